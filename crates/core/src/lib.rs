//! `lavka-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no HTTP or storage
//! concerns): the error taxonomy, strongly-typed identifiers, and the
//! `Entity` seam the other crates implement.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, ProductId, TransactionId};
