//! `lavka-catalog` — product identity and metadata.
//!
//! Stock quantities and valuation are **not** stored here; they are
//! projections over posted documents and live in `lavka-posting`.

pub mod product;

pub use product::{Product, ProductCatalog};
