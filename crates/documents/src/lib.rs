//! `lavka-documents` — purchase/sale document lifecycle.
//!
//! Documents are created as drafts, may be posted exactly once, and may be
//! canceled (discarded from draft, or unposted from posted). They are never
//! deleted; cancellation is a status change.

pub mod document;
pub mod store;

pub use document::{Document, DocumentItem, DocumentStatus, DocumentType};
pub use store::{DocumentStore, VendorPurchaseRow};
