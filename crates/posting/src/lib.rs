//! `lavka-posting` — stock ledger and the document posting engine.
//!
//! The stock ledger (per-product quantity + weighted-average cost) is owned
//! and exclusively mutated by [`PostingEngine`]; everything else reads it
//! through [`StockLedger::snapshot`].

pub mod engine;
pub mod stock;

pub use engine::PostingEngine;
pub use stock::{StockLedger, StockLevel};
