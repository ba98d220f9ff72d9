//! `lavka-treasury` — cash/bank transaction log and balances.
//!
//! Append-only by design: there is no edit or reversal operation, corrections
//! are new offsetting transactions.

pub mod ledger;

pub use ledger::{Account, Direction, TreasuryBalance, TreasuryLedger, TreasuryTransaction};
