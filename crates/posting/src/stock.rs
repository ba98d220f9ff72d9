use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lavka_core::{DomainError, DomainResult, ProductId};

/// Per-product stock position: on-hand quantity and weighted-average unit
/// cost. Both are projections of posted documents, recomputable from the
/// document history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    pub qty_on_hand: Decimal,
    pub avg_cost: Decimal,
}

impl StockLevel {
    /// Receive a purchase line, recomputing the weighted-average cost:
    /// `new_avg = (old_qty * old_avg + qty * price) / (old_qty + qty)`,
    /// with an empty position taking the incoming price directly.
    pub fn receive(&mut self, qty: Decimal, price: Decimal) {
        let new_qty = self.qty_on_hand + qty;
        self.avg_cost = if self.qty_on_hand.is_zero() {
            price
        } else {
            (self.qty_on_hand * self.avg_cost + qty * price) / new_qty
        };
        self.qty_on_hand = new_qty;
    }

    /// Issue a sale line. Negative stock is never allowed; the average cost
    /// is untouched (cost basis derives only from purchases).
    pub fn issue(&mut self, qty: Decimal) -> DomainResult<()> {
        if self.qty_on_hand < qty {
            return Err(DomainError::insufficient_stock(format!(
                "on hand {}, requested {}",
                self.qty_on_hand, qty
            )));
        }
        self.qty_on_hand -= qty;
        Ok(())
    }
}

/// Per-product running stock levels.
///
/// Mutable access is crate-private: only the posting engine writes here.
#[derive(Debug, Default)]
pub struct StockLedger {
    levels: HashMap<ProductId, StockLevel>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level for a product; a product that never moved is at zero.
    pub fn snapshot(&self, product_id: ProductId) -> StockLevel {
        self.levels.get(&product_id).copied().unwrap_or_default()
    }

    pub(crate) fn set(&mut self, product_id: ProductId, level: StockLevel) {
        self.levels.insert(product_id, level);
    }
}
