use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lavka_core::{DomainError, DomainResult, Entity, TransactionId};

/// Where the money sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Account {
    Cash,
    Bank,
}

/// Money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// One treasury movement. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTransaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub account: Account,
    pub direction: Direction,
    pub amount: Decimal,
    pub counterparty: Option<String>,
    pub note: Option<String>,
}

impl TreasuryTransaction {
    /// Amount with the direction's sign applied.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::In => self.amount,
            Direction::Out => -self.amount,
        }
    }
}

impl Entity for TreasuryTransaction {
    type Id = TransactionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Balances per account, plus their sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryBalance {
    pub cash: Decimal,
    pub bank: Decimal,
    pub total: Decimal,
}

/// Append-only cash/bank transaction log.
///
/// Balances are a pure fold over all recorded transactions, independent of
/// the inventory side of the system.
#[derive(Debug, Default)]
pub struct TreasuryLedger {
    txns: Vec<TreasuryTransaction>,
    next_id: u64,
}

impl TreasuryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a movement. The amount must be strictly positive.
    pub fn record(
        &mut self,
        date: NaiveDate,
        account: Account,
        direction: Direction,
        amount: Decimal,
        counterparty: Option<String>,
        note: Option<String>,
    ) -> DomainResult<TreasuryTransaction> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::validation(format!(
                "amount must be positive, got {amount}"
            )));
        }

        self.next_id += 1;
        let txn = TreasuryTransaction {
            id: TransactionId::new(self.next_id),
            date,
            account,
            direction,
            amount,
            counterparty: counterparty.filter(|c| !c.trim().is_empty()),
            note: note.filter(|n| !n.trim().is_empty()),
        };
        self.txns.push(txn.clone());
        Ok(txn)
    }

    /// Fold all transactions into per-account balances.
    pub fn balance(&self) -> TreasuryBalance {
        let mut balance = TreasuryBalance::default();
        for txn in &self.txns {
            let signed = txn.signed_amount();
            match txn.account {
                Account::Cash => balance.cash += signed,
                Account::Bank => balance.bank += signed,
            }
        }
        balance.total = balance.cash + balance.bank;
        balance
    }

    /// Most recent transactions first: date descending, ties kept in
    /// insertion order (stable sort).
    pub fn recent(&self, limit: usize) -> Vec<TreasuryTransaction> {
        let mut rows = self.txns.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        rows.truncate(limit);
        rows
    }

    pub fn len(&self) -> usize {
        self.txns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.txns.is_empty()
    }
}
