use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lavka_core::{DocumentId, DomainError, DomainResult, Entity, ProductId};

/// Document kind. Purchases receive stock, sales issue it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Purchase,
    Sale,
}

impl core::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DocumentType::Purchase => f.write_str("purchase"),
            DocumentType::Sale => f.write_str("sale"),
        }
    }
}

/// Document status lifecycle.
///
/// `draft -> posted -> canceled`, or `draft -> canceled` (discard).
/// `canceled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Draft,
    Posted,
    Canceled,
}

impl DocumentStatus {
    /// Transition table; anything not listed here is rejected.
    pub fn can_transition(self, to: DocumentStatus) -> bool {
        use DocumentStatus::*;
        matches!((self, to), (Draft, Posted) | (Draft, Canceled) | (Posted, Canceled))
    }
}

impl core::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DocumentStatus::Draft => f.write_str("draft"),
            DocumentStatus::Posted => f.write_str("posted"),
            DocumentStatus::Canceled => f.write_str("canceled"),
        }
    }
}

/// Document line: product reference, quantity (> 0), unit price (>= 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentItem {
    pub product_id: ProductId,
    pub qty: Decimal,
    pub price: Decimal,
}

impl DocumentItem {
    pub fn line_total(&self) -> Decimal {
        self.qty * self.price
    }
}

/// A purchase or sale document.
///
/// `total` is always derived from the items; `number` is assigned by the
/// posting engine when the document is posted. Items are immutable once
/// posted (nothing mutates them after draft creation here at all).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub(crate) id: DocumentId,
    pub(crate) doc_type: DocumentType,
    pub(crate) number: Option<String>,
    pub(crate) date: NaiveDate,
    pub(crate) partner: Option<String>,
    pub(crate) status: DocumentStatus,
    pub(crate) items: Vec<DocumentItem>,
}

impl Document {
    pub fn id_typed(&self) -> DocumentId {
        self.id
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn partner(&self) -> Option<&str> {
        self.partner.as_deref()
    }

    pub fn status(&self) -> DocumentStatus {
        self.status
    }

    pub fn items(&self) -> &[DocumentItem] {
        &self.items
    }

    /// Sum of `qty * price` over all items, at any status.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(DocumentItem::line_total).sum()
    }

    pub(crate) fn transition(&mut self, to: DocumentStatus) -> DomainResult<()> {
        if !self.status.can_transition(to) {
            return Err(DomainError::invalid_state(format!(
                "document {} is {}, cannot transition to {}",
                self.id, self.status, to
            )));
        }
        self.status = to;
        Ok(())
    }
}

impl Entity for Document {
    type Id = DocumentId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
