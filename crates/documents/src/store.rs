use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use lavka_catalog::ProductCatalog;
use lavka_core::{DocumentId, DomainError, DomainResult};

use crate::document::{Document, DocumentItem, DocumentStatus, DocumentType};

/// One line of a vendor's purchase history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorPurchaseRow {
    pub date: NaiveDate,
    pub product_name: String,
    pub qty: Decimal,
    pub price: Decimal,
    pub total: Decimal,
}

/// In-memory document store.
///
/// Owns the document lifecycle: drafts are created and validated here, status
/// changes go through the transition table, and nothing is ever deleted.
/// Ledger effects are the posting engine's concern.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: BTreeMap<DocumentId, Document>,
    next_id: u64,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a draft document. Every line is validated up front: at least one
    /// item, positive quantities, non-negative prices, and known products.
    pub fn create_draft(
        &mut self,
        doc_type: DocumentType,
        date: NaiveDate,
        partner: Option<String>,
        items: Vec<DocumentItem>,
        catalog: &ProductCatalog,
    ) -> DomainResult<Document> {
        if items.is_empty() {
            return Err(DomainError::validation(format!(
                "{doc_type} document must contain at least one item"
            )));
        }
        for item in &items {
            if item.qty <= Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "item quantity must be positive (product {}, qty {})",
                    item.product_id, item.qty
                )));
            }
            if item.price < Decimal::ZERO {
                return Err(DomainError::validation(format!(
                    "item price cannot be negative (product {}, price {})",
                    item.product_id, item.price
                )));
            }
            if !catalog.contains(item.product_id) {
                return Err(DomainError::validation(format!(
                    "item references unknown product {}",
                    item.product_id
                )));
            }
        }

        self.next_id += 1;
        let doc = Document {
            id: DocumentId::new(self.next_id),
            doc_type,
            number: None,
            date,
            partner: partner.filter(|p| !p.trim().is_empty()),
            status: DocumentStatus::Draft,
            items,
        };
        self.docs.insert(doc.id, doc.clone());
        Ok(doc)
    }

    pub fn get(&self, id: DocumentId) -> DomainResult<&Document> {
        self.docs
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("document {id}")))
    }

    /// Discard a draft: direct `draft -> canceled`, no ledger effect.
    pub fn discard(&mut self, id: DocumentId) -> DomainResult<Document> {
        let doc = self.get_mut(id)?;
        if doc.status != DocumentStatus::Draft {
            return Err(DomainError::invalid_state(format!(
                "document {id} is {}, only drafts can be discarded",
                doc.status
            )));
        }
        doc.transition(DocumentStatus::Canceled)?;
        Ok(doc.clone())
    }

    /// Mark a document posted and stamp its number. Called by the posting
    /// engine after all ledger preconditions have been validated.
    pub fn mark_posted(&mut self, id: DocumentId, number: String) -> DomainResult<Document> {
        let doc = self.get_mut(id)?;
        doc.transition(DocumentStatus::Posted)?;
        doc.number = Some(number);
        Ok(doc.clone())
    }

    /// Mark a posted document canceled. Called by the posting engine after it
    /// has reversed the document's ledger effect.
    pub fn mark_canceled(&mut self, id: DocumentId) -> DomainResult<Document> {
        let doc = self.get_mut(id)?;
        doc.transition(DocumentStatus::Canceled)?;
        Ok(doc.clone())
    }

    /// Distinct partners of non-canceled purchase documents, most recent
    /// first (document date, then creation order), capped at `limit`.
    pub fn recent_vendors(&self, limit: usize) -> Vec<String> {
        let mut vendors = Vec::new();
        for doc in self.purchases_most_recent_first() {
            let Some(partner) = doc.partner() else { continue };
            if !vendors.iter().any(|v| v == partner) {
                vendors.push(partner.to_string());
            }
            if vendors.len() == limit {
                break;
            }
        }
        vendors
    }

    /// Purchase lines for one vendor, most recent document first.
    pub fn vendor_history(
        &self,
        vendor: &str,
        limit: usize,
        catalog: &ProductCatalog,
    ) -> DomainResult<Vec<VendorPurchaseRow>> {
        let mut rows = Vec::new();
        for doc in self.purchases_most_recent_first() {
            if doc.partner() != Some(vendor) {
                continue;
            }
            for item in doc.items() {
                if rows.len() == limit {
                    return Ok(rows);
                }
                let product = catalog.get(item.product_id)?;
                rows.push(VendorPurchaseRow {
                    date: doc.date(),
                    product_name: product.name.clone(),
                    qty: item.qty,
                    price: item.price,
                    total: item.line_total(),
                });
            }
        }
        Ok(rows)
    }

    fn get_mut(&mut self, id: DocumentId) -> DomainResult<&mut Document> {
        self.docs
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("document {id}")))
    }

    /// Non-canceled purchase documents ordered by date descending, then
    /// creation order descending.
    fn purchases_most_recent_first(&self) -> Vec<&Document> {
        let mut purchases: Vec<&Document> = self
            .docs
            .values()
            .filter(|d| d.doc_type() == DocumentType::Purchase)
            .filter(|d| d.status() != DocumentStatus::Canceled)
            .collect();
        purchases.sort_by(|a, b| b.date().cmp(&a.date()).then_with(|| b.id.cmp(&a.id)));
        purchases
    }
}
