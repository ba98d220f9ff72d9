use std::collections::{BTreeMap, HashMap};

use lavka_catalog::ProductCatalog;
use lavka_core::{DocumentId, DomainError, DomainResult, ProductId};
use lavka_documents::{Document, DocumentStatus, DocumentStore, DocumentType};

use crate::stock::{StockLedger, StockLevel};

/// Transitions documents between draft/posted/canceled and applies (or
/// reverses) their effect on the stock ledger.
///
/// Posting is atomic per document: every line is first applied to a staged
/// copy of the affected levels, and the ledger is only written once all
/// lines pass. At post time the engine records each affected product's
/// pre-post [`StockLevel`]; `unpost` restores those snapshots verbatim, which
/// makes the reversal exact even though the weighted-average cost is not
/// recomputable from the post-state alone.
#[derive(Debug, Default)]
pub struct PostingEngine {
    ledger: StockLedger,
    snapshots: HashMap<DocumentId, Vec<(ProductId, StockLevel)>>,
    purchase_seq: u64,
    sale_seq: u64,
}

impl PostingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the stock ledger.
    pub fn ledger(&self) -> &StockLedger {
        &self.ledger
    }

    /// Post a draft document: validate every line, stamp a sequential
    /// per-type number, apply the ledger effect.
    pub fn post(
        &mut self,
        docs: &mut DocumentStore,
        catalog: &ProductCatalog,
        id: DocumentId,
    ) -> DomainResult<Document> {
        let doc = docs.get(id)?;
        if doc.status() != DocumentStatus::Draft {
            return Err(DomainError::invalid_state(format!(
                "document {id} is {}, only drafts can be posted",
                doc.status()
            )));
        }
        let doc_type = doc.doc_type();
        let items = doc.items().to_vec();

        // Stage all lines before touching the ledger. Lines for the same
        // product accumulate on one staged level, so a sale is checked
        // against the cumulative quantity.
        let mut staged: BTreeMap<ProductId, StockLevel> = BTreeMap::new();
        for item in &items {
            if !catalog.contains(item.product_id) {
                return Err(DomainError::not_found(format!("product {}", item.product_id)));
            }
            let level = staged
                .entry(item.product_id)
                .or_insert_with(|| self.ledger.snapshot(item.product_id));
            match doc_type {
                DocumentType::Purchase => level.receive(item.qty, item.price),
                DocumentType::Sale => level.issue(item.qty).map_err(|e| match e {
                    DomainError::InsufficientStock(msg) => DomainError::insufficient_stock(
                        format!("product {}: {msg}", item.product_id),
                    ),
                    other => other,
                })?,
            }
        }

        let pre_post: Vec<(ProductId, StockLevel)> = staged
            .keys()
            .map(|&product_id| (product_id, self.ledger.snapshot(product_id)))
            .collect();

        let posted = docs.mark_posted(id, self.next_number(doc_type))?;

        for (&product_id, &level) in &staged {
            self.ledger.set(product_id, level);
        }
        self.snapshots.insert(id, pre_post);

        Ok(posted)
    }

    /// Unpost a posted document: restore the pre-post stock levels and mark
    /// it canceled (terminal).
    pub fn unpost(&mut self, docs: &mut DocumentStore, id: DocumentId) -> DomainResult<Document> {
        let doc = docs.get(id)?;
        if doc.status() != DocumentStatus::Posted {
            return Err(DomainError::invalid_state(format!(
                "document {id} is {}, only posted documents can be unposted",
                doc.status()
            )));
        }
        if !self.snapshots.contains_key(&id) {
            return Err(DomainError::invalid_state(format!(
                "document {id} has no posting snapshot"
            )));
        }

        let canceled = docs.mark_canceled(id)?;

        // Restore the snapshot verbatim; the pre-post levels are the exact
        // reversal of both quantity and average cost.
        for (product_id, level) in self.snapshots.remove(&id).unwrap_or_default() {
            self.ledger.set(product_id, level);
        }

        Ok(canceled)
    }

    fn next_number(&mut self, doc_type: DocumentType) -> String {
        match doc_type {
            DocumentType::Purchase => {
                self.purchase_seq += 1;
                format!("PUR-{:06}", self.purchase_seq)
            }
            DocumentType::Sale => {
                self.sale_seq += 1;
                format!("SAL-{:06}", self.sale_seq)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lavka_documents::DocumentItem;
    use rust_decimal::Decimal;

    struct Fixture {
        catalog: ProductCatalog,
        docs: DocumentStore,
        engine: PostingEngine,
    }

    fn fixture(products: &[&str]) -> Fixture {
        let mut catalog = ProductCatalog::new();
        for name in products {
            catalog.create(*name, None, None, None).unwrap();
        }
        Fixture {
            catalog,
            docs: DocumentStore::new(),
            engine: PostingEngine::new(),
        }
    }

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn item(product: u64, qty: i64, price_cents: i64) -> DocumentItem {
        DocumentItem {
            product_id: ProductId::new(product),
            qty: Decimal::from(qty),
            price: Decimal::new(price_cents, 2),
        }
    }

    fn draft(fx: &mut Fixture, doc_type: DocumentType, items: Vec<DocumentItem>) -> DocumentId {
        fx.docs
            .create_draft(doc_type, test_date(), None, items, &fx.catalog)
            .unwrap()
            .id_typed()
    }

    fn post(fx: &mut Fixture, id: DocumentId) -> DomainResult<Document> {
        fx.engine.post(&mut fx.docs, &fx.catalog, id)
    }

    #[test]
    fn purchase_sale_unpost_scenario() {
        // Worked example: P starts at qty=0, avg=0.
        let mut fx = fixture(&["P"]);
        let p = ProductId::new(1);

        // Purchase 10 @ 5.00.
        let buy1 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 500)]);
        post(&mut fx, buy1).unwrap();
        let level = fx.engine.ledger().snapshot(p);
        assert_eq!(level.qty_on_hand, Decimal::from(10));
        assert_eq!(level.avg_cost, Decimal::new(500, 2));

        // Purchase 10 @ 7.00 -> avg 6.00.
        let buy2 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 700)]);
        post(&mut fx, buy2).unwrap();
        let level = fx.engine.ledger().snapshot(p);
        assert_eq!(level.qty_on_hand, Decimal::from(20));
        assert_eq!(level.avg_cost, Decimal::new(600, 2));

        // Sale of 5 at any price: qty drops, avg unchanged.
        let sale = draft(&mut fx, DocumentType::Sale, vec![item(1, 5, 999)]);
        post(&mut fx, sale).unwrap();
        let level = fx.engine.ledger().snapshot(p);
        assert_eq!(level.qty_on_hand, Decimal::from(15));
        assert_eq!(level.avg_cost, Decimal::new(600, 2));

        // Unpost the sale: qty back to 20.
        let canceled = fx.engine.unpost(&mut fx.docs, sale).unwrap();
        assert_eq!(canceled.status(), DocumentStatus::Canceled);
        let level = fx.engine.ledger().snapshot(p);
        assert_eq!(level.qty_on_hand, Decimal::from(20));
        assert_eq!(level.avg_cost, Decimal::new(600, 2));

        // Sale of 25 fails, ledger untouched.
        let too_big = draft(&mut fx, DocumentType::Sale, vec![item(1, 25, 999)]);
        let err = post(&mut fx, too_big).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(fx.engine.ledger().snapshot(p).qty_on_hand, Decimal::from(20));
        assert_eq!(fx.docs.get(too_big).unwrap().status(), DocumentStatus::Draft);
    }

    #[test]
    fn posting_assigns_sequential_numbers_scoped_by_type() {
        let mut fx = fixture(&["P"]);
        let buy1 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 500)]);
        let buy2 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 500)]);
        let sale = draft(&mut fx, DocumentType::Sale, vec![item(1, 1, 900)]);

        assert_eq!(post(&mut fx, buy1).unwrap().number(), Some("PUR-000001"));
        assert_eq!(post(&mut fx, buy2).unwrap().number(), Some("PUR-000002"));
        assert_eq!(post(&mut fx, sale).unwrap().number(), Some("SAL-000001"));
    }

    #[test]
    fn posting_twice_fails_and_applies_effect_once() {
        let mut fx = fixture(&["P"]);
        let buy = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 500)]);
        post(&mut fx, buy).unwrap();

        let err = post(&mut fx, buy).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        let level = fx.engine.ledger().snapshot(ProductId::new(1));
        assert_eq!(level.qty_on_hand, Decimal::from(10));
    }

    #[test]
    fn unposting_requires_posted_status() {
        let mut fx = fixture(&["P"]);
        let buy = draft(&mut fx, DocumentType::Purchase, vec![item(1, 10, 500)]);

        let err = fx.engine.unpost(&mut fx.docs, buy).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));

        post(&mut fx, buy).unwrap();
        fx.engine.unpost(&mut fx.docs, buy).unwrap();

        // Canceled is terminal: no second unpost.
        let err = fx.engine.unpost(&mut fx.docs, buy).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
    }

    #[test]
    fn unpost_restores_average_cost_snapshot_exactly() {
        let mut fx = fixture(&["P"]);
        let p = ProductId::new(1);

        let buy1 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 3, 199)]);
        post(&mut fx, buy1).unwrap();
        let before = fx.engine.ledger().snapshot(p);

        let buy2 = draft(&mut fx, DocumentType::Purchase, vec![item(1, 7, 331)]);
        post(&mut fx, buy2).unwrap();
        assert_ne!(fx.engine.ledger().snapshot(p), before);

        fx.engine.unpost(&mut fx.docs, buy2).unwrap();
        assert_eq!(fx.engine.ledger().snapshot(p), before);
    }

    #[test]
    fn multi_line_sale_validates_cumulatively_before_mutating() {
        let mut fx = fixture(&["A", "B"]);
        let buy = draft(
            &mut fx,
            DocumentType::Purchase,
            vec![item(1, 10, 500), item(2, 10, 300)],
        );
        post(&mut fx, buy).unwrap();

        // Two lines of product A totaling 12 exceed the 10 on hand, even
        // though each line alone would fit. Product B's valid line must not
        // be applied either.
        let sale = draft(
            &mut fx,
            DocumentType::Sale,
            vec![item(2, 1, 400), item(1, 6, 900), item(1, 6, 900)],
        );
        let err = post(&mut fx, sale).unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock(_)));
        assert_eq!(fx.engine.ledger().snapshot(ProductId::new(1)).qty_on_hand, Decimal::from(10));
        assert_eq!(fx.engine.ledger().snapshot(ProductId::new(2)).qty_on_hand, Decimal::from(10));
    }

    #[test]
    fn multi_line_purchase_folds_lines_in_order() {
        let mut fx = fixture(&["P"]);
        let buy = draft(
            &mut fx,
            DocumentType::Purchase,
            vec![item(1, 10, 500), item(1, 10, 700)],
        );
        post(&mut fx, buy).unwrap();
        let level = fx.engine.ledger().snapshot(ProductId::new(1));
        assert_eq!(level.qty_on_hand, Decimal::from(20));
        assert_eq!(level.avg_cost, Decimal::new(600, 2));
    }

    #[test]
    fn posting_unknown_document_is_not_found() {
        let mut fx = fixture(&["P"]);
        let err = post(&mut fx, DocumentId::new(42)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn purchase_lines() -> impl Strategy<Value = Vec<(i64, i64)>> {
            // (qty, price in cents), both positive.
            prop::collection::vec((1i64..500, 1i64..100_000), 1..12)
        }

        proptest! {
            /// The weighted average is bounded by the purchase prices seen.
            #[test]
            fn average_cost_stays_within_price_bounds(lines in purchase_lines()) {
                let mut fx = fixture(&["P"]);
                for (qty, price) in &lines {
                    let id = draft(&mut fx, DocumentType::Purchase, vec![item(1, *qty, *price)]);
                    post(&mut fx, id).unwrap();
                }
                let level = fx.engine.ledger().snapshot(ProductId::new(1));
                let min = lines.iter().map(|(_, p)| *p).min().unwrap();
                let max = lines.iter().map(|(_, p)| *p).max().unwrap();
                prop_assert!(level.avg_cost >= Decimal::new(min, 2));
                prop_assert!(level.avg_cost <= Decimal::new(max, 2));
                let total_qty: i64 = lines.iter().map(|(q, _)| *q).sum();
                prop_assert_eq!(level.qty_on_hand, Decimal::from(total_qty));
            }

            /// Post followed by unpost is an exact round trip for any prior
            /// purchase history.
            #[test]
            fn unpost_is_exact_inverse_of_post(
                history in purchase_lines(),
                qty in 1i64..500,
                price in 1i64..100_000,
            ) {
                let mut fx = fixture(&["P"]);
                for (q, p) in &history {
                    let id = draft(&mut fx, DocumentType::Purchase, vec![item(1, *q, *p)]);
                    post(&mut fx, id).unwrap();
                }
                let before = fx.engine.ledger().snapshot(ProductId::new(1));

                let id = draft(&mut fx, DocumentType::Purchase, vec![item(1, qty, price)]);
                post(&mut fx, id).unwrap();
                fx.engine.unpost(&mut fx.docs, id).unwrap();

                prop_assert_eq!(fx.engine.ledger().snapshot(ProductId::new(1)), before);
            }
        }
    }
}
