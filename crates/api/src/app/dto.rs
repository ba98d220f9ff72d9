use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lavka_catalog::Product;
use lavka_core::ProductId;
use lavka_documents::{Document, DocumentItem};
use lavka_posting::StockLevel;
use lavka_treasury::{Account, Direction};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub sku: Option<String>,
    pub unit: Option<String>,
    pub barcode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentItemRequest {
    pub product_id: ProductId,
    pub qty: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequest {
    pub date: NaiveDate,
    pub partner: Option<String>,
    pub items: Vec<DocumentItemRequest>,
}

/// Sale date is optional; the engine defaults it to today.
#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub date: Option<NaiveDate>,
    pub partner: Option<String>,
    pub items: Vec<DocumentItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct TreasuryTxnRequest {
    pub date: NaiveDate,
    pub account: Account,
    pub direction: Direction,
    pub amount: Decimal,
    pub counterparty: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VendorHistoryParams {
    pub vendor: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<usize>,
}

impl DocumentItemRequest {
    pub fn into_item(self) -> DocumentItem {
        DocumentItem {
            product_id: self.product_id,
            qty: self.qty,
            price: self.price,
        }
    }
}

pub fn into_items(items: Vec<DocumentItemRequest>) -> Vec<DocumentItem> {
    items.into_iter().map(DocumentItemRequest::into_item).collect()
}

// -------------------------
// Response DTOs
// -------------------------

/// Product with its current stock projection mixed in.
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub unit: Option<String>,
    pub barcode: Option<String>,
    pub qty_on_hand: Decimal,
    pub avg_cost: Decimal,
}

impl ProductResponse {
    pub fn from_parts(product: &Product, level: StockLevel) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            sku: product.sku.clone(),
            unit: product.unit.clone(),
            barcode: product.barcode.clone(),
            qty_on_hand: level.qty_on_hand,
            avg_cost: level.avg_cost,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentItemResponse {
    pub product_id: ProductId,
    pub qty: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: u64,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub number: Option<String>,
    pub date: NaiveDate,
    pub partner: Option<String>,
    pub status: String,
    pub total: Decimal,
    pub items: Vec<DocumentItemResponse>,
}

impl From<&Document> for DocumentResponse {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id_typed().as_u64(),
            doc_type: doc.doc_type().to_string(),
            number: doc.number().map(str::to_string),
            date: doc.date(),
            partner: doc.partner().map(str::to_string),
            status: doc.status().to_string(),
            total: doc.total(),
            items: doc
                .items()
                .iter()
                .map(|item| DocumentItemResponse {
                    product_id: item.product_id,
                    qty: item.qty,
                    price: item.price,
                })
                .collect(),
        }
    }
}
