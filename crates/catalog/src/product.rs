use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lavka_core::{DomainError, DomainResult, Entity, ProductId};

/// Catalog entry: identity and metadata only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: Option<String>,
    pub unit: Option<String>,
    pub barcode: Option<String>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// In-memory product catalog.
///
/// Keyed by id in an ordered map, so `list` iterates id-ascending (creation
/// order) without sorting. Products are never deleted.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: BTreeMap<ProductId, Product>,
    next_id: u64,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new product. The name must be non-blank; a missing or blank
    /// unit defaults to `"pcs"`.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        sku: Option<String>,
        unit: Option<String>,
        barcode: Option<String>,
    ) -> DomainResult<Product> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }

        self.next_id += 1;
        let product = Product {
            id: ProductId::new(self.next_id),
            name,
            sku: none_if_blank(sku),
            unit: Some(none_if_blank(unit).unwrap_or_else(|| "pcs".to_string())),
            barcode: none_if_blank(barcode),
        };
        self.products.insert(product.id, product.clone());
        Ok(product)
    }

    /// All products, id ascending.
    pub fn list(&self) -> Vec<Product> {
        self.products.values().cloned().collect()
    }

    pub fn get(&self, id: ProductId) -> DomainResult<&Product> {
        self.products
            .get(&id)
            .ok_or_else(|| DomainError::not_found(format!("product {id}")))
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.products.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn none_if_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assigns_sequential_ids() {
        let mut catalog = ProductCatalog::new();
        let a = catalog.create("Flour", None, None, None).unwrap();
        let b = catalog.create("Sugar", None, None, None).unwrap();
        assert_eq!(a.id, ProductId::new(1));
        assert_eq!(b.id, ProductId::new(2));
    }

    #[test]
    fn create_rejects_blank_name() {
        let mut catalog = ProductCatalog::new();
        let err = catalog.create("   ", None, None, None).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn unit_defaults_to_pcs_and_blank_fields_are_dropped() {
        let mut catalog = ProductCatalog::new();
        let p = catalog
            .create("Salt", Some(" ".to_string()), None, Some(String::new()))
            .unwrap();
        assert_eq!(p.unit.as_deref(), Some("pcs"));
        assert_eq!(p.sku, None);
        assert_eq!(p.barcode, None);

        let q = catalog
            .create("Rice", Some("R-1".to_string()), Some("kg".to_string()), None)
            .unwrap();
        assert_eq!(q.unit.as_deref(), Some("kg"));
        assert_eq!(q.sku.as_deref(), Some("R-1"));
    }

    #[test]
    fn list_is_ordered_by_id_ascending() {
        let mut catalog = ProductCatalog::new();
        for name in ["C", "A", "B"] {
            catalog.create(name, None, None, None).unwrap();
        }
        let ids: Vec<u64> = catalog.list().iter().map(|p| p.id.as_u64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn get_unknown_product_is_not_found() {
        let catalog = ProductCatalog::new();
        let err = catalog.get(ProductId::new(99)).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
