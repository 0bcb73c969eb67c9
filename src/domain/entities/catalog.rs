//! # Product Catalog
//!
//! The seller's sellable products with technical attributes and prices.
//!
//! A [`Catalog`] is loaded once per run and shared read-only by every
//! matcher invocation; nothing in the engine holds a mutable reference to it.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, Sku};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogProduct {
    /// Unique key.
    pub sku: Sku,
    /// Display name.
    pub name: String,
    /// Technical attributes keyed by attribute name.
    pub attributes: BTreeMap<String, String>,
    /// Price per unit.
    pub unit_price: Money,
    /// Category tag, e.g. `"cables"`.
    pub category: String,
    /// Manufacturer, if recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
}

impl CatalogProduct {
    /// Creates a product without attributes.
    #[must_use]
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        Self {
            sku: Sku::new(sku),
            name: name.into(),
            attributes: BTreeMap::new(),
            unit_price,
            category: category.into(),
            manufacturer: None,
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the manufacturer.
    #[must_use]
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Returns an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

impl fmt::Display for CatalogProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) @ {}", self.sku, self.name, self.unit_price)
    }
}

/// A catalog of products with unique SKUs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<CatalogProduct>,
}

impl Catalog {
    /// Creates a catalog.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if two products share a SKU.
    pub fn new(products: Vec<CatalogProduct>) -> DomainResult<Self> {
        {
            let mut seen = BTreeSet::new();
            for product in &products {
                if !seen.insert(&product.sku) {
                    return Err(DomainError::validation(format!(
                        "duplicate SKU in catalog: {}",
                        product.sku
                    )));
                }
            }
        }
        Ok(Self { products })
    }

    /// Returns the products in load order.
    #[must_use]
    pub fn products(&self) -> &[CatalogProduct] {
        &self.products
    }

    /// Looks up a product by SKU.
    #[must_use]
    pub fn get(&self, sku: &Sku) -> Option<&CatalogProduct> {
        self.products.iter().find(|p| &p.sku == sku)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(sku: &str) -> CatalogProduct {
        CatalogProduct::new(sku, "Cable", "cables", Money::from_units(100))
            .with_attribute("insulation", "XLPE")
    }

    #[test]
    fn rejects_duplicate_skus() {
        let err = Catalog::new(vec![product("A"), product("A")]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn lookup_by_sku() {
        let catalog = Catalog::new(vec![product("A"), product("B")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(&Sku::new("B")).is_some());
        assert!(catalog.get(&Sku::new("C")).is_none());
        assert_eq!(catalog.products()[0].attribute("insulation"), Some("XLPE"));
    }

    #[test]
    fn empty_catalog_is_valid() {
        assert!(Catalog::new(Vec::new()).unwrap().is_empty());
    }
}
