//! # Testing and Certification Costs
//!
//! Entries of the testing-cost table and the predicate deciding which
//! products they apply to.

use crate::domain::entities::catalog::CatalogProduct;
use crate::domain::errors::DomainResult;
use crate::domain::value_objects::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which products a testing cost applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Applicability {
    /// Every product.
    All,
    /// Products whose category equals the value (case-insensitive).
    Category {
        /// Category tag to match.
        category: String,
    },
    /// Products that declare the attribute, whatever its value.
    HasAttribute {
        /// Attribute name.
        attribute: String,
    },
    /// Products whose attribute equals the value (case-insensitive).
    AttributeEquals {
        /// Attribute name.
        attribute: String,
        /// Expected value.
        value: String,
    },
}

impl Applicability {
    /// Returns true if the predicate holds for the product.
    #[must_use]
    pub fn applies_to(&self, product: &CatalogProduct) -> bool {
        match self {
            Self::All => true,
            Self::Category { category } => product.category.eq_ignore_ascii_case(category),
            Self::HasAttribute { attribute } => product.attributes.contains_key(attribute),
            Self::AttributeEquals { attribute, value } => product
                .attribute(attribute)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value.trim())),
        }
    }
}

/// One testing or certification charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestingCost {
    /// Test or certification name, e.g. `"Type test"`.
    pub name: String,
    /// Flat amount, or amount per unit when `per_unit` is set.
    pub amount: Money,
    /// Charge per unit of quantity instead of once per line.
    #[serde(default)]
    pub per_unit: bool,
    /// Products the charge applies to.
    pub applies_to: Applicability,
}

impl TestingCost {
    /// Flat charge applied once per matching line.
    #[must_use]
    pub fn flat(name: impl Into<String>, amount: Money, applies_to: Applicability) -> Self {
        Self {
            name: name.into(),
            amount,
            per_unit: false,
            applies_to,
        }
    }

    /// Charge applied per unit of quantity.
    #[must_use]
    pub fn per_unit(name: impl Into<String>, amount: Money, applies_to: Applicability) -> Self {
        Self {
            name: name.into(),
            amount,
            per_unit: true,
            applies_to,
        }
    }

    /// Cost of this entry for a line of the given quantity.
    ///
    /// # Errors
    ///
    /// Returns an arithmetic error on overflow.
    pub fn cost_for(&self, quantity: Decimal) -> DomainResult<Money> {
        if self.per_unit {
            self.amount.safe_mul(quantity)
        } else {
            Ok(self.amount)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cable() -> CatalogProduct {
        CatalogProduct::new("C-1", "Cable", "Cables", Money::from_units(10))
            .with_attribute("insulation", "XLPE")
    }

    #[test]
    fn applicability_predicates() {
        let p = cable();
        assert!(Applicability::All.applies_to(&p));
        assert!(Applicability::Category { category: "cables".into() }.applies_to(&p));
        assert!(!Applicability::Category { category: "wires".into() }.applies_to(&p));
        assert!(Applicability::HasAttribute { attribute: "insulation".into() }.applies_to(&p));
        assert!(
            Applicability::AttributeEquals {
                attribute: "insulation".into(),
                value: "xlpe".into()
            }
            .applies_to(&p)
        );
        assert!(
            !Applicability::AttributeEquals {
                attribute: "armour".into(),
                value: "steel".into()
            }
            .applies_to(&p)
        );
    }

    #[test]
    fn flat_and_per_unit_costs() {
        let flat = TestingCost::flat("Type test", Money::from_units(5_000), Applicability::All);
        assert_eq!(flat.cost_for(Decimal::from(300)).unwrap(), Money::from_units(5_000));

        let per_unit = TestingCost::per_unit("Routine test", Money::from_units(2), Applicability::All);
        assert_eq!(per_unit.cost_for(Decimal::from(300)).unwrap(), Money::from_units(600));
    }

    #[test]
    fn serde_shape() {
        let json = r#"{"name":"Type test","amount":"5000","applies_to":{"kind":"category","category":"cables"}}"#;
        let cost: TestingCost = serde_json::from_str(json).unwrap();
        assert!(!cost.per_unit);
        assert_eq!(
            cost.applies_to,
            Applicability::Category { category: "cables".into() }
        );
    }
}
