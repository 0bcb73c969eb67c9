//! # Logistics Policies
//!
//! Pluggable policies computing the logistics charge of one priced line.
//!
//! | Policy | Charge |
//! |--------|--------|
//! | [`PercentageOfSubtotal`] | `rate × discounted subtotal` |
//! | [`FlatFee`] | fixed amount per line |
//! | [`PerUnit`] | `rate × quantity` |
//! | [`PerWeight`] | `rate × quantity × unit weight` (weight read from a product attribute) |
//!
//! Policies are selected from configuration through [`LogisticsConfig`].

use crate::domain::entities::catalog::CatalogProduct;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Dimension, Measurement, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Inputs available to a logistics policy for one line.
#[derive(Debug, Clone, Copy)]
pub struct LogisticsContext<'a> {
    /// Product being shipped.
    pub product: &'a CatalogProduct,
    /// Line quantity.
    pub quantity: Decimal,
    /// Subtotal after quantity discount, before testing.
    pub discounted_subtotal: Money,
}

/// Computes the logistics charge of a line.
pub trait LogisticsPolicy: Send + Sync + fmt::Debug {
    /// Returns the charge for the line.
    ///
    /// # Errors
    ///
    /// Returns an error if the charge cannot be computed for this product
    /// or overflows.
    fn cost(&self, ctx: &LogisticsContext<'_>) -> DomainResult<Money>;

    /// Returns the policy name.
    fn name(&self) -> &'static str;
}

/// Charge proportional to the discounted subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentageOfSubtotal {
    rate: Decimal,
}

impl PercentageOfSubtotal {
    /// Creates the policy. `rate` is a fraction, e.g. `0.02` for 2%.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the rate is negative.
    pub fn new(rate: Decimal) -> DomainResult<Self> {
        if rate.is_sign_negative() {
            return Err(DomainError::config(format!(
                "logistics rate must be non-negative, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    /// Returns the rate.
    #[must_use]
    #[inline]
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}

impl LogisticsPolicy for PercentageOfSubtotal {
    fn cost(&self, ctx: &LogisticsContext<'_>) -> DomainResult<Money> {
        ctx.discounted_subtotal.safe_mul(self.rate)
    }

    fn name(&self) -> &'static str {
        "PercentageOfSubtotal"
    }
}

/// Fixed charge per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatFee {
    amount: Money,
}

impl FlatFee {
    /// Creates the policy.
    #[must_use]
    pub fn new(amount: Money) -> Self {
        Self { amount }
    }
}

impl LogisticsPolicy for FlatFee {
    fn cost(&self, _ctx: &LogisticsContext<'_>) -> DomainResult<Money> {
        Ok(self.amount)
    }

    fn name(&self) -> &'static str {
        "FlatFee"
    }
}

/// Charge per unit of quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerUnit {
    rate: Money,
}

impl PerUnit {
    /// Creates the policy.
    #[must_use]
    pub fn new(rate: Money) -> Self {
        Self { rate }
    }
}

impl LogisticsPolicy for PerUnit {
    fn cost(&self, ctx: &LogisticsContext<'_>) -> DomainResult<Money> {
        self.rate.safe_mul(ctx.quantity)
    }

    fn name(&self) -> &'static str {
        "PerUnit"
    }
}

/// Charge per kilogram shipped.
///
/// The unit weight is read from a product attribute such as
/// `"weight": "1.2 kg"`; any mass unit is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerWeight {
    rate_per_kg: Money,
    weight_attribute: String,
}

impl PerWeight {
    /// Creates the policy.
    #[must_use]
    pub fn new(rate_per_kg: Money, weight_attribute: impl Into<String>) -> Self {
        Self {
            rate_per_kg,
            weight_attribute: weight_attribute.into(),
        }
    }
}

impl LogisticsPolicy for PerWeight {
    fn cost(&self, ctx: &LogisticsContext<'_>) -> DomainResult<Money> {
        let weight = ctx
            .product
            .attribute(&self.weight_attribute)
            .and_then(Measurement::parse)
            .filter(|m| m.dimension == Dimension::Mass)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "product {} has no mass in attribute '{}'",
                    ctx.product.sku, self.weight_attribute
                ))
            })?;
        self.rate_per_kg
            .safe_mul(ctx.quantity)?
            .safe_mul(weight.magnitude)
    }

    fn name(&self) -> &'static str {
        "PerWeight"
    }
}

/// Default logistics rate (2% of the discounted subtotal).
#[must_use]
pub fn default_logistics_rate() -> Decimal {
    Decimal::new(2, 2)
}

/// Serializable selection of a logistics policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum LogisticsConfig {
    /// See [`PercentageOfSubtotal`].
    PercentageOfSubtotal {
        /// Fraction of the discounted subtotal.
        rate: Decimal,
    },
    /// See [`FlatFee`].
    FlatFee {
        /// Amount per line.
        amount: Money,
    },
    /// See [`PerUnit`].
    PerUnit {
        /// Amount per unit.
        rate: Money,
    },
    /// See [`PerWeight`].
    PerWeight {
        /// Amount per kilogram.
        rate_per_kg: Money,
        /// Product attribute holding the unit weight.
        #[serde(default = "default_weight_attribute")]
        weight_attribute: String,
    },
}

fn default_weight_attribute() -> String {
    "weight".to_string()
}

impl Default for LogisticsConfig {
    fn default() -> Self {
        Self::PercentageOfSubtotal {
            rate: default_logistics_rate(),
        }
    }
}

impl LogisticsConfig {
    /// Builds the configured policy.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the policy parameters are invalid.
    pub fn build(&self) -> DomainResult<Arc<dyn LogisticsPolicy>> {
        let policy: Arc<dyn LogisticsPolicy> = match self {
            Self::PercentageOfSubtotal { rate } => Arc::new(PercentageOfSubtotal::new(*rate)?),
            Self::FlatFee { amount } => Arc::new(FlatFee::new(*amount)),
            Self::PerUnit { rate } => Arc::new(PerUnit::new(*rate)),
            Self::PerWeight {
                rate_per_kg,
                weight_attribute,
            } => {
                if weight_attribute.trim().is_empty() {
                    return Err(DomainError::config("weight_attribute must not be empty"));
                }
                Arc::new(PerWeight::new(*rate_per_kg, weight_attribute.clone()))
            }
        };
        Ok(policy)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ctx(product: &CatalogProduct, qty: i64, subtotal: u64) -> LogisticsContext<'_> {
        LogisticsContext {
            product,
            quantity: Decimal::from(qty),
            discounted_subtotal: Money::from_units(subtotal),
        }
    }

    fn drum() -> CatalogProduct {
        CatalogProduct::new("D-1", "Drum", "cables", Money::from_units(10))
            .with_attribute("weight", "1500 g")
    }

    #[test]
    fn percentage_of_subtotal() {
        let p = drum();
        let policy = PercentageOfSubtotal::new(default_logistics_rate()).unwrap();
        assert_eq!(policy.cost(&ctx(&p, 10, 1_000)).unwrap(), Money::from_units(20));
        assert_eq!(policy.name(), "PercentageOfSubtotal");
    }

    #[test]
    fn negative_rate_rejected() {
        assert!(PercentageOfSubtotal::new(Decimal::new(-1, 2)).unwrap_err().is_config());
    }

    #[test]
    fn flat_and_per_unit() {
        let p = drum();
        assert_eq!(
            FlatFee::new(Money::from_units(250)).cost(&ctx(&p, 10, 0)).unwrap(),
            Money::from_units(250)
        );
        assert_eq!(
            PerUnit::new(Money::from_units(3)).cost(&ctx(&p, 10, 0)).unwrap(),
            Money::from_units(30)
        );
    }

    #[test]
    fn per_weight_normalises_units() {
        let p = drum();
        let policy = PerWeight::new(Money::from_units(2), "weight");
        // 10 units × 1.5 kg × 2
        assert_eq!(policy.cost(&ctx(&p, 10, 0)).unwrap(), Money::from_units(30));
    }

    #[test]
    fn per_weight_requires_mass() {
        let p = drum().with_attribute("weight", "heavy");
        let err = PerWeight::new(Money::from_units(2), "weight")
            .cost(&ctx(&p, 1, 0))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn config_serde_and_build() {
        let config: LogisticsConfig =
            serde_json::from_str(r#"{"policy":"flat-fee","amount":"100"}"#).unwrap();
        assert_eq!(config.build().unwrap().name(), "FlatFee");
        assert_eq!(
            LogisticsConfig::default().build().unwrap().name(),
            "PercentageOfSubtotal"
        );

        let weight: LogisticsConfig =
            serde_json::from_str(r#"{"policy":"per-weight","rate_per_kg":"1"}"#).unwrap();
        assert_eq!(weight.build().unwrap().name(), "PerWeight");
    }
}
