//! # Cost Estimator
//!
//! Prices each matched line and aggregates a total.
//!
//! ```text
//! base                   = unit_price × quantity
//! discounted_subtotal    = base × (1 − tier_rate)
//! testing                = Σ applicable testing costs
//! logistics              = policy(line)
//! subtotal_before_margin = discounted_subtotal + testing + logistics
//! margin                 = subtotal_before_margin × margin_rate
//! final_total            = subtotal_before_margin + margin
//! ```
//!
//! All arithmetic is exact decimal. Amounts are rounded to two places only
//! when displayed.

use crate::application::services::logistics::{LogisticsConfig, LogisticsContext, LogisticsPolicy};
use crate::application::services::matcher::{MatchResult, ProductMatch};
use crate::domain::entities::testing_cost::TestingCost;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CheckedArithmetic, Money, RequirementId, Sku};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Label used when no discount tier applies.
pub const NO_TIER_LABEL: &str = "none";

/// Default margin rate (10%).
#[must_use]
pub fn default_margin_rate() -> Decimal {
    Decimal::new(10, 2)
}

/// A quantity discount tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTier {
    /// Label reported on priced lines.
    pub label: String,
    /// Smallest quantity the tier applies to.
    pub min_quantity: i64,
    /// Discount as a fraction in `[0, 1)`.
    pub rate: Decimal,
}

impl DiscountTier {
    /// Creates a tier.
    #[must_use]
    pub fn new(label: impl Into<String>, min_quantity: i64, rate: Decimal) -> Self {
        Self {
            label: label.into(),
            min_quantity,
            rate,
        }
    }
}

/// Default tiers: 1000+ → 5%, 5000+ → 8%, 10000+ → 12%.
#[must_use]
pub fn default_discount_tiers() -> Vec<DiscountTier> {
    vec![
        DiscountTier::new("1000-4999", 1_000, Decimal::new(5, 2)),
        DiscountTier::new("5000-9999", 5_000, Decimal::new(8, 2)),
        DiscountTier::new("10000+", 10_000, Decimal::new(12, 2)),
    ]
}

/// Validated, ascending set of discount tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountSchedule {
    tiers: Vec<DiscountTier>,
}

impl DiscountSchedule {
    /// Creates a schedule.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if thresholds are not strictly
    /// ascending, a threshold is not positive, or a rate is outside `[0, 1)`.
    pub fn new(tiers: Vec<DiscountTier>) -> DomainResult<Self> {
        for tier in &tiers {
            if tier.min_quantity <= 0 {
                return Err(DomainError::config(format!(
                    "discount tier '{}' must have a positive min_quantity",
                    tier.label
                )));
            }
            if tier.rate.is_sign_negative() || tier.rate >= Decimal::ONE {
                return Err(DomainError::config(format!(
                    "discount tier '{}' rate must be within [0, 1), got {}",
                    tier.label, tier.rate
                )));
            }
        }
        if tiers
            .windows(2)
            .any(|w| matches!(w, [a, b] if a.min_quantity >= b.min_quantity))
        {
            return Err(DomainError::config(
                "discount tiers must have strictly ascending min_quantity",
            ));
        }
        Ok(Self { tiers })
    }

    /// Returns the tier with the highest threshold not above the quantity.
    #[must_use]
    pub fn tier_for(&self, quantity: i64) -> Option<&DiscountTier> {
        self.tiers.iter().rev().find(|t| quantity >= t.min_quantity)
    }

    /// Returns the tiers in ascending order.
    #[must_use]
    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self {
            tiers: default_discount_tiers(),
        }
    }
}

/// Configuration for the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Quantity discount tiers, ascending.
    pub discount_tiers: Vec<DiscountTier>,
    /// Margin as a fraction of the pre-margin subtotal.
    pub margin_rate: Decimal,
    /// Logistics policy.
    pub logistics: LogisticsConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            discount_tiers: default_discount_tiers(),
            margin_rate: default_margin_rate(),
            logistics: LogisticsConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Sets the discount tiers.
    #[must_use]
    pub fn with_discount_tiers(mut self, tiers: Vec<DiscountTier>) -> Self {
        self.discount_tiers = tiers;
        self
    }

    /// Sets the margin rate.
    #[must_use]
    pub fn with_margin_rate(mut self, rate: Decimal) -> Self {
        self.margin_rate = rate;
        self
    }

    /// Sets the logistics policy.
    #[must_use]
    pub fn with_logistics(mut self, logistics: LogisticsConfig) -> Self {
        self.logistics = logistics;
        self
    }
}

/// One line to price: a requirement, its chosen product and the quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// Requirement being priced.
    pub requirement_id: RequirementId,
    /// Chosen product.
    pub product_match: ProductMatch,
    /// Quantity to price.
    pub quantity: i64,
}

impl LineItem {
    /// Builds a line from the top match of a requirement, if any.
    #[must_use]
    pub fn from_top_match(result: &MatchResult) -> Option<Self> {
        result.best().map(|best| Self {
            requirement_id: result.requirement_id.clone(),
            product_match: best.clone(),
            quantity: result.quantity,
        })
    }
}

/// A fully priced line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceLine {
    /// Requirement priced.
    pub requirement_id: RequirementId,
    /// Product priced.
    pub sku: Sku,
    /// Product name.
    pub product_name: String,
    /// Match percentage of the product.
    pub match_percentage: f64,
    /// Quantity priced.
    pub quantity: i64,
    /// Catalog unit price.
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub base_cost: Money,
    /// Applied discount tier label, or `"none"`.
    pub discount_tier: String,
    /// Applied discount rate.
    pub discount_rate: Decimal,
    /// Base cost after discount.
    pub discounted_subtotal: Money,
    /// Sum of applicable testing costs.
    pub testing_cost: Money,
    /// Names of the testing costs applied.
    pub applied_tests: Vec<String>,
    /// Logistics charge.
    pub logistics_cost: Money,
    /// Discounted subtotal plus testing and logistics.
    pub subtotal_before_margin: Money,
    /// Margin rate applied.
    pub margin_rate: Decimal,
    /// Margin amount.
    pub margin_amount: Money,
    /// Line total including margin.
    pub final_total: Money,
}

impl PriceLine {
    /// Returns true if the line's components add up and the margin equals
    /// the subtotal times the margin rate. Overflow counts as inconsistent.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let subtotal = self.subtotal_before_margin.get();
        let components = self
            .discounted_subtotal
            .get()
            .safe_add(self.testing_cost.get())
            .and_then(|sum| sum.safe_add(self.logistics_cost.get()));
        let margin = subtotal.safe_mul(self.margin_rate);
        let total = subtotal.safe_add(self.margin_amount.get());

        components == Ok(subtotal)
            && margin == Ok(self.margin_amount.get())
            && total == Ok(self.final_total.get())
    }
}

impl fmt::Display for PriceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} x{} base={} discount={}({}) testing={} logistics={} margin={} total={}",
            self.requirement_id,
            self.sku,
            self.quantity,
            self.base_cost,
            self.discount_tier,
            self.discount_rate,
            self.testing_cost,
            self.logistics_cost,
            self.margin_amount,
            self.final_total
        )
    }
}

/// Priced lines and the grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceBreakdown {
    /// Priced lines in input order.
    pub lines: Vec<PriceLine>,
    /// Sum of line totals.
    pub total: Money,
    /// Sum of line margins.
    pub total_margin: Money,
}

impl PriceBreakdown {
    /// Returns true if nothing was priced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for PriceBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "TOTAL {} (margin {})", self.total, self.total_margin)
    }
}

/// Prices matched lines.
#[derive(Debug, Clone)]
pub struct Estimator {
    schedule: DiscountSchedule,
    margin_rate: Decimal,
    logistics: Arc<dyn LogisticsPolicy>,
}

impl Estimator {
    /// Creates an estimator.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the tiers, margin rate or logistics
    /// policy are invalid.
    pub fn new(config: &EstimatorConfig) -> DomainResult<Self> {
        if config.margin_rate.is_sign_negative() {
            return Err(DomainError::config(format!(
                "margin_rate must be non-negative, got {}",
                config.margin_rate
            )));
        }
        Ok(Self {
            schedule: DiscountSchedule::new(config.discount_tiers.clone())?,
            margin_rate: config.margin_rate,
            logistics: config.logistics.build()?,
        })
    }

    /// Replaces the logistics policy.
    #[must_use]
    pub fn with_logistics_policy(mut self, policy: Arc<dyn LogisticsPolicy>) -> Self {
        self.logistics = policy;
        self
    }

    /// Returns the discount schedule.
    #[must_use]
    pub fn schedule(&self) -> &DiscountSchedule {
        &self.schedule
    }

    /// Returns the margin rate.
    #[must_use]
    pub fn margin_rate(&self) -> Decimal {
        self.margin_rate
    }

    /// Returns the logistics policy.
    #[must_use]
    pub fn logistics(&self) -> &dyn LogisticsPolicy {
        self.logistics.as_ref()
    }

    /// Prices one line.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a non-positive quantity, or an
    /// error from the logistics policy or on overflow.
    pub fn price_line(
        &self,
        item: &LineItem,
        testing_costs: &[TestingCost],
    ) -> DomainResult<PriceLine> {
        if item.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "quantity for {} must be positive, got {}",
                item.requirement_id, item.quantity
            )));
        }
        let product = &item.product_match.product;
        let quantity = Decimal::from(item.quantity);

        let base_cost = product.unit_price.safe_mul(quantity)?;
        let (discount_tier, discount_rate) = self
            .schedule
            .tier_for(item.quantity)
            .map_or((NO_TIER_LABEL.to_string(), Decimal::ZERO), |t| {
                (t.label.clone(), t.rate)
            });
        let discounted_subtotal = base_cost.safe_mul(Decimal::ONE - discount_rate)?;

        let mut testing_cost = Money::ZERO;
        let mut applied_tests = Vec::new();
        for cost in testing_costs.iter().filter(|c| c.applies_to.applies_to(product)) {
            testing_cost = testing_cost.safe_add(cost.cost_for(quantity)?)?;
            applied_tests.push(cost.name.clone());
        }

        let logistics_cost = self.logistics.cost(&LogisticsContext {
            product,
            quantity,
            discounted_subtotal,
        })?;

        let subtotal_before_margin = discounted_subtotal
            .safe_add(testing_cost)?
            .safe_add(logistics_cost)?;
        let margin_amount = subtotal_before_margin.safe_mul(self.margin_rate)?;
        let final_total = subtotal_before_margin.safe_add(margin_amount)?;

        debug!(
            requirement = %item.requirement_id,
            sku = %product.sku,
            tier = %discount_tier,
            total = %final_total,
            "line priced"
        );

        Ok(PriceLine {
            requirement_id: item.requirement_id.clone(),
            sku: product.sku.clone(),
            product_name: product.name.clone(),
            match_percentage: item.product_match.match_percentage,
            quantity: item.quantity,
            unit_price: product.unit_price,
            base_cost,
            discount_tier,
            discount_rate,
            discounted_subtotal,
            testing_cost,
            applied_tests,
            logistics_cost,
            subtotal_before_margin,
            margin_rate: self.margin_rate,
            margin_amount,
            final_total,
        })
    }

    /// Prices every line and sums the totals.
    ///
    /// # Errors
    ///
    /// Returns the first error from [`Estimator::price_line`].
    pub fn estimate(
        &self,
        items: &[LineItem],
        testing_costs: &[TestingCost],
    ) -> DomainResult<PriceBreakdown> {
        let mut breakdown = PriceBreakdown::default();
        for item in items {
            let line = self.price_line(item, testing_costs)?;
            breakdown.total = breakdown.total.safe_add(line.final_total)?;
            breakdown.total_margin = breakdown.total_margin.safe_add(line.margin_amount)?;
            breakdown.lines.push(line);
        }
        info!(
            lines = breakdown.lines.len(),
            total = %breakdown.total,
            logistics = self.logistics.name(),
            "estimate complete"
        );
        Ok(breakdown)
    }
}
