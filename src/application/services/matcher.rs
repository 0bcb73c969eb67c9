//! # Requirement Matcher
//!
//! Maps each requirement of a solicitation to the best-fitting catalog
//! products.
//!
//! A product's match percentage is the share of required attributes it
//! satisfies, times 100. A requirement without attributes matches every
//! product at 100%. Products below the configured threshold are dropped and
//! the rest are ranked:
//!
//! 1. Match percentage (descending)
//! 2. Unit price (ascending)
//! 3. SKU (ascending)
//!
//! At most `max_recommendations` products are returned per requirement.

use crate::domain::entities::catalog::CatalogProduct;
use crate::domain::entities::solicitation::Requirement;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    round_score, AttributeRule, ComparisonOutcome, Money, RequirementId, Sku,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use tracing::{debug, warn};

/// Default minimum match percentage.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 30.0;

/// Default number of products kept per requirement.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 3;

/// Configuration for the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Products below this percentage are dropped.
    pub match_threshold: f64,
    /// Maximum products kept per requirement.
    pub max_recommendations: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
        }
    }
}

impl MatchConfig {
    /// Sets the threshold.
    #[must_use]
    pub fn with_match_threshold(mut self, threshold: f64) -> Self {
        self.match_threshold = threshold;
        self
    }

    /// Sets the number of products kept per requirement.
    #[must_use]
    pub fn with_max_recommendations(mut self, max: usize) -> Self {
        self.max_recommendations = max;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the threshold is outside 0–100 or
    /// `max_recommendations` is zero.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.match_threshold.is_finite() || !(0.0..=100.0).contains(&self.match_threshold) {
            return Err(DomainError::config(format!(
                "match_threshold must be within 0-100, got {}",
                self.match_threshold
            )));
        }
        if self.max_recommendations == 0 {
            return Err(DomainError::config("max_recommendations must be at least 1"));
        }
        Ok(())
    }
}

/// Outcome of comparing one required attribute against a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeComparison {
    /// Attribute name.
    pub attribute: String,
    /// Required value as written.
    pub required: String,
    /// Catalog value, if the product declares the attribute.
    pub offered: Option<String>,
    /// Rule used for the comparison.
    pub rule: AttributeRule,
    /// Result of the comparison.
    pub outcome: ComparisonOutcome,
}

impl AttributeComparison {
    /// Returns true if the attribute counts toward the match percentage.
    #[must_use]
    #[inline]
    pub fn is_satisfied(&self) -> bool {
        self.outcome.is_satisfied()
    }
}

/// A catalog product paired with its match percentage for one requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMatch {
    /// The matched product.
    pub product: CatalogProduct,
    /// Share of satisfied attributes, 0–100, rounded to 2 decimal places.
    pub match_percentage: f64,
    /// Per-attribute comparison detail, ordered by attribute name.
    pub comparisons: Vec<AttributeComparison>,
}

impl ProductMatch {
    /// SKU of the matched product.
    #[must_use]
    #[inline]
    pub fn sku(&self) -> &Sku {
        &self.product.sku
    }

    /// Unit price of the matched product.
    #[must_use]
    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.unit_price
    }

    /// Number of satisfied attributes.
    #[must_use]
    pub fn satisfied_count(&self) -> usize {
        self.comparisons.iter().filter(|c| c.is_satisfied()).count()
    }

    /// Unrounded share of satisfied attributes, 0–100.
    #[must_use]
    pub fn exact_percentage(&self) -> f64 {
        satisfied_ratio(self.satisfied_count(), self.comparisons.len())
    }
}

impl fmt::Display for ProductMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2}% ({}/{})",
            self.product.sku,
            self.match_percentage,
            self.satisfied_count(),
            self.comparisons.len()
        )
    }
}

/// Ranked products for one requirement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The requirement matched.
    pub requirement_id: RequirementId,
    /// Required quantity, carried for pricing and compliance weighting.
    pub quantity: i64,
    /// Products at or above the threshold, best first.
    pub matches: Vec<ProductMatch>,
}

impl MatchResult {
    /// Best product, if any met the threshold.
    #[must_use]
    pub fn best(&self) -> Option<&ProductMatch> {
        self.matches.first()
    }

    /// Match percentage of the best product, 0 when nothing matched.
    #[must_use]
    pub fn top_match_percentage(&self) -> f64 {
        self.best().map_or(0.0, |m| m.match_percentage)
    }

    /// Returns true if no product met the threshold.
    #[must_use]
    pub fn is_gap(&self) -> bool {
        self.matches.is_empty()
    }
}

fn satisfied_ratio(satisfied: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        satisfied as f64 / total as f64 * 100.0
    }
}

/// Matches requirements against the catalog.
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Creates a matcher.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` if the configuration is invalid.
    pub fn new(config: MatchConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Compares every required attribute against one product.
    #[must_use]
    pub fn score_product(&self, requirement: &Requirement, product: &CatalogProduct) -> ProductMatch {
        let comparisons: Vec<AttributeComparison> = requirement
            .attributes()
            .iter()
            .map(|(name, required)| {
                let offered = product.attribute(name);
                let outcome = offered.map_or(ComparisonOutcome::Missing, |value| {
                    required.evaluate(value)
                });
                AttributeComparison {
                    attribute: name.clone(),
                    required: required.value.clone(),
                    offered: offered.map(str::to_owned),
                    rule: required.rule,
                    outcome,
                }
            })
            .collect();

        let satisfied = comparisons.iter().filter(|c| c.is_satisfied()).count();
        let match_percentage = round_score(satisfied_ratio(satisfied, comparisons.len()));

        ProductMatch {
            product: product.clone(),
            match_percentage,
            comparisons,
        }
    }

    /// Ranks catalog products for one requirement.
    ///
    /// An empty catalog, or one where nothing meets the threshold, yields a
    /// result with no matches.
    #[must_use]
    pub fn match_requirement(
        &self,
        requirement: &Requirement,
        catalog: &[CatalogProduct],
    ) -> MatchResult {
        let mut matches: Vec<ProductMatch> = catalog
            .iter()
            .map(|product| self.score_product(requirement, product))
            .filter(|m| m.exact_percentage() >= self.config.match_threshold)
            .collect();

        matches.sort_by(compare_matches);
        matches.truncate(self.config.max_recommendations);

        if matches.is_empty() {
            warn!(
                requirement = %requirement.id(),
                catalog_size = catalog.len(),
                threshold = self.config.match_threshold,
                "no product meets the match threshold"
            );
        } else {
            debug!(
                requirement = %requirement.id(),
                kept = matches.len(),
                top = matches.first().map_or(0.0, |m| m.match_percentage),
                "requirement matched"
            );
        }

        MatchResult {
            requirement_id: requirement.id().clone(),
            quantity: requirement.quantity(),
            matches,
        }
    }

    /// Ranks catalog products for every requirement, in requirement order.
    #[must_use]
    pub fn match_all(
        &self,
        requirements: &[Requirement],
        catalog: &[CatalogProduct],
    ) -> Vec<MatchResult> {
        requirements
            .iter()
            .map(|r| self.match_requirement(r, catalog))
            .collect()
    }
}

/// Percentage descending, then price ascending, then SKU ascending.
fn compare_matches(a: &ProductMatch, b: &ProductMatch) -> Ordering {
    b.match_percentage
        .total_cmp(&a.match_percentage)
        .then_with(|| a.unit_price().cmp(&b.unit_price()))
        .then_with(|| a.sku().cmp(b.sku()))
}
