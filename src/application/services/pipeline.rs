//! # Decision Pipeline
//!
//! Runs Selector → Matcher → Estimator → Consolidator in sequence.
//!
//! [`DecisionEngine`] validates every component configuration up front, so a
//! bad configuration fails before any candidate is looked at. Each stage
//! consumes only the previous stage's output; the inputs are never mutated.
//!
//! # Examples
//!
//! ```
//! use rfp_engine::application::services::pipeline::{run_pipeline, PipelineConfig};
//! use rfp_engine::domain::entities::{Catalog, CatalogProduct, Requirement, Solicitation};
//! use rfp_engine::domain::value_objects::{AttributeRequirement, Money, OrganizationClass};
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let requirement = Requirement::builder("R1", "XLPE cable", 100)
//!     .attribute("insulation", AttributeRequirement::exact("XLPE"))
//!     .build()
//!     .unwrap();
//! let solicitation = Solicitation::builder(
//!     "S1", "Cable supply", "City Utility", OrganizationClass::Public,
//!     NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), Money::from_units(50_000),
//! )
//! .requirement(requirement)
//! .build();
//! let catalog = Catalog::new(vec![
//!     CatalogProduct::new("C-1", "Cable", "cables", Money::from_units(10))
//!         .with_attribute("insulation", "XLPE"),
//! ])
//! .unwrap();
//!
//! let config = PipelineConfig::default().with_evaluation_date(as_of);
//! let record = run_pipeline(&[solicitation], &catalog, &[], &config).unwrap();
//! assert_eq!(record.items_matched(), 1);
//! ```

use crate::application::services::consolidator::{
    Consolidator, RecommendationThresholds, ResponseRecord,
};
use crate::application::services::estimator::{Estimator, EstimatorConfig, LineItem};
use crate::application::services::matcher::{MatchConfig, Matcher};
use crate::application::services::selector::{SelectionConfig, SelectionOutcome, Selector};
use crate::domain::entities::catalog::Catalog;
use crate::domain::entities::solicitation::Solicitation;
use crate::domain::entities::testing_cost::TestingCost;
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

/// Configuration of a full pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Date deadlines are measured from. `None` means today (UTC).
    pub evaluation_date: Option<NaiveDate>,
    /// Selector settings.
    pub selection: SelectionConfig,
    /// Matcher settings.
    pub matching: MatchConfig,
    /// Estimator settings.
    pub estimation: EstimatorConfig,
    /// Recommendation thresholds.
    pub recommendation: RecommendationThresholds,
}

impl PipelineConfig {
    /// Pins the evaluation date.
    #[must_use]
    pub fn with_evaluation_date(mut self, date: NaiveDate) -> Self {
        self.evaluation_date = Some(date);
        self
    }

    /// Sets the selector settings.
    #[must_use]
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the matcher settings.
    #[must_use]
    pub fn with_matching(mut self, matching: MatchConfig) -> Self {
        self.matching = matching;
        self
    }

    /// Sets the estimator settings.
    #[must_use]
    pub fn with_estimation(mut self, estimation: EstimatorConfig) -> Self {
        self.estimation = estimation;
        self
    }

    /// Sets the recommendation thresholds.
    #[must_use]
    pub fn with_recommendation(mut self, recommendation: RecommendationThresholds) -> Self {
        self.recommendation = recommendation;
        self
    }
}

/// The four components wired together.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    selector: Selector,
    matcher: Matcher,
    estimator: Estimator,
    consolidator: Consolidator,
    evaluation_date: Option<NaiveDate>,
}

impl DecisionEngine {
    /// Builds every component from the configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Config` from the first invalid component
    /// configuration.
    pub fn new(config: &PipelineConfig) -> DomainResult<Self> {
        Ok(Self {
            selector: Selector::new(config.selection.clone())?,
            matcher: Matcher::new(config.matching)?,
            estimator: Estimator::new(&config.estimation)?,
            consolidator: Consolidator::new(config.recommendation)?,
            evaluation_date: config.evaluation_date,
        })
    }

    /// Returns the selector.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Returns the matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Returns the estimator.
    #[must_use]
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Returns the consolidator.
    #[must_use]
    pub fn consolidator(&self) -> &Consolidator {
        &self.consolidator
    }

    /// Date this engine evaluates deadlines against.
    #[must_use]
    pub fn evaluation_date(&self) -> NaiveDate {
        self.evaluation_date
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Runs the full pipeline.
    ///
    /// "No eligible candidate" and "no viable match" are reported in the
    /// record, not as errors.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `candidates` is empty, or any
    /// pricing error.
    pub fn run(
        &self,
        candidates: &[Solicitation],
        catalog: &Catalog,
        testing_costs: &[TestingCost],
    ) -> DomainResult<ResponseRecord> {
        if candidates.is_empty() {
            return Err(DomainError::validation("candidate set must not be empty"));
        }
        let as_of = self.evaluation_date();
        let span = info_span!("pipeline", %as_of, candidates = candidates.len());
        let _guard = span.enter();

        let selection = self.selector.select(candidates, as_of);
        let record = match selection.best().map(|s| s.solicitation.clone()) {
            Some(chosen) => self.process(&chosen, selection, catalog, testing_costs)?,
            None => {
                info!("no eligible opportunity");
                self.consolidator
                    .consolidate(selection, Vec::new(), Default::default())
            }
        };

        info!(
            response_id = %record.response_id(),
            recommendation = %record.recommendation(),
            "pipeline complete"
        );
        Ok(record)
    }

    fn process(
        &self,
        chosen: &Solicitation,
        selection: SelectionOutcome,
        catalog: &Catalog,
        testing_costs: &[TestingCost],
    ) -> DomainResult<ResponseRecord> {
        info!(solicitation = %chosen.id(), requirements = chosen.requirements().len(), "processing");
        let matches = self
            .matcher
            .match_all(chosen.requirements(), catalog.products());
        let items: Vec<LineItem> = matches.iter().filter_map(LineItem::from_top_match).collect();
        let pricing = self.estimator.estimate(&items, testing_costs)?;
        Ok(self.consolidator.consolidate(selection, matches, pricing))
    }
}

/// Builds a [`DecisionEngine`] and runs it once.
///
/// # Errors
///
/// Returns `DomainError::Config` for an invalid configuration, or any error
/// from [`DecisionEngine::run`].
pub fn run_pipeline(
    candidates: &[Solicitation],
    catalog: &Catalog,
    testing_costs: &[TestingCost],
    config: &PipelineConfig,
) -> DomainResult<ResponseRecord> {
    DecisionEngine::new(config)?.run(candidates, catalog, testing_costs)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::selector::SelectionWeights;
    use crate::domain::entities::catalog::CatalogProduct;
    use crate::domain::entities::solicitation::Requirement;
    use crate::domain::value_objects::{Money, OrganizationClass, RecommendationLabel};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn config() -> PipelineConfig {
        PipelineConfig::default().with_evaluation_date(as_of())
    }

    #[test]
    fn invalid_config_fails_fast() {
        let bad = config().with_selection(
            SelectionConfig::default().with_weights(SelectionWeights::new(1.0, 1.0, 0.0, 0.0)),
        );
        assert!(DecisionEngine::new(&bad).unwrap_err().is_config());
    }

    #[test]
    fn empty_candidates_is_validation_error() {
        let catalog = Catalog::default();
        let err = run_pipeline(&[], &catalog, &[], &config()).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn unmatched_requirement_is_a_gap_not_an_error() {
        let requirement = Requirement::builder("R1", "transformer", 2)
            .attribute(
                "rating",
                crate::domain::value_objects::AttributeRequirement::minimum("500 kW"),
            )
            .build()
            .unwrap();
        let solicitation = Solicitation::builder(
            "S1",
            "t",
            "o",
            OrganizationClass::Private,
            as_of() + chrono::Duration::days(10),
            Money::from_units(100),
        )
        .requirement(requirement)
        .build();
        let catalog = Catalog::new(vec![CatalogProduct::new(
            "C-1",
            "Cable",
            "cables",
            Money::from_units(5),
        )])
        .unwrap();

        let record = run_pipeline(&[solicitation], &catalog, &[], &config()).unwrap();
        assert_eq!(record.gaps().len(), 1);
        assert!(record.pricing().is_empty());
        assert_eq!(record.recommendation(), RecommendationLabel::NotRecommended);
    }

    #[test]
    fn evaluation_date_defaults_to_today() {
        let engine = DecisionEngine::new(&PipelineConfig::default()).unwrap();
        let today = Utc::now().date_naive();
        assert!((engine.evaluation_date() - today).num_days().abs() <= 1);
    }
}
