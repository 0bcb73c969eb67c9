//! # rfp-engine
//!
//! Decision engine for B2B procurement solicitations.
//!
//! Given candidate solicitations, a product catalog and a testing-cost
//! table, the engine:
//!
//! 1. **Selects** the most attractive eligible solicitation by weighted
//!    multi-factor scoring
//! 2. **Matches** each of its requirements to catalog products by attribute
//!    comparison with unit normalisation
//! 3. **Estimates** the cost of the matched lines with tiered quantity
//!    discounts, testing, logistics and margin
//! 4. **Consolidates** everything into one immutable response record with a
//!    compliance percentage and a recommendation label
//!
//! # Layers
//!
//! - [`domain`]: Records, value objects and errors; no I/O
//! - [`application`]: The four components and the pipeline
//! - [`infrastructure`]: JSON loading, layered settings, tracing setup
//!
//! # Example
//!
//! ```
//! use rfp_engine::prelude::*;
//! use chrono::NaiveDate;
//!
//! let as_of = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! let solicitation = Solicitation::builder(
//!     "S1", "Cable supply", "City Utility", OrganizationClass::Public,
//!     NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(), Money::from_units(1_000_000),
//! )
//! .requirement(Requirement::builder("R1", "XLPE cable", 1_200).build().unwrap())
//! .build();
//! let catalog = Catalog::new(vec![CatalogProduct::new("C-1", "Cable", "cables", Money::from_units(8))])
//!     .unwrap();
//!
//! let config = PipelineConfig::default().with_evaluation_date(as_of);
//! let record = run_pipeline(&[solicitation], &catalog, &[], &config).unwrap();
//! assert_eq!(record.recommendation(), RecommendationLabel::Recommended);
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

/// Commonly used types.
pub mod prelude {
    pub use crate::application::batch::{evaluate_files, InputFiles};
    pub use crate::application::error::{ApplicationError, ApplicationResult};
    pub use crate::application::services::{
        run_pipeline, Consolidator, DecisionEngine, Estimator, EstimatorConfig, MatchConfig,
        MatchResult, Matcher, PipelineConfig, PriceBreakdown, RecommendationThresholds,
        ResponseRecord, SelectionConfig, SelectionOutcome, SelectionWeights, Selector,
    };
    pub use crate::domain::entities::{
        Applicability, Catalog, CatalogProduct, Requirement, Solicitation, TestingCost,
    };
    pub use crate::domain::errors::{DomainError, DomainResult};
    pub use crate::domain::value_objects::{
        AttributeRequirement, AttributeRule, ComparisonOutcome, Money, OrganizationClass,
        RecommendationLabel,
    };
}
