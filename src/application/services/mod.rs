//! # Application Services
//!
//! The decision engine's components and the pipeline wiring them together.
//!
//! - [`Selector`]: Filters and ranks candidate solicitations
//! - [`Matcher`]: Matches requirements to catalog products
//! - [`Estimator`]: Prices matched lines, with a pluggable [`LogisticsPolicy`]
//! - [`Consolidator`]: Builds the [`ResponseRecord`]
//! - [`DecisionEngine`] / [`run_pipeline`]: Runs all four in sequence

pub mod consolidator;
pub mod estimator;
pub mod logistics;
pub mod matcher;
pub mod pipeline;
pub mod selector;

pub use consolidator::{Consolidator, RecommendationThresholds, ResponseRecord};
pub use estimator::{
    DiscountSchedule, DiscountTier, Estimator, EstimatorConfig, LineItem, PriceBreakdown,
    PriceLine,
};
pub use logistics::{
    FlatFee, LogisticsConfig, LogisticsContext, LogisticsPolicy, PerUnit, PerWeight,
    PercentageOfSubtotal,
};
pub use matcher::{AttributeComparison, MatchConfig, MatchResult, Matcher, ProductMatch};
pub use pipeline::{run_pipeline, DecisionEngine, PipelineConfig};
pub use selector::{
    Exclusion, ScoreBreakdown, ScoredSolicitation, SelectionConfig, SelectionOutcome,
    SelectionWeights, Selector,
};
