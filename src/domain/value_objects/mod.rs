//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`SolicitationId`], [`RequirementId`], [`Sku`], [`CriterionId`]: String-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Money`]: Non-negative fixed-point currency amount
//!
//! ## Arithmetic
//!
//! - [`ArithmeticError`]: Error type for arithmetic failures
//! - [`CheckedArithmetic`]: Trait for safe arithmetic operations
//! - [`round_currency`]: Two-decimal display rounding
//!
//! ## Attributes
//!
//! - [`AttributeValue`], [`AttributeRule`], [`AttributeRequirement`]
//!
//! ## Domain Enums
//!
//! - [`OrganizationClass`], [`ComparisonOutcome`], [`ExclusionReason`], [`RecommendationLabel`]

pub mod arithmetic;
pub mod attribute;
pub mod enums;
pub mod ids;
pub mod money;

pub use arithmetic::{
    round_currency, round_score, ArithmeticError, ArithmeticResult, CheckedArithmetic,
};
pub use attribute::{AttributeRequirement, AttributeRule, AttributeValue, Dimension, Measurement};
pub use enums::{
    ComparisonOutcome, ExclusionReason, OrganizationClass, ParseEnumError, RecommendationLabel,
};
pub use ids::{CriterionId, RequirementId, SolicitationId, Sku};
pub use money::Money;
