//! # Domain Enums
//!
//! Enumeration types for domain concepts:
//!
//! - [`OrganizationClass`] - Public or private issuing organization
//! - [`ComparisonOutcome`] - Result of comparing one attribute against a catalog value
//! - [`ExclusionReason`] - Why the selector skipped a candidate
//! - [`RecommendationLabel`] - Qualitative bid recommendation
//!
//! All enums implement `Display`, `FromStr` and serde using the same
//! kebab-case spelling.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The value is not a known variant.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Class of the organization issuing a solicitation.
///
/// # Examples
///
/// ```
/// use rfp_engine::domain::value_objects::OrganizationClass;
///
/// let class: OrganizationClass = "public".parse().unwrap();
/// assert!(class.is_public());
/// assert_eq!(class.to_string(), "public");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrganizationClass {
    /// Government, public-sector undertaking or utility.
    Public,
    /// Private company.
    Private,
}

impl OrganizationClass {
    /// Returns true for public-sector organizations.
    #[inline]
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for OrganizationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" | "public-sector" | "government" => Ok(Self::Public),
            "private" | "private-sector" => Ok(Self::Private),
            _ => Err(ParseEnumError::InvalidValue("OrganizationClass", s.to_string())),
        }
    }
}

/// Outcome of comparing one required attribute against a catalog product.
///
/// Only [`ComparisonOutcome::Matched`] and [`ComparisonOutcome::Exceeded`]
/// count as satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOutcome {
    /// Catalog value equals the requirement.
    Matched,
    /// Catalog value is strictly above a minimum threshold.
    Exceeded,
    /// The catalog record has no such attribute.
    Missing,
    /// Catalog value is below a minimum threshold.
    BelowThreshold,
    /// Values could not be brought to a common unit.
    UnitMismatch,
    /// Exact comparison failed.
    Mismatched,
    /// Numeric value outside the tolerance band.
    OutOfTolerance,
}

impl ComparisonOutcome {
    /// Returns true if the attribute counts towards the match percentage.
    #[inline]
    #[must_use]
    pub const fn is_satisfied(self) -> bool {
        matches!(self, Self::Matched | Self::Exceeded)
    }

    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Exceeded => "exceeded",
            Self::Missing => "missing",
            Self::BelowThreshold => "below-threshold",
            Self::UnitMismatch => "unit-mismatch",
            Self::Mismatched => "mismatched",
            Self::OutOfTolerance => "out-of-tolerance",
        }
    }
}

impl fmt::Display for ComparisonOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonOutcome {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matched" => Ok(Self::Matched),
            "exceeded" => Ok(Self::Exceeded),
            "missing" => Ok(Self::Missing),
            "below-threshold" => Ok(Self::BelowThreshold),
            "unit-mismatch" => Ok(Self::UnitMismatch),
            "mismatched" => Ok(Self::Mismatched),
            "out-of-tolerance" => Ok(Self::OutOfTolerance),
            _ => Err(ParseEnumError::InvalidValue("ComparisonOutcome", s.to_string())),
        }
    }
}

/// Reason a candidate solicitation was not scored by the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExclusionReason {
    /// Deadline is in the past or beyond the lookahead window.
    DeadlineExpired,
    /// Declared project value is below the configured minimum.
    ValueTooLow,
}

impl ExclusionReason {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeadlineExpired => "deadline-expired",
            Self::ValueTooLow => "value-too-low",
        }
    }
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExclusionReason {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deadline-expired" => Ok(Self::DeadlineExpired),
            "value-too-low" => Ok(Self::ValueTooLow),
            _ => Err(ParseEnumError::InvalidValue("ExclusionReason", s.to_string())),
        }
    }
}

/// Qualitative recommendation attached to a response record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationLabel {
    /// High compliance and a positive margin.
    Recommended,
    /// Partial compliance; bid with documented gaps.
    RecommendedWithGaps,
    /// Compliance too low to bid.
    NotRecommended,
}

impl RecommendationLabel {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::RecommendedWithGaps => "recommended with gaps",
            Self::NotRecommended => "not recommended",
        }
    }

    /// Returns true if the label suggests submitting a bid.
    #[inline]
    #[must_use]
    pub const fn is_bid(self) -> bool {
        !matches!(self, Self::NotRecommended)
    }
}

impl fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecommendationLabel {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "recommended" => Ok(Self::Recommended),
            "recommended-with-gaps" => Ok(Self::RecommendedWithGaps),
            "not-recommended" => Ok(Self::NotRecommended),
            _ => Err(ParseEnumError::InvalidValue("RecommendationLabel", s.to_string())),
        }
    }
}
