//! # Attribute Values and Comparison Rules
//!
//! Technical attribute values (`"11kV"`, `"95 sq mm"`, `"XLPE"`) and the
//! per-attribute comparison policy used by the matcher.
//!
//! Values are parsed into either a [`Measurement`] (a decimal magnitude
//! normalised to the base unit of its [`Dimension`]) or free text.
//! [`AttributeRule`] is the tagged variant deciding how a requirement's
//! value is compared with a catalog value; adding a rule never touches
//! attribute names.
//!
//! # Examples
//!
//! ```
//! use rfp_engine::domain::value_objects::attribute::{AttributeRule, AttributeValue};
//! use rfp_engine::domain::value_objects::ComparisonOutcome;
//!
//! let required = AttributeValue::parse("11kV");
//! let offered = AttributeValue::parse("11000 V");
//! assert_eq!(AttributeRule::Exact.compare(&required, &offered), ComparisonOutcome::Matched);
//!
//! let offered = AttributeValue::parse("33 kV");
//! assert_eq!(AttributeRule::Minimum.compare(&required, &offered), ComparisonOutcome::Exceeded);
//! ```

use crate::domain::value_objects::enums::ComparisonOutcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical dimension of a measurement after unit normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    /// Volts.
    Voltage,
    /// Amperes.
    Current,
    /// Watts.
    Power,
    /// Square millimetres.
    Area,
    /// Metres.
    Length,
    /// Kilograms.
    Mass,
    /// Hertz.
    Frequency,
    /// Degrees Celsius.
    Temperature,
    /// Percent.
    Percent,
    /// Bare number.
    Dimensionless,
    /// Unrecognised unit, compared only with the same unit.
    Other(String),
}

/// Known unit spellings with their dimension and factor to the base unit.
fn lookup_unit(unit: &str) -> Option<(Dimension, Decimal)> {
    let entry = match unit {
        "" => (Dimension::Dimensionless, Decimal::ONE),
        "v" | "volt" | "volts" => (Dimension::Voltage, Decimal::ONE),
        "kv" => (Dimension::Voltage, Decimal::ONE_THOUSAND),
        "a" | "amp" | "amps" => (Dimension::Current, Decimal::ONE),
        "ma" => (Dimension::Current, Decimal::new(1, 3)),
        "ka" => (Dimension::Current, Decimal::ONE_THOUSAND),
        "w" => (Dimension::Power, Decimal::ONE),
        "kw" => (Dimension::Power, Decimal::ONE_THOUSAND),
        "mm2" | "mm²" | "sqmm" | "sq.mm" | "sq.mm." => (Dimension::Area, Decimal::ONE),
        "cm2" | "cm²" => (Dimension::Area, Decimal::ONE_HUNDRED),
        "mm" => (Dimension::Length, Decimal::new(1, 3)),
        "cm" => (Dimension::Length, Decimal::new(1, 2)),
        "m" | "mtr" | "metre" | "meter" | "metres" | "meters" => (Dimension::Length, Decimal::ONE),
        "km" => (Dimension::Length, Decimal::ONE_THOUSAND),
        "g" => (Dimension::Mass, Decimal::new(1, 3)),
        "kg" => (Dimension::Mass, Decimal::ONE),
        "t" | "tonne" | "tonnes" => (Dimension::Mass, Decimal::ONE_THOUSAND),
        "hz" => (Dimension::Frequency, Decimal::ONE),
        "khz" => (Dimension::Frequency, Decimal::ONE_THOUSAND),
        "°c" | "degc" | "c" => (Dimension::Temperature, Decimal::ONE),
        "%" | "percent" => (Dimension::Percent, Decimal::ONE),
        _ => return None,
    };
    Some(entry)
}

/// A numeric value normalised to the base unit of its dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Magnitude in the base unit.
    pub magnitude: Decimal,
    /// Dimension after normalisation.
    pub dimension: Dimension,
}

/// Removes commas used as thousands separators.
///
/// Commas are accepted only between groups of three integer digits, so a
/// decimal comma such as `1,5` is rejected rather than read as `15`.
fn strip_digit_grouping(number: &str) -> Option<String> {
    if !number.contains(',') {
        return Some(number.to_string());
    }
    let (integer, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains(',') {
        return None;
    }
    let digits = integer.trim_start_matches(['-', '+']);
    let mut groups = digits.split(',');
    let leading = groups.next()?;
    if leading.is_empty() || leading.len() > 3 || groups.clone().any(|g| g.len() != 3) {
        return None;
    }
    Some(number.replace(',', ""))
}

impl Measurement {
    /// Parses a leading number followed by an optional unit.
    ///
    /// Returns `None` if the text does not start with a number.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let split = trimmed
            .char_indices()
            .find(|(i, c)| {
                let numeric = c.is_ascii_digit() || *c == '.' || *c == ',';
                let sign = *i == 0 && (*c == '-' || *c == '+');
                !(numeric || sign)
            })
            .map_or(trimmed.len(), |(i, _)| i);
        let (number, unit) = trimmed.split_at(split);
        let number = strip_digit_grouping(number)?;
        if !number.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        let value = Decimal::from_str(&number).ok()?;

        let unit: String = unit
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        let (dimension, factor) =
            lookup_unit(&unit).unwrap_or_else(|| (Dimension::Other(unit.clone()), Decimal::ONE));
        let magnitude = value.checked_mul(factor)?;
        Some(Self {
            magnitude: magnitude.normalize(),
            dimension,
        })
    }

    /// Returns true if both measurements share a dimension.
    #[inline]
    #[must_use]
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.dimension == other.dimension
    }
}

/// A parsed attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValue {
    raw: String,
    measurement: Option<Measurement>,
}

impl AttributeValue {
    /// Parses a raw attribute value. Never fails: non-numeric input is text.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.trim().to_string(),
            measurement: Measurement::parse(raw),
        }
    }

    /// Returns the raw (trimmed) text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns the normalised measurement, if the value is numeric.
    #[must_use]
    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    fn text_eq(&self, other: &Self) -> bool {
        self.raw.to_lowercase() == other.raw.to_lowercase()
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Comparison policy for one required attribute.
///
/// Serialized as `"exact"`, `"minimum"` or `{"tolerance": {"pct": "5"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeRule {
    /// Case-insensitive text equality, or numeric equality after unit normalisation.
    #[default]
    Exact,
    /// Catalog value must be numerically greater than or equal to the requirement.
    Minimum,
    /// Catalog value must lie within `pct` percent of the requirement.
    Tolerance {
        /// Allowed deviation in percent of the required value.
        pct: Decimal,
    },
}

impl AttributeRule {
    /// Compares a required value against an offered catalog value.
    #[must_use]
    pub fn compare(&self, required: &AttributeValue, offered: &AttributeValue) -> ComparisonOutcome {
        match self {
            Self::Exact => {
                if required.text_eq(offered) {
                    return ComparisonOutcome::Matched;
                }
                match (required.measurement(), offered.measurement()) {
                    (Some(r), Some(o)) if r.is_comparable(o) => {
                        if r.magnitude == o.magnitude {
                            ComparisonOutcome::Matched
                        } else {
                            ComparisonOutcome::Mismatched
                        }
                    }
                    (Some(_), Some(_)) => ComparisonOutcome::UnitMismatch,
                    _ => ComparisonOutcome::Mismatched,
                }
            }
            Self::Minimum => match comparable(required, offered) {
                Some((r, o)) if o > r => ComparisonOutcome::Exceeded,
                Some((r, o)) if o == r => ComparisonOutcome::Matched,
                Some(_) => ComparisonOutcome::BelowThreshold,
                None => ComparisonOutcome::UnitMismatch,
            },
            Self::Tolerance { pct } => match comparable(required, offered) {
                Some((r, o)) => {
                    let band = (r.abs() * *pct / Decimal::ONE_HUNDRED).abs();
                    if (o - r).abs() <= band {
                        ComparisonOutcome::Matched
                    } else {
                        ComparisonOutcome::OutOfTolerance
                    }
                }
                None => ComparisonOutcome::UnitMismatch,
            },
        }
    }
}

/// Returns both magnitudes when the values share a dimension.
fn comparable(required: &AttributeValue, offered: &AttributeValue) -> Option<(Decimal, Decimal)> {
    match (required.measurement(), offered.measurement()) {
        (Some(r), Some(o)) if r.is_comparable(o) => Some((r.magnitude, o.magnitude)),
        _ => None,
    }
}

/// One required attribute: the value and how to compare it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRequirement {
    /// Required value as written in the solicitation.
    pub value: String,
    /// Comparison policy; exact match when omitted.
    #[serde(default)]
    pub rule: AttributeRule,
}

impl AttributeRequirement {
    /// Exact-match requirement.
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            rule: AttributeRule::Exact,
        }
    }

    /// Minimum-threshold requirement.
    #[must_use]
    pub fn minimum(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            rule: AttributeRule::Minimum,
        }
    }

    /// Tolerance-band requirement.
    #[must_use]
    pub fn tolerance(value: impl Into<String>, pct: Decimal) -> Self {
        Self {
            value: value.into(),
            rule: AttributeRule::Tolerance { pct },
        }
    }

    /// Compares this requirement against an offered catalog value.
    #[must_use]
    pub fn evaluate(&self, offered: &str) -> ComparisonOutcome {
        self.rule
            .compare(&AttributeValue::parse(&self.value), &AttributeValue::parse(offered))
    }
}
