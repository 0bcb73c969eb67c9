//! # JSON Loader
//!
//! Boundary turning JSON input files into validated domain records.
//!
//! Raw records are deserialized with every field optional, then checked
//! field by field so that a missing or malformed value is reported as a
//! [`SchemaError`] naming the record and field, rather than as a generic
//! deserialization failure.
//!
//! ## Solicitation format
//!
//! ```json
//! [{
//!   "id": "TND-001",
//!   "title": "11kV cable supply",
//!   "organization": "City Utility",
//!   "organization_class": "public",
//!   "submission_deadline": "2025-03-01",
//!   "project_value": "25000000",
//!   "requirements": [{
//!     "id": "R1",
//!     "description": "XLPE cable",
//!     "quantity": 6000,
//!     "unit": "m",
//!     "attributes": {
//!       "insulation": "XLPE",
//!       "cross_section": { "value": "185 mm2", "rule": "minimum" }
//!     }
//!   }]
//! }]
//! ```
//!
//! Catalog and testing-cost files are arrays of [`CatalogProduct`] and
//! [`TestingCost`] records.

use crate::domain::entities::catalog::{Catalog, CatalogProduct};
use crate::domain::entities::solicitation::{AcceptanceCriterion, Requirement, Solicitation};
use crate::domain::entities::testing_cost::{Applicability, TestingCost};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{AttributeRequirement, AttributeRule, Money, OrganizationClass};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Malformed input record.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not valid JSON or has the wrong shape.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A required field is absent.
    #[error("{record}: missing required field '{field}'")]
    MissingField {
        /// Record locator, e.g. `solicitation[0]`.
        record: String,
        /// Field name.
        field: &'static str,
    },

    /// A field holds a value of the wrong format.
    #[error("{record}: invalid {field} '{value}': {reason}")]
    InvalidField {
        /// Record locator.
        record: String,
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: String,
        /// What was expected.
        reason: String,
    },

    /// The record is well-formed but violates a domain rule.
    #[error("{record}: {source}")]
    Rejected {
        /// Record locator.
        record: String,
        /// Domain rule violated.
        #[source]
        source: DomainError,
    },
}

impl SchemaError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(record: impl Into<String>, field: &'static str) -> Self {
        Self::MissingField {
            record: record.into(),
            field,
        }
    }

    /// Creates an invalid-field error.
    #[must_use]
    pub fn invalid_field(
        record: impl Into<String>,
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            record: record.into(),
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }
}

type SchemaResult<T> = Result<T, SchemaError>;

fn required<T>(value: Option<T>, record: &str, field: &'static str) -> SchemaResult<T> {
    value.ok_or_else(|| SchemaError::missing_field(record, field))
}

fn parse_date(text: &str, record: &str, field: &'static str) -> SchemaResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| SchemaError::invalid_field(record, field, text, e.to_string()))
}

fn parse_decimal(value: &Value, record: &str, field: &'static str) -> SchemaResult<Decimal> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(SchemaError::invalid_field(
                record,
                field,
                other.to_string(),
                "expected a number or numeric string",
            ));
        }
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| SchemaError::invalid_field(record, field, text.clone(), e.to_string()))
}

fn parse_money(value: &Value, record: &str, field: &'static str) -> SchemaResult<Money> {
    let amount = parse_decimal(value, record, field)?;
    Money::new(amount).map_err(|e| SchemaError::invalid_field(record, field, amount.to_string(), e.to_string()))
}

/// Attribute values may be written as JSON strings, numbers or booleans.
fn scalar_text(value: &Value, record: &str, field: &'static str) -> SchemaResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(SchemaError::invalid_field(
            record,
            field,
            other.to_string(),
            "expected a scalar value",
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAttribute {
    Detailed {
        value: Value,
        #[serde(default)]
        rule: AttributeRule,
    },
    Plain(Value),
}

#[derive(Debug, Deserialize)]
struct RawRequirement {
    id: Option<String>,
    description: Option<String>,
    quantity: Option<i64>,
    unit: Option<String>,
    #[serde(default)]
    attributes: BTreeMap<String, RawAttribute>,
}

#[derive(Debug, Deserialize)]
struct RawCriterion {
    id: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSolicitation {
    id: Option<String>,
    title: Option<String>,
    organization: Option<String>,
    organization_class: Option<String>,
    submission_deadline: Option<String>,
    project_value: Option<Value>,
    #[serde(default)]
    requirements: Vec<RawRequirement>,
    #[serde(default)]
    acceptance_criteria: Vec<RawCriterion>,
    source_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawProduct {
    sku: Option<String>,
    name: Option<String>,
    category: Option<String>,
    unit_price: Option<Value>,
    #[serde(default)]
    attributes: BTreeMap<String, Value>,
    manufacturer: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTestingCost {
    name: Option<String>,
    amount: Option<Value>,
    #[serde(default)]
    per_unit: bool,
    applies_to: Option<Applicability>,
}

impl RawRequirement {
    fn into_domain(self, record: &str) -> SchemaResult<Requirement> {
        let id = required(self.id, record, "id")?;
        let description = required(self.description, record, "description")?;
        let quantity = required(self.quantity, record, "quantity")?;

        let mut builder = Requirement::builder(id, description, quantity);
        if let Some(unit) = self.unit {
            builder = builder.unit(unit);
        }
        for (name, raw) in self.attributes {
            let requirement = match raw {
                RawAttribute::Detailed { value, rule } => AttributeRequirement {
                    value: scalar_text(&value, record, "attributes")?,
                    rule,
                },
                RawAttribute::Plain(value) => {
                    AttributeRequirement::exact(scalar_text(&value, record, "attributes")?)
                }
            };
            builder = builder.attribute(name, requirement);
        }
        builder.build().map_err(|source| SchemaError::Rejected {
            record: record.to_string(),
            source,
        })
    }
}

impl RawSolicitation {
    fn into_domain(self, record: &str) -> SchemaResult<Solicitation> {
        let id = required(self.id, record, "id")?;
        let title = required(self.title, record, "title")?;
        let organization = required(self.organization, record, "organization")?;
        let class_text = required(self.organization_class, record, "organization_class")?;
        let class = OrganizationClass::from_str(&class_text).map_err(|e| {
            SchemaError::invalid_field(record, "organization_class", &class_text, e.to_string())
        })?;
        let deadline_text = required(self.submission_deadline, record, "submission_deadline")?;
        let deadline = parse_date(&deadline_text, record, "submission_deadline")?;
        let value = required(self.project_value, record, "project_value")?;
        let project_value = parse_money(&value, record, "project_value")?;

        let requirements = self
            .requirements
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_domain(&format!("{record}.requirements[{i}]")))
            .collect::<SchemaResult<Vec<_>>>()?;

        let mut builder =
            Solicitation::builder(id, title, organization, class, deadline, project_value)
                .requirements(requirements);
        for (i, criterion) in self.acceptance_criteria.into_iter().enumerate() {
            let locator = format!("{record}.acceptance_criteria[{i}]");
            builder = builder.acceptance_criterion(AcceptanceCriterion::new(
                required(criterion.id, &locator, "id")?,
                required(criterion.description, &locator, "description")?,
            ));
        }
        if let Some(url) = self.source_url {
            builder = builder.source_url(url);
        }
        Ok(builder.build())
    }
}

impl RawProduct {
    fn into_domain(self, record: &str) -> SchemaResult<CatalogProduct> {
        let sku = required(self.sku, record, "sku")?;
        let name = required(self.name, record, "name")?;
        let category = required(self.category, record, "category")?;
        let price = required(self.unit_price, record, "unit_price")?;
        let unit_price = parse_money(&price, record, "unit_price")?;

        let mut product = CatalogProduct::new(sku, name, category, unit_price);
        for (attr, value) in &self.attributes {
            product = product.with_attribute(attr.clone(), scalar_text(value, record, "attributes")?);
        }
        if let Some(manufacturer) = self.manufacturer {
            product = product.with_manufacturer(manufacturer);
        }
        Ok(product)
    }
}

impl RawTestingCost {
    fn into_domain(self, record: &str) -> SchemaResult<TestingCost> {
        let name = required(self.name, record, "name")?;
        let amount_value = required(self.amount, record, "amount")?;
        Ok(TestingCost {
            name,
            amount: parse_money(&amount_value, record, "amount")?,
            per_unit: self.per_unit,
            applies_to: self.applies_to.unwrap_or(Applicability::All),
        })
    }
}

/// Parses a JSON array of solicitations.
///
/// # Errors
///
/// Returns `SchemaError` if the JSON is malformed or a record is invalid.
pub fn parse_solicitations(json: &str) -> Result<Vec<Solicitation>, SchemaError> {
    convert_solicitations(serde_json::from_str(json)?)
}

/// Reads a JSON array of solicitations.
///
/// # Errors
///
/// Returns `SchemaError` if the input cannot be read or a record is invalid.
pub fn read_solicitations<R: Read>(reader: R) -> Result<Vec<Solicitation>, SchemaError> {
    convert_solicitations(serde_json::from_reader(reader)?)
}

fn convert_solicitations(raw: Vec<RawSolicitation>) -> SchemaResult<Vec<Solicitation>> {
    let solicitations = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_domain(&format!("solicitation[{i}]")))
        .collect::<SchemaResult<Vec<_>>>()?;
    debug!(count = solicitations.len(), "solicitations loaded");
    Ok(solicitations)
}

/// Parses a JSON array of catalog products.
///
/// # Errors
///
/// Returns `SchemaError` if the JSON is malformed, a record is invalid, or
/// two products share a SKU.
pub fn parse_catalog(json: &str) -> Result<Catalog, SchemaError> {
    convert_catalog(serde_json::from_str(json)?)
}

/// Reads a JSON array of catalog products.
///
/// # Errors
///
/// Returns `SchemaError` if the input cannot be read or a record is invalid.
pub fn read_catalog<R: Read>(reader: R) -> Result<Catalog, SchemaError> {
    convert_catalog(serde_json::from_reader(reader)?)
}

fn convert_catalog(raw: Vec<RawProduct>) -> SchemaResult<Catalog> {
    let products = raw
        .into_iter()
        .enumerate()
        .map(|(i, r)| r.into_domain(&format!("catalog[{i}]")))
        .collect::<SchemaResult<Vec<_>>>()?;
    let catalog = Catalog::new(products).map_err(|source| SchemaError::Rejected {
        record: "catalog".to_string(),
        source,
    })?;
    debug!(count = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// Parses a JSON array of testing costs.
///
/// # Errors
///
/// Returns `SchemaError` if the JSON is malformed or a record is invalid.
pub fn parse_testing_costs(json: &str) -> Result<Vec<TestingCost>, SchemaError> {
    convert_testing_costs(serde_json::from_str(json)?)
}

/// Reads a JSON array of testing costs.
///
/// # Errors
///
/// Returns `SchemaError` if the input cannot be read or a record is invalid.
pub fn read_testing_costs<R: Read>(reader: R) -> Result<Vec<TestingCost>, SchemaError> {
    convert_testing_costs(serde_json::from_reader(reader)?)
}

fn convert_testing_costs(raw: Vec<RawTestingCost>) -> SchemaResult<Vec<TestingCost>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| r.into_domain(&format!("testing_cost[{i}]")))
        .collect()
}
