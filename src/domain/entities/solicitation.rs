//! # Solicitation Aggregate
//!
//! A procurement solicitation (RFP) with its requirement line items and
//! acceptance criteria.
//!
//! Solicitations are read-only inputs for one pipeline run; every
//! component borrows them and produces new result objects.
//!
//! # Examples
//!
//! ```
//! use rfp_engine::domain::entities::solicitation::{Requirement, Solicitation};
//! use rfp_engine::domain::value_objects::{AttributeRequirement, Money, OrganizationClass};
//! use chrono::NaiveDate;
//!
//! let requirement = Requirement::builder("ITEM-1", "11kV XLPE cable", 6000)
//!     .attribute("voltage_rating", AttributeRequirement::minimum("11kV"))
//!     .build()
//!     .unwrap();
//!
//! let rfp = Solicitation::builder(
//!     "RFP-001",
//!     "Metro cabling",
//!     "Metro Rail Corporation",
//!     OrganizationClass::Public,
//!     NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
//!     Money::from_units(25_000_000),
//! )
//! .requirement(requirement)
//! .build();
//!
//! assert_eq!(rfp.requirements().len(), 1);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{
    AttributeRequirement, CriterionId, Money, OrganizationClass, RequirementId, SolicitationId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// One technical line item within a solicitation.
///
/// # Invariants
///
/// - Quantity is positive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    id: RequirementId,
    description: String,
    attributes: BTreeMap<String, AttributeRequirement>,
    quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<String>,
}

impl Requirement {
    /// Starts building a requirement.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: i64,
    ) -> RequirementBuilder {
        RequirementBuilder {
            id: RequirementId::new(id),
            description: description.into(),
            attributes: BTreeMap::new(),
            quantity,
            unit: None,
        }
    }

    /// Returns the requirement identifier.
    #[must_use]
    pub fn id(&self) -> &RequirementId {
        &self.id
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the required attributes keyed by attribute name.
    #[must_use]
    pub fn attributes(&self) -> &BTreeMap<String, AttributeRequirement> {
        &self.attributes
    }

    /// Returns the required quantity.
    #[must_use]
    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Returns the unit of measure of the quantity, if declared.
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// Builder for [`Requirement`].
#[derive(Debug, Clone)]
pub struct RequirementBuilder {
    id: RequirementId,
    description: String,
    attributes: BTreeMap<String, AttributeRequirement>,
    quantity: i64,
    unit: Option<String>,
}

impl RequirementBuilder {
    /// Adds a required attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, requirement: AttributeRequirement) -> Self {
        self.attributes.insert(name.into(), requirement);
        self
    }

    /// Sets the unit of measure.
    #[must_use]
    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Builds the requirement.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the quantity is not positive.
    pub fn build(self) -> DomainResult<Requirement> {
        if self.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "requirement {} quantity must be positive, got {}",
                self.id, self.quantity
            )));
        }
        Ok(Requirement {
            id: self.id,
            description: self.description,
            attributes: self.attributes,
            quantity: self.quantity,
            unit: self.unit,
        })
    }
}

/// A condition the buyer will check on delivery (tests, certifications, timelines).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriterion {
    /// Criterion identifier.
    pub id: CriterionId,
    /// Description as written in the solicitation.
    pub description: String,
}

impl AcceptanceCriterion {
    /// Creates a new acceptance criterion.
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CriterionId::new(id),
            description: description.into(),
        }
    }
}

/// A procurement request the seller may respond to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solicitation {
    id: SolicitationId,
    title: String,
    organization: String,
    organization_class: OrganizationClass,
    submission_deadline: NaiveDate,
    project_value: Money,
    requirements: Vec<Requirement>,
    acceptance_criteria: Vec<AcceptanceCriterion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
}

impl Solicitation {
    /// Starts building a solicitation.
    #[must_use]
    pub fn builder(
        id: impl Into<String>,
        title: impl Into<String>,
        organization: impl Into<String>,
        organization_class: OrganizationClass,
        submission_deadline: NaiveDate,
        project_value: Money,
    ) -> SolicitationBuilder {
        SolicitationBuilder {
            inner: Self {
                id: SolicitationId::new(id),
                title: title.into(),
                organization: organization.into(),
                organization_class,
                submission_deadline,
                project_value,
                requirements: Vec::new(),
                acceptance_criteria: Vec::new(),
                source_url: None,
            },
        }
    }

    /// Returns the solicitation identifier.
    #[must_use]
    pub fn id(&self) -> &SolicitationId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the issuing organization.
    #[must_use]
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// Returns the organization class.
    #[must_use]
    pub fn organization_class(&self) -> OrganizationClass {
        self.organization_class
    }

    /// Returns the submission deadline.
    #[must_use]
    pub fn submission_deadline(&self) -> NaiveDate {
        self.submission_deadline
    }

    /// Returns the declared project value.
    #[must_use]
    pub fn project_value(&self) -> Money {
        self.project_value
    }

    /// Returns the requirement line items in solicitation order.
    #[must_use]
    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// Returns the acceptance criteria in solicitation order.
    #[must_use]
    pub fn acceptance_criteria(&self) -> &[AcceptanceCriterion] {
        &self.acceptance_criteria
    }

    /// Returns where the listing was found, if known.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Whole days from `as_of` to the deadline; negative once the deadline has passed.
    #[must_use]
    pub fn days_until_deadline(&self, as_of: NaiveDate) -> i64 {
        (self.submission_deadline - as_of).num_days()
    }

    /// Number of distinct requirement identifiers.
    #[must_use]
    pub fn distinct_requirement_count(&self) -> usize {
        self.requirements
            .iter()
            .map(Requirement::id)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Looks up a requirement by identifier.
    #[must_use]
    pub fn requirement(&self, id: &RequirementId) -> Option<&Requirement> {
        self.requirements.iter().find(|r| r.id() == id)
    }
}

impl fmt::Display for Solicitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Solicitation({} '{}' by {} due {})",
            self.id, self.title, self.organization, self.submission_deadline
        )
    }
}

/// Builder for [`Solicitation`].
#[derive(Debug, Clone)]
pub struct SolicitationBuilder {
    inner: Solicitation,
}

impl SolicitationBuilder {
    /// Appends a requirement line item.
    #[must_use]
    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.inner.requirements.push(requirement);
        self
    }

    /// Appends several requirement line items.
    #[must_use]
    pub fn requirements(mut self, requirements: impl IntoIterator<Item = Requirement>) -> Self {
        self.inner.requirements.extend(requirements);
        self
    }

    /// Appends an acceptance criterion.
    #[must_use]
    pub fn acceptance_criterion(mut self, criterion: AcceptanceCriterion) -> Self {
        self.inner.acceptance_criteria.push(criterion);
        self
    }

    /// Sets the listing URL.
    #[must_use]
    pub fn source_url(mut self, url: impl Into<String>) -> Self {
        self.inner.source_url = Some(url.into());
        self
    }

    /// Builds the solicitation.
    #[must_use]
    pub fn build(self) -> Solicitation {
        self.inner
    }
}
