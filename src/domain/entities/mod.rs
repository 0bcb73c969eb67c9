//! # Domain Entities
//!
//! Read-only records the decision engine operates on.
//!
//! - [`Solicitation`]: Procurement request with [`Requirement`] line items
//! - [`Catalog`]: Sellable [`CatalogProduct`]s keyed by SKU
//! - [`TestingCost`]: Testing/certification charge with an [`Applicability`] predicate

pub mod catalog;
pub mod solicitation;
pub mod testing_cost;

pub use catalog::{Catalog, CatalogProduct};
pub use solicitation::{
    AcceptanceCriterion, Requirement, RequirementBuilder, Solicitation, SolicitationBuilder,
};
pub use testing_cost::{Applicability, TestingCost};
