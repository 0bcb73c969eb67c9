//! # Domain Layer
//!
//! Records, value objects and errors of the procurement decision engine.
//! Nothing in this layer performs I/O.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
