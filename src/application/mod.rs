//! # Application Layer
//!
//! The decision engine components, file-driven evaluation and the errors
//! surfaced to callers.

pub mod batch;
pub mod error;
pub mod services;

pub use batch::{evaluate_files, InputFiles};
pub use error::{ApplicationError, ApplicationResult};
