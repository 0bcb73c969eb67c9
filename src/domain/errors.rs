//! # Domain Errors
//!
//! Error taxonomy shared by the selection, matching, estimation and
//! consolidation components.
//!
//! ```text
//! DomainError
//! ├── Config(String)      - invalid or inconsistent configuration, raised at construction
//! ├── Validation(String)  - bad per-call input
//! └── Arithmetic(..)      - checked decimal arithmetic failure
//! ```
//!
//! "No viable match" and "no candidate passes filters" are outcomes, not
//! errors, and never surface here.

use crate::domain::value_objects::arithmetic::ArithmeticError;
use thiserror::Error;

/// Error raised by the decision engine components.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid or inconsistent configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid per-call input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Checked arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_and_predicates() {
        let err = DomainError::config("weights must sum to 1.0");
        assert!(err.is_config());
        assert!(!err.is_validation());
        assert_eq!(
            err.to_string(),
            "configuration error: weights must sum to 1.0"
        );

        let err = DomainError::validation("quantity must be positive");
        assert!(err.is_validation());
    }

    #[test]
    fn arithmetic_errors_convert() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert_eq!(err, DomainError::Arithmetic(ArithmeticError::Overflow));
        assert_eq!(err.to_string(), "arithmetic error: arithmetic overflow");
    }
}
