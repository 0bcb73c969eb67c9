//! # Application Errors
//!
//! Error types surfaced to callers at the outer boundary.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)       - Config, validation and arithmetic failures
//! ├── Input { path, source }    - Input file could not be opened
//! ├── Schema(SchemaError)       - Malformed input records
//! └── Settings(SettingsError)   - Unreadable or malformed settings
//! ```
//!
//! # Examples
//!
//! ```
//! use rfp_engine::application::error::ApplicationError;
//! use rfp_engine::domain::DomainError;
//!
//! let err: ApplicationError = DomainError::validation("quantity must be positive").into();
//! assert!(err.is_validation());
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::loader::SchemaError;
use crate::infrastructure::settings::SettingsError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors returned by application entry points.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain rule violation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An input file could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    Input {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed input record.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Settings could not be loaded.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl ApplicationError {
    /// Creates an input error for the file.
    #[must_use]
    pub fn input(path: &Path, source: std::io::Error) -> Self {
        Self::Input {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true if this is a configuration error from any source.
    #[must_use]
    pub fn is_config(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_config(),
            Self::Settings(_) => true,
            Self::Schema(_) | Self::Input { .. } => false,
        }
    }

    /// Returns true if this is an input validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_validation())
    }

    /// Returns true if an input file could not be opened.
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. })
    }

    /// Returns true if this is a schema error.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
