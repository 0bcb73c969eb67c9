//! # Infrastructure Layer
//!
//! Boundaries to the outside world: input loading, settings and tracing.
//!
//! - [`loader`]: JSON input files to domain records, raising [`SchemaError`]
//! - [`settings`]: Layered [`PipelineConfig`](crate::application::services::PipelineConfig) loading
//! - [`telemetry`]: Tracing subscriber initialisation

pub mod loader;
pub mod settings;
pub mod telemetry;

pub use loader::SchemaError;
pub use settings::{load_settings, SettingsError, SettingsLoader};
pub use telemetry::{init_tracing, TelemetryError};
