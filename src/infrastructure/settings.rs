//! # Settings
//!
//! Layered loading of [`PipelineConfig`].
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. Optional settings file (TOML, JSON or YAML, by extension)
//! 3. Environment variables prefixed `RFP_ENGINE__`, nested with `__`,
//!    e.g. `RFP_ENGINE__MATCHING__MATCH_THRESHOLD=40`
//!
//! A `.env` file is read first when present. Values are only deserialized
//! here; they are validated when the engine is constructed.

use crate::application::services::pipeline::PipelineConfig;
use config::{Config, ConfigError, Environment, File, FileFormat, Map};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "RFP_ENGINE";

/// Nesting separator for environment variables.
pub const ENV_SEPARATOR: &str = "__";

/// Settings could not be loaded.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or did not match the settings shape.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Builds a [`PipelineConfig`] from layered sources.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    inline_toml: Option<String>,
    env_source: Option<Map<String, String>>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            file: None,
            inline_toml: None,
            env_source: None,
        }
    }
}

impl SettingsLoader {
    /// Creates a loader with defaults and the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a settings file. The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Adds inline TOML, layered above the file.
    #[must_use]
    pub fn with_toml(mut self, contents: impl Into<String>) -> Self {
        self.inline_toml = Some(contents.into());
        self
    }

    /// Reads environment overrides from the map instead of the process.
    #[must_use]
    pub fn with_env_source(mut self, vars: Map<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Loads the configuration.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if a source cannot be read or parsed.
    pub fn load(self) -> Result<PipelineConfig, SettingsError> {
        let mut builder = Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);
        if let Some(path) = &self.file {
            debug!(path = %path.display(), "loading settings file");
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }
        if let Some(contents) = &self.inline_toml {
            builder = builder.add_source(File::from_str(contents, FileFormat::Toml));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(self.env_source),
        );
        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Loads settings from defaults, an optional file and the environment.
///
/// # Errors
///
/// Returns `SettingsError` if the file is missing or malformed, or an
/// environment override has the wrong type.
pub fn load_settings(path: Option<&Path>) -> Result<PipelineConfig, SettingsError> {
    dotenvy::dotenv().ok();
    let loader = path.map_or_else(SettingsLoader::new, |p| SettingsLoader::new().with_file(p));
    loader.load()
}
