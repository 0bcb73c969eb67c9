//! # File Evaluation
//!
//! Runs the pipeline over input files on disk. Used by the command-line
//! binary; every failure is reported as an [`ApplicationError`].

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::consolidator::ResponseRecord;
use crate::application::services::pipeline::{run_pipeline, PipelineConfig};
use crate::infrastructure::loader;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the JSON input files for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFiles {
    /// Array of candidate solicitations.
    pub solicitations: PathBuf,
    /// Array of catalog products.
    pub catalog: PathBuf,
    /// Array of testing costs; none apply when absent.
    pub testing_costs: Option<PathBuf>,
}

impl InputFiles {
    /// Creates the set without a testing-cost file.
    #[must_use]
    pub fn new(solicitations: impl Into<PathBuf>, catalog: impl Into<PathBuf>) -> Self {
        Self {
            solicitations: solicitations.into(),
            catalog: catalog.into(),
            testing_costs: None,
        }
    }

    /// Sets the testing-cost file.
    #[must_use]
    pub fn with_testing_costs(mut self, path: impl Into<PathBuf>) -> Self {
        self.testing_costs = Some(path.into());
        self
    }
}

fn open(path: &Path) -> ApplicationResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ApplicationError::input(path, source))
}

/// Loads the input files and runs the pipeline once.
///
/// # Errors
///
/// Returns `ApplicationError::Input` if a file cannot be opened,
/// `ApplicationError::Schema` if a record is malformed and
/// `ApplicationError::Domain` if the configuration or inputs are rejected.
pub fn evaluate_files(files: &InputFiles, config: &PipelineConfig) -> ApplicationResult<ResponseRecord> {
    let solicitations = loader::read_solicitations(open(&files.solicitations)?)?;
    let catalog = loader::read_catalog(open(&files.catalog)?)?;
    let testing_costs = match &files.testing_costs {
        Some(path) => loader::read_testing_costs(open(path)?)?,
        None => Vec::new(),
    };
    info!(
        solicitations = solicitations.len(),
        products = catalog.len(),
        testing_costs = testing_costs.len(),
        "inputs loaded"
    );

    Ok(run_pipeline(&solicitations, &catalog, &testing_costs, config)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::RecommendationLabel;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    const SOLICITATIONS: &str = r#"[{
        "id": "T-1", "title": "Cable", "organization": "Grid Co",
        "organization_class": "private", "submission_deadline": "2025-03-01",
        "project_value": "500000",
        "requirements": [{ "id": "R1", "description": "cable", "quantity": 100,
                           "attributes": { "voltage": "11kV" } }]
    }]"#;

    const CATALOG: &str = r#"[
        { "sku": "C-1", "name": "Cable", "category": "cables", "unit_price": "12.50",
          "attributes": { "voltage": "11 kV" } }
    ]"#;

    fn config() -> PipelineConfig {
        PipelineConfig::default().with_evaluation_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap())
    }

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn evaluates_files_on_disk() {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(
            write(&dir, "solicitations.json", SOLICITATIONS),
            write(&dir, "catalog.json", CATALOG),
        )
        .with_testing_costs(write(&dir, "testing.json", "[]"));

        let record = evaluate_files(&files, &config()).unwrap();
        assert_eq!(record.solicitation().unwrap().id().as_str(), "T-1");
        assert_eq!(record.items_matched(), 1);
        assert_eq!(record.recommendation(), RecommendationLabel::Recommended);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.json");
        let files = InputFiles::new(&missing, write(&dir, "catalog.json", CATALOG));

        let err = evaluate_files(&files, &config()).unwrap_err();
        assert!(err.is_input());
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn malformed_catalog_is_a_schema_error() {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(
            write(&dir, "solicitations.json", SOLICITATIONS),
            write(&dir, "catalog.json", r#"[{ "sku": "C-1" }]"#),
        );
        assert!(evaluate_files(&files, &config()).unwrap_err().is_schema());
    }

    #[test]
    fn empty_candidate_file_is_a_validation_error() {
        let dir = TempDir::new().unwrap();
        let files = InputFiles::new(
            write(&dir, "solicitations.json", "[]"),
            write(&dir, "catalog.json", CATALOG),
        );
        assert!(evaluate_files(&files, &config()).unwrap_err().is_validation());
    }
}
