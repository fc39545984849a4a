//! le-project: run configuration format, hourly series input and validation.

pub mod migrate;
pub mod model;
pub mod schema;
pub mod series;
pub mod validate;

pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use model::{ModelKind, SurvivalModel};
pub use schema::*;
pub use series::{HourlySeries, SeriesFile};
pub use validate::{ValidationError, check_run_count, precheck_model, validate_config};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Invalid series: {0}")]
    Series(#[from] le_core::LeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load a run configuration, choosing the format from the file extension
/// (`.json` is JSON, everything else YAML).
pub fn load_config(path: &Path) -> ProjectResult<RunConfig> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_yaml(path),
    }
}

pub fn load_yaml(path: &Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_yaml::from_str(&content)?;
    from_raw(raw)
}

pub fn load_json(path: &Path) -> ProjectResult<RunConfig> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = serde_json::from_str(&content)?;
    from_raw(raw)
}

// Model identifier and run count are checked on the raw document so that
// they surface as precondition errors instead of generic parse errors.
fn from_raw(raw: serde_json::Value) -> ProjectResult<RunConfig> {
    precheck_model(&raw)?;
    let mut config: RunConfig = serde_json::from_value(raw)?;
    config = migrate_to_latest(config)?;
    validate_config(&config)?;
    Ok(config)
}
