//! Error types for the le-app service layer.

use std::path::PathBuf;

use le_export::ExportError;
use le_project::{ProjectError, ValidationError};
use le_results::ResultsError;

/// Application error type that wraps errors from the backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Unsupported model identifier or a run count where none applies.
    /// Raised before the pipeline touches the processing path.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    #[error("Configuration error: {0}")]
    Project(String),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Processing path {path} already holds a previous run")]
    ProcessingPathInUse { path: PathBuf },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Simulator failed: {0}")]
    Simulator(String),

    /// Simulator output that does not match the run's shape.
    #[error("Malformed result fragment {fragment} (line {line}): {reason}")]
    MalformedResult {
        fragment: String,
        line: usize,
        reason: String,
    },

    #[error("Results error: {0}")]
    Results(String),

    #[error("Run not found: {0}")]
    RunNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid data: {0}")]
    Data(#[from] le_core::LeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for le-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnsupportedModel { .. }
            | ValidationError::RunCountNotApplicable { .. } => {
                AppError::Precondition(err.to_string())
            }
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<ProjectError> for AppError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Validation(v) => v.into(),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Write { path, source } => AppError::FileWrite { path, source },
            ExportError::Read { path, source } => AppError::FileRead { path, source },
            ExportError::Core(e) => AppError::Data(e),
            other => AppError::Export(other.to_string()),
        }
    }
}

impl From<ResultsError> for AppError {
    fn from(err: ResultsError) -> Self {
        match err {
            ResultsError::Io(e) => AppError::Io(e),
            ResultsError::FragmentOpen { path, source } => AppError::FileRead { path, source },
            ResultsError::Malformed {
                fragment,
                line,
                reason,
            } => AppError::MalformedResult {
                fragment,
                line,
                reason,
            },
            ResultsError::Window(e) => AppError::Data(e),
            ResultsError::RunNotFound { run_id } => AppError::RunNotFound(run_id),
            other => AppError::Results(other.to_string()),
        }
    }
}
