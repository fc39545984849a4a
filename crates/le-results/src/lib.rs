//! le-results: simulator output reassembly and run storage.

pub mod fragment;
pub mod hash;
pub mod kinds;
pub mod reassemble;
pub mod store;
pub mod types;

pub use fragment::{FragmentKey, FragmentLayout, FragmentSource};
pub use hash::compute_run_id;
pub use kinds::{Aggregation, ResultKind};
pub use reassemble::{reassemble_daily, reassemble_daily_by_reach, reassemble_yearly_by_reach};
pub use store::RunStore;
pub use types::*;

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to open result fragment {path}: {source}")]
    FragmentOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed result fragment {fragment} (line {line}): {reason}")]
    Malformed {
        fragment: String,
        line: usize,
        reason: String,
    },

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Invalid window: {0}")]
    Window(#[from] le_core::LeError),

    #[error("Run not found: {run_id}")]
    RunNotFound { run_id: String },

    #[error("Result {name} not found in run {run_id}")]
    ArrayNotFound { run_id: String, name: String },
}
