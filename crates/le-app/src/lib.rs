//! Shared application service layer for leffect.
//!
//! Drives the whole pipeline for the CLI: configuration loading, simulator
//! input preparation, simulator invocation, result reassembly, run caching
//! and result queries.

pub mod context;
pub mod environment;
pub mod error;
pub mod overrides;
pub mod pipeline;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod simulator;

// Re-export key types for convenience
pub use context::RunContext;
pub use error::{AppError, AppResult};
pub use overrides::apply_overrides;
pub use progress::{RunProgressEvent, RunStage};
pub use project_service::{ConfigSummary, load_config, load_series, summarize_config};
pub use query::{ArraySummary, SeriesPoint, extract_series, summarize};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, delete_run, ensure_run,
    ensure_run_with_simulator, list_runs, load_array, load_run,
};
pub use simulator::{ProcessSimulator, Simulator};
