//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use le_results::{ResultArray, RunManifest, RunStore};
use tracing::info;

use crate::context::RunContext;
use crate::error::AppResult;
use crate::overrides::apply_overrides;
use crate::pipeline;
use crate::progress::{RunProgressEvent, RunStage};
use crate::project_service;
use crate::simulator::{ProcessSimulator, Simulator};

/// Options for running the pipeline.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub pipeline_version: String,
    /// Model identifier replacing the configured one.
    pub model: Option<String>,
    /// Run count replacing the configured one (population models only).
    pub number_runs: Option<u32>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            pipeline_version: env!("CARGO_PKG_VERSION").to_string(),
            model: None,
            number_runs: None,
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub config_path: &'a Path,
    pub options: RunOptions,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub total_time_s: f64,
}

type ProgressCallback<'a> = Option<&'a mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: &mut ProgressCallback<'_>,
    stage: RunStage,
    started: Instant,
    year: Option<i32>,
    message: String,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message: Some(message),
            year,
        });
    }
}

/// Execute or load a run with the configured simulator process and stream
/// progress events.
pub fn ensure_run(
    request: &RunRequest,
    progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    run(request, None, progress_cb)
}

/// Execute or load a run with a caller-supplied simulator.
pub fn ensure_run_with_simulator(
    request: &RunRequest,
    simulator: &mut dyn Simulator,
    progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    run(request, Some(simulator), progress_cb)
}

fn run(
    request: &RunRequest,
    simulator: Option<&mut dyn Simulator>,
    mut progress_cb: ProgressCallback<'_>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let config_path = request.config_path;

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingConfig,
        started,
        None,
        "Loading configuration".to_string(),
    );
    let mut config = project_service::load_config(config_path)?;
    apply_overrides(
        &mut config,
        request.options.model.as_deref(),
        request.options.number_runs,
    )?;
    let (series, series_bytes) = project_service::load_series(&config, config_path)?;

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        None,
        "Checking run cache".to_string(),
    );
    let run_id =
        le_results::compute_run_id(&config, &series_bytes, &request.options.pipeline_version)?;
    let store = RunStore::for_config(config_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            None,
            "Loading cached run".to_string(),
        );
        let manifest = store.load_manifest(&run_id)?;
        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            None,
            "Loaded cached run".to_string(),
        );
        info!(run_id = %run_id, "using cached run");
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            total_time_s: started.elapsed().as_secs_f64(),
        });
    }

    let ctx = RunContext::new(&config, config_path, &series)?;
    let mut process;
    let simulator: &mut dyn Simulator = match simulator {
        Some(simulator) => simulator,
        None => {
            process = ProcessSimulator::from_def(&config.simulator, config_path);
            &mut process
        }
    };

    let arrays = {
        let mut on_stage = |stage: RunStage, year: Option<i32>, message: String| {
            emit_progress(&mut progress_cb, stage, started, year, message)
        };
        pipeline::execute(&ctx, &config, config_path, &series, simulator, &mut on_stage)?
    };

    let manifest = RunManifest {
        run_id: run_id.clone(),
        config_name: config.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        model: ctx.model.identifier().to_string(),
        window: ctx.window,
        reaches: ctx.reaches.clone(),
        multiplication_factors: ctx.multiplication_factors.clone(),
        number_runs: ctx.number_runs,
        arrays: arrays.iter().map(|a| a.name.clone()).collect(),
        pipeline_version: request.options.pipeline_version.clone(),
    };

    emit_progress(
        &mut progress_cb,
        RunStage::SavingResults,
        started,
        None,
        "Saving run output".to_string(),
    );
    store.save_run(&manifest, &arrays)?;

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        None,
        "Run completed".to_string(),
    );
    info!(run_id = %run_id, arrays = arrays.len(), "run completed");

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        total_time_s: started.elapsed().as_secs_f64(),
    })
}

/// List runs of a configuration, most recent first.
pub fn list_runs(config_path: &Path) -> AppResult<Vec<RunManifest>> {
    let config = project_service::load_config(config_path)?;
    let store = RunStore::for_config(config_path)?;
    Ok(store.list_runs(&config.name)?)
}

/// Load a run with all of its result arrays.
pub fn load_run(config_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<ResultArray>)> {
    let store = RunStore::for_config(config_path)?;

    let manifest = store.load_manifest(run_id)?;
    let arrays = manifest
        .arrays
        .iter()
        .map(|name| store.load_array(run_id, name))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((manifest, arrays))
}

pub fn load_array(config_path: &Path, run_id: &str, name: &str) -> AppResult<ResultArray> {
    let store = RunStore::for_config(config_path)?;
    Ok(store.load_array(run_id, name)?)
}

pub fn delete_run(config_path: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_config(config_path)?;
    if !store.has_run(run_id) {
        return Err(crate::error::AppError::RunNotFound(run_id.to_string()));
    }
    Ok(store.delete_run(run_id)?)
}
