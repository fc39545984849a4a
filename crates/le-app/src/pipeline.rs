//! One pass of the export / simulate / reassemble pipeline.
//!
//! Stages run strictly in order: the simulator reads what the exporter
//! wrote, and individual models rename the simulator's output between
//! invocations.

use std::fs;
use std::path::{Path, PathBuf};

use le_project::{HourlySeries, ModelDef, RunConfig};
use le_results::{ResultArray, ResultKind};
use tracing::{info, warn};

use crate::context::RunContext;
use crate::environment::prepare_runtime_environment;
use crate::error::{AppError, AppResult};
use crate::progress::RunStage;
use crate::simulator::Simulator;

/// Receives stage changes; `year` is set for per-year simulator invocations.
pub type StageSink<'a> = dyn FnMut(RunStage, Option<i32>, String) + 'a;

pub fn execute(
    ctx: &RunContext,
    config: &RunConfig,
    config_path: &Path,
    series: &HourlySeries,
    simulator: &mut dyn Simulator,
    on_stage: &mut StageSink<'_>,
) -> AppResult<Vec<ResultArray>> {
    on_stage(
        RunStage::PreparingEnvironment,
        None,
        format!("Preparing {}", ctx.processing_path.display()),
    );
    let runtime_files: Vec<PathBuf> = config
        .simulator
        .runtime_files
        .iter()
        .map(|f| RunConfig::resolve(config_path, f))
        .collect();
    prepare_runtime_environment(ctx, &runtime_files)?;
    write_model_inputs(ctx, &config.model)?;

    on_stage(
        RunStage::ExportingConcentrations,
        None,
        format!("Exporting {} year(s)", ctx.slices.len()),
    );
    let written = le_export::export_concentrations(&ctx.data_dir(), series, &ctx.slices)?;
    info!(records = written.len(), reaches = ctx.reaches.len(), "exported concentrations");

    match config.model.verbosity() {
        None => run_population(ctx, simulator, on_stage)?,
        Some(verbosity) => run_individual(ctx, verbosity, simulator, on_stage)?,
    }

    on_stage(
        RunStage::CollectingResults,
        None,
        "Collecting simulator output".to_string(),
    );
    collect_results(ctx)
}

fn write_model_inputs(ctx: &RunContext, model: &ModelDef) -> AppResult<()> {
    le_export::control::write_startup_statements(
        &ctx.startup_path(),
        model,
        &ctx.multiplication_factors,
    )?;
    le_export::control::write_coefficients(&ctx.coefficients_path(), model)?;
    Ok(())
}

fn run_population(
    ctx: &RunContext,
    simulator: &mut dyn Simulator,
    on_stage: &mut StageSink<'_>,
) -> AppResult<()> {
    le_export::control::write_population_control(
        &ctx.control_path(),
        &ctx.window,
        ctx.steps_within_one_hour,
    )?;
    on_stage(
        RunStage::RunningSimulator,
        None,
        format!(
            "Simulating {}..={}",
            ctx.window.simulated_first_year(),
            ctx.window.simulated_last_year()
        ),
    );
    simulator.run(&ctx.processing_path)
}

/// One invocation per application year; each invocation's output is moved
/// aside under its 0-based year index before the next one starts.
fn run_individual(
    ctx: &RunContext,
    verbosity: u32,
    simulator: &mut dyn Simulator,
    on_stage: &mut StageSink<'_>,
) -> AppResult<()> {
    for slice in ctx.slices.iter() {
        le_export::control::write_individual_control(
            &ctx.control_path(),
            slice.year,
            verbosity,
            ctx.steps_within_one_hour,
        )?;
        on_stage(
            RunStage::RunningSimulator,
            Some(slice.year),
            format!("Simulating {}", slice.year),
        );
        simulator.run(&ctx.processing_path)?;

        let y = slice.index;
        rename_output(
            &ctx.model_script_path(),
            &suffixed(&ctx.model_script_path(), &format!(".{y}")),
        )?;
        rename_output(&ctx.output_dir(), &suffixed(&ctx.output_dir(), &format!("_{y}")))?;
    }
    Ok(())
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn rename_output(from: &Path, to: &Path) -> AppResult<()> {
    fs::rename(from, to).map_err(|e| {
        warn!(path = %from.display(), "simulator output missing");
        AppError::Io(e)
    })
}

fn collect_results(ctx: &RunContext) -> AppResult<Vec<ResultArray>> {
    let kinds = ResultKind::for_model(ctx.model);
    let mut arrays = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let layout = kind.layout(&ctx.processing_path, ctx.model);
        let array = kind.reassemble(
            &layout,
            &ctx.window,
            &ctx.reaches,
            ctx.factor_count(),
            ctx.run_count(),
        )?;
        info!(result = kind.name, shape = ?array.shape(), "reassembled result");
        arrays.push(array);
    }
    Ok(arrays)
}
