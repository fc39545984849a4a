//! Configuration and series loading.

use std::path::Path;

use le_project::{HourlySeries, RunConfig};
use tracing::debug;

use crate::context::RunContext;
use crate::error::{AppError, AppResult};

/// Summary of a validated configuration for display.
#[derive(Debug, Clone)]
pub struct ConfigSummary {
    pub name: String,
    pub model: String,
    pub multiplication_factors: Vec<f64>,
    pub number_runs: Option<u32>,
    pub reach_count: usize,
    pub hours: usize,
    pub simulated_years: (i32, i32),
    pub application_years: (i32, i32),
    pub total_days: usize,
}

/// Load and validate a configuration (YAML, or JSON by extension).
pub fn load_config(path: &Path) -> AppResult<RunConfig> {
    if !path.exists() {
        return Err(AppError::FileRead {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    Ok(le_project::load_config(path)?)
}

/// Read the hourly series named by the configuration.
///
/// Returns the raw file bytes as well; they take part in the run id.
pub fn load_series(config: &RunConfig, config_path: &Path) -> AppResult<(HourlySeries, Vec<u8>)> {
    let path = config.concentrations_path(config_path);
    let bytes = std::fs::read(&path).map_err(|e| AppError::FileRead {
        path: path.clone(),
        source: e,
    })?;
    let series = HourlySeries::from_json_slice(&bytes)
        .map_err(|e| AppError::Project(format!("series {}: {e}", path.display())))?;
    debug!(
        path = %path.display(),
        hours = series.hours(),
        reaches = series.reach_count(),
        "loaded hourly series"
    );
    Ok((series, bytes))
}

pub fn summarize_config(config: &RunConfig, config_path: &Path) -> AppResult<ConfigSummary> {
    let (series, _) = load_series(config, config_path)?;
    let ctx = RunContext::new(config, config_path, &series)?;
    Ok(ConfigSummary {
        name: config.name.clone(),
        model: config.model.kind().to_string(),
        multiplication_factors: config.multiplication_factors.clone(),
        number_runs: config.model.number_runs(),
        reach_count: series.reach_count(),
        hours: series.hours(),
        simulated_years: (ctx.window.simulated_first_year(), ctx.window.simulated_last_year()),
        application_years: (
            ctx.window.first_simulated_year,
            ctx.window.application_last_year(),
        ),
        total_days: ctx.window.total_days()?,
    })
}
