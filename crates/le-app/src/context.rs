//! Per-run state threaded through every pipeline stage.

use std::path::{Path, PathBuf};

use chrono::Datelike;
use le_core::{PhaseWindow, ReachId, YearSlices};
use le_project::{HourlySeries, ModelKind, RunConfig};

use crate::error::AppResult;

/// Everything a pipeline stage needs to know about one run. Two contexts
/// with distinct processing paths never share files.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub processing_path: PathBuf,
    pub model: ModelKind,
    pub slices: YearSlices,
    pub window: PhaseWindow,
    /// Export order; also the reach axis of per-reach results.
    pub reaches: Vec<ReachId>,
    pub multiplication_factors: Vec<f64>,
    pub number_runs: Option<u32>,
    pub steps_within_one_hour: u32,
}

impl RunContext {
    pub fn new(config: &RunConfig, config_path: &Path, series: &HourlySeries) -> AppResult<Self> {
        let slices = YearSlices::compute(config.simulation_start, series.hours())?;
        let window = PhaseWindow::new(
            config.simulation_start.year(),
            config.warm_up_years,
            config.recovery_years,
            slices.len() as u32,
        )?;
        Ok(Self {
            processing_path: config.processing_path(config_path),
            model: config.model.kind(),
            slices,
            window,
            reaches: series.reaches().to_vec(),
            multiplication_factors: config.multiplication_factors.clone(),
            number_runs: config.model.number_runs(),
            steps_within_one_hour: config.steps_within_one_hour,
        })
    }

    /// Factor count as seen by the result arrays.
    pub fn factor_count(&self) -> usize {
        self.multiplication_factors.len()
    }

    /// Run count as seen by the result arrays; individual models run once.
    pub fn run_count(&self) -> usize {
        self.number_runs.unwrap_or(1) as usize
    }

    pub fn ecotalk_dir(&self) -> PathBuf {
        self.processing_path.join("ecotalk")
    }

    pub fn model_input_dir(&self) -> PathBuf {
        self.processing_path
            .join("ETInput")
            .join(self.model.model_system())
    }

    pub fn parameters_dir(&self) -> PathBuf {
        self.model_input_dir().join("parameters")
    }

    pub fn reach_list_dir(&self) -> PathBuf {
        self.model_input_dir()
            .join("maps")
            .join("shapes")
            .join("reachlist_shp")
    }

    /// Where the exported concentration records go.
    pub fn data_dir(&self) -> PathBuf {
        self.processing_path
            .join("ETInput")
            .join("CatchmentModelSystem")
            .join("data")
    }

    pub fn startup_path(&self) -> PathBuf {
        self.processing_path.join(le_export::control::STARTUP_STATEMENTS)
    }

    pub fn coefficients_path(&self) -> PathBuf {
        self.parameters_dir()
            .join(format!("{}_coefs.csv", self.model.model_system()))
    }

    pub fn control_path(&self) -> PathBuf {
        self.parameters_dir()
            .join(format!("{}_control.csv", self.model.model_system()))
    }

    /// Simulator output directory of the current invocation.
    pub fn output_dir(&self) -> PathBuf {
        self.ecotalk_dir()
            .join(format!("{}_MoS", self.model.model_system()))
    }

    pub fn model_script_path(&self) -> PathBuf {
        self.ecotalk_dir()
            .join(format!("{}_MoS.modelscript", self.model.model_system()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use le_project::SeriesFile;

    /// Zero series over `hours` hours for reaches 1 and 2.
    fn series(hours: usize) -> HourlySeries {
        let file = SeriesFile {
            unit: Default::default(),
            reaches: vec![ReachId::new(1), ReachId::new(2)],
            values: vec![vec![0.0, 0.0]; hours],
        };
        HourlySeries::from_file(file).unwrap()
    }

    fn config() -> RunConfig {
        serde_yaml::from_str(
            r#"
version: 1
name: ctx
processing_path: work
simulation_start: 2019-07-01
warm_up_years: 2
multiplication_factors: [1.0, 5.0]
concentrations: series.json
simulator:
  executable: sim
model:
  type: CatchmentGUTSIT
  toxicokinetics:
    dominant_rate_constant: 0.5
    background_hazard_rate: 0.0
  it:
    threshold: 3.0
    beta: 2.0
"#,
        )
        .unwrap()
    }

    #[test]
    fn window_follows_the_series() {
        // 2019-07-01 + 300 days reaches into 2020.
        let ctx = RunContext::new(&config(), Path::new("/cfg/run.yaml"), &series(300 * 24)).unwrap();
        assert_eq!(ctx.slices.len(), 2);
        assert_eq!(ctx.window.first_simulated_year, 2019);
        assert_eq!(ctx.window.number_simulated_years, 2);
        assert_eq!(ctx.window.simulated_first_year(), 2017);
        assert_eq!(ctx.run_count(), 1);
        assert_eq!(ctx.factor_count(), 2);
        assert_eq!(
            ctx.slices.start(),
            NaiveDate::from_ymd_opt(2019, 7, 1).unwrap()
        );
    }

    #[test]
    fn paths_are_relative_to_the_processing_path() {
        let ctx = RunContext::new(&config(), Path::new("/cfg/run.yaml"), &series(24)).unwrap();
        assert_eq!(ctx.processing_path, Path::new("/cfg/work"));
        assert_eq!(
            ctx.control_path(),
            Path::new("/cfg/work/ETInput/CatchmentGUTSITModelSystem/parameters/CatchmentGUTSITModelSystem_control.csv")
        );
        assert_eq!(
            ctx.data_dir(),
            Path::new("/cfg/work/ETInput/CatchmentModelSystem/data")
        );
        assert_eq!(
            ctx.model_script_path(),
            Path::new("/cfg/work/ecotalk/CatchmentGUTSITModelSystem_MoS.modelscript")
        );
    }
}
