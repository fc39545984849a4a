//! Plain-text files the simulator reads at startup.
//!
//! Parameter files use one `key:,value,description` line per entry; section
//! headers are plain comma-separated lines.

use std::path::Path;

use le_core::PhaseWindow;
use le_project::{ModelDef, ModelKind, SurvivalDef};

use crate::{ExportError, ExportResult};

/// Statement script file name inside the processing path.
pub const STARTUP_STATEMENTS: &str = "startup.st";

/// Render a real the way the simulator's parser expects it (always with a
/// decimal point).
fn real(v: f64) -> String {
    format!("{v:?}")
}

#[derive(Debug, Default, Clone)]
struct ParameterFile {
    content: String,
}

impl ParameterFile {
    fn section(&mut self, header: &str) -> &mut Self {
        self.content.push_str(header);
        self.content.push('\n');
        self
    }

    fn entry(&mut self, key: &str, value: impl std::fmt::Display, description: &str) -> &mut Self {
        self.content
            .push_str(&format!("{key}:,{value},{description}\n"));
        self
    }

    fn finish(&mut self) -> String {
        std::mem::take(&mut self.content)
    }
}

fn write_text(path: &Path, content: &str) -> ExportResult<()> {
    std::fs::write(path, content).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "wrote simulator input");
    Ok(())
}

/// Statement script that selects the model project and runs it in the
/// foreground.
pub fn startup_statements(kind: ModelKind, factors: &[f64], number_runs: Option<u32>) -> String {
    let mut out = String::new();
    out.push_str("| mfs scriptFile |\n");
    out.push_str("ModelIO invalidateRootDirectories.\n");
    if !kind.is_population() {
        out.push_str("CatchmentConcDataBase removeAllDataBases.\n");
        out.push_str("RInterface rDirectory: nil. \"\"\n");
    }
    let factors = factors.iter().map(|f| real(*f)).collect::<Vec<_>>().join(" ");
    out.push_str(&format!("mfs := #({factors}).\n"));
    let runs = match number_runs {
        Some(runs) if kind.is_population() => format!(" runs: {runs}"),
        _ => String::new(),
    };
    out.push_str(&format!(
        "scriptFile := {}Project scriptMoSAnalysis{}MultiplicationFactors: mfs{}.\n",
        kind.project_type(),
        kind.project_name(),
        runs
    ));
    out.push_str("(ModelProject fromScriptFile: scriptFile) runModelProjectForeground.\n");
    out.push_str("Smalltalk quitPrimitive\n");
    out
}

pub fn write_startup_statements(path: &Path, model: &ModelDef, factors: &[f64]) -> ExportResult<()> {
    write_text(
        path,
        &startup_statements(model.kind(), factors, model.number_runs()),
    )
}

/// Coefficients of the inhabitant and landscape classes.
pub fn coefficients(model: &ModelDef) -> String {
    let mut file = ParameterFile::default();
    file.section("Component,model-dependent,inhabitantClass");
    if let Some(p) = model.population() {
        file.entry("minClutchSize", p.minimum_clutch_size, "minimum clutch size [ind]")
            .entry(
                "backgroundMortality",
                real(p.background_mortality_rate),
                "background mortality rate [d-1]",
            )
            .entry(
                "muDD",
                real(p.density_dependent_mortality_rate),
                "(default 0.000010) density-dependent mortality rate [m2 ind-1 d-1]",
            );
    }
    let tk = model.toxicokinetics();
    file.entry("kd", real(tk.dominant_rate_constant), "dominant rate constant [1/d]")
        .entry("hb", real(tk.background_hazard_rate), "background hazard rate [1/d]");
    match model.survival() {
        SurvivalDef::Sd(sd) => {
            file.entry("z", real(sd.threshold), "threshold concentration [ng/L]")
                .entry("b", real(sd.killing_rate), "killing rate [L/(ng*d)]");
        }
        SurvivalDef::It(it) => {
            file.entry("m", real(it.threshold), "threshold distribution [ng/L]")
                .entry("beta", real(it.beta), "width of distribution []");
        }
    }

    file.section("Component,model-dependent,landscapeClass");
    if let Some(p) = model.population() {
        file.entry(
            "envTav",
            real(p.average_temperature),
            "average temperature parameter of forcing function [oC]",
        )
        .entry(
            "envTamp",
            real(p.temperature_amplitude),
            "amplitude temperature fluctuations parameter [oC]",
        )
        .entry(
            "envTminShift",
            p.coldest_day_shift,
            "shift forward of daynr with lowest temperature [d]",
        );
    }
    file.entry(
        "conversionToGutsFactor",
        "1.0",
        "(concentrations are given in ng/l; no conversion))",
    );
    if let Some(p) = model.population() {
        file.entry(
            "migrationProb",
            real(p.migration_probability),
            "per individual probability of migration [d-1]",
        )
        .entry(
            "downStreamProb",
            real(p.downstream_probability),
            "probability of a migrating individual to move downstream",
        );
    }
    file.finish()
}

pub fn write_coefficients(path: &Path, model: &ModelDef) -> ExportResult<()> {
    write_text(path, &coefficients(model))
}

/// Control parameters of a population model run: the simulated window and
/// the application (forcing) window.
pub fn population_control(window: &PhaseWindow, steps_within_one_hour: u32) -> String {
    let mut file = ParameterFile::default();
    file.entry(
        "startYear",
        window.simulated_first_year(),
        "start year of the simulation",
    )
    .entry(
        "endYear",
        window.simulated_last_year(),
        "last year of the simulation",
    )
    .entry(
        "startApplicationYear",
        window.first_simulated_year,
        "start year of pesticide application",
    )
    .entry(
        "endApplicationYear",
        window.application_last_year(),
        "last year of pesticide application",
    );
    input_format_entries(&mut file, steps_within_one_hour);
    file.finish()
}

pub fn write_population_control(
    path: &Path,
    window: &PhaseWindow,
    steps_within_one_hour: u32,
) -> ExportResult<()> {
    write_text(path, &population_control(window, steps_within_one_hour))
}

/// Control parameters of one yearly individual model invocation.
pub fn individual_control(application_year: i32, verbosity: u32, steps_within_one_hour: u32) -> String {
    let mut file = ParameterFile::default();
    file.entry(
        "applicationYear",
        application_year,
        "year of pesticide application",
    )
    .entry(
        "verbose",
        verbosity,
        "survival output per day (1) or end of the year only (0)",
    );
    input_format_entries(&mut file, steps_within_one_hour);
    file.finish()
}

pub fn write_individual_control(
    path: &Path,
    application_year: i32,
    verbosity: u32,
    steps_within_one_hour: u32,
) -> ExportResult<()> {
    write_text(
        path,
        &individual_control(application_year, verbosity, steps_within_one_hour),
    )
}

fn input_format_entries(file: &mut ParameterFile, steps_within_one_hour: u32) {
    file.entry(
        "useCSV",
        0,
        "use the slow csv input format (1) or much faster msgpack format(0)",
    )
    .entry(
        "stepsInHr",
        steps_within_one_hour,
        "the number of steps within 1 hourly time step for GUTS simulation",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use le_project::{IndividualToleranceDef, ToxicokineticsDef};

    fn individual_it() -> ModelDef {
        ModelDef::IndividualIt {
            verbosity: 0,
            toxicokinetics: ToxicokineticsDef {
                dominant_rate_constant: 0.5,
                background_hazard_rate: 0.0,
            },
            it: IndividualToleranceDef {
                threshold: 12.0,
                beta: 3.0,
            },
        }
    }

    #[test]
    fn population_statements_declare_runs() {
        let text = startup_statements(ModelKind::PopulationSd, &[1.0, 10.0], Some(5));
        assert!(text.contains("mfs := #(1.0 10.0).\n"));
        assert!(text.contains(
            "scriptFile := LPopProject scriptMoSAnalysisLPopSDMultiplicationFactors: mfs runs: 5.\n"
        ));
        assert!(!text.contains("CatchmentConcDataBase"));
    }

    #[test]
    fn individual_statements_reset_databases() {
        let text = startup_statements(ModelKind::IndividualIt, &[2.5], None);
        assert!(text.contains("CatchmentConcDataBase removeAllDataBases.\n"));
        assert!(text.contains(
            "scriptFile := LGUTSProject scriptMoSAnalysisGUTSITMultiplicationFactors: mfs.\n"
        ));
        assert!(text.ends_with("Smalltalk quitPrimitive\n"));
    }

    #[test]
    fn individual_coefficients_skip_population_parameters() {
        let text = coefficients(&individual_it());
        assert!(text.contains("m:,12.0,threshold distribution [ng/L]\n"));
        assert!(text.contains("beta:,3.0,"));
        assert!(!text.contains("minClutchSize"));
        assert!(!text.contains("migrationProb"));
        assert!(text.contains("conversionToGutsFactor:,1.0,"));
    }

    #[test]
    fn population_control_uses_phase_window() {
        let window = PhaseWindow::new(2019, 1, 1, 2).unwrap();
        let text = population_control(&window, 4);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "startYear:,2018,start year of the simulation");
        assert_eq!(lines[1], "endYear:,2021,last year of the simulation");
        assert_eq!(lines[2], "startApplicationYear:,2019,start year of pesticide application");
        assert_eq!(lines[3], "endApplicationYear:,2020,last year of pesticide application");
        assert!(lines[5].starts_with("stepsInHr:,4,"));
    }

    #[test]
    fn individual_control_names_application_year() {
        let text = individual_control(2020, 1, 2);
        assert!(text.starts_with("applicationYear:,2020,"));
        assert!(text.contains("verbose:,1,"));
        assert_eq!(text.lines().count(), 4);
    }
}
