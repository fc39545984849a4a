//! Run configuration schema.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::ModelKind;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub version: u32,
    pub name: String,
    /// Working directory handed to the simulator; one pipeline per path.
    pub processing_path: PathBuf,
    /// Date of hour 0 of the concentration series.
    pub simulation_start: NaiveDate,
    #[serde(default)]
    pub warm_up_years: u32,
    #[serde(default)]
    pub recovery_years: u32,
    pub multiplication_factors: Vec<f64>,
    #[serde(default = "default_steps_within_one_hour")]
    pub steps_within_one_hour: u32,
    /// Hourly series file, relative to the configuration file.
    pub concentrations: PathBuf,
    pub simulator: SimulatorDef,
    pub model: ModelDef,
}

fn default_steps_within_one_hour() -> u32 {
    1
}

impl RunConfig {
    /// Resolve a path from the configuration against the directory of the
    /// configuration file.
    pub fn resolve(config_path: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        config_path
            .parent()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|| path.to_path_buf())
    }

    pub fn concentrations_path(&self, config_path: &Path) -> PathBuf {
        Self::resolve(config_path, &self.concentrations)
    }

    pub fn processing_path(&self, config_path: &Path) -> PathBuf {
        Self::resolve(config_path, &self.processing_path)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SimulatorDef {
    pub executable: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Files copied into the processing path before the first invocation.
    #[serde(default)]
    pub runtime_files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum ModelDef {
    #[serde(rename = "LPopSD")]
    PopulationSd {
        number_runs: u32,
        population: PopulationDef,
        toxicokinetics: ToxicokineticsDef,
        sd: StochasticDeathDef,
    },
    #[serde(rename = "LPopIT")]
    PopulationIt {
        number_runs: u32,
        population: PopulationDef,
        toxicokinetics: ToxicokineticsDef,
        it: IndividualToleranceDef,
    },
    #[serde(rename = "CatchmentGUTSSD")]
    IndividualSd {
        #[serde(default)]
        verbosity: u32,
        toxicokinetics: ToxicokineticsDef,
        sd: StochasticDeathDef,
    },
    #[serde(rename = "CatchmentGUTSIT")]
    IndividualIt {
        #[serde(default)]
        verbosity: u32,
        toxicokinetics: ToxicokineticsDef,
        it: IndividualToleranceDef,
    },
}

impl ModelDef {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelDef::PopulationSd { .. } => ModelKind::PopulationSd,
            ModelDef::PopulationIt { .. } => ModelKind::PopulationIt,
            ModelDef::IndividualSd { .. } => ModelKind::IndividualSd,
            ModelDef::IndividualIt { .. } => ModelKind::IndividualIt,
        }
    }

    /// Runs per multiplication factor; population variants only.
    pub fn number_runs(&self) -> Option<u32> {
        match self {
            ModelDef::PopulationSd { number_runs, .. }
            | ModelDef::PopulationIt { number_runs, .. } => Some(*number_runs),
            ModelDef::IndividualSd { .. } | ModelDef::IndividualIt { .. } => None,
        }
    }

    pub fn population(&self) -> Option<&PopulationDef> {
        match self {
            ModelDef::PopulationSd { population, .. }
            | ModelDef::PopulationIt { population, .. } => Some(population),
            ModelDef::IndividualSd { .. } | ModelDef::IndividualIt { .. } => None,
        }
    }

    pub fn toxicokinetics(&self) -> &ToxicokineticsDef {
        match self {
            ModelDef::PopulationSd { toxicokinetics, .. }
            | ModelDef::PopulationIt { toxicokinetics, .. }
            | ModelDef::IndividualSd { toxicokinetics, .. }
            | ModelDef::IndividualIt { toxicokinetics, .. } => toxicokinetics,
        }
    }

    pub fn survival(&self) -> SurvivalDef<'_> {
        match self {
            ModelDef::PopulationSd { sd, .. } | ModelDef::IndividualSd { sd, .. } => {
                SurvivalDef::Sd(sd)
            }
            ModelDef::PopulationIt { it, .. } | ModelDef::IndividualIt { it, .. } => {
                SurvivalDef::It(it)
            }
        }
    }

    /// Output verbosity of the individual model; population variants have none.
    pub fn verbosity(&self) -> Option<u32> {
        match self {
            ModelDef::IndividualSd { verbosity, .. } | ModelDef::IndividualIt { verbosity, .. } => {
                Some(*verbosity)
            }
            ModelDef::PopulationSd { .. } | ModelDef::PopulationIt { .. } => None,
        }
    }

    /// Replace the run count of a population variant.
    pub fn set_number_runs(&mut self, runs: u32) -> bool {
        match self {
            ModelDef::PopulationSd { number_runs, .. }
            | ModelDef::PopulationIt { number_runs, .. } => {
                *number_runs = runs;
                true
            }
            ModelDef::IndividualSd { .. } | ModelDef::IndividualIt { .. } => false,
        }
    }
}

/// Population and landscape parameters of the population model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PopulationDef {
    /// Minimum clutch size [ind].
    pub minimum_clutch_size: u32,
    /// Background mortality rate [1/d].
    pub background_mortality_rate: f64,
    /// Density-dependent mortality rate [m²/d].
    pub density_dependent_mortality_rate: f64,
    /// Average temperature of the forcing function [°C].
    pub average_temperature: f64,
    /// Amplitude of temperature fluctuations [°C].
    pub temperature_amplitude: f64,
    /// Forward shift of the day number with lowest temperature [d].
    pub coldest_day_shift: i32,
    /// Per-individual probability of migration [1/d].
    pub migration_probability: f64,
    /// Probability of a migrating individual to move downstream [1].
    pub downstream_probability: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ToxicokineticsDef {
    /// Dominant rate constant `kd` [1/d].
    pub dominant_rate_constant: f64,
    /// Background hazard rate `hb` [1/d].
    pub background_hazard_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StochasticDeathDef {
    /// Threshold concentration `z` [ng/l].
    pub threshold: f64,
    /// Killing rate `b` [l/(ng*d)].
    pub killing_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndividualToleranceDef {
    /// Median of the threshold distribution `m` [ng/l].
    pub threshold: f64,
    /// Width of the threshold distribution `beta` [1].
    pub beta: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurvivalDef<'a> {
    Sd(&'a StochasticDeathDef),
    It(&'a IndividualToleranceDef),
}
