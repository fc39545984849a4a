//! Simulator model variants and the names the simulator derives from them.

use core::fmt;
use core::str::FromStr;

use crate::validate::ValidationError;

/// The four model systems the simulator ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    PopulationSd,
    PopulationIt,
    IndividualSd,
    IndividualIt,
}

/// Toxicodynamic assumption of the survival model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurvivalModel {
    /// Stochastic death.
    Sd,
    /// Individual tolerance.
    It,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::PopulationSd,
        ModelKind::PopulationIt,
        ModelKind::IndividualSd,
        ModelKind::IndividualIt,
    ];

    /// Identifier used in configuration files and in simulator paths.
    pub fn identifier(self) -> &'static str {
        match self {
            ModelKind::PopulationSd => "LPopSD",
            ModelKind::PopulationIt => "LPopIT",
            ModelKind::IndividualSd => "CatchmentGUTSSD",
            ModelKind::IndividualIt => "CatchmentGUTSIT",
        }
    }

    pub fn is_population(self) -> bool {
        matches!(self, ModelKind::PopulationSd | ModelKind::PopulationIt)
    }

    pub fn survival_model(self) -> SurvivalModel {
        match self {
            ModelKind::PopulationSd | ModelKind::IndividualSd => SurvivalModel::Sd,
            ModelKind::PopulationIt | ModelKind::IndividualIt => SurvivalModel::It,
        }
    }

    /// Name of the model system directory tree, e.g. `LPopSDModelSystem`.
    pub fn model_system(self) -> String {
        format!("{}ModelSystem", self.identifier())
    }

    /// Project type passed to the statement script.
    pub fn project_type(self) -> &'static str {
        if self.is_population() { "LPop" } else { "LGUTS" }
    }

    /// Project name passed to the statement script.
    pub fn project_name(self) -> &'static str {
        match self {
            ModelKind::PopulationSd => "LPopSD",
            ModelKind::PopulationIt => "LPopIT",
            ModelKind::IndividualSd => "GUTSSD",
            ModelKind::IndividualIt => "GUTSIT",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ModelKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|kind| kind.identifier() == s)
            .ok_or_else(|| ValidationError::UnsupportedModel {
                identifier: s.to_string(),
            })
    }
}
