//! Command-line overrides of the configured model and run count.

use le_project::{ModelDef, ModelKind, RunConfig, check_run_count};

use crate::error::{AppError, AppResult};

/// Apply overrides, then recheck the run-count precondition on the result.
///
/// Switching models keeps the toxicokinetic and survival parameters; a
/// switch that would need parameters the configuration does not carry
/// (population parameters, or the other survival model) is rejected.
pub fn apply_overrides(
    config: &mut RunConfig,
    model: Option<&str>,
    number_runs: Option<u32>,
) -> AppResult<()> {
    if let Some(identifier) = model {
        let kind: ModelKind = identifier.parse()?;
        config.model = switch_model(&config.model, kind)?;
    }

    if let Some(runs) = number_runs {
        check_run_count(config.model.kind(), Some(runs))?;
        config.model.set_number_runs(runs);
    }

    check_run_count(config.model.kind(), config.model.number_runs())?;
    Ok(())
}

fn switch_model(current: &ModelDef, target: ModelKind) -> AppResult<ModelDef> {
    let from = current.kind();
    if from == target {
        return Ok(current.clone());
    }
    if from.survival_model() != target.survival_model() {
        return Err(AppError::Precondition(format!(
            "cannot switch from {from} to {target}: survival parameters differ"
        )));
    }
    match (current, target) {
        (
            ModelDef::PopulationSd {
                toxicokinetics, sd, ..
            },
            ModelKind::IndividualSd,
        ) => Ok(ModelDef::IndividualSd {
            verbosity: 0,
            toxicokinetics: toxicokinetics.clone(),
            sd: sd.clone(),
        }),
        (
            ModelDef::PopulationIt {
                toxicokinetics, it, ..
            },
            ModelKind::IndividualIt,
        ) => Ok(ModelDef::IndividualIt {
            verbosity: 0,
            toxicokinetics: toxicokinetics.clone(),
            it: it.clone(),
        }),
        _ => Err(AppError::Precondition(format!(
            "cannot switch from {from} to {target}: population parameters are missing"
        ))),
    }
}
