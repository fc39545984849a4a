//! Configuration validation logic.
//!
//! Everything here runs before the pipeline touches the file system.

use crate::model::ModelKind;
use crate::schema::{ModelDef, RunConfig, SurvivalDef};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Unsupported model: {identifier}")]
    UnsupportedModel { identifier: String },

    #[error("Number of runs may not be provided for model {model}")]
    RunCountNotApplicable { model: ModelKind },

    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Series row {row} holds {found} values, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Check the model identifier and run count of a raw configuration document.
pub fn precheck_model(raw: &serde_json::Value) -> Result<(), ValidationError> {
    let Some(model) = raw.get("model") else {
        return Ok(());
    };
    let kind = match model.get("type") {
        Some(serde_json::Value::String(identifier)) => identifier.parse::<ModelKind>()?,
        Some(other) => {
            return Err(ValidationError::UnsupportedModel {
                identifier: other.to_string(),
            });
        }
        None => return Ok(()),
    };
    let runs = match model.get("number_runs") {
        None | Some(serde_json::Value::Null) => None,
        Some(_) if !kind.is_population() => {
            return Err(ValidationError::RunCountNotApplicable { model: kind });
        }
        Some(v) => Some(
            v.as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .ok_or_else(|| ValidationError::InvalidValue {
                    field: "model.number_runs".to_string(),
                    value: v.to_string(),
                    reason: "must be a non-negative integer below 2^32".to_string(),
                })?,
        ),
    };
    // A missing population run count is left to the schema.
    match runs {
        Some(runs) => check_run_count(kind, Some(runs)),
        None => Ok(()),
    }
}

/// A run count is required for population models and forbidden otherwise.
pub fn check_run_count(kind: ModelKind, runs: Option<u32>) -> Result<(), ValidationError> {
    match (kind.is_population(), runs) {
        (true, Some(0)) => Err(ValidationError::InvalidValue {
            field: "model.number_runs".to_string(),
            value: "0".to_string(),
            reason: "at least one run is required".to_string(),
        }),
        (true, Some(_)) => Ok(()),
        (true, None) => Err(ValidationError::InvalidValue {
            field: "model.number_runs".to_string(),
            value: "none".to_string(),
            reason: format!("model {kind} requires a number of runs"),
        }),
        (false, Some(_)) => Err(ValidationError::RunCountNotApplicable { model: kind }),
        (false, None) => Ok(()),
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }

    if config.processing_path.as_os_str().is_empty() {
        return Err(invalid("processing_path", "\"\"", "must not be empty"));
    }

    if config.multiplication_factors.is_empty() {
        return Err(invalid(
            "multiplication_factors",
            "[]",
            "at least one multiplication factor is required",
        ));
    }
    for (i, factor) in config.multiplication_factors.iter().enumerate() {
        if !factor.is_finite() || *factor <= 0.0 {
            return Err(invalid(
                &format!("multiplication_factors[{i}]"),
                &factor.to_string(),
                "must be finite and positive",
            ));
        }
    }

    if config.steps_within_one_hour == 0 {
        return Err(invalid(
            "steps_within_one_hour",
            "0",
            "at least one step per hour is required",
        ));
    }

    validate_model(&config.model)
}

fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    check_run_count(model.kind(), model.number_runs())?;

    let tk = model.toxicokinetics();
    ensure_finite_param("toxicokinetics.dominant_rate_constant", tk.dominant_rate_constant)?;
    ensure_finite_param("toxicokinetics.background_hazard_rate", tk.background_hazard_rate)?;

    match model.survival() {
        SurvivalDef::Sd(sd) => {
            ensure_finite_param("sd.threshold", sd.threshold)?;
            ensure_finite_param("sd.killing_rate", sd.killing_rate)?;
        }
        SurvivalDef::It(it) => {
            ensure_finite_param("it.threshold", it.threshold)?;
            ensure_finite_param("it.beta", it.beta)?;
        }
    }

    if let Some(population) = model.population() {
        for (field, value) in [
            ("population.background_mortality_rate", population.background_mortality_rate),
            (
                "population.density_dependent_mortality_rate",
                population.density_dependent_mortality_rate,
            ),
            ("population.average_temperature", population.average_temperature),
            ("population.temperature_amplitude", population.temperature_amplitude),
            ("population.migration_probability", population.migration_probability),
            ("population.downstream_probability", population.downstream_probability),
        ] {
            ensure_finite_param(field, value)?;
        }
        for (field, value) in [
            ("population.migration_probability", population.migration_probability),
            ("population.downstream_probability", population.downstream_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, &value.to_string(), "must lie in [0, 1]"));
            }
        }
    }

    Ok(())
}

fn ensure_finite_param(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, &value.to_string(), "must be finite"))
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
