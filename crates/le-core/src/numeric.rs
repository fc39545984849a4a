//! Float checks shared by the input and export paths.

use crate::{LeError, LeResult};

pub fn ensure_finite(v: f64, what: &'static str) -> LeResult<f64> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(LeError::NonFinite { what, value: v })
    }
}

/// Finite and not below zero; concentrations and exposure values.
pub fn ensure_non_negative(v: f64, what: &'static str) -> LeResult<f64> {
    let v = ensure_finite(v, what)?;
    if v < 0.0 {
        return Err(LeError::InvalidArg { what });
    }
    Ok(v)
}
