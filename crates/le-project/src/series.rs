//! Hourly concentration series input.
//!
//! On disk the series is a JSON document with one row per hour and one column
//! per reach, the column order being the reach order of the whole run.

use std::collections::HashSet;
use std::ops::Range;

use le_core::{ConcentrationUnit, ReachId, ensure_non_negative};
use ndarray::{Array2, ArrayView1, s};
use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;
use crate::{ProjectError, ProjectResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeriesFile {
    #[serde(default)]
    pub unit: ConcentrationUnit,
    pub reaches: Vec<ReachId>,
    /// `values[hour][reach]`
    pub values: Vec<Vec<f64>>,
}

/// Rectangular hourly series in ng/l, indexed `[hour, reach]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    reaches: Vec<ReachId>,
    values: Array2<f64>,
}

impl HourlySeries {
    pub fn new(reaches: Vec<ReachId>, values: Array2<f64>) -> ProjectResult<Self> {
        let (hours, columns) = values.dim();
        if hours == 0 {
            return Err(ValidationError::InvalidValue {
                field: "values".to_string(),
                value: "[]".to_string(),
                reason: "series must hold at least one hour".to_string(),
            }
            .into());
        }
        if columns != reaches.len() {
            return Err(ValidationError::NotRectangular {
                row: 0,
                expected: reaches.len(),
                found: columns,
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(reaches.len());
        for reach in &reaches {
            if !seen.insert(*reach) {
                return Err(ValidationError::DuplicateId {
                    id: reach.to_string(),
                    context: "series reaches".to_string(),
                }
                .into());
            }
        }

        for v in values.iter() {
            ensure_non_negative(*v, "concentration")?;
        }

        Ok(Self { reaches, values })
    }

    pub fn from_file(file: SeriesFile) -> ProjectResult<Self> {
        let reach_count = file.reaches.len();
        let hours = file.values.len();
        let mut flat = Vec::with_capacity(hours * reach_count);
        for (row, record) in file.values.into_iter().enumerate() {
            if record.len() != reach_count {
                return Err(ValidationError::NotRectangular {
                    row,
                    expected: reach_count,
                    found: record.len(),
                }
                .into());
            }
            flat.extend(record.into_iter().map(|v| file.unit.to_ng_per_l(v)));
        }

        let values = Array2::from_shape_vec((hours, reach_count), flat).map_err(|e| {
            ProjectError::Validation(ValidationError::InvalidValue {
                field: "values".to_string(),
                value: format!("{hours}x{reach_count}"),
                reason: e.to_string(),
            })
        })?;
        Self::new(file.reaches, values)
    }

    /// Parse a JSON series document.
    pub fn from_json_slice(bytes: &[u8]) -> ProjectResult<Self> {
        let file: SeriesFile = serde_json::from_slice(bytes)?;
        Self::from_file(file)
    }

    pub fn hours(&self) -> usize {
        self.values.nrows()
    }

    pub fn reach_count(&self) -> usize {
        self.reaches.len()
    }

    /// Reach order shared by export buffers and per-reach results.
    pub fn reaches(&self) -> &[ReachId] {
        &self.reaches
    }

    /// Values of one reach over an hour range.
    pub fn reach_slice(&self, reach_index: usize, hours: Range<usize>) -> ArrayView1<'_, f64> {
        self.values.slice(s![hours, reach_index])
    }
}
