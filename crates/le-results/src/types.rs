//! Result data types.

use chrono::NaiveDate;
use le_core::{PhaseWindow, ReachId};
use ndarray::{Array3, Array4, ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: RunId,
    pub config_name: String,
    pub timestamp: String,
    /// Model identifier as written in the configuration.
    pub model: String,
    pub window: PhaseWindow,
    pub reaches: Vec<ReachId>,
    pub multiplication_factors: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_runs: Option<u32>,
    /// Names of the stored Result Arrays.
    pub arrays: Vec<String>,
    pub pipeline_version: String,
}

/// Label of one axis of a Result Array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scale {
    #[serde(rename = "time/day")]
    Day,
    #[serde(rename = "time/year")]
    Year,
    #[serde(rename = "space/reach")]
    Reach,
    #[serde(rename = "other/factor")]
    Factor,
    #[serde(rename = "other/runs")]
    Run,
}

impl Scale {
    pub fn label(self) -> &'static str {
        match self {
            Scale::Day => "time/day",
            Scale::Year => "time/year",
            Scale::Reach => "space/reach",
            Scale::Factor => "other/factor",
            Scale::Run => "other/runs",
        }
    }
}

/// Absolute position of index 0 of the leading (temporal) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TemporalOffset {
    Day { first_day: NaiveDate },
    Year { first_year: i32 },
}

impl TemporalOffset {
    /// Human-readable label of a temporal index.
    pub fn label(&self, index: usize) -> String {
        match self {
            TemporalOffset::Day { first_day } => first_day
                .checked_add_days(chrono::Days::new(index as u64))
                .map(|d| d.to_string())
                .unwrap_or_else(|| format!("day {index}")),
            TemporalOffset::Year { first_year } => {
                (i64::from(*first_year) + index as i64).to_string()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultData {
    /// Individual counts.
    Count(ArrayD<i64>),
    /// Probabilities and other real-valued results.
    Real(ArrayD<f64>),
}

impl ResultData {
    pub fn shape(&self) -> &[usize] {
        match self {
            ResultData::Count(a) => a.shape(),
            ResultData::Real(a) => a.shape(),
        }
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        match self {
            ResultData::Count(a) => a.get(IxDyn(index)).map(|v| *v as f64),
            ResultData::Real(a) => a.get(IxDyn(index)).copied(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultData::Count(a) => a.len(),
            ResultData::Real(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All values in logical order, widened to f64.
    pub fn iter_f64(&self) -> Box<dyn Iterator<Item = f64> + '_> {
        match self {
            ResultData::Count(a) => Box::new(a.iter().map(|v| *v as f64)),
            ResultData::Real(a) => Box::new(a.iter().copied()),
        }
    }
}

/// A dense, fully populated result of one kind for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultArray {
    pub name: String,
    pub scales: Vec<Scale>,
    pub unit: String,
    /// Storage chunk hint for the host framework.
    pub chunks: Vec<usize>,
    pub offset: TemporalOffset,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaches: Option<Vec<ReachId>>,
    pub data: ResultData,
}

impl ResultArray {
    /// `[day, factor, run]` counts.
    pub fn daily(name: &str, window: &PhaseWindow, values: Array3<i64>) -> le_core::LeResult<Self> {
        let (days, _, _) = values.dim();
        Ok(Self {
            name: name.to_string(),
            scales: vec![Scale::Day, Scale::Factor, Scale::Run],
            unit: "1".to_string(),
            chunks: vec![days, 1, 1],
            offset: TemporalOffset::Day {
                first_day: window.first_day()?,
            },
            reaches: None,
            data: ResultData::Count(values.into_dyn()),
        })
    }

    /// `[day, reach, factor, run]` counts.
    pub fn daily_by_reach(
        name: &str,
        window: &PhaseWindow,
        reaches: &[ReachId],
        values: Array4<i64>,
    ) -> le_core::LeResult<Self> {
        let (days, _, _, _) = values.dim();
        Ok(Self {
            name: name.to_string(),
            scales: vec![Scale::Day, Scale::Reach, Scale::Factor, Scale::Run],
            unit: "1".to_string(),
            chunks: vec![days, 1, 1, 1],
            offset: TemporalOffset::Day {
                first_day: window.first_day()?,
            },
            reaches: Some(reaches.to_vec()),
            data: ResultData::Count(values.into_dyn()),
        })
    }

    /// `[year, reach, factor]` reals, starting at `first_year`.
    pub fn yearly_by_reach(
        name: &str,
        first_year: i32,
        reaches: &[ReachId],
        values: Array3<f64>,
    ) -> Self {
        Self {
            name: name.to_string(),
            scales: vec![Scale::Year, Scale::Reach, Scale::Factor],
            unit: "1".to_string(),
            chunks: values.shape().to_vec(),
            offset: TemporalOffset::Year { first_year },
            reaches: Some(reaches.to_vec()),
            data: ResultData::Real(values.into_dyn()),
        }
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        self.data.get(index)
    }

    /// Position of `scale` among the axes, if present.
    pub fn axis(&self, scale: Scale) -> Option<usize> {
        self.scales.iter().position(|s| *s == scale)
    }

    pub fn reach_index(&self, reach: ReachId) -> Option<usize> {
        self.reaches.as_ref()?.iter().position(|r| *r == reach)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_labels_match_serialized_form() {
        for scale in [Scale::Day, Scale::Year, Scale::Reach, Scale::Factor, Scale::Run] {
            let json = serde_json::to_string(&scale).unwrap();
            assert_eq!(json, format!("\"{}\"", scale.label()));
        }
    }

    #[test]
    fn daily_array_metadata() {
        let window = PhaseWindow::new(2019, 1, 0, 1).unwrap();
        let array = ResultArray::daily("AdultMetaPopulation", &window, Array3::zeros((730, 2, 3))).unwrap();
        assert_eq!(array.shape(), &[730, 2, 3]);
        assert_eq!(array.chunks, vec![730, 1, 1]);
        assert_eq!(
            array.offset,
            TemporalOffset::Day {
                first_day: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
            }
        );
        assert_eq!(array.axis(Scale::Run), Some(2));
        assert!(array.reaches.is_none());
    }

    #[test]
    fn temporal_labels() {
        let day = TemporalOffset::Day {
            first_day: NaiveDate::from_ymd_opt(2020, 2, 28).unwrap(),
        };
        assert_eq!(day.label(1), "2020-02-29");
        let year = TemporalOffset::Year { first_year: 2020 };
        assert_eq!(year.label(2), "2022");
    }

    #[test]
    fn array_json_round_trip() {
        let reaches = [ReachId::new(7), ReachId::new(3)];
        let mut values = Array3::zeros((2, 2, 1));
        values[[1, 0, 0]] = 0.25;
        let array = ResultArray::yearly_by_reach("GutsSurvivalReaches", 2020, &reaches, values);
        let json = serde_json::to_string(&array).unwrap();
        let back: ResultArray = serde_json::from_str(&json).unwrap();
        assert_eq!(back, array);
        assert_eq!(back.get(&[1, 0, 0]), Some(0.25));
        assert_eq!(back.reach_index(ReachId::new(3)), Some(1));
    }
}
