//! Query helpers for loaded Result Arrays.

use le_core::ReachId;
use le_results::{ResultArray, Scale};

use crate::error::{AppError, AppResult};

/// Summary of one Result Array.
#[derive(Debug, Clone)]
pub struct ArraySummary {
    pub name: String,
    pub shape: Vec<usize>,
    pub scales: Vec<&'static str>,
    /// Label of the first temporal index.
    pub first: String,
    /// Label of the last temporal index.
    pub last: String,
    pub min: f64,
    pub max: f64,
}

/// One labeled point of a temporal series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

pub fn summarize(array: &ResultArray) -> ArraySummary {
    let temporal_len = array.shape().first().copied().unwrap_or(0);
    let (min, max) = array
        .data
        .iter_f64()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let (min, max) = if array.data.is_empty() {
        (0.0, 0.0)
    } else {
        (min, max)
    };
    ArraySummary {
        name: array.name.clone(),
        shape: array.shape().to_vec(),
        scales: array.scales.iter().map(|s| s.label()).collect(),
        first: array.offset.label(0),
        last: array.offset.label(temporal_len.saturating_sub(1)),
        min,
        max,
    }
}

/// Temporal series of one cell of the non-temporal axes.
///
/// `factor` and `run` are 1-based like the simulator's scenario numbering;
/// `run` is ignored for arrays without a run axis and `reach` is required
/// exactly when the array has a reach axis.
pub fn extract_series(
    array: &ResultArray,
    factor: usize,
    run: usize,
    reach: Option<ReachId>,
) -> AppResult<Vec<SeriesPoint>> {
    let shape = array.shape();
    let mut index = vec![0usize; shape.len()];
    for (axis, scale) in array.scales.iter().enumerate() {
        index[axis] = match scale {
            Scale::Day | Scale::Year => 0,
            Scale::Factor => one_based("factor", factor, shape[axis])?,
            Scale::Run => one_based("run", run, shape[axis])?,
            Scale::Reach => {
                let reach = reach.ok_or_else(|| {
                    AppError::InvalidInput(format!("{} is indexed by reach; pass a reach", array.name))
                })?;
                array.reach_index(reach).ok_or_else(|| {
                    AppError::InvalidInput(format!("reach {reach} not in {}", array.name))
                })?
            }
        };
    }
    if reach.is_some() && array.axis(Scale::Reach).is_none() {
        return Err(AppError::InvalidInput(format!(
            "{} has no reach axis",
            array.name
        )));
    }

    let temporal_len = shape.first().copied().unwrap_or(0);
    let mut points = Vec::with_capacity(temporal_len);
    for t in 0..temporal_len {
        index[0] = t;
        let value = array
            .get(&index)
            .ok_or_else(|| AppError::InvalidInput(format!("index {index:?} out of range")))?;
        points.push(SeriesPoint {
            label: array.offset.label(t),
            value,
        });
    }
    Ok(points)
}

fn one_based(what: &str, value: usize, len: usize) -> AppResult<usize> {
    if value == 0 || value > len {
        return Err(AppError::InvalidInput(format!(
            "{what} {value} outside 1..={len}"
        )));
    }
    Ok(value - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use le_core::PhaseWindow;
    use ndarray::Array3;

    fn yearly() -> ResultArray {
        let reaches = [ReachId::new(11), ReachId::new(12)];
        let mut values = Array3::from_elem((2, 2, 2), 1.0);
        values[[0, 1, 1]] = 0.5;
        values[[1, 1, 1]] = 0.25;
        ResultArray::yearly_by_reach("GutsSurvivalReaches", 2020, &reaches, values)
    }

    #[test]
    fn summary_reports_range_and_labels() {
        let summary = summarize(&yearly());
        assert_eq!(summary.shape, vec![2, 2, 2]);
        assert_eq!(summary.scales, vec!["time/year", "space/reach", "other/factor"]);
        assert_eq!(summary.first, "2020");
        assert_eq!(summary.last, "2021");
        assert_eq!(summary.min, 0.25);
        assert_eq!(summary.max, 1.0);
    }

    #[test]
    fn series_for_reach_and_factor() {
        let points = extract_series(&yearly(), 2, 1, Some(ReachId::new(12))).unwrap();
        assert_eq!(
            points,
            vec![
                SeriesPoint { label: "2020".to_string(), value: 0.5 },
                SeriesPoint { label: "2021".to_string(), value: 0.25 },
            ]
        );
    }

    #[test]
    fn series_argument_errors() {
        let array = yearly();
        assert!(extract_series(&array, 3, 1, Some(ReachId::new(12))).is_err());
        assert!(extract_series(&array, 1, 1, None).is_err());
        assert!(extract_series(&array, 1, 1, Some(ReachId::new(99))).is_err());

        let window = PhaseWindow::new(2021, 0, 0, 1).unwrap();
        let daily = ResultArray::daily("AdultMetaPopulation", &window, Array3::zeros((365, 1, 1))).unwrap();
        assert!(extract_series(&daily, 1, 1, Some(ReachId::new(1))).is_err());
        assert_eq!(extract_series(&daily, 1, 1, None).unwrap().len(), 365);
        assert!(extract_series(&daily, 1, 2, None).is_err());
    }
}
