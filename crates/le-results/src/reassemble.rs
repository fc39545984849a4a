//! Folding simulator fragments into dense Result Arrays.
//!
//! Every array is zero-initialised and only returned once all of its
//! fragments have been folded. Days a fragment does not mention keep the
//! zero default; days outside `[1, total_days]` are malformed.

use le_core::{PhaseWindow, ReachId};
use ndarray::{Array3, Array4};
use tracing::debug;

use crate::fragment::{FragmentKey, FragmentSource, Record, for_each_record, malformed, parse_field};
use crate::types::ResultArray;
use crate::ResultsResult;

const DAY_FIELD: usize = 0;
// Field 1 is a simulator bookkeeping column we do not use.
const FIRST_VALUE_FIELD: usize = 2;

fn day_index(fragment: &str, record: &Record<'_>, total_days: usize) -> ResultsResult<usize> {
    let day: usize = parse_field(fragment, record, DAY_FIELD, "day number")?;
    if day == 0 || day > total_days {
        return Err(malformed(
            fragment,
            record.line,
            format!("day {day} outside 1..={total_days}"),
        ));
    }
    Ok(day - 1)
}

/// `[day, factor, run]` from one fragment per 1-based (factor, run).
pub fn fold_daily(
    source: &dyn FragmentSource,
    total_days: usize,
    factors: usize,
    runs: usize,
) -> ResultsResult<Array3<i64>> {
    let mut values = Array3::<i64>::zeros((total_days, factors, runs));
    for f in 0..factors {
        for r in 0..runs {
            let key = FragmentKey::Scenario {
                factor: f + 1,
                run: r + 1,
            };
            let name = source.describe(key);
            let mut reader = source.open(key)?;
            let lines = for_each_record(reader.as_mut(), &name, |record| {
                let day = day_index(&name, &record, total_days)?;
                values[[day, f, r]] = parse_field(&name, &record, FIRST_VALUE_FIELD, "value")?;
                Ok(())
            })?;
            debug!(fragment = %name, lines, "folded daily fragment");
        }
    }
    Ok(values)
}

/// `[day, reach, factor, run]`; each line carries one value per reach in
/// export order.
pub fn fold_daily_by_reach(
    source: &dyn FragmentSource,
    total_days: usize,
    reach_count: usize,
    factors: usize,
    runs: usize,
) -> ResultsResult<Array4<i64>> {
    let mut values = Array4::<i64>::zeros((total_days, reach_count, factors, runs));
    for f in 0..factors {
        for r in 0..runs {
            let key = FragmentKey::Scenario {
                factor: f + 1,
                run: r + 1,
            };
            let name = source.describe(key);
            let mut reader = source.open(key)?;
            let lines = for_each_record(reader.as_mut(), &name, |record| {
                let day = day_index(&name, &record, total_days)?;
                let found = record.fields.len().saturating_sub(FIRST_VALUE_FIELD);
                if found != reach_count {
                    return Err(malformed(
                        &name,
                        record.line,
                        format!("expected {reach_count} reach values, found {found}"),
                    ));
                }
                for reach in 0..reach_count {
                    values[[day, reach, f, r]] =
                        parse_field(&name, &record, FIRST_VALUE_FIELD + reach, "reach value")?;
                }
                Ok(())
            })?;
            debug!(fragment = %name, lines, "folded per-reach fragment");
        }
    }
    Ok(values)
}

/// `[year, reach, factor]` from one fragment per 0-based year; line `i`
/// holds reach `i`'s value for every factor.
pub fn fold_yearly_by_reach(
    source: &dyn FragmentSource,
    years: usize,
    reach_count: usize,
    factors: usize,
) -> ResultsResult<Array3<f64>> {
    let mut values = Array3::<f64>::zeros((years, reach_count, factors));
    for y in 0..years {
        let key = FragmentKey::Year { year_index: y };
        let name = source.describe(key);
        let mut reader = source.open(key)?;
        let mut reach = 0;
        let lines = for_each_record(reader.as_mut(), &name, |record| {
            if reach >= reach_count {
                return Err(malformed(
                    &name,
                    record.line,
                    format!("more than {reach_count} reach lines"),
                ));
            }
            if record.fields.len() != factors {
                return Err(malformed(
                    &name,
                    record.line,
                    format!(
                        "expected {factors} factor values, found {}",
                        record.fields.len()
                    ),
                ));
            }
            for f in 0..factors {
                values[[y, reach, f]] = parse_field(&name, &record, f, "survival value")?;
            }
            reach += 1;
            Ok(())
        })?;
        if lines != reach_count {
            return Err(malformed(
                &name,
                lines,
                format!("expected {reach_count} reach lines, found {lines}"),
            ));
        }
        debug!(fragment = %name, lines, "folded yearly fragment");
    }
    Ok(values)
}

pub fn reassemble_daily(
    source: &dyn FragmentSource,
    name: &str,
    window: &PhaseWindow,
    factors: usize,
    runs: usize,
) -> ResultsResult<ResultArray> {
    let values = fold_daily(source, window.total_days()?, factors, runs)?;
    Ok(ResultArray::daily(name, window, values)?)
}

pub fn reassemble_daily_by_reach(
    source: &dyn FragmentSource,
    name: &str,
    window: &PhaseWindow,
    reaches: &[ReachId],
    factors: usize,
    runs: usize,
) -> ResultsResult<ResultArray> {
    let values = fold_daily_by_reach(source, window.total_days()?, reaches.len(), factors, runs)?;
    Ok(ResultArray::daily_by_reach(name, window, reaches, values)?)
}

/// Yearly results cover the application years only.
pub fn reassemble_yearly_by_reach(
    source: &dyn FragmentSource,
    name: &str,
    window: &PhaseWindow,
    reaches: &[ReachId],
    factors: usize,
) -> ResultsResult<ResultArray> {
    let years = window.number_simulated_years as usize;
    let values = fold_yearly_by_reach(source, years, reaches.len(), factors)?;
    Ok(ResultArray::yearly_by_reach(
        name,
        window.first_simulated_year,
        reaches,
        values,
    ))
}
