//! Calendar-year slicing of an hourly series.
//!
//! An hourly series starts at midnight of a known date and is indexed by
//! contiguous hours from 0. Slicing walks the series hour by hour and records
//! every index at which the calendar year changes, plus a final sentinel
//! equal to the series length, so that slice `y` is the half-open range
//! `[boundary[y-1], boundary[y])` (with `0` in place of `boundary[-1]`).

use core::ops::Range;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeDelta};

use crate::{LeError, LeResult};

pub const HOURS_PER_DAY: usize = 24;

/// Hours in a leap year.
pub const MAX_HOURS_PER_YEAR: usize = 366 * HOURS_PER_DAY;

/// Hour indices at which the calendar year changes, closed by the series
/// length.
pub fn year_boundaries(start: NaiveDate, hours: usize) -> LeResult<Vec<usize>> {
    if hours == 0 {
        return Err(LeError::InvalidArg {
            what: "hourly series must hold at least one hour",
        });
    }

    let mut boundaries = Vec::new();
    let mut current_year = start.year();
    let mut timestamp = start.and_time(NaiveTime::MIN);
    let step = TimeDelta::hours(1);

    for hour in 0..hours {
        if timestamp.year() != current_year {
            boundaries.push(hour);
            current_year = timestamp.year();
        }
        timestamp = timestamp
            .checked_add_signed(step)
            .ok_or(LeError::CalendarRange {
                year: i64::from(current_year) + 1,
            })?;
    }

    // Recorded boundaries are always < hours, so the sentinel is always new.
    boundaries.push(hours);
    Ok(boundaries)
}

/// One calendar year of an hourly series.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearSlice {
    /// 0-based position of the slice within the series.
    pub index: usize,
    /// Absolute calendar year.
    pub year: i32,
    /// Half-open hour range within the series.
    pub hours: Range<usize>,
}

impl YearSlice {
    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.index == 0
    }
}

/// The year slices of one run; computed once, immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YearSlices {
    start: NaiveDate,
    boundaries: Vec<usize>,
}

impl YearSlices {
    pub fn compute(start: NaiveDate, hours: usize) -> LeResult<Self> {
        let boundaries = year_boundaries(start, hours)?;
        Ok(Self { start, boundaries })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn first_year(&self) -> i32 {
        self.start.year()
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    /// Number of calendar years touched by the series.
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn get(&self, index: usize) -> LeResult<YearSlice> {
        let to = *self.boundaries.get(index).ok_or(LeError::IndexOob {
            what: "year slice",
            index,
            len: self.boundaries.len(),
        })?;
        let from = if index == 0 {
            0
        } else {
            self.boundaries[index - 1]
        };
        Ok(YearSlice {
            index,
            year: self.first_year() + index as i32,
            hours: from..to,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = YearSlice> + '_ {
        let first_year = self.first_year();
        self.boundaries
            .iter()
            .enumerate()
            .scan(0_usize, move |from, (index, &to)| {
                let slice = YearSlice {
                    index,
                    year: first_year + index as i32,
                    hours: *from..to,
                };
                *from = to;
                Some(slice)
            })
    }
}
