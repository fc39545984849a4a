//! Warm-up / simulation / recovery year window.
//!
//! Day counts are exact calendar differences between January 1st dates.

use chrono::NaiveDate;

use crate::{LeError, LeResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseWindow {
    /// First calendar year covered by the concentration series.
    pub first_simulated_year: i32,
    pub warm_up_years: u32,
    pub recovery_years: u32,
    /// Number of calendar years covered by the concentration series.
    pub number_simulated_years: u32,
}

impl PhaseWindow {
    pub fn new(
        first_simulated_year: i32,
        warm_up_years: u32,
        recovery_years: u32,
        number_simulated_years: u32,
    ) -> LeResult<Self> {
        if number_simulated_years == 0 {
            return Err(LeError::InvalidArg {
                what: "at least one simulated year is required",
            });
        }
        let window = Self {
            first_simulated_year,
            warm_up_years,
            recovery_years,
            number_simulated_years,
        };
        // Both ends must be representable dates.
        window.first_day()?;
        window.end_day()?;
        Ok(window)
    }

    /// First year the simulator runs, warm-up included.
    pub fn simulated_first_year(&self) -> i32 {
        (i64::from(self.first_simulated_year) - i64::from(self.warm_up_years)) as i32
    }

    /// Last year the simulator runs, recovery included.
    pub fn simulated_last_year(&self) -> i32 {
        (i64::from(self.first_simulated_year) + i64::from(self.number_simulated_years) - 1
            + i64::from(self.recovery_years)) as i32
    }

    /// Last year of the forcing (application) period.
    pub fn application_last_year(&self) -> i32 {
        (i64::from(self.first_simulated_year) + i64::from(self.number_simulated_years) - 1) as i32
    }

    /// January 1st of the first simulated year; day index 0 of daily results.
    pub fn first_day(&self) -> LeResult<NaiveDate> {
        jan_first(i64::from(self.first_simulated_year) - i64::from(self.warm_up_years))
    }

    /// January 1st after the last simulated year (exclusive end).
    pub fn end_day(&self) -> LeResult<NaiveDate> {
        jan_first(
            i64::from(self.first_simulated_year)
                + i64::from(self.number_simulated_years)
                + i64::from(self.recovery_years),
        )
    }

    /// Calendar days from the first simulated day up to the exclusive end.
    pub fn total_days(&self) -> LeResult<usize> {
        let days = (self.end_day()? - self.first_day()?).num_days();
        Ok(days as usize)
    }
}

fn jan_first(year: i64) -> LeResult<NaiveDate> {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .ok_or(LeError::CalendarRange { year })
}
