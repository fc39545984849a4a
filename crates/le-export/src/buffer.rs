//! Fixed-length yearly export buffer of one reach.
//!
//! Layout expected by the simulator:
//!
//! | slots                              | content                           |
//! |------------------------------------|-----------------------------------|
//! | `0`                                | reach identifier                  |
//! | `1 .. start_offset`                | zeros (hours before the series)   |
//! | `start_offset .. start_offset+len` | the slice's hourly concentrations |
//! | remainder                          | zeros                             |
//!
//! The identifier in slot 0 is only ever written and read in this module.

use chrono::{Datelike, NaiveDate};
use le_core::{HOURS_PER_DAY, LeError, LeResult, MAX_HOURS_PER_YEAR, ReachId, YearSlice};

/// Slots in front of the hourly data.
pub const HEADER_SLOTS: usize = 1;

/// One spare slot after a full leap year.
const TRAILING_SLACK: usize = 1;

/// 8786 slots: a leap year of hours, the header, and the slack.
pub const EXPORT_BUFFER_LEN: usize = MAX_HOURS_PER_YEAR + HEADER_SLOTS + TRAILING_SLACK;

/// First data slot of a year slice.
///
/// The first exported year starts at the hour of its start date within the
/// year; every later year starts on January 1st.
pub fn start_offset(slice: &YearSlice, simulation_start: NaiveDate) -> usize {
    if slice.is_first() {
        simulation_start.ordinal0() as usize * HOURS_PER_DAY + HEADER_SLOTS
    } else {
        HEADER_SLOTS
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportBuffer {
    slots: Vec<f64>,
}

impl ExportBuffer {
    /// Pack one reach's slice values at `start_offset`.
    pub fn pack<I>(reach: ReachId, start_offset: usize, values: I) -> LeResult<Self>
    where
        I: IntoIterator<Item = f64>,
        I::IntoIter: ExactSizeIterator,
    {
        if start_offset < HEADER_SLOTS {
            return Err(LeError::InvalidArg {
                what: "export data may not overwrite the reach header",
            });
        }
        let values = values.into_iter();
        let needed = start_offset + values.len();
        if needed > EXPORT_BUFFER_LEN {
            return Err(LeError::Overflow {
                what: "export buffer",
                needed,
                capacity: EXPORT_BUFFER_LEN,
            });
        }

        let mut slots = vec![0.0; EXPORT_BUFFER_LEN];
        slots[0] = reach.as_header_value();
        for (slot, v) in slots[start_offset..needed].iter_mut().zip(values) {
            *slot = v;
        }
        Ok(Self { slots })
    }

    /// Rebuild a buffer read back from an exported record.
    pub fn from_slots(slots: Vec<f64>) -> LeResult<Self> {
        if slots.len() != EXPORT_BUFFER_LEN {
            return Err(LeError::InvalidArg {
                what: "export buffer has the wrong length",
            });
        }
        let header = slots[0];
        if !header.is_finite() || header.fract() != 0.0 {
            return Err(LeError::InvalidArg {
                what: "export buffer header is not a reach identifier",
            });
        }
        Ok(Self { slots })
    }

    pub fn reach(&self) -> ReachId {
        ReachId::new(self.slots[0] as i64)
    }

    /// `len` values starting at an absolute slot offset.
    pub fn values(&self, start_offset: usize, len: usize) -> LeResult<&[f64]> {
        let end = start_offset + len;
        if start_offset < HEADER_SLOTS || end > self.slots.len() {
            return Err(LeError::IndexOob {
                what: "export buffer range",
                index: end,
                len: self.slots.len(),
            });
        }
        Ok(&self.slots[start_offset..end])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.slots
    }
}
