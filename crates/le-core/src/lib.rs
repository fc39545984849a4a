//! le-core: stable foundation for leffect.
//!
//! Contains:
//! - calendar (hour-indexed year slicing of an hourly series)
//! - phase (warm-up / simulation / recovery year window)
//! - units (uom concentration types + constructors)
//! - numeric (finite / non-negative checks)
//! - ids (reach identifiers)
//! - error (shared error types)

pub mod calendar;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod phase;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use calendar::{YearSlice, YearSlices, HOURS_PER_DAY, MAX_HOURS_PER_YEAR};
pub use error::{LeError, LeResult};
pub use ids::*;
pub use numeric::*;
pub use phase::PhaseWindow;
pub use units::*;
