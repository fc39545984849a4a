use thiserror::Error;

pub type LeResult<T> = Result<T, LeError>;

#[derive(Error, Debug)]
pub enum LeError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Year {year} is outside the supported calendar range")]
    CalendarRange { year: i64 },

    #[error("Capacity exceeded: {what} (needed={needed}, capacity={capacity})")]
    Overflow {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },
}
