use core::fmt;
use core::str::FromStr;

/// Numeric identifier of a reach (a discrete water-body segment).
///
/// Identifiers come from the hydrography and are opaque to this crate; the
/// only arithmetic done on them is the lossless conversion into the header
/// slot of an export buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ReachId(i64);

impl ReachId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Value stored in slot 0 of the reach's export buffer.
    pub fn as_header_value(self) -> f64 {
        self.0 as f64
    }
}

impl From<i64> for ReachId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for ReachId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Debug for ReachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReachId({})", self.0)
    }
}

impl fmt::Display for ReachId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        for raw in [0_i64, 1, 42, 10_000, -3] {
            let id: ReachId = raw.to_string().parse().unwrap();
            assert_eq!(id.get(), raw);
            assert_eq!(id.to_string(), raw.to_string());
        }
    }

    #[test]
    fn header_value_is_exact_for_typical_ids() {
        assert_eq!(ReachId::new(570_123).as_header_value(), 570_123.0);
    }
}
