//! Concentration quantities and the units series files may use.

use core::fmt;

use uom::si::f64::MassDensity as UomMassDensity;
use uom::si::mass_density::kilogram_per_cubic_meter;

/// Mass concentration of a substance in water.
pub type Concentration = UomMassDensity;

const KG_PER_M3_PER_NG_PER_L: f64 = 1e-9;
const KG_PER_M3_PER_UG_PER_L: f64 = 1e-6;
const KG_PER_M3_PER_MG_PER_L: f64 = 1e-3;

/// Numeric value in ng/l, the unit the simulator expects.
#[inline]
pub fn to_ng_per_l(c: Concentration) -> f64 {
    c.get::<kilogram_per_cubic_meter>() / KG_PER_M3_PER_NG_PER_L
}

/// Units accepted for input concentration series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConcentrationUnit {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ng/l"))]
    NanogramPerLiter,
    #[cfg_attr(feature = "serde", serde(rename = "ug/l"))]
    MicrogramPerLiter,
    #[cfg_attr(feature = "serde", serde(rename = "mg/l"))]
    MilligramPerLiter,
}

impl ConcentrationUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::NanogramPerLiter => "ng/l",
            Self::MicrogramPerLiter => "ug/l",
            Self::MilligramPerLiter => "mg/l",
        }
    }

    fn kg_per_m3(self) -> f64 {
        match self {
            Self::NanogramPerLiter => KG_PER_M3_PER_NG_PER_L,
            Self::MicrogramPerLiter => KG_PER_M3_PER_UG_PER_L,
            Self::MilligramPerLiter => KG_PER_M3_PER_MG_PER_L,
        }
    }

    #[inline]
    pub fn concentration(self, v: f64) -> Concentration {
        Concentration::new::<kilogram_per_cubic_meter>(v * self.kg_per_m3())
    }

    /// Convert a value given in this unit to ng/l.
    #[inline]
    pub fn to_ng_per_l(self, v: f64) -> f64 {
        if self == Self::NanogramPerLiter {
            return v;
        }
        to_ng_per_l(self.concentration(v))
    }
}

impl fmt::Display for ConcentrationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
