//! Physical units accepted as numeric suffixes.
//!
//! A float read declares which [`Unit`] category it expects. Suffixes that
//! belong to the category are converted to its canonical SI unit, so callers
//! always receive metres, radians, seconds, metres per second or kilograms.

use std::f32::consts::PI;
use std::fmt;

/// Category of physical unit a numeric value may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Plain number; no suffix expected
    None,
    /// Length, canonical unit metres
    Distance,
    /// Angle, canonical unit radians
    Angle,
    /// Duration, canonical unit seconds
    Time,
    /// Speed, canonical unit metres per second
    Speed,
    /// Mass, canonical unit kilograms
    Mass,
}

/// Unit expectation for a single numeric read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitSpec {
    /// Accepted unit category
    pub unit: Unit,
    /// Whether the value must carry an explicit suffix
    pub required: bool,
}

impl Unit {
    /// Require an explicit suffix from this category.
    pub const fn required(self) -> UnitSpec {
        UnitSpec {
            unit: self,
            required: true,
        }
    }

    /// Factor converting a value with `suffix` into the canonical unit.
    ///
    /// `suffix` must already be lowercase. Returns `None` when the suffix
    /// does not belong to this category.
    pub fn scale(self, suffix: &str) -> Option<f32> {
        let factor = match (self, suffix) {
            (Unit::Distance, "m") => 1.0,
            (Unit::Distance, "cm") => 0.01,
            (Unit::Distance, "mm") => 0.001,
            (Unit::Distance, "km") => 1000.0,
            (Unit::Distance, "ft") => 0.3048,
            (Unit::Distance, "in") => 0.0254,
            (Unit::Distance, "yd") => 0.9144,
            (Unit::Distance, "mi") => 1609.344,

            (Unit::Angle, "rad") => 1.0,
            (Unit::Angle, "deg") => PI / 180.0,

            (Unit::Time, "s") => 1.0,
            (Unit::Time, "ms") => 0.001,
            (Unit::Time, "min") => 60.0,
            (Unit::Time, "h") => 3600.0,

            (Unit::Speed, "m/s" | "mps") => 1.0,
            (Unit::Speed, "km/h" | "kph" | "kmh") => 1.0 / 3.6,
            (Unit::Speed, "mph") => 0.44704,

            (Unit::Mass, "kg") => 1.0,
            (Unit::Mass, "g") => 0.001,
            (Unit::Mass, "t") => 1000.0,
            (Unit::Mass, "lb") => 0.453_592_37,

            _ => return None,
        };
        Some(factor)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::None => "plain number",
            Unit::Distance => "distance",
            Unit::Angle => "angle",
            Unit::Time => "time",
            Unit::Speed => "speed",
            Unit::Mass => "mass",
        };
        f.write_str(name)
    }
}

impl From<Unit> for UnitSpec {
    fn from(unit: Unit) -> Self {
        UnitSpec {
            unit,
            required: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_distance_scales() {
        assert_relative_eq!(Unit::Distance.scale("ft").unwrap(), 0.3048);
        assert_relative_eq!(Unit::Distance.scale("km").unwrap(), 1000.0);
        assert_eq!(Unit::Distance.scale("deg"), None);
    }

    #[test]
    fn test_angle_degrees_to_radians() {
        assert_relative_eq!(Unit::Angle.scale("deg").unwrap() * 180.0, PI);
    }

    #[test]
    fn test_none_accepts_no_suffix() {
        for suffix in ["m", "deg", "s", "kg"] {
            assert_eq!(Unit::None.scale(suffix), None);
        }
    }

    #[test]
    fn test_unit_spec_conversion() {
        let spec: UnitSpec = Unit::Time.into();
        assert!(!spec.required);
        assert!(Unit::Time.required().required);
        assert_eq!(Unit::Speed.required().unit, Unit::Speed);
    }
}
