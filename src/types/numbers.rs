// Copyright (c) 2024 Mike Tsao

//! Numeric types used throughout the system.

use core::{
    fmt::{self, Display},
    ops::Mul,
};
use serde::{Deserialize, Serialize};

/// The primitive type of every automatable parameter value.
pub type ParameterType = f64;

/// [FrequencyHz] is a frequency in Hertz, or cycles per second. The sign is
/// kept because a negative frequency is a legal (if unusual) parameter value;
/// generators always receive the magnitude.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FrequencyHz(pub ParameterType);
impl FrequencyHz {
    /// A4, the customary tuning reference.
    pub const A4: FrequencyHz = FrequencyHz(440.0);

    /// The magnitude of this frequency, which is what a generator can play.
    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// The length of one cycle, in seconds. A zero frequency has no cycle, so
    /// it reports a zero period rather than infinity.
    pub fn period(&self) -> ParameterType {
        if self.0 == 0.0 {
            0.0
        } else {
            1.0 / self.0.abs()
        }
    }

    #[allow(missing_docs)]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}
impl Display for FrequencyHz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.2} Hz", self.0))
    }
}
impl From<f64> for FrequencyHz {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<FrequencyHz> for f64 {
    fn from(value: FrequencyHz) -> Self {
        value.0
    }
}
impl Mul<ParameterType> for FrequencyHz {
    type Output = Self;

    fn mul(self, rhs: ParameterType) -> Self::Output {
        Self(self.0 * rhs)
    }
}
/// Linearly maps `value` from the input range onto the output range. The
/// input range must not be empty; callers validate that.
pub fn map_range(
    value: ParameterType,
    in_min: ParameterType,
    in_max: ParameterType,
    out_min: ParameterType,
    out_max: ParameterType,
) -> ParameterType {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn period_of_common_frequencies() {
        assert!(approx_eq!(f64, FrequencyHz(440.0).period(), 1.0 / 440.0));
        assert!(approx_eq!(f64, FrequencyHz(-440.0).period(), 1.0 / 440.0));
        assert_eq!(
            FrequencyHz(0.0).period(),
            0.0,
            "A zero frequency should have a zero period"
        );
    }

    #[test]
    fn map_range_mainline() {
        assert_eq!(map_range(0.5, 0.0, 1.0, 0.0, 10.0), 5.0);
        assert_eq!(map_range(-1.0, -1.0, 1.0, 200.0, 400.0), 200.0);
        assert_eq!(map_range(1.0, -1.0, 1.0, 200.0, 400.0), 400.0);
        assert_eq!(
            map_range(0.25, 0.0, 1.0, 1.0, 0.0),
            0.75,
            "Inverted output ranges should work"
        );
    }
}
