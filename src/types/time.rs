// Copyright (c) 2024 Mike Tsao

//! Handles wall-clock time as seen by the audio clock.

use core::{
    fmt::{self, Display},
    ops::{Add, Sub},
};
use serde::{Deserialize, Serialize};

/// Represents the [seconds](https://en.wikipedia.org/wiki/Second) unit of time.
/// Audio clock readings and scheduling offsets are both [Seconds].
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Seconds(pub f64);
impl Seconds {
    /// Zero seconds.
    pub const fn zero() -> Seconds {
        Seconds(0.0)
    }

    #[allow(missing_docs)]
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }

    #[allow(missing_docs)]
    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }

    /// Returns the smaller of the two values.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
}
impl Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:0.4}s", self.0))
    }
}
impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self(value)
    }
}
impl From<Seconds> for f64 {
    fn from(value: Seconds) -> Self {
        value.0
    }
}
impl Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}
impl Sub for Seconds {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_arithmetic() {
        let now = Seconds(10.0);
        assert_eq!(now + Seconds(0.5), Seconds(10.5));
        assert_eq!(now - Seconds(2.0), Seconds(8.0));
        assert_eq!(Seconds(3.0).min(Seconds(1.0)), Seconds(1.0));
        assert!(Seconds::zero().is_zero());
    }
}
