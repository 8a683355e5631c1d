// Copyright (c) 2024 Mike Tsao

//! Errors that oscillators report to their callers.

use crate::types::OscillatorUid;
use thiserror::Error;

/// Why an oscillator refused a request. Every check runs before anything is
/// changed, so a refused request leaves the oscillator as it was.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OscillatorError {
    /// An argument was out of range or not a finite number.
    #[error("invalid {name}: {reason}")]
    InvalidParameter {
        /// The name of the offending argument.
        name: &'static str,
        #[allow(missing_docs)]
        reason: String,
    },

    /// The request needs a playing generator, and the oscillator is stopped.
    #[error("oscillator {0} has no active generator")]
    InactiveGenerator(OscillatorUid),

    /// The oscillator has released its nodes.
    #[error("oscillator {0} has been disposed")]
    Disposed(OscillatorUid),
}
impl OscillatorError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// The crate's result type.
pub type Result<T> = core::result::Result<T, OscillatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            OscillatorError::invalid("phase", "must be in [0, 1)").to_string(),
            "invalid phase: must be in [0, 1)"
        );
        assert_eq!(
            OscillatorError::InactiveGenerator(OscillatorUid(3)).to_string(),
            "oscillator 3 has no active generator"
        );
    }
}
