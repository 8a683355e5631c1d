// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// How a parameter travels from the previous scheduled value to an event's
/// value.
#[derive(
    Clone, Copy, Debug, Default, Display, EnumIter, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Curve {
    /// Jump to the value at the event time.
    #[default]
    Step,
    /// Arrive at the value by the event time, moving at a constant rate.
    Linear,
    /// Arrive at the value by the event time, moving at a constant ratio.
    /// Undefined when either end is zero or the ends differ in sign; in that
    /// case the previous value holds until the event time.
    Exponential,
}

/// A single scheduled write to a parameter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutomationEvent {
    /// The absolute clock time at which the parameter reaches `value`.
    pub when: Seconds,
    /// The value the parameter should have at `when`.
    pub value: ParameterType,
    #[allow(missing_docs)]
    pub curve: Curve,
}
#[allow(missing_docs)]
impl AutomationEvent {
    pub fn step(when: Seconds, value: ParameterType) -> Self {
        Self {
            when,
            value,
            curve: Curve::Step,
        }
    }

    pub fn linear(when: Seconds, value: ParameterType) -> Self {
        Self {
            when,
            value,
            curve: Curve::Linear,
        }
    }

    pub fn exponential(when: Seconds, value: ParameterType) -> Self {
        Self {
            when,
            value,
            curve: Curve::Exponential,
        }
    }

    /// Whether this event describes a continuous transition rather than a jump.
    pub fn is_ramp(&self) -> bool {
        !matches!(self.curve, Curve::Step)
    }
}
