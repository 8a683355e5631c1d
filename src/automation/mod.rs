// Copyright (c) 2024 Mike Tsao

//! Support for changing parameters over time in a scheduled, reproducible way.
//!
//! Every automatable parameter in an audio graph owns a [ParamTimeline]. A
//! caller never blocks waiting for a change to happen; instead it hands the
//! timeline an [AutomationEvent] stamped with an absolute clock time, and the
//! rendering layer reads the timeline back with
//! [ParamTimeline::value_at()].
//!
//! Three write modes exist, described by [Curve]:
//!
//! * [Curve::Step] sets the value at an instant and holds it.
//! * [Curve::Linear] ramps from the previous event's value at a constant rate.
//! * [Curve::Exponential] ramps at a constant ratio per unit time, which is how
//!   pitch glides sound natural to the ear.
//!
//! Scheduling an event cancels every event that was scheduled for a later
//! time. That's the only form of cancellation: the last write wins.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{AutomationEvent, Curve, ParamTimeline};
}

pub use timeline::ParamTimeline;
pub use types::{AutomationEvent, Curve};

mod timeline;
mod types;
