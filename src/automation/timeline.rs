// Copyright (c) 2024 Mike Tsao

use super::{AutomationEvent, Curve};
use crate::prelude::*;
use core::ops::Range;
use serde::{Deserialize, Serialize};

/// The stretch of time between two scheduled values that a ramp covers.
#[derive(Clone, Debug)]
struct RampSpan {
    when: Range<Seconds>,
    value: Range<ParameterType>,
}
impl RampSpan {
    fn percent_elapsed(&self, when: Seconds) -> f64 {
        let duration = (self.when.end - self.when.start).0;
        if duration <= 0.0 {
            1.0
        } else {
            ((when - self.when.start).0 / duration).clamp(0.0, 1.0)
        }
    }

    fn linear_value(&self, percent: f64) -> ParameterType {
        self.value.start + (self.value.end - self.value.start) * percent
    }

    fn exponential_value(&self, percent: f64) -> ParameterType {
        let (start, end) = (self.value.start, self.value.end);
        if start == 0.0 || end == 0.0 || start.signum() != end.signum() {
            start
        } else {
            start * (end / start).powf(percent)
        }
    }
}

/// The automation history and future of a single parameter.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamTimeline {
    default_value: ParameterType,
    events: Vec<AutomationEvent>,
}
impl ParamTimeline {
    /// Creates a timeline that reads `default_value` until something is
    /// scheduled.
    pub fn new_with(default_value: ParameterType) -> Self {
        Self {
            default_value,
            events: Vec::default(),
        }
    }

    /// Adds `event`, cancelling everything scheduled after it. A ramp needs
    /// somewhere to start from, so if nothing precedes it, the value at `now`
    /// is pinned first.
    pub fn schedule(&mut self, event: AutomationEvent, now: Seconds) {
        let value_now = self.value_at(now);
        self.events.retain(|e| e.when <= event.when);
        if event.is_ramp() && self.events.is_empty() {
            self.events
                .push(AutomationEvent::step(now.min(event.when), value_now));
        }
        self.events.push(event);
    }

    /// The parameter's value at the given time.
    pub fn value_at(&self, when: Seconds) -> ParameterType {
        let mut previous = (Seconds::zero(), self.default_value);
        for event in self.events.iter() {
            if event.when <= when {
                previous = (event.when, event.value);
                continue;
            }
            let span = RampSpan {
                when: previous.0..event.when,
                value: previous.1..event.value,
            };
            return match event.curve {
                Curve::Step => previous.1,
                Curve::Linear => span.linear_value(span.percent_elapsed(when)),
                Curve::Exponential => span.exponential_value(span.percent_elapsed(when)),
            };
        }
        previous.1
    }

    #[allow(missing_docs)]
    pub fn default_value(&self) -> ParameterType {
        self.default_value
    }

    /// The scheduled events, in time order.
    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;
    use more_asserts::{assert_gt, assert_lt};

    #[test]
    fn timeline_holds_default_until_written() {
        let timeline = ParamTimeline::new_with(440.0);
        assert_eq!(timeline.value_at(Seconds(0.0)), 440.0);
        assert_eq!(timeline.value_at(Seconds(100.0)), 440.0);
        assert!(timeline.is_empty());
    }

    #[test]
    fn step_events_take_effect_at_their_time() {
        let mut timeline = ParamTimeline::new_with(0.5);
        timeline.schedule(AutomationEvent::step(Seconds(1.0), 0.25), Seconds::zero());
        assert_eq!(
            timeline.value_at(Seconds(0.99)),
            0.5,
            "A step shouldn't take effect early"
        );
        assert_eq!(timeline.value_at(Seconds(1.0)), 0.25);
        assert_eq!(timeline.value_at(Seconds(7.0)), 0.25);
    }

    #[test]
    fn linear_ramp_interpolates_from_previous_event() {
        let mut timeline = ParamTimeline::new_with(0.0);
        timeline.schedule(AutomationEvent::step(Seconds(0.2), 0.0), Seconds::zero());
        timeline.schedule(AutomationEvent::linear(Seconds(0.7), 1.0), Seconds::zero());
        assert_eq!(timeline.value_at(Seconds(0.1)), 0.0);
        assert_eq!(timeline.value_at(Seconds(0.2)), 0.0);
        assert!(approx_eq!(
            f64,
            timeline.value_at(Seconds(0.45)),
            0.5,
            epsilon = 0.000001
        ));
        assert_eq!(timeline.value_at(Seconds(0.7)), 1.0);
        assert_eq!(timeline.value_at(Seconds(2.0)), 1.0);
    }

    #[test]
    fn ramp_without_predecessor_anchors_at_now() {
        let mut timeline = ParamTimeline::new_with(100.0);
        timeline.schedule(AutomationEvent::linear(Seconds(3.0), 200.0), Seconds(2.0));
        assert_eq!(timeline.events().len(), 2, "An anchor should have been added");
        assert_eq!(timeline.value_at(Seconds(2.0)), 100.0);
        assert!(approx_eq!(f64, timeline.value_at(Seconds(2.5)), 150.0));
    }

    #[test]
    fn exponential_ramp_moves_by_constant_ratio() {
        let mut timeline = ParamTimeline::new_with(440.0);
        timeline.schedule(
            AutomationEvent::exponential(Seconds(1.0), 880.0),
            Seconds::zero(),
        );
        assert!(approx_eq!(
            f64,
            timeline.value_at(Seconds(0.5)),
            440.0 * 2.0f64.sqrt(),
            epsilon = 0.000001
        ));
        let quarter = timeline.value_at(Seconds(0.25));
        let linear_quarter = 440.0 + 440.0 * 0.25;
        assert_lt!(
            quarter,
            linear_quarter,
            "An exponential rise should lag a linear one early on"
        );
        assert_eq!(timeline.value_at(Seconds(1.0)), 880.0);
    }

    #[test]
    fn exponential_ramp_across_zero_holds_then_jumps() {
        let mut timeline = ParamTimeline::new_with(-10.0);
        timeline.schedule(
            AutomationEvent::exponential(Seconds(1.0), 10.0),
            Seconds::zero(),
        );
        assert_eq!(timeline.value_at(Seconds(0.9)), -10.0);
        assert_eq!(timeline.value_at(Seconds(1.0)), 10.0);
    }

    #[test]
    fn later_write_cancels_pending_events() {
        let mut timeline = ParamTimeline::new_with(1.0);
        timeline.schedule(AutomationEvent::linear(Seconds(10.0), 0.0), Seconds::zero());
        timeline.schedule(AutomationEvent::step(Seconds(1.0), 0.75), Seconds::zero());
        assert_eq!(
            timeline.value_at(Seconds(5.0)),
            0.75,
            "The pending ramp should have been superseded"
        );
        assert_gt!(timeline.value_at(Seconds(0.5)), 0.75);
        assert!(timeline.events().iter().all(|e| e.when <= Seconds(1.0)));
    }
}
