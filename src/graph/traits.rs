// Copyright (c) 2024 Mike Tsao

use super::ParamId;
use crate::{
    automation::AutomationEvent,
    oscillator::{StageKind, Waveform},
    prelude::*,
};

/// The capabilities of the audio substrate that an oscillator composes: a
/// clock, node primitives, directed connections, and parameter automation.
///
/// Every method is infallible. Structural misuse (unknown nodes, connecting
/// an edge that already exists, disconnecting a node with no edges, releasing
/// twice) is harmless and should be absorbed by the implementation.
pub trait AudioBackend {
    /// The current audio clock time. Monotonic.
    fn now(&self) -> Seconds;

    /// The sink that oscillators route to unless told otherwise.
    fn default_destination(&self) -> NodeUid;

    /// Whether `node` has been allocated and not yet released.
    fn is_live(&self, node: NodeUid) -> bool;

    /// Allocates a generator that has not started. Generators are one-shot:
    /// once stopped, they can't start again.
    fn create_generator(&mut self, waveform: Waveform, frequency: FrequencyHz) -> NodeUid;

    /// Changes the waveform of an existing generator.
    fn set_waveform(&mut self, generator: NodeUid, waveform: Waveform);

    #[allow(missing_docs)]
    fn create_gain(&mut self) -> NodeUid;

    /// Allocates a delay line that can delay by at most `max_delay`.
    fn create_delay(&mut self, max_delay: Seconds) -> NodeUid;

    #[allow(missing_docs)]
    fn create_panner(&mut self) -> NodeUid;

    /// Allocates a fixed arithmetic processing stage.
    fn create_stage(&mut self, stage: StageKind) -> NodeUid;

    /// Schedules a generator to begin emitting at the absolute time `at`.
    fn start(&mut self, node: NodeUid, at: Seconds);

    /// Schedules a generator to fall silent at the absolute time `at`.
    fn stop(&mut self, node: NodeUid, at: Seconds);

    /// Adds an edge from `from`'s output to `to`'s input.
    fn connect(&mut self, from: NodeUid, to: NodeUid);

    /// Adds an edge from `from`'s output to a parameter, which `from` then
    /// modulates.
    fn connect_param(&mut self, from: NodeUid, to: ParamId);

    /// Removes every outgoing edge of `from`.
    fn disconnect(&mut self, from: NodeUid);

    /// Removes the edge from `from` to `to`, if any.
    fn disconnect_from(&mut self, from: NodeUid, to: NodeUid);

    /// Removes the edge from `from` to the parameter `to`, if any.
    fn disconnect_param(&mut self, from: NodeUid, to: ParamId);

    /// Frees a node along with every edge that touches it.
    fn release(&mut self, node: NodeUid);

    /// Writes to a parameter's automation timeline.
    fn schedule(&mut self, param: ParamId, event: AutomationEvent);

    /// Reads a parameter's automated value at the given time, or None if the
    /// parameter doesn't exist.
    fn param_value(&self, param: ParamId, at: Seconds) -> Option<ParameterType>;

    /// Sets the parameter to `value` at the absolute time `when`.
    fn set_value_at_time(&mut self, param: ParamId, value: ParameterType, when: Seconds) {
        self.schedule(param, AutomationEvent::step(when, value));
    }

    /// Ramps the parameter linearly so that it reaches `value` at `when`.
    fn linear_ramp_to_value_at_time(&mut self, param: ParamId, value: ParameterType, when: Seconds) {
        self.schedule(param, AutomationEvent::linear(when, value));
    }

    /// Ramps the parameter exponentially so that it reaches `value` at `when`.
    fn exponential_ramp_to_value_at_time(
        &mut self,
        param: ParamId,
        value: ParameterType,
        when: Seconds,
    ) {
        self.schedule(param, AutomationEvent::exponential(when, value));
    }
}

/// Something that accepts a signal through one of its nodes.
pub trait HasInput {
    /// The node that incoming signals should connect to.
    fn input(&self) -> NodeUid;
}

/// Something that emits a signal from one of its nodes, so it can serve as a
/// modulator.
pub trait HasOutput {
    /// The node whose signal should drive whatever connects to it.
    fn output(&self) -> NodeUid;
}
