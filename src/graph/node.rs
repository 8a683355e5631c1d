// Copyright (c) 2024 Mike Tsao

use crate::{
    oscillator::{StageKind, Waveform},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// What an audio node does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// The final sink, usually a mixer input.
    Destination,
    /// A one-shot periodic signal source.
    Generator(Waveform),
    /// Multiplies its input by its gain parameter.
    Gain,
    /// Delays its input by its delay-time parameter, up to `max_delay`.
    Delay {
        #[allow(missing_docs)]
        max_delay: Seconds,
    },
    /// Places its input in the stereo field according to its pan parameter.
    Panner,
    /// A fixed arithmetic transformation.
    Stage(StageKind),
}
impl NodeKind {
    /// The parameters a node of this kind exposes, with their initial values.
    pub(crate) fn default_params(&self) -> Vec<(ParamKind, ParameterType)> {
        match self {
            NodeKind::Generator(_) => vec![(ParamKind::Frequency, FrequencyHz::A4.0)],
            NodeKind::Gain => vec![(ParamKind::Gain, 1.0)],
            NodeKind::Delay { .. } => vec![(ParamKind::DelayTime, 0.0)],
            NodeKind::Panner => vec![(ParamKind::Pan, 0.0)],
            NodeKind::Destination | NodeKind::Stage(_) => Vec::default(),
        }
    }
}

/// Names an automatable parameter within a node.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, Eq, Hash, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ParamKind {
    /// A generator's instantaneous frequency, in Hertz.
    Frequency,
    /// A gain node's multiplier.
    Gain,
    /// A delay node's delay, in seconds.
    DelayTime,
    /// A panner's position, -1.0 (left) to 1.0 (right).
    Pan,
}

/// Addresses one parameter of one node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParamId {
    #[allow(missing_docs)]
    pub node: NodeUid,
    #[allow(missing_docs)]
    pub kind: ParamKind,
}
#[allow(missing_docs)]
impl ParamId {
    pub fn new(node: NodeUid, kind: ParamKind) -> Self {
        Self { node, kind }
    }

    pub fn frequency(node: NodeUid) -> Self {
        Self::new(node, ParamKind::Frequency)
    }

    pub fn gain(node: NodeUid) -> Self {
        Self::new(node, ParamKind::Gain)
    }

    pub fn delay_time(node: NodeUid) -> Self {
        Self::new(node, ParamKind::DelayTime)
    }

    pub fn pan(node: NodeUid) -> Self {
        Self::new(node, ParamKind::Pan)
    }
}

/// The far end of a directed edge leaving a node.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Connection {
    /// The edge feeds another node's signal input.
    Node(NodeUid),
    /// The edge drives a parameter continuously.
    Param(ParamId),
}

/// Where an oscillator sends its finished signal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// The backend's default sink.
    #[default]
    Default,
    /// A specific node.
    Node(NodeUid),
}
impl From<NodeUid> for Destination {
    fn from(value: NodeUid) -> Self {
        Destination::Node(value)
    }
}
impl<T: HasInput> From<&T> for Destination {
    fn from(value: &T) -> Self {
        Destination::Node(value.input())
    }
}

/// Either a value to schedule, or a signal source to connect to a parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamInput {
    /// A scheduled numeric write.
    Value(ParameterType),
    /// A modulator that drives the parameter continuously.
    Source(NodeUid),
}
impl From<ParameterType> for ParamInput {
    fn from(value: ParameterType) -> Self {
        ParamInput::Value(value)
    }
}
impl From<FrequencyHz> for ParamInput {
    fn from(value: FrequencyHz) -> Self {
        ParamInput::Value(value.0)
    }
}
impl From<NodeUid> for ParamInput {
    fn from(value: NodeUid) -> Self {
        ParamInput::Source(value)
    }
}
impl<T: HasOutput> From<&T> for ParamInput {
    fn from(value: &T) -> Self {
        ParamInput::Source(value.output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Mixer {
        channel_strip: NodeUid,
    }
    impl HasInput for Mixer {
        fn input(&self) -> NodeUid {
            self.channel_strip
        }
    }

    #[test]
    fn destinations_from_inputs() {
        let mixer = Mixer {
            channel_strip: NodeUid(42),
        };
        assert_eq!(Destination::from(&mixer), Destination::Node(NodeUid(42)));
        assert_eq!(Destination::from(NodeUid(7)), Destination::Node(NodeUid(7)));
        assert_eq!(Destination::default(), Destination::Default);
    }

    #[test]
    fn param_inputs_from_values_and_sources() {
        assert_eq!(ParamInput::from(0.5), ParamInput::Value(0.5));
        assert_eq!(
            ParamInput::from(FrequencyHz(220.0)),
            ParamInput::Value(220.0)
        );
        assert_eq!(ParamInput::from(NodeUid(3)), ParamInput::Source(NodeUid(3)));
    }
}
