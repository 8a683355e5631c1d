// Copyright (c) 2024 Mike Tsao

use crate::{prelude::*, types::map_range};
use log::debug;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The kinds of processing stage a [SignalChain] can hold. A chain holds at
/// most one stage of each category.
#[derive(
    Clone, Copy, Debug, Display, EnumIter, Eq, Hash, IntoStaticStr, PartialEq, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum StageCategory {
    /// Adds a constant.
    Additive,
    /// Multiplies by a constant.
    Multiplicative,
    /// Maps one range onto another.
    RangeScale,
}

/// A fixed arithmetic transformation applied to a signal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Adds the value to every sample.
    Offset(ParameterType),
    /// Multiplies every sample by the value.
    Multiply(ParameterType),
    /// Linearly maps `in_min..in_max` onto `out_min..out_max`.
    Rescale {
        #[allow(missing_docs)]
        in_min: ParameterType,
        #[allow(missing_docs)]
        in_max: ParameterType,
        #[allow(missing_docs)]
        out_min: ParameterType,
        #[allow(missing_docs)]
        out_max: ParameterType,
    },
}
impl StageKind {
    #[allow(missing_docs)]
    pub fn category(&self) -> StageCategory {
        match self {
            StageKind::Offset(_) => StageCategory::Additive,
            StageKind::Multiply(_) => StageCategory::Multiplicative,
            StageKind::Rescale { .. } => StageCategory::RangeScale,
        }
    }

    /// What this stage does to one sample.
    pub fn transform(&self, input: ParameterType) -> ParameterType {
        match *self {
            StageKind::Offset(value) => input + value,
            StageKind::Multiply(value) => input * value,
            StageKind::Rescale {
                in_min,
                in_max,
                out_min,
                out_max,
            } => map_range(input, in_min, in_max, out_min, out_max),
        }
    }
}

/// A processing stage that has been spliced into the graph.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stage {
    #[allow(missing_docs)]
    pub kind: StageKind,
    /// The backend node that implements the stage.
    pub node: NodeUid,
}

/// The ordered post-output processing pipeline of an oscillator.
///
/// Position 0 is always the output gain node. The stages follow in the order
/// their categories were first used. The chain's tail feeds a sink (the
/// oscillator's panner) that the chain doesn't own.
#[derive(Clone, Debug, PartialEq)]
pub struct SignalChain {
    output: NodeUid,
    stages: Vec<Stage>,
}
impl SignalChain {
    /// Creates a chain holding only the output node.
    pub fn new_with(output: NodeUid) -> Self {
        Self {
            output,
            stages: Vec::default(),
        }
    }

    /// The output gain node, which is always first.
    pub fn output(&self) -> NodeUid {
        self.output
    }

    #[allow(missing_docs)]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The number of nodes in the chain, counting the output node.
    pub fn node_count(&self) -> usize {
        self.stages.len() + 1
    }

    /// Every node in the chain, output node first.
    pub fn nodes(&self) -> impl Iterator<Item = NodeUid> + '_ {
        core::iter::once(self.output).chain(self.stages.iter().map(|s| s.node))
    }

    /// The last node in the chain, which feeds the sink.
    pub fn tail(&self) -> NodeUid {
        self.stages.last().map_or(self.output, |s| s.node)
    }

    /// The stage of the given category, if the chain has one.
    pub fn stage(&self, category: StageCategory) -> Option<&Stage> {
        self.stages.iter().find(|s| s.kind.category() == category)
    }

    /// The categories present, in chain order.
    pub fn categories(&self) -> Vec<StageCategory> {
        self.stages.iter().map(|s| s.kind.category()).collect()
    }

    /// Splices a new stage into the graph, replacing any stage of the same
    /// category in place, or appending it just before `sink` if the category
    /// is new. Returns the new stage's node.
    ///
    /// The predecessor loses its edge to whatever it used to feed and gains
    /// one to the new stage; the new stage feeds the old stage's successor (or
    /// `sink`). A replaced stage is disconnected and released, so it never
    /// keeps an edge alive.
    pub(crate) fn splice<B: AudioBackend>(
        &mut self,
        backend: &mut B,
        kind: StageKind,
        sink: NodeUid,
    ) -> NodeUid {
        let category = kind.category();
        let node = backend.create_stage(kind);
        let existing = self
            .stages
            .iter()
            .position(|s| s.kind.category() == category);
        let index = existing.unwrap_or(self.stages.len());
        let predecessor = if index == 0 {
            self.output
        } else {
            self.stages[index - 1].node
        };
        let successor = self.stages.get(index + 1).map_or(sink, |s| s.node);
        let old_successor = existing.map_or(sink, |i| self.stages[i].node);

        backend.disconnect_from(predecessor, old_successor);
        if let Some(i) = existing {
            let old = self.stages[i].node;
            backend.disconnect(old);
            backend.release(old);
            debug!("splice: {category} stage {old} replaced by {node}");
        } else {
            debug!("splice: {category} stage {node} appended");
        }
        backend.connect(predecessor, node);
        backend.connect(node, successor);

        let stage = Stage { kind, node };
        if let Some(i) = existing {
            self.stages[i] = stage;
        } else {
            self.stages.push(stage);
        }
        node
    }

    /// Ensures every internal edge output -> stages -> `sink` exists.
    pub(crate) fn link<B: AudioBackend>(&self, backend: &mut B, sink: NodeUid) {
        let nodes: Vec<NodeUid> = self.nodes().chain(core::iter::once(sink)).collect();
        nodes
            .windows(2)
            .for_each(|pair| backend.connect(pair[0], pair[1]));
    }

    pub(crate) fn stage_nodes(&self) -> Vec<NodeUid> {
        self.stages.iter().map(|s| s.node).collect()
    }
}
