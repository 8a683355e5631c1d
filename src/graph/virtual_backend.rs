// Copyright (c) 2024 Mike Tsao

use super::{AudioBackend, Connection, NodeKind, ParamId, ParamKind};
use crate::{
    automation::{AutomationEvent, ParamTimeline},
    oscillator::{StageKind, Waveform},
    prelude::*,
};
use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

#[derive(Debug)]
struct VirtualNode {
    kind: NodeKind,
    outputs: Vec<Connection>,
    params: FxHashMap<ParamKind, ParamTimeline>,
    started_at: Option<Seconds>,
    stopped_at: Option<Seconds>,
}
impl VirtualNode {
    fn new_with(kind: NodeKind) -> Self {
        Self {
            kind,
            outputs: Vec::default(),
            params: kind
                .default_params()
                .into_iter()
                .map(|(kind, value)| (kind, ParamTimeline::new_with(value)))
                .collect(),
            started_at: None,
            stopped_at: None,
        }
    }
}

/// An in-memory [AudioBackend]. It doesn't render audio; it keeps the node
/// graph, the one-shot playback bookkeeping, and every parameter timeline,
/// and it lets the caller move the clock by hand. That makes it the natural
/// backend for tests and for driving a real renderer that polls it.
#[derive(Debug)]
pub struct VirtualBackend {
    now: Seconds,
    uid_factory: UidFactory<NodeUid>,
    destination: NodeUid,
    nodes: FxHashMap<NodeUid, VirtualNode>,
}
impl Default for VirtualBackend {
    fn default() -> Self {
        let uid_factory = UidFactory::<NodeUid>::default();
        let destination = uid_factory.mint_next();
        let mut nodes = FxHashMap::default();
        nodes.insert(destination, VirtualNode::new_with(NodeKind::Destination));
        Self {
            now: Seconds::zero(),
            uid_factory,
            destination,
            nodes,
        }
    }
}
impl AudioBackend for VirtualBackend {
    fn now(&self) -> Seconds {
        self.now
    }

    fn default_destination(&self) -> NodeUid {
        self.destination
    }

    fn is_live(&self, node: NodeUid) -> bool {
        self.nodes.contains_key(&node)
    }

    fn create_generator(&mut self, waveform: Waveform, frequency: FrequencyHz) -> NodeUid {
        let uid = self.add_node(NodeKind::Generator(waveform));
        if let Some(node) = self.nodes.get_mut(&uid) {
            node.params
                .insert(ParamKind::Frequency, ParamTimeline::new_with(frequency.0));
        }
        uid
    }

    fn set_waveform(&mut self, generator: NodeUid, waveform: Waveform) {
        match self.nodes.get_mut(&generator) {
            Some(node) if matches!(node.kind, NodeKind::Generator(_)) => {
                node.kind = NodeKind::Generator(waveform);
            }
            _ => debug!("set_waveform: {generator} is not a live generator"),
        }
    }

    fn create_gain(&mut self) -> NodeUid {
        self.add_node(NodeKind::Gain)
    }

    fn create_delay(&mut self, max_delay: Seconds) -> NodeUid {
        self.add_node(NodeKind::Delay { max_delay })
    }

    fn create_panner(&mut self) -> NodeUid {
        self.add_node(NodeKind::Panner)
    }

    fn create_stage(&mut self, stage: StageKind) -> NodeUid {
        self.add_node(NodeKind::Stage(stage))
    }

    fn start(&mut self, node: NodeUid, at: Seconds) {
        let Some(n) = self.nodes.get_mut(&node) else {
            debug!("start: {node} doesn't exist");
            return;
        };
        if !matches!(n.kind, NodeKind::Generator(_)) {
            warn!("start: {node} is a {:?}, not a generator", n.kind);
        } else if n.started_at.is_some() {
            warn!("start: generator {node} has already started, and generators are one-shot");
        } else {
            trace!("start: {node} at {at}");
            n.started_at = Some(at);
        }
    }

    fn stop(&mut self, node: NodeUid, at: Seconds) {
        let Some(n) = self.nodes.get_mut(&node) else {
            debug!("stop: {node} doesn't exist");
            return;
        };
        if n.started_at.is_none() || n.stopped_at.is_some() {
            debug!("stop: {node} isn't playing");
        } else {
            trace!("stop: {node} at {at}");
            n.stopped_at = Some(at);
        }
    }

    fn connect(&mut self, from: NodeUid, to: NodeUid) {
        if !self.nodes.contains_key(&to) {
            debug!("connect: target {to} doesn't exist");
            return;
        }
        self.add_edge(from, Connection::Node(to));
    }

    fn connect_param(&mut self, from: NodeUid, to: ParamId) {
        let has_param = self
            .nodes
            .get(&to.node)
            .is_some_and(|n| n.params.contains_key(&to.kind));
        if !has_param {
            debug!("connect_param: {} has no {} parameter", to.node, to.kind);
            return;
        }
        self.add_edge(from, Connection::Param(to));
    }

    fn disconnect(&mut self, from: NodeUid) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.outputs.clear();
        }
    }

    fn disconnect_from(&mut self, from: NodeUid, to: NodeUid) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.outputs.retain(|c| *c != Connection::Node(to));
        }
    }

    fn disconnect_param(&mut self, from: NodeUid, to: ParamId) {
        if let Some(node) = self.nodes.get_mut(&from) {
            node.outputs.retain(|c| *c != Connection::Param(to));
        }
    }

    fn release(&mut self, node: NodeUid) {
        if node == self.destination {
            warn!("release: refusing to release the default destination");
            return;
        }
        if self.nodes.remove(&node).is_none() {
            return;
        }
        self.nodes.values_mut().for_each(|n| {
            n.outputs.retain(|c| match c {
                Connection::Node(uid) => *uid != node,
                Connection::Param(param) => param.node != node,
            })
        });
        trace!("release: {node}");
    }

    fn schedule(&mut self, param: ParamId, event: AutomationEvent) {
        let now = self.now;
        match self
            .nodes
            .get_mut(&param.node)
            .and_then(|n| n.params.get_mut(&param.kind))
        {
            Some(timeline) => {
                trace!(
                    "schedule: {} {} -> {} ({}) at {}",
                    param.node,
                    param.kind,
                    event.value,
                    event.curve,
                    event.when
                );
                timeline.schedule(event, now);
            }
            None => debug!("schedule: {} has no {} parameter", param.node, param.kind),
        }
    }

    fn param_value(&self, param: ParamId, at: Seconds) -> Option<ParameterType> {
        self.timeline(param).map(|t| t.value_at(at))
    }
}
impl VirtualBackend {
    fn add_node(&mut self, kind: NodeKind) -> NodeUid {
        let uid = self.uid_factory.mint_next();
        self.nodes.insert(uid, VirtualNode::new_with(kind));
        uid
    }

    fn add_edge(&mut self, from: NodeUid, connection: Connection) {
        let Some(node) = self.nodes.get_mut(&from) else {
            debug!("connect: source {from} doesn't exist");
            return;
        };
        // Connecting an edge that already exists is ignored.
        if !node.outputs.contains(&connection) {
            node.outputs.push(connection);
        }
    }

    /// Moves the clock forward.
    pub fn advance(&mut self, delta: Seconds) {
        if delta.0 < 0.0 {
            warn!("advance: the clock only moves forward");
            return;
        }
        self.now = self.now + delta;
    }

    /// Moves the clock to `now`, which must not be in the past.
    pub fn set_time(&mut self, now: Seconds) {
        if now < self.now {
            warn!("set_time: refusing to move the clock back to {now}");
            return;
        }
        self.now = now;
    }

    /// Every outgoing edge of `node`, in the order they were made.
    pub fn outputs(&self, node: NodeUid) -> Vec<Connection> {
        self.nodes
            .get(&node)
            .map(|n| n.outputs.clone())
            .unwrap_or_default()
    }

    /// The nodes that `node` feeds signal to.
    pub fn node_outputs(&self, node: NodeUid) -> Vec<NodeUid> {
        self.outputs(node)
            .into_iter()
            .filter_map(|c| match c {
                Connection::Node(uid) => Some(uid),
                Connection::Param(_) => None,
            })
            .collect()
    }

    /// The nodes that feed signal to `node`.
    pub fn node_inputs(&self, node: NodeUid) -> Vec<NodeUid> {
        self.sources_of(Connection::Node(node))
    }

    /// The nodes currently modulating `param`.
    pub fn param_sources(&self, param: ParamId) -> Vec<NodeUid> {
        self.sources_of(Connection::Param(param))
    }

    fn sources_of(&self, connection: Connection) -> Vec<NodeUid> {
        let mut sources: Vec<NodeUid> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.outputs.contains(&connection))
            .map(|(uid, _)| *uid)
            .collect();
        sources.sort_by_key(|uid| uid.0);
        sources
    }

    #[allow(missing_docs)]
    pub fn node_kind(&self, node: NodeUid) -> Option<NodeKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    /// The number of live nodes, including the default destination.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the generator is emitting at time `at`.
    pub fn is_emitting(&self, node: NodeUid, at: Seconds) -> bool {
        self.nodes.get(&node).is_some_and(|n| {
            n.started_at.is_some_and(|start| start <= at)
                && n.stopped_at.map_or(true, |stop| at < stop)
        })
    }

    /// The time at which a generator was told to start, if it was.
    pub fn started_at(&self, node: NodeUid) -> Option<Seconds> {
        self.nodes.get(&node).and_then(|n| n.started_at)
    }

    /// The time at which a generator was told to stop, if it was.
    pub fn stopped_at(&self, node: NodeUid) -> Option<Seconds> {
        self.nodes.get(&node).and_then(|n| n.stopped_at)
    }

    #[allow(missing_docs)]
    pub fn timeline(&self, param: ParamId) -> Option<&ParamTimeline> {
        self.nodes
            .get(&param.node)
            .and_then(|n| n.params.get(&param.kind))
    }

    /// Pushes `input` through the graph starting at `from`, following each
    /// node's first outgoing signal edge and applying gains and processing
    /// stages at the current clock time. Returns the value that reaches the
    /// default destination, or None if the path dead-ends or loops.
    pub fn probe(&self, from: NodeUid, input: ParameterType) -> Option<ParameterType> {
        let mut uid = from;
        let mut value = input;
        for _ in 0..=self.nodes.len() {
            let node = self.nodes.get(&uid)?;
            value = match node.kind {
                NodeKind::Destination => return Some(value),
                NodeKind::Gain => value * self.param_value(ParamId::gain(uid), self.now)?,
                NodeKind::Stage(stage) => stage.transform(value),
                NodeKind::Generator(_) | NodeKind::Delay { .. } | NodeKind::Panner => value,
            };
            uid = node.outputs.iter().find_map(|c| match c {
                Connection::Node(next) => Some(*next),
                Connection::Param(_) => None,
            })?;
        }
        None
    }
}
