// Copyright (c) 2024 Mike Tsao

use crate::prelude::*;
use log::trace;
use rustc_hash::FxHashMap;

/// The backend nodes that one oscillator owns exclusively.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OwnedNodes {
    #[allow(missing_docs)]
    pub generator: Option<NodeUid>,
    #[allow(missing_docs)]
    pub delay: Option<NodeUid>,
    #[allow(missing_docs)]
    pub output: NodeUid,
    #[allow(missing_docs)]
    pub pan: NodeUid,
    /// The chain's processing stages, in chain order.
    pub stages: Vec<NodeUid>,
}
impl OwnedNodes {
    /// Every owned node, signal path order.
    pub fn all(&self) -> Vec<NodeUid> {
        self.generator
            .iter()
            .chain(self.delay.iter())
            .chain(core::iter::once(&self.output))
            .chain(self.stages.iter())
            .chain(core::iter::once(&self.pan))
            .copied()
            .collect()
    }

    /// Silences the generator now, then severs and releases every node.
    pub(crate) fn teardown<B: AudioBackend>(&self, backend: &mut B) {
        if let Some(generator) = self.generator {
            let now = backend.now();
            backend.stop(generator, now);
        }
        for node in self.all() {
            backend.disconnect(node);
            backend.release(node);
        }
    }
}

/// Tracks every live oscillator in one audio context, along with the nodes it
/// owns, so that the whole subsystem can be torn down at once.
#[derive(Debug, Default)]
pub struct LivenessRegistry {
    entries: FxHashMap<OscillatorUid, OwnedNodes>,
}
impl LivenessRegistry {
    /// Adds an oscillator, or replaces its record of owned nodes.
    pub fn insert(&mut self, uid: OscillatorUid, nodes: OwnedNodes) {
        trace!("registry: {uid} owns {:?}", nodes.all());
        self.entries.insert(uid, nodes);
    }

    /// Removes an oscillator. Returns its owned nodes if it was registered.
    pub fn remove(&mut self, uid: OscillatorUid) -> Option<OwnedNodes> {
        self.entries.remove(&uid)
    }

    #[allow(missing_docs)]
    pub fn contains(&self, uid: OscillatorUid) -> bool {
        self.entries.contains_key(&uid)
    }

    #[allow(missing_docs)]
    pub fn get(&self, uid: OscillatorUid) -> Option<&OwnedNodes> {
        self.entries.get(&uid)
    }

    /// Registered uids in ascending order.
    pub fn uids(&self) -> Vec<OscillatorUid> {
        let mut uids: Vec<OscillatorUid> = self.entries.keys().copied().collect();
        uids.sort_by_key(|uid| uid.0);
        uids
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Empties the registry, returning every entry ordered by uid.
    pub fn drain(&mut self) -> Vec<(OscillatorUid, OwnedNodes)> {
        let mut entries: Vec<(OscillatorUid, OwnedNodes)> = self.entries.drain().collect();
        entries.sort_by_key(|(uid, _)| uid.0);
        entries
    }
}
