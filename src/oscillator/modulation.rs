// Copyright (c) 2024 Mike Tsao

use crate::{graph::ParamId, prelude::*};
use log::debug;

/// An ordered list of the external signal sources driving one parameter.
///
/// Sources are referenced, never owned. Registering a source twice is
/// ignored, so a source is attached at most once no matter how often a caller
/// hands it over.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModulationRegistry {
    sources: Vec<NodeUid>,
}
impl ModulationRegistry {
    /// Adds a source. Returns false if it was already registered.
    pub fn register(&mut self, source: NodeUid) -> bool {
        if self.sources.contains(&source) {
            false
        } else {
            self.sources.push(source);
            true
        }
    }

    /// The registered sources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeUid> {
        self.sources.iter()
    }

    #[allow(missing_docs)]
    pub fn contains(&self, source: NodeUid) -> bool {
        self.sources.contains(&source)
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Connects every source to `param`, in registration order.
    pub(crate) fn attach_all<B: AudioBackend>(&self, backend: &mut B, param: ParamId) {
        for source in self.sources.iter() {
            debug!("attaching modulator {source} to {} {}", param.node, param.kind);
            backend.connect_param(*source, param);
        }
    }

    /// Severs every source's edge to `param`. The sources stay registered.
    pub(crate) fn detach_all<B: AudioBackend>(&self, backend: &mut B, param: ParamId) {
        for source in self.sources.iter() {
            backend.disconnect_param(*source, param);
        }
    }

    /// Forgets every source.
    pub(crate) fn clear(&mut self) {
        self.sources.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscillator::Waveform;

    #[test]
    fn registration_is_ordered_and_deduplicated() {
        let mut registry = ModulationRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.register(NodeUid(9)));
        assert!(registry.register(NodeUid(3)));
        assert!(!registry.register(NodeUid(9)), "Duplicates are ignored");
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.iter().copied().collect::<Vec<_>>(),
            vec![NodeUid(9), NodeUid(3)]
        );
    }

    #[test]
    fn attach_and_detach() {
        let mut backend = VirtualBackend::default();
        let lfo_1 = backend.create_generator(Waveform::Sine, FrequencyHz(3.0));
        let lfo_2 = backend.create_generator(Waveform::Triangle, FrequencyHz(0.5));
        let carrier = backend.create_generator(Waveform::Sine, FrequencyHz(440.0));
        let param = ParamId::frequency(carrier);

        let mut registry = ModulationRegistry::default();
        registry.register(lfo_1);
        registry.register(lfo_2);
        registry.attach_all(&mut backend, param);
        assert_eq!(backend.param_sources(param), vec![lfo_1, lfo_2]);

        registry.detach_all(&mut backend, param);
        assert!(backend.param_sources(param).is_empty());
        assert_eq!(registry.len(), 2, "Detaching doesn't forget sources");

        registry.clear();
        assert!(registry.is_empty());
    }
}
