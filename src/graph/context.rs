// Copyright (c) 2024 Mike Tsao

use super::{AudioBackend, VirtualBackend};
use crate::{oscillator::LivenessRegistry, prelude::*};
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard};

/// The state that an [AudioContext] shares among its oscillators.
#[derive(Debug)]
pub(crate) struct ContextInner<B: AudioBackend> {
    pub(crate) backend: B,
    pub(crate) registry: LivenessRegistry,
    pub(crate) uid_factory: UidFactory<OscillatorUid>,
}

/// A cloneable handle to an audio subsystem: the [AudioBackend] that owns the
/// node graph, plus the registry of every live oscillator created against it.
///
/// Oscillators hold a clone of the handle. All of them issue commands from
/// the control thread; the lock only keeps the borrow checker and any
/// rendering thread that polls the backend honest.
#[derive(Debug)]
pub struct AudioContext<B: AudioBackend = VirtualBackend> {
    inner: Arc<Mutex<ContextInner<B>>>,
}
impl<B: AudioBackend> Clone for AudioContext<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
impl<B: AudioBackend + Default> Default for AudioContext<B> {
    fn default() -> Self {
        Self::new_with(B::default())
    }
}
impl<B: AudioBackend> AudioContext<B> {
    /// Wraps a backend in a new context with an empty registry.
    pub fn new_with(backend: B) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ContextInner {
                backend,
                registry: LivenessRegistry::default(),
                uid_factory: UidFactory::default(),
            })),
        }
    }

    // A panic while the lock was held can't leave the graph half-built in a
    // way that matters more than losing the whole subsystem, so a poisoned
    // lock is simply reclaimed.
    pub(crate) fn lock(&self) -> MutexGuard<'_, ContextInner<B>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The backend's current clock time.
    pub fn now(&self) -> Seconds {
        self.lock().backend.now()
    }

    /// Runs `f` with exclusive access to the backend, for example to advance
    /// a [VirtualBackend]'s clock or to inspect its graph.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.lock().backend)
    }

    /// Whether the oscillator is registered as live.
    pub fn is_live(&self, uid: OscillatorUid) -> bool {
        self.lock().registry.contains(uid)
    }

    /// The uids of every live oscillator, in ascending order.
    pub fn live_oscillators(&self) -> Vec<OscillatorUid> {
        self.lock().registry.uids()
    }

    /// Disposes every live oscillator: stops its generator, severs and
    /// releases every node it owns, and empties the registry. Returns the
    /// number of oscillators disposed.
    pub fn dispose_all(&self) -> usize {
        let mut inner = self.lock();
        let inner = &mut *inner;
        let entries = inner.registry.drain();
        let count = entries.len();
        for (uid, nodes) in entries {
            nodes.teardown(&mut inner.backend);
            debug!("dispose_all: tore down oscillator {uid}");
        }
        info!("disposed {count} oscillator(s)");
        count
    }
}
