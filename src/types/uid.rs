// Copyright (c) 2024 Mike Tsao

//! Unique identifiers for audio nodes and oscillators, and factories that help
//! ensure they are in fact unique.

use core::sync::atomic::Ordering;
use core::{hash::Hash, marker::PhantomData, sync::atomic::AtomicUsize};
use serde::{Deserialize, Serialize};
use synonym::Synonym;

/// Identifies a node in an audio graph. Unique within one backend.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
// See
// https://doc.rust-lang.org/stable/std/marker/trait.StructuralPartialEq.html
// for explanation why we derive PartialEq rather than letting Synonym do it.
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct NodeUid(pub usize);
impl IsUid for NodeUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// Identifies an oscillator within one audio context.
#[derive(Synonym, Serialize, Deserialize, Eq, PartialEq)]
#[synonym(skip(PartialEq))]
#[serde(rename_all = "kebab-case")]
pub struct OscillatorUid(pub usize);
impl IsUid for OscillatorUid {
    fn as_usize(&self) -> usize {
        self.0
    }
}

/// An optional Uid trait.
pub trait IsUid: Eq + Hash + Clone + From<usize> {
    /// Returns the raw uid.
    fn as_usize(&self) -> usize;
}

/// Generates unique uids.
#[derive(Debug)]
pub struct UidFactory<U: IsUid> {
    pub(crate) next_uid_value: AtomicUsize,
    pub(crate) _phantom: PhantomData<U>,
}
impl<U: IsUid> Default for UidFactory<U> {
    // Zero is reserved so that a default-constructed uid never collides with
    // a minted one.
    fn default() -> Self {
        Self::new(1)
    }
}
impl<U: IsUid> UidFactory<U> {
    /// Creates a new [UidFactory] starting with the given value.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
            _phantom: Default::default(),
        }
    }

    /// Generates the next unique uid.
    pub fn mint_next(&self) -> U {
        let uid_value = self.next_uid_value.fetch_add(1, Ordering::Relaxed);
        U::from(uid_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_factory() {
        let f = UidFactory::<NodeUid>::default();

        let uid_1 = f.mint_next();
        let uid_2 = f.mint_next();
        assert_ne!(uid_1, uid_2, "Minted Uids should not repeat");
        assert_ne!(
            uid_1,
            NodeUid::default(),
            "Minted Uids should never equal the default Uid"
        );

        let mut ids: std::collections::HashSet<NodeUid> = Default::default();
        for _ in 0..64 {
            let uid = f.mint_next();
            assert!(!ids.contains(&uid), "minted uids should be unique");
            ids.insert(uid);
        }
    }
}
