// Copyright (c) 2024 Mike Tsao

#![deny(missing_docs, unused_imports, unused_variables)]
#![allow(rustdoc::private_intra_doc_links)]

//! Ensnare oscillators are periodic signal sources that you can keep
//! reshaping while they play.
//!
//! An oscillator doesn't compute samples. It composes primitives supplied by
//! an audio backend (a generator, gains, a delay line, a panner, and simple
//! arithmetic stages) into a small graph, and it schedules changes to their
//! parameters against the backend's clock. That leaves the hard part to this
//! crate: keeping the graph correct while it's being rewired.
//!
//! * Create an [AudioContext] around an [AudioBackend]. [VirtualBackend] is a
//!   complete in-memory backend that is also handy for tests.
//! * Create a [ModulatableOscillator], directly or with one of the
//!   [presets](oscillator::presets), and [start()](ModulatableOscillator::start) it.
//! * Schedule frequency, amplitude, and pan changes, set a phase offset, or let
//!   another oscillator drive its frequency or amplitude.
//! * Splice an offset, a multiplier, or a rescale into its output path. Doing
//!   it again replaces the earlier stage of the same kind.
//! * [dispose()](ModulatableOscillator::dispose) it, or tear down everything
//!   at once with [AudioContext::dispose_all()].

/// A collection of imports that are useful to users of this crate. `use
/// ensnare_oscillator::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        automation::prelude::*, error::OscillatorError, graph::prelude::*,
        oscillator::prelude::*, types::prelude::*, util::prelude::*,
    };
}

// Fundamental structures that are important enough to re-export at top level.
pub use {
    error::{OscillatorError, Result},
    graph::{AudioBackend, AudioContext, VirtualBackend},
    oscillator::ModulatableOscillator,
    util::OscillatorSettings,
};

pub mod automation;
pub mod error;
pub mod graph;
pub mod oscillator;
pub mod types;
pub mod util;
