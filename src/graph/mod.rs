// Copyright (c) 2024 Mike Tsao

//! The boundary between oscillators and the audio substrate they run on.
//!
//! An oscillator never renders a sample itself. It composes primitives that
//! an [AudioBackend] provides (generators, gains, delays, panners, and fixed
//! processing stages), wires them together with directed edges, and writes
//! automation to their parameters. [VirtualBackend] is a complete in-memory
//! backend, and [AudioContext] is the shared handle that oscillators hold.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        AudioBackend, AudioContext, Connection, Destination, HasInput, HasOutput, NodeKind,
        ParamId, ParamInput, ParamKind, VirtualBackend,
    };
}

pub use {
    context::AudioContext,
    node::{Connection, Destination, NodeKind, ParamId, ParamInput, ParamKind},
    traits::{AudioBackend, HasInput, HasOutput},
    virtual_backend::VirtualBackend,
};

mod context;
mod node;
mod traits;
mod virtual_backend;
