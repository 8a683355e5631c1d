// Copyright (c) 2024 Mike Tsao

//! Oscillators that keep running while their pitch, loudness, stereo
//! position, phase, and output processing change underneath them.
//!
//! [ModulatableOscillator] is the main type. It composes backend primitives
//! into a small graph and keeps the durable state needed to rebuild its
//! one-shot generator on every restart. Its output path is a [SignalChain]
//! holding at most one processing stage per [StageCategory], and the sources
//! modulating its frequency live in a [ModulationRegistry] so that they
//! survive restarts. Each [AudioContext](crate::graph::AudioContext) tracks
//! its live oscillators in a [LivenessRegistry].

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        ModulatableOscillator, ModulationRegistry, SignalChain, StageCategory, StageKind, Waveform,
    };
}

pub use {
    chain::{SignalChain, Stage, StageCategory, StageKind},
    modulatable::ModulatableOscillator,
    modulation::ModulationRegistry,
    registry::{LivenessRegistry, OwnedNodes},
    waveform::Waveform,
};

pub mod presets;

mod chain;
mod modulatable;
mod modulation;
mod registry;
mod waveform;
