// Copyright (c) 2024 Mike Tsao

//! Convenience constructors for oscillators with a fixed waveform.

use super::{ModulatableOscillator, Waveform};
use crate::{error::Result, prelude::*};

/// A sine oscillator.
pub fn sine<B: AudioBackend>(
    context: &AudioContext<B>,
    frequency: impl Into<FrequencyHz>,
) -> Result<ModulatableOscillator<B>> {
    ModulatableOscillator::new_with(context, frequency, Waveform::Sine)
}

/// A triangle oscillator.
pub fn triangle<B: AudioBackend>(
    context: &AudioContext<B>,
    frequency: impl Into<FrequencyHz>,
) -> Result<ModulatableOscillator<B>> {
    ModulatableOscillator::new_with(context, frequency, Waveform::Triangle)
}

/// A sawtooth oscillator.
pub fn sawtooth<B: AudioBackend>(
    context: &AudioContext<B>,
    frequency: impl Into<FrequencyHz>,
) -> Result<ModulatableOscillator<B>> {
    ModulatableOscillator::new_with(context, frequency, Waveform::Sawtooth)
}

/// A square oscillator.
pub fn square<B: AudioBackend>(
    context: &AudioContext<B>,
    frequency: impl Into<FrequencyHz>,
) -> Result<ModulatableOscillator<B>> {
    ModulatableOscillator::new_with(context, frequency, Waveform::Square)
}
