// Copyright (c) 2024 Mike Tsao

//! Serializable configuration for oscillators.

use crate::{oscillator::Waveform, prelude::*};
use derivative::Derivative;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Everything needed to construct a
/// [ModulatableOscillator](crate::oscillator::ModulatableOscillator), and
/// nothing that depends on a running audio graph.
#[derive(Builder, Clone, Debug, Derivative, PartialEq, Serialize, Deserialize)]
#[derivative(Default)]
#[serde(default, rename_all = "kebab-case")]
#[builder(build_fn(private, name = "build_from_builder"), default)]
pub struct OscillatorSettings {
    /// The nominal frequency. Negative values are allowed; the generator plays
    /// the absolute value.
    #[derivative(Default(value = "FrequencyHz::A4"))]
    #[builder(setter(into))]
    pub frequency: FrequencyHz,

    #[allow(missing_docs)]
    pub waveform: Waveform,

    /// The output gain. Nominally 0.0..=1.0, but not clamped.
    #[derivative(Default(value = "0.5"))]
    pub amplitude: ParameterType,

    /// Stereo position, -1.0 (left) to 1.0 (right).
    #[builder(setter(into))]
    pub pan: BipolarNormal,

    /// The capacity of the delay line that implements phase offsets.
    #[derivative(Default(value = "Seconds(1.0)"))]
    #[builder(setter(into))]
    pub max_phase_delay: Seconds,
}
impl OscillatorSettingsBuilder {
    /// Builds the settings, rejecting values that no oscillator could use.
    pub fn build(&self) -> Result<OscillatorSettings, OscillatorSettingsBuilderError> {
        let s = self.build_from_builder()?;
        Self::verify(&s)?;
        Ok(s)
    }

    fn verify(s: &OscillatorSettings) -> Result<(), OscillatorSettingsBuilderError> {
        if !s.frequency.is_finite() {
            return Err(OscillatorSettingsBuilderError::ValidationError(format!(
                "frequency {} is not finite",
                s.frequency
            )));
        }
        if !s.amplitude.is_finite() {
            return Err(OscillatorSettingsBuilderError::ValidationError(format!(
                "amplitude {} is not finite",
                s.amplitude
            )));
        }
        if !BipolarNormal::contains(s.pan.0) {
            return Err(OscillatorSettingsBuilderError::ValidationError(format!(
                "pan {} is outside -1.0..=1.0",
                s.pan
            )));
        }
        if !s.max_phase_delay.is_finite() || s.max_phase_delay.0 <= 0.0 {
            return Err(OscillatorSettingsBuilderError::ValidationError(format!(
                "max phase delay {} must be positive",
                s.max_phase_delay
            )));
        }
        Ok(())
    }
}
impl OscillatorSettings {
    /// Parses settings from JSON. Missing fields take their defaults, and the
    /// result is validated the same way the builder validates.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        OscillatorSettingsBuilder::verify(&settings)?;
        Ok(settings)
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
