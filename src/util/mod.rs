// Copyright (c) 2024 Mike Tsao

//! Configuration and other utilities.

/// Commonly used imports.
pub mod prelude {
    pub use super::{OscillatorSettings, OscillatorSettingsBuilder};
}

pub use settings::{OscillatorSettings, OscillatorSettingsBuilder, OscillatorSettingsBuilderError};

mod settings;
