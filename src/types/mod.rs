// Copyright (c) 2024 Mike Tsao

//! Common data types used throughout the system.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{
        BipolarNormal, FrequencyHz, NodeUid, OscillatorUid, ParameterType, Seconds,
        UidFactory,
    };
}

pub use {
    numbers::{map_range, FrequencyHz, ParameterType},
    ranges::{BipolarNormal, RangedF64},
    time::Seconds,
    uid::{IsUid, NodeUid, OscillatorUid, UidFactory},
};

mod numbers;
mod ranges;
mod time;
mod uid;
