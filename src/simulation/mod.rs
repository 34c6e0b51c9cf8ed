//! Analog-side simulation: time base, ideal waveform and noise
//! Location: src/simulation/mod.rs

pub mod time_base;
pub mod waveform;
pub mod noise_models;

pub use time_base::TimeBase;
pub use waveform::{SignalSynthesizer, WaveformSpec};
pub use noise_models::{noise_rng, GaussianNoise};
