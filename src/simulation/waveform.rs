// src/simulation/waveform.rs
//! Ideal analog waveform synthesis

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{AdcError, AdcResult};

/// Sinusoid riding on a DC offset
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct WaveformSpec {
    /// DC offset in volts
    #[serde(default = "defaults::offset_v")]
    pub offset_v: f64,

    /// Peak amplitude in volts
    #[serde(default = "defaults::amplitude_v")]
    pub amplitude_v: f64,

    /// Frequency in hertz
    #[serde(default = "defaults::frequency_hz")]
    pub frequency_hz: f64,
}

mod defaults {
    use crate::config::constants::waveform;

    pub fn offset_v() -> f64 { waveform::DEFAULT_OFFSET_V }
    pub fn amplitude_v() -> f64 { waveform::DEFAULT_AMPLITUDE_V }
    pub fn frequency_hz() -> f64 { waveform::DEFAULT_FREQUENCY_HZ }
}

impl Default for WaveformSpec {
    fn default() -> Self {
        Self {
            offset_v: defaults::offset_v(),
            amplitude_v: defaults::amplitude_v(),
            frequency_hz: defaults::frequency_hz(),
        }
    }
}

impl WaveformSpec {
    /// Sinusoid with the given parameters, unchecked until [`validate`](Self::validate)
    pub fn new(offset_v: f64, amplitude_v: f64, frequency_hz: f64) -> Self {
        Self { offset_v, amplitude_v, frequency_hz }
    }

    /// Constant level, no oscillation
    pub fn dc(level_v: f64) -> Self {
        Self::new(level_v, 0.0, 0.0)
    }

    /// Reject non-finite parameters
    pub fn validate(&self) -> AdcResult<()> {
        let fields = [
            ("offset_v", self.offset_v),
            ("amplitude_v", self.amplitude_v),
            ("frequency_hz", self.frequency_hz),
        ];

        for (field, value) in fields {
            if !value.is_finite() {
                return Err(AdcError::InvalidWaveform { field, value });
            }
        }
        Ok(())
    }

    /// `offset + amplitude * sin(2π f t)`
    #[inline]
    pub fn value_at(&self, t: f64) -> f64 {
        self.offset_v + self.amplitude_v * (2.0 * PI * self.frequency_hz * t).sin()
    }
}

/// Produces the ideal signal for a time base
#[derive(Debug, Clone, Copy)]
pub struct SignalSynthesizer {
    spec: WaveformSpec,
}

impl SignalSynthesizer {
    /// Synthesizer for `spec`
    pub fn new(spec: WaveformSpec) -> Self {
        Self { spec }
    }

    /// Waveform being synthesized
    pub fn spec(&self) -> &WaveformSpec {
        &self.spec
    }

    /// Evaluate the waveform at every instant
    pub fn synthesize(&self, time: &[f64]) -> Vec<f64> {
        time.iter().map(|&t| self.spec.value_at(t)).collect()
    }

    /// Same values as [`synthesize`](Self::synthesize), computed across the rayon pool
    pub fn synthesize_par(&self, time: &[f64]) -> Vec<f64> {
        time.par_iter().map(|&t| self.spec.value_at(t)).collect()
    }
}
