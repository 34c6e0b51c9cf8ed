// src/error.rs
//! Error types for the ADC signal chain
//!
//! Every variant is raised while an [`AdcConfig`](crate::config::AdcConfig) is being
//! constructed. Once a configuration exists, no pipeline stage can fail, so the
//! processing APIs return plain values rather than `Result`s.

use thiserror::Error;

/// Result alias used throughout the crate
pub type AdcResult<T> = Result<T, AdcError>;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AdcError {
    /// Bit resolution is zero, negative, fractional or too wide for a `u32` code
    #[error("invalid resolution {bits} bits: must be an integer in [1, {max}]")]
    InvalidResolution {
        /// Offending resolution as supplied
        bits: f64,
        /// Widest supported resolution
        max: u32,
    },

    /// Filter coefficient outside (0, 1]
    #[error("invalid filter coefficient alpha={alpha}: must satisfy 0 < alpha <= 1")]
    InvalidFilterCoefficient {
        /// Offending coefficient
        alpha: f64,
    },

    /// Reference voltage not strictly positive and finite
    #[error("invalid reference voltage {volts} V: must be positive and finite")]
    InvalidReferenceVoltage {
        /// Offending reference voltage
        volts: f64,
    },

    /// Fewer than two samples, so the time base has no spacing
    #[error("invalid sample count {count}: at least 2 samples are required")]
    InvalidSampleCount {
        /// Offending sample count as written, which may be negative in a file
        count: i64,
    },

    /// Sampling duration not finite and positive, or too short to separate the samples
    #[error(
        "invalid sampling duration {seconds} s: must be positive, finite and long enough \
         for strictly increasing sample instants"
    )]
    InvalidDuration {
        /// Offending duration
        seconds: f64,
    },

    /// Noise standard deviation negative or not finite
    #[error("invalid noise amplitude {std_dev}: standard deviation must be finite and >= 0")]
    InvalidNoiseAmplitude {
        /// Offending standard deviation
        std_dev: f64,
    },

    /// Waveform parameter not finite
    #[error("invalid waveform {field}={value}: must be finite")]
    InvalidWaveform {
        /// Name of the offending parameter
        field: &'static str,
        /// Offending value
        value: f64,
    },
}
