// src/processing/quantizer.rs
//! Voltage-to-code quantization and code-to-voltage reconstruction
//!
//! ```text
//! code          = round(clip(v / vref * (levels - 1), 0, levels - 1))
//! reconstructed = code / (levels - 1) * vref
//! ```
//!
//! Rounding is half-to-even, so a value exactly between two codes goes to the even
//! one (511.5 -> 512, 2.5 -> 2). Out-of-range voltages saturate at code 0 or
//! `levels - 1`; NaN maps to code 0.

use rayon::prelude::*;
use serde::Serialize;

use crate::config::AdcConfig;

/// Uniform quantizer over `[0, vref]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    reference_voltage: f64,
    max_code: u32,
}

/// Codes and their reconstructed voltages, index-aligned with the input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantized {
    /// Output codes
    pub codes: Vec<u32>,
    /// Voltage of each code
    pub reconstructed: Vec<f64>,
}

impl Quantizer {
    /// Caller guarantees a positive finite reference voltage and `1 <= bits <= 32`
    pub fn new(reference_voltage: f64, resolution_bits: u32) -> Self {
        Self {
            reference_voltage,
            max_code: ((1u64 << resolution_bits) - 1) as u32,
        }
    }

    /// Quantizer for the configured range and resolution
    pub fn from_config(config: &AdcConfig) -> Self {
        Self {
            reference_voltage: config.reference_voltage(),
            max_code: config.max_code(),
        }
    }

    /// Full-scale voltage
    pub fn reference_voltage(&self) -> f64 {
        self.reference_voltage
    }

    /// Largest code, `2^bits - 1`
    pub fn max_code(&self) -> u32 {
        self.max_code
    }

    /// Voltage of one code step
    pub fn step(&self) -> f64 {
        self.reference_voltage / self.max_code as f64
    }

    /// Nearest code, clipped to the converter range
    #[inline]
    pub fn code(&self, volts: f64) -> u32 {
        round_code(volts / self.reference_voltage * self.max_code as f64, self.max_code)
    }

    /// Voltage represented by `code`
    #[inline]
    pub fn reconstruct(&self, code: u32) -> f64 {
        code as f64 / self.max_code as f64 * self.reference_voltage
    }

    /// True when `volts` lies outside `[0, vref]` and was clipped
    pub fn saturates(&self, volts: f64) -> bool {
        volts < 0.0 || volts > self.reference_voltage
    }

    /// Quantize and reconstruct every sample
    pub fn quantize(&self, filtered: &[f64]) -> Quantized {
        let codes: Vec<u32> = filtered.iter().map(|&v| self.code(v)).collect();
        let reconstructed = codes.iter().map(|&c| self.reconstruct(c)).collect();
        Quantized { codes, reconstructed }
    }

    /// Same result as [`quantize`](Self::quantize), computed across the rayon pool
    pub fn quantize_par(&self, filtered: &[f64]) -> Quantized {
        let codes: Vec<u32> = filtered.par_iter().map(|&v| self.code(v)).collect();
        let reconstructed = codes.par_iter().map(|&c| self.reconstruct(c)).collect();
        Quantized { codes, reconstructed }
    }
}

/// Clip a scaled value to `[0, max_code]` and round half-to-even
#[inline]
pub fn round_code(scaled: f64, max_code: u32) -> u32 {
    if scaled.is_nan() {
        return 0;
    }
    scaled.clamp(0.0, max_code as f64).round_ties_even() as u32
}
