// src/processing/quality_monitor.rs
//! Quality figures for one pipeline run

use serde::Serialize;

use super::quantizer::Quantizer;

/// Summary statistics of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// One LSB in volts
    pub quantization_step_v: f64,
    /// RMS of `reconstructed - filtered` over samples inside `[0, vref]`
    pub rms_quantization_error_v: f64,
    /// Largest `|reconstructed - filtered|` over samples inside `[0, vref]`
    pub max_quantization_error_v: f64,
    /// Samples clipped to code 0
    pub saturated_low: usize,
    /// Samples clipped to the top code
    pub saturated_high: usize,
    /// Ideal vs noisy, in dB
    pub input_snr_db: f64,
    /// Ideal vs reconstructed, in dB
    pub output_snr_db: f64,
}

impl QualityReport {
    /// Samples clipped at either end
    pub fn saturated(&self) -> usize {
        self.saturated_low + self.saturated_high
    }
}

/// Computes a [`QualityReport`] from the stage outputs
#[derive(Debug, Clone, Copy)]
pub struct QualityMonitor {
    quantizer: Quantizer,
}

impl QualityMonitor {
    /// Monitor measuring against `quantizer`
    pub fn new(quantizer: Quantizer) -> Self {
        Self { quantizer }
    }

    /// All slices must be index-aligned and of equal length
    pub fn assess(
        &self,
        ideal: &[f64],
        noisy: &[f64],
        filtered: &[f64],
        reconstructed: &[f64],
    ) -> QualityReport {
        let vref = self.quantizer.reference_voltage();

        let mut saturated_low = 0;
        let mut saturated_high = 0;
        let mut error_energy = 0.0;
        let mut max_error: f64 = 0.0;
        let mut in_range = 0usize;

        for (&v, &r) in filtered.iter().zip(reconstructed) {
            if v < 0.0 {
                saturated_low += 1;
            } else if v > vref {
                saturated_high += 1;
            } else {
                let error = r - v;
                error_energy += error * error;
                max_error = max_error.max(error.abs());
                in_range += 1;
            }
        }

        let rms_error = if in_range == 0 {
            0.0
        } else {
            (error_energy / in_range as f64).sqrt()
        };

        QualityReport {
            quantization_step_v: self.quantizer.step(),
            rms_quantization_error_v: rms_error,
            max_quantization_error_v: max_error,
            saturated_low,
            saturated_high,
            input_snr_db: snr_db(ideal, noisy),
            output_snr_db: snr_db(ideal, reconstructed),
        }
    }
}

/// Signal-to-noise ratio of `observed` against `reference`, in dB
///
/// Noise is `observed - reference`. Returns `+inf` when the two are identical and
/// `NaN` for empty input.
pub fn snr_db(reference: &[f64], observed: &[f64]) -> f64 {
    let count = reference.len().min(observed.len());
    if count == 0 {
        return f64::NAN;
    }

    let (signal_energy, noise_energy) = reference
        .iter()
        .zip(observed)
        .fold((0.0, 0.0), |(s, n), (&r, &o)| {
            let diff = o - r;
            (s + r * r, n + diff * diff)
        });

    if noise_energy == 0.0 {
        return f64::INFINITY;
    }

    10.0 * (signal_energy / noise_energy).log10()
}
