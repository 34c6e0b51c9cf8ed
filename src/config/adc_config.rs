// src/config/adc_config.rs
//! Converter configuration: raw settings and the validated, immutable record

use serde::{Deserialize, Serialize};

use crate::config::constants::{adc, filter, sampling};
use crate::error::{AdcError, AdcResult};

/// Raw converter settings as read from a file or built in code
///
/// Nothing is checked here. Turn it into an [`AdcConfig`] before running anything.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AdcSettings {
    /// Number of samples in a run
    #[serde(default = "defaults::sample_count")]
    pub sample_count: usize,

    /// Length of the run in seconds
    #[serde(default = "defaults::duration_s")]
    pub duration_s: f64,

    /// Full-scale voltage of the converter
    #[serde(default = "defaults::reference_voltage")]
    pub reference_voltage: f64,

    /// Converter resolution
    #[serde(default = "defaults::resolution_bits")]
    pub resolution_bits: u32,

    /// Low-pass smoothing coefficient
    #[serde(default = "defaults::alpha")]
    pub alpha: f64,

    /// Standard deviation of the additive noise, in volts
    #[serde(default = "defaults::noise_std_dev")]
    pub noise_std_dev: f64,
}

mod defaults {
    use crate::config::constants::*;

    pub fn sample_count() -> usize { sampling::DEFAULT_SAMPLE_COUNT }
    pub fn duration_s() -> f64 { sampling::DEFAULT_DURATION_S }
    pub fn reference_voltage() -> f64 { adc::DEFAULT_REFERENCE_VOLTAGE }
    pub fn resolution_bits() -> u32 { adc::DEFAULT_RESOLUTION_BITS }
    pub fn alpha() -> f64 { filter::DEFAULT_ALPHA }
    pub fn noise_std_dev() -> f64 { noise::DEFAULT_STD_DEV }
}

impl Default for AdcSettings {
    fn default() -> Self {
        Self {
            sample_count: defaults::sample_count(),
            duration_s: defaults::duration_s(),
            reference_voltage: defaults::reference_voltage(),
            resolution_bits: defaults::resolution_bits(),
            alpha: defaults::alpha(),
            noise_std_dev: defaults::noise_std_dev(),
        }
    }
}

/// Validated converter configuration
///
/// Construction is the only place where configuration errors surface. Every stage
/// receives a shared reference to this record and can rely on:
///
/// - `sample_count >= 2`
/// - `duration_s` finite and positive
/// - `reference_voltage` finite and positive
/// - `1 <= resolution_bits <= 32`
/// - `0 < alpha <= 1`
/// - `noise_std_dev` finite and non-negative
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdcConfig {
    sample_count: usize,
    duration_s: f64,
    reference_voltage: f64,
    resolution_bits: u32,
    alpha: f64,
    noise_std_dev: f64,
}

impl AdcConfig {
    /// Validate raw settings
    pub fn new(settings: &AdcSettings) -> AdcResult<Self> {
        if settings.sample_count < sampling::MIN_SAMPLE_COUNT {
            // Below MIN_SAMPLE_COUNT, so the cast is exact
            return Err(AdcError::InvalidSampleCount { count: settings.sample_count as i64 });
        }

        if !(settings.duration_s.is_finite() && settings.duration_s > 0.0) {
            return Err(AdcError::InvalidDuration { seconds: settings.duration_s });
        }

        if !instants_strictly_increase(settings.duration_s, settings.sample_count) {
            return Err(AdcError::InvalidDuration { seconds: settings.duration_s });
        }

        if !(settings.reference_voltage.is_finite() && settings.reference_voltage > 0.0) {
            return Err(AdcError::InvalidReferenceVoltage { volts: settings.reference_voltage });
        }

        let resolution_bits = validate_resolution_bits(settings.resolution_bits as f64)?;

        // Written so that NaN fails the check
        if !(settings.alpha > 0.0 && settings.alpha <= filter::MAX_ALPHA) {
            return Err(AdcError::InvalidFilterCoefficient { alpha: settings.alpha });
        }

        if !(settings.noise_std_dev.is_finite() && settings.noise_std_dev >= 0.0) {
            return Err(AdcError::InvalidNoiseAmplitude { std_dev: settings.noise_std_dev });
        }

        Ok(Self {
            sample_count: settings.sample_count,
            duration_s: settings.duration_s,
            reference_voltage: settings.reference_voltage,
            resolution_bits,
            alpha: settings.alpha,
            noise_std_dev: settings.noise_std_dev,
        })
    }

    /// Start from the default settings
    pub fn builder() -> AdcConfigBuilder {
        AdcConfigBuilder::default()
    }

    /// Number of samples
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Run length in seconds
    pub fn duration_s(&self) -> f64 {
        self.duration_s
    }

    /// Full-scale voltage
    pub fn reference_voltage(&self) -> f64 {
        self.reference_voltage
    }

    /// Bits per code
    pub fn resolution_bits(&self) -> u32 {
        self.resolution_bits
    }

    /// Low-pass coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Noise standard deviation in volts
    pub fn noise_std_dev(&self) -> f64 {
        self.noise_std_dev
    }

    /// Number of representable codes, `2^resolution_bits`
    pub fn levels(&self) -> u64 {
        1u64 << self.resolution_bits
    }

    /// Largest code, `levels - 1`
    pub fn max_code(&self) -> u32 {
        (self.levels() - 1) as u32
    }

    /// Voltage covered by one code (one LSB)
    pub fn quantization_step(&self) -> f64 {
        self.reference_voltage / self.max_code() as f64
    }

    /// Spacing between consecutive time-base instants
    pub fn sample_spacing(&self) -> f64 {
        self.duration_s / (self.sample_count - 1) as f64
    }

    /// Raw settings that reproduce this configuration
    pub fn settings(&self) -> AdcSettings {
        AdcSettings {
            sample_count: self.sample_count,
            duration_s: self.duration_s,
            reference_voltage: self.reference_voltage,
            resolution_bits: self.resolution_bits,
            alpha: self.alpha,
            noise_std_dev: self.noise_std_dev,
        }
    }
}

impl TryFrom<AdcSettings> for AdcConfig {
    type Error = AdcError;

    fn try_from(settings: AdcSettings) -> AdcResult<Self> {
        Self::new(&settings)
    }
}

impl TryFrom<&AdcSettings> for AdcConfig {
    type Error = AdcError;

    fn try_from(settings: &AdcSettings) -> AdcResult<Self> {
        Self::new(settings)
    }
}

/// Whether `count` instants spaced `duration / (count - 1)` apart stay distinct
///
/// The spacing can round to zero for subnormal durations, and the last computed
/// instant can round up onto the endpoint, which is written exactly.
fn instants_strictly_increase(duration_s: f64, count: usize) -> bool {
    let spacing = duration_s / (count - 1) as f64;
    spacing > 0.0 && (count - 2) as f64 * spacing < duration_s
}

/// Check a resolution that may have arrived as a float
///
/// Accepts integral values in `[1, 32]` and returns them as `u32`.
pub fn validate_resolution_bits(bits: f64) -> AdcResult<u32> {
    let invalid = AdcError::InvalidResolution { bits, max: adc::MAX_RESOLUTION_BITS };

    if !bits.is_finite() || bits.fract() != 0.0 {
        return Err(invalid);
    }
    if bits < adc::MIN_RESOLUTION_BITS as f64 || bits > adc::MAX_RESOLUTION_BITS as f64 {
        return Err(invalid);
    }

    Ok(bits as u32)
}

/// Fluent construction of an [`AdcConfig`]
#[derive(Debug, Clone, Default)]
pub struct AdcConfigBuilder {
    settings: AdcSettings,
}

impl AdcConfigBuilder {
    /// Set the number of samples
    pub fn sample_count(mut self, count: usize) -> Self {
        self.settings.sample_count = count;
        self
    }

    /// Set the run length
    pub fn duration_s(mut self, seconds: f64) -> Self {
        self.settings.duration_s = seconds;
        self
    }

    /// Set the full-scale voltage
    pub fn reference_voltage(mut self, volts: f64) -> Self {
        self.settings.reference_voltage = volts;
        self
    }

    /// Set the resolution
    pub fn resolution_bits(mut self, bits: u32) -> Self {
        self.settings.resolution_bits = bits;
        self
    }

    /// Set the low-pass coefficient
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.settings.alpha = alpha;
        self
    }

    /// Set the noise standard deviation
    pub fn noise_std_dev(mut self, std_dev: f64) -> Self {
        self.settings.noise_std_dev = std_dev;
        self
    }

    /// Validate and build
    pub fn build(self) -> AdcResult<AdcConfig> {
        AdcConfig::new(&self.settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::TimeBase;

    #[test]
    fn test_default_settings_are_valid() {
        let config = AdcConfig::new(&AdcSettings::default()).unwrap();
        assert_eq!(config.sample_count(), sampling::DEFAULT_SAMPLE_COUNT);
        assert_eq!(config.resolution_bits(), 10);
        assert_eq!(config.levels(), 1024);
        assert_eq!(config.max_code(), 1023);
    }

    #[test]
    fn test_derived_values() {
        let config = AdcConfig::builder()
            .sample_count(5)
            .duration_s(1.0)
            .reference_voltage(5.0)
            .build()
            .unwrap();

        assert_eq!(config.sample_spacing(), 0.25);
        assert!((config.quantization_step() - 5.0 / 1023.0).abs() < 1e-15);
    }

    #[test]
    fn test_sample_count_below_two_rejected() {
        for count in [0usize, 1] {
            let err = AdcConfig::builder().sample_count(count).build().unwrap_err();
            assert_eq!(err, AdcError::InvalidSampleCount { count: count as i64 });
        }
        assert!(AdcConfig::builder().sample_count(2).build().is_ok());
    }

    #[test]
    fn test_alpha_bounds() {
        for alpha in [0.0, -0.1, 1.0001, f64::NAN, f64::INFINITY] {
            let result = AdcConfig::builder().alpha(alpha).build();
            assert!(
                matches!(result, Err(AdcError::InvalidFilterCoefficient { .. })),
                "alpha {} should be rejected",
                alpha
            );
        }
        assert!(AdcConfig::builder().alpha(1.0).build().is_ok());
        assert!(AdcConfig::builder().alpha(1e-9).build().is_ok());
    }

    #[test]
    fn test_reference_voltage_must_be_positive() {
        for volts in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let result = AdcConfig::builder().reference_voltage(volts).build();
            assert!(matches!(result, Err(AdcError::InvalidReferenceVoltage { .. })));
        }
    }

    #[test]
    fn test_resolution_bounds() {
        let err = AdcConfig::builder().resolution_bits(0).build().unwrap_err();
        assert!(matches!(err, AdcError::InvalidResolution { .. }));

        let err = AdcConfig::builder().resolution_bits(33).build().unwrap_err();
        assert!(matches!(err, AdcError::InvalidResolution { .. }));

        let config = AdcConfig::builder().resolution_bits(32).build().unwrap();
        assert_eq!(config.max_code(), u32::MAX);

        let config = AdcConfig::builder().resolution_bits(1).build().unwrap();
        assert_eq!(config.levels(), 2);
    }

    #[test]
    fn test_fractional_resolution_rejected() {
        assert!(validate_resolution_bits(10.5).is_err());
        assert!(validate_resolution_bits(-3.0).is_err());
        assert!(validate_resolution_bits(f64::NAN).is_err());
        assert_eq!(validate_resolution_bits(12.0), Ok(12));
    }

    #[test]
    fn test_duration_and_noise_checks() {
        assert!(matches!(
            AdcConfig::builder().duration_s(0.0).build(),
            Err(AdcError::InvalidDuration { .. })
        ));
        assert!(matches!(
            AdcConfig::builder().noise_std_dev(-0.1).build(),
            Err(AdcError::InvalidNoiseAmplitude { .. })
        ));
        assert!(AdcConfig::builder().noise_std_dev(0.0).build().is_ok());
    }

    #[test]
    fn test_duration_too_short_to_separate_samples() {
        // Spacing rounds to zero
        let err = AdcConfig::builder().sample_count(3).duration_s(5e-324).build().unwrap_err();
        assert!(matches!(err, AdcError::InvalidDuration { .. }));

        // Spacing rounds up and the third instant lands on the endpoint
        let err = AdcConfig::builder().sample_count(4).duration_s(1e-323).build().unwrap_err();
        assert!(matches!(err, AdcError::InvalidDuration { .. }));

        let config = AdcConfig::builder().sample_count(2).duration_s(5e-324).build().unwrap();
        let time = TimeBase::from_config(&config);
        assert!(time.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_accepted_configs_give_increasing_time_base() {
        for (count, duration) in [(3, 1.5e-323), (1000, 1e-300), (1000, 1.0), (7, 3e-323)] {
            if let Ok(config) = AdcConfig::builder().sample_count(count).duration_s(duration).build() {
                let time = TimeBase::from_config(&config);
                assert!(
                    time.as_slice().windows(2).all(|w| w[0] < w[1]),
                    "{} samples over {} s",
                    count,
                    duration
                );
            }
        }
    }

    #[test]
    fn test_settings_round_trip() {
        let config = AdcConfig::builder().alpha(0.5).resolution_bits(12).build().unwrap();
        let rebuilt = AdcConfig::try_from(config.settings()).unwrap();
        assert_eq!(config, rebuilt);
    }
}
