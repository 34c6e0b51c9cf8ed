// src/config/mod.rs
//! Configuration for a simulation run
//!
//! The on-disk layout mirrors [`SimulationConfig`]:
//!
//! ```toml
//! [adc]
//! sample_count = 1000
//! duration_s = 1.0
//! reference_voltage = 5.0
//! resolution_bits = 10
//! alpha = 0.1
//! noise_std_dev = 0.3
//!
//! [waveform]
//! offset_v = 2.5
//! amplitude_v = 2.0
//! frequency_hz = 5.0
//!
//! [run]
//! seed = 42
//! execution = "sequential"
//! ```
//!
//! TOML integers are signed 64-bit, so seeds above `i64::MAX` are written as decimal
//! strings (`seed = "18446744073709551615"`). Both forms load.

pub mod constants;
pub mod adc_config;
pub mod loader;

pub use adc_config::{validate_resolution_bits, AdcConfig, AdcConfigBuilder, AdcSettings};
pub use loader::{ConfigError, ConfigLoader};

use serde::{Deserialize, Serialize};

use crate::error::AdcResult;
use crate::simulation::WaveformSpec;

/// Complete description of a run
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct SimulationConfig {
    /// Converter settings, `[adc]`
    #[serde(default)]
    pub adc: AdcSettings,

    /// Input signal, `[waveform]`
    #[serde(default)]
    pub waveform: WaveformSpec,

    /// Noise seed and scheduling, `[run]`
    #[serde(default)]
    pub run: RunSettings,
}

/// How a run draws noise and schedules work
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct RunSettings {
    /// Fixed noise seed; entropy-seeded when absent
    #[serde(default, with = "seed_format", skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Sequential or rayon-backed stages
    #[serde(default)]
    pub execution: ExecutionMode,
}

/// Seed encoding that covers the full `u64` range in TOML
mod seed_format {
    use std::fmt;

    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(seed: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
        match seed {
            Some(seed) => match i64::try_from(*seed) {
                Ok(seed) => serializer.serialize_i64(seed),
                Err(_) => serializer.serialize_str(&seed.to_string()),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        deserializer.deserialize_any(SeedVisitor).map(Some)
    }

    struct SeedVisitor;

    impl<'de> Visitor<'de> for SeedVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer seed or its decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<u64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<u64, E> {
            u64::try_from(value).map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<u64, E> {
            value
                .trim()
                .parse()
                .map_err(|_| E::invalid_value(Unexpected::Str(value), &self))
        }
    }
}

/// Scheduling of the index-parallel stages
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Everything on the calling thread
    #[default]
    Sequential,
    /// Synthesis and quantization on the rayon pool, filter as a parallel scan
    Parallel,
}

impl SimulationConfig {
    /// Check the waveform and build the validated converter configuration
    pub fn validate(&self) -> AdcResult<AdcConfig> {
        self.waveform.validate()?;
        AdcConfig::new(&self.adc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AdcError;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        let adc = config.validate().unwrap();
        assert_eq!(adc.sample_count(), constants::sampling::DEFAULT_SAMPLE_COUNT);
        assert_eq!(config.run.seed, None);
        assert_eq!(config.run.execution, ExecutionMode::Sequential);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = SimulationConfig::default();
        config.run.seed = Some(7);
        config.run.execution = ExecutionMode::Parallel;

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("execution = \"parallel\""));

        let deserialized: SimulationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_seed_encoding() {
        let mut config = SimulationConfig::default();
        config.run.seed = Some(u64::MAX);

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("seed = \"18446744073709551615\""));
        let deserialized: SimulationConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized.run.seed, Some(u64::MAX));

        config.run.seed = Some(42);
        assert!(toml::to_string(&config).unwrap().contains("seed = 42"));

        assert!(toml::from_str::<SimulationConfig>("[run]\nseed = -1\n").is_err());
        assert!(toml::from_str::<SimulationConfig>("[run]\nseed = \"abc\"\n").is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: SimulationConfig = toml::from_str("[adc]\nresolution_bits = 12\n").unwrap();
        assert_eq!(config.adc.resolution_bits, 12);
        assert_eq!(config.adc.alpha, constants::filter::DEFAULT_ALPHA);
        assert_eq!(config.waveform, WaveformSpec::default());
    }

    #[test]
    fn test_validate_checks_waveform_first() {
        let mut config = SimulationConfig::default();
        config.waveform.amplitude_v = f64::NAN;
        config.adc.alpha = 0.0;
        assert!(matches!(config.validate(), Err(AdcError::InvalidWaveform { .. })));
    }
}
