//! ADC-Sim: signal-chain model of an analog-to-digital converter
//!
//! A run passes through four stages, each consuming the whole output of the one
//! before it:
//!
//! - synthesis of an ideal sinusoid over an evenly spaced time base
//! - additive Gaussian noise from a seedable random source
//! - a single-pole IIR low-pass (`y[i] = a x[i] + (1 - a) y[i-1]`, `y[0] = 0`)
//! - quantization to `2^bits` codes over `[0, vref]` and reconstruction
//!
//! Configuration is validated once, up front. After that no stage can fail.
//!
//! # Quick Start
//!
//! ```rust
//! use adc_sim::{AdcConfig, AdcPipeline, WaveformSpec};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AdcConfig::builder()
//!         .sample_count(1000)
//!         .reference_voltage(5.0)
//!         .resolution_bits(10)
//!         .alpha(0.1)
//!         .noise_std_dev(0.3)
//!         .build()?;
//!
//!     let pipeline = AdcPipeline::new(config, WaveformSpec::default())?.with_seed(Some(42));
//!     let output = pipeline.run();
//!
//!     assert_eq!(output.codes().len(), 1000);
//!     assert!(output.codes().iter().all(|&c| c <= config.max_code()));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod error;
pub mod processing;
pub mod simulation;

// Re-export commonly used types for convenience
pub use config::{
    AdcConfig, AdcSettings, ConfigError, ConfigLoader, ExecutionMode, RunSettings,
    SimulationConfig,
};
pub use error::{AdcError, AdcResult};
pub use processing::{
    AdcPipeline, Filter, PipelineOutput, QualityReport, Quantizer, SampleRow, SinglePoleLowPass,
};
pub use simulation::{GaussianNoise, SignalSynthesizer, TimeBase, WaveformSpec};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Signal-chain model of an analog-to-digital converter".to_string(),
        features: vec![
            "Sinusoidal signal synthesis".to_string(),
            "Seedable Gaussian noise injection".to_string(),
            "Single-pole IIR low-pass with parallel scan".to_string(),
            "Saturating quantization and reconstruction".to_string(),
            "Layered TOML configuration".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}
