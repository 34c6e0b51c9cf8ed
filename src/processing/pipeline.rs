// src/processing/pipeline.rs
//! End-to-end signal chain: synthesis, noise, low-pass, quantization

use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::filters::SinglePoleLowPass;
use super::quality_monitor::{QualityMonitor, QualityReport};
use super::quantizer::Quantizer;
use crate::config::{AdcConfig, ExecutionMode, SimulationConfig};
use crate::error::AdcResult;
use crate::simulation::{noise_rng, GaussianNoise, SignalSynthesizer, TimeBase, WaveformSpec};

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    /// Ideal waveform over the time base
    Synthesis,
    /// Additive Gaussian noise
    NoiseInjection,
    /// Single-pole low-pass
    Filtering,
    /// Coding and reconstruction
    Quantization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Synthesis => "synthesis",
            Stage::NoiseInjection => "noise-injection",
            Stage::Filtering => "filtering",
            Stage::Quantization => "quantization",
        };
        f.write_str(name)
    }
}

/// A configured signal chain
///
/// Holds only immutable configuration, so one pipeline can be run any number of
/// times and from several threads at once. With a seed every run produces the same
/// output; the execution mode does not change the noise drawn.
#[derive(Debug, Clone)]
pub struct AdcPipeline {
    config: AdcConfig,
    waveform: WaveformSpec,
    seed: Option<u64>,
    execution: ExecutionMode,
}

impl AdcPipeline {
    /// Unseeded, sequential pipeline
    pub fn new(config: AdcConfig, waveform: WaveformSpec) -> AdcResult<Self> {
        waveform.validate()?;
        Ok(Self {
            config,
            waveform,
            seed: None,
            execution: ExecutionMode::Sequential,
        })
    }

    /// Validate a full configuration, taking seed and execution mode from `[run]`
    pub fn from_simulation_config(simulation: &SimulationConfig) -> AdcResult<Self> {
        let config = simulation.validate()?;
        Ok(Self {
            config,
            waveform: simulation.waveform,
            seed: simulation.run.seed,
            execution: simulation.run.execution,
        })
    }

    /// Fix the noise seed, or draw from entropy with `None`
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Choose sequential or parallel stages
    pub fn with_execution(mut self, execution: ExecutionMode) -> Self {
        self.execution = execution;
        self
    }

    /// Converter configuration
    pub fn config(&self) -> &AdcConfig {
        &self.config
    }

    /// Input waveform
    pub fn waveform(&self) -> &WaveformSpec {
        &self.waveform
    }

    /// Noise seed used by [`run`](Self::run)
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Execution mode
    pub fn execution(&self) -> ExecutionMode {
        self.execution
    }

    /// Run with the pipeline's own noise source
    pub fn run(&self) -> PipelineOutput {
        debug!(seed = ?self.seed, "noise source from pipeline seed");
        let mut rng = noise_rng(self.seed);
        self.run_with_rng(&mut rng)
    }

    /// Run drawing noise from `rng`
    ///
    /// The pipeline's own seed is ignored.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> PipelineOutput {
        let parallel = self.execution == ExecutionMode::Parallel;

        info!(
            sample_count = self.config.sample_count(),
            resolution_bits = self.config.resolution_bits(),
            alpha = self.config.alpha(),
            noise_std_dev = self.config.noise_std_dev(),
            execution = ?self.execution,
            "running ADC pipeline"
        );

        let time = TimeBase::from_config(&self.config);

        debug!(stage = %Stage::Synthesis, "stage start");
        let synthesizer = SignalSynthesizer::new(self.waveform);
        let ideal = if parallel {
            synthesizer.synthesize_par(time.as_slice())
        } else {
            synthesizer.synthesize(time.as_slice())
        };

        // Always sequential: one RNG stream regardless of execution mode
        debug!(stage = %Stage::NoiseInjection, "stage start");
        let noisy = GaussianNoise::from_config(&self.config).add_noise(&ideal, rng);

        debug!(stage = %Stage::Filtering, "stage start");
        let lowpass = SinglePoleLowPass::from_config(&self.config);
        let filtered = if parallel {
            lowpass.apply_par(&noisy)
        } else {
            lowpass.apply(&noisy)
        };

        debug!(stage = %Stage::Quantization, "stage start");
        let quantizer = Quantizer::from_config(&self.config);
        let quantized = if parallel {
            quantizer.quantize_par(&filtered)
        } else {
            quantizer.quantize(&filtered)
        };

        let quality = QualityMonitor::new(quantizer).assess(
            &ideal,
            &noisy,
            &filtered,
            &quantized.reconstructed,
        );

        if quality.saturated() > 0 {
            warn!(
                saturated_low = quality.saturated_low,
                saturated_high = quality.saturated_high,
                reference_voltage = self.config.reference_voltage(),
                "filtered signal left the converter range"
            );
        }

        debug!(
            input_snr_db = quality.input_snr_db,
            output_snr_db = quality.output_snr_db,
            rms_quantization_error_v = quality.rms_quantization_error_v,
            "pipeline finished"
        );

        PipelineOutput {
            time,
            ideal,
            noisy,
            filtered,
            codes: quantized.codes,
            reconstructed: quantized.reconstructed,
            quality,
        }
    }
}

/// Index-aligned results of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    time: TimeBase,
    ideal: Vec<f64>,
    noisy: Vec<f64>,
    filtered: Vec<f64>,
    codes: Vec<u32>,
    reconstructed: Vec<f64>,
    quality: QualityReport,
}

/// One time step of a [`PipelineOutput`], for tabular export
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleRow {
    /// Sample instant in seconds
    pub time_s: f64,
    /// Input after noise injection
    pub noisy_v: f64,
    /// Low-pass output
    pub filtered_v: f64,
    /// Voltage of the output code
    pub reconstructed_v: f64,
    /// Converter output code
    pub code: u32,
}

impl PipelineOutput {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the run has no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Sample instants
    pub fn time(&self) -> &[f64] {
        self.time.as_slice()
    }

    /// Noise-free input
    pub fn ideal(&self) -> &[f64] {
        &self.ideal
    }

    /// Input with noise added
    pub fn noisy(&self) -> &[f64] {
        &self.noisy
    }

    /// Low-pass output, `0.0` at index 0
    pub fn filtered(&self) -> &[f64] {
        &self.filtered
    }

    /// Converter codes in `[0, 2^bits - 1]`
    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    /// Voltages of the codes
    pub fn reconstructed(&self) -> &[f64] {
        &self.reconstructed
    }

    /// Converter quality figures for the run
    pub fn quality(&self) -> &QualityReport {
        &self.quality
    }

    /// Per-sample records in time order
    pub fn rows(&self) -> impl Iterator<Item = SampleRow> + '_ {
        (0..self.len()).map(move |i| SampleRow {
            time_s: self.time.as_slice()[i],
            noisy_v: self.noisy[i],
            filtered_v: self.filtered[i],
            reconstructed_v: self.reconstructed[i],
            code: self.codes[i],
        })
    }
}
