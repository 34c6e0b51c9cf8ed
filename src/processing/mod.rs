// src/processing/mod.rs
//! Digital-side processing: low-pass filtering, quantization and the pipeline

pub mod filters;
pub mod pipeline;
pub mod quality_monitor;
pub mod quantizer;

pub use filters::{Filter, SinglePoleLowPass};
pub use pipeline::{AdcPipeline, PipelineOutput, SampleRow, Stage};
pub use quality_monitor::{snr_db, QualityMonitor, QualityReport};
pub use quantizer::{round_code, Quantized, Quantizer};
