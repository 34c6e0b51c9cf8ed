// src/processing/filters/mod.rs
//! Digital filters for the ADC front end

pub mod iir;

pub use iir::*;

/// Stateful sample-by-sample filter
pub trait Filter {
    /// Push one input sample and return the corresponding output
    fn process_sample(&mut self, input: f64) -> f64;

    /// Run a whole block through the filter, continuing from the current state
    fn process(&mut self, input: &[f64]) -> Vec<f64> {
        input.iter().map(|&x| self.process_sample(x)).collect()
    }

    /// Return to the cold-start state
    fn reset(&mut self);

    /// Short identifier for logs
    fn name(&self) -> &str;
}
