// src/processing/filters/iir.rs
//! Single-pole IIR (exponential smoothing) low-pass filter
//!
//! ```text
//! y[0] = 0
//! y[i] = alpha * x[i] + (1 - alpha) * y[i-1]      i >= 1
//! ```
//!
//! The first output is pinned to zero whatever the first input is. With
//! `alpha = 1` the filter therefore passes every sample through except the first.
//! Callers that want a transient-free start must discard or pre-roll that sample.

use rayon::prelude::*;

use super::Filter;
use crate::config::constants::{filter, parallel};
use crate::config::AdcConfig;

/// First-order recursive low-pass
#[derive(Debug, Clone, PartialEq)]
pub struct SinglePoleLowPass {
    alpha: f64,
    // None until the first sample has been seen
    previous_output: Option<f64>,
}

impl SinglePoleLowPass {
    /// Caller guarantees `0 < alpha <= 1`
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha,
            previous_output: None,
        }
    }

    /// Filter with the configured coefficient
    pub fn from_config(config: &AdcConfig) -> Self {
        Self::new(config.alpha())
    }

    /// Smoothing coefficient
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Filter a whole sequence from the cold-start state
    ///
    /// Plain left-to-right scan. Does not touch `self`'s streaming state.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let decay = 1.0 - self.alpha;
        let mut output = Vec::with_capacity(input.len());
        let mut previous = filter::COLD_START_OUTPUT;

        for (i, &x) in input.iter().enumerate() {
            let y = if i == 0 {
                filter::COLD_START_OUTPUT
            } else {
                self.alpha * x + decay * previous
            };
            output.push(y);
            previous = y;
        }

        output
    }

    /// Blocked parallel prefix scan over the same recurrence
    ///
    /// Each step is the affine map `y -> decay * y + alpha * x`, and affine maps
    /// compose associatively, so the sequence can be scanned in three passes:
    ///
    /// 1. every block is scanned in parallel assuming a zero carry-in;
    /// 2. the true carry into each block is propagated across block ends
    ///    sequentially (one step per block);
    /// 3. every block adds `decay^(k+1) * carry` to its k-th output in parallel.
    ///
    /// Results match [`apply`](Self::apply) up to floating point reassociation.
    /// Short inputs fall back to the sequential scan.
    pub fn apply_par(&self, input: &[f64]) -> Vec<f64> {
        let len = input.len();
        let workers = rayon::current_num_threads().max(1);
        let block = len.div_ceil(workers).max(parallel::MIN_SCAN_BLOCK);

        if len <= block {
            return self.apply(input);
        }

        let alpha = self.alpha;
        let decay = 1.0 - alpha;
        let mut output = vec![0.0; len];

        // Pass 1: local scans
        output
            .par_chunks_mut(block)
            .zip(input.par_chunks(block))
            .enumerate()
            .for_each(|(block_index, (dst, src))| {
                let mut y = 0.0;
                for (k, (out, &x)) in dst.iter_mut().zip(src).enumerate() {
                    y = if block_index == 0 && k == 0 {
                        filter::COLD_START_OUTPUT
                    } else {
                        alpha * x + decay * y
                    };
                    *out = y;
                }
            });

        // Pass 2: carries, carries[b] is the true output just before block b
        let block_count = len.div_ceil(block);
        let mut carries = vec![0.0; block_count];
        for b in 1..block_count {
            let prev_start = (b - 1) * block;
            let prev_end = (prev_start + block).min(len);
            let prev_len = prev_end - prev_start;
            carries[b] = output[prev_end - 1] + decay.powf(prev_len as f64) * carries[b - 1];
        }

        // Pass 3: fix-up, block 0 is already exact
        output
            .par_chunks_mut(block)
            .zip(carries.par_iter())
            .skip(1)
            .for_each(|(dst, &carry)| {
                let mut factor = decay;
                for out in dst.iter_mut() {
                    *out += factor * carry;
                    factor *= decay;
                }
            });

        output
    }
}

impl Filter for SinglePoleLowPass {
    fn process_sample(&mut self, input: f64) -> f64 {
        let output = match self.previous_output {
            None => filter::COLD_START_OUTPUT,
            Some(previous) => self.alpha * input + (1.0 - self.alpha) * previous,
        };
        self.previous_output = Some(output);
        output
    }

    fn reset(&mut self) {
        self.previous_output = None;
    }

    fn name(&self) -> &str {
        "single-pole-lowpass"
    }
}
