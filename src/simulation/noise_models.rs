// src/simulation/noise_models.rs
//! Additive Gaussian noise for the analog input

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

use crate::config::AdcConfig;

/// Zero-mean white Gaussian noise with a fixed standard deviation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoise {
    std_dev: f64,
}

impl GaussianNoise {
    /// Caller guarantees `std_dev` is finite and non-negative
    pub fn new(std_dev: f64) -> Self {
        Self { std_dev }
    }

    /// Noise at the configured amplitude
    pub fn from_config(config: &AdcConfig) -> Self {
        Self::new(config.noise_std_dev())
    }

    /// Standard deviation in volts
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Draw one disturbance
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = StandardNormal.sample(rng);
        z * self.std_dev
    }

    /// Add an independent draw to every sample
    ///
    /// With a zero standard deviation the input is copied unchanged and the random
    /// source is left untouched.
    pub fn add_noise<R: Rng + ?Sized>(&self, clean: &[f64], rng: &mut R) -> Vec<f64> {
        if self.std_dev == 0.0 {
            return clean.to_vec();
        }

        clean.iter().map(|&x| x + self.sample(rng)).collect()
    }
}

/// Random source for noise injection
///
/// A seed gives a reproducible stream; `None` seeds from OS entropy.
pub fn noise_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
