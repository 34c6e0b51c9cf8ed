// src/simulation/time_base.rs
//! Evenly spaced sample instants

use serde::Serialize;

use crate::config::AdcConfig;

/// Ordered sample instants over `[0, duration]`
///
/// Spacing is `duration / (n - 1)`, so the first instant is exactly `0.0` and the last
/// is exactly `duration`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeBase {
    instants: Vec<f64>,
    #[serde(skip)]
    spacing: f64,
}

impl TimeBase {
    /// Build the time base described by a validated configuration
    pub fn from_config(config: &AdcConfig) -> Self {
        Self::linspace(0.0, config.duration_s(), config.sample_count())
    }

    /// `count` evenly spaced points from `start` to `stop` inclusive
    ///
    /// The endpoint is written explicitly instead of accumulated so rounding never
    /// pushes it past `stop`. With fewer than two points the spacing is zero.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Self {
        if count < 2 {
            return Self {
                instants: vec![start; count],
                spacing: 0.0,
            };
        }

        let spacing = (stop - start) / (count - 1) as f64;
        let mut instants: Vec<f64> = (0..count).map(|i| start + i as f64 * spacing).collect();
        instants[count - 1] = stop;

        Self { instants, spacing }
    }

    /// Distance between neighbouring instants
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Number of instants
    pub fn len(&self) -> usize {
        self.instants.len()
    }

    /// Whether there are no instants
    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// Instants in order
    pub fn as_slice(&self) -> &[f64] {
        &self.instants
    }

    /// Iterate over the instants
    pub fn iter(&self) -> std::slice::Iter<'_, f64> {
        self.instants.iter()
    }

    /// Take the instants
    pub fn into_vec(self) -> Vec<f64> {
        self.instants
    }
}

impl AsRef<[f64]> for TimeBase {
    fn as_ref(&self) -> &[f64] {
        &self.instants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints_and_spacing() {
        let time = TimeBase::linspace(0.0, 1.0, 5);
        assert_eq!(time.as_slice(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(time.spacing(), 0.25);
    }

    #[test]
    fn test_strictly_increasing() {
        let time = TimeBase::linspace(0.0, 1.0, 1000);
        assert_eq!(time.len(), 1000);
        assert!(time.as_slice().windows(2).all(|w| w[1] > w[0]));
        assert_eq!(time.as_slice()[999], 1.0);
    }

    #[test]
    fn test_from_config() {
        let config = AdcConfig::builder()
            .sample_count(11)
            .duration_s(2.0)
            .build()
            .unwrap();
        let time = TimeBase::from_config(&config);

        assert_eq!(time.len(), 11);
        assert!((time.spacing() - config.sample_spacing()).abs() < 1e-15);
        assert_eq!(time.as_slice()[0], 0.0);
        assert_eq!(time.as_slice()[10], 2.0);
    }

    #[test]
    fn test_degenerate_counts() {
        assert!(TimeBase::linspace(0.0, 1.0, 0).is_empty());
        let single = TimeBase::linspace(3.0, 1.0, 1);
        assert_eq!(single.as_slice(), &[3.0]);
        assert_eq!(single.spacing(), 0.0);
    }
}
