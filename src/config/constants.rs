// src/config/constants.rs
//! Configuration constants for the ADC signal chain

/// Sampling and time-base constants
pub mod sampling {
    /// Samples per run
    pub const DEFAULT_SAMPLE_COUNT: usize = 1000;
    /// Run length in seconds
    pub const DEFAULT_DURATION_S: f64 = 1.0;

    /// Fewest samples that define a spacing
    pub const MIN_SAMPLE_COUNT: usize = 2;
}

/// Converter constants
pub mod adc {
    /// Full-scale voltage
    pub const DEFAULT_REFERENCE_VOLTAGE: f64 = 5.0;
    /// Bits per code
    pub const DEFAULT_RESOLUTION_BITS: u32 = 10;
    /// Narrowest converter
    pub const MIN_RESOLUTION_BITS: u32 = 1;

    /// Widest converter; codes are `u32`
    pub const MAX_RESOLUTION_BITS: u32 = 32;
}

/// Low-pass filter constants
pub mod filter {
    /// Smoothing coefficient
    pub const DEFAULT_ALPHA: f64 = 0.1;
    /// Upper bound, inclusive; the lower bound 0 is exclusive
    pub const MAX_ALPHA: f64 = 1.0;

    /// Filter output at index 0, before any input has been seen
    pub const COLD_START_OUTPUT: f64 = 0.0;
}

/// Noise injection constants
pub mod noise {
    /// Standard deviation in volts
    pub const DEFAULT_STD_DEV: f64 = 0.3;
}

/// Reference waveform constants
pub mod waveform {
    /// DC offset in volts
    pub const DEFAULT_OFFSET_V: f64 = 2.5;
    /// Peak amplitude in volts
    pub const DEFAULT_AMPLITUDE_V: f64 = 2.0;
    /// Frequency in hertz
    pub const DEFAULT_FREQUENCY_HZ: f64 = 5.0;
}

/// Parallel execution constants
pub mod parallel {
    /// Smallest block handed to one worker by the parallel scan
    pub const MIN_SCAN_BLOCK: usize = 4096;
}

/// Configuration file and environment constants
pub mod paths {
    /// Project-local configuration file
    pub const DEFAULT_CONFIG_FILE: &str = "adc-sim.toml";
    /// Per-user directory under the home directory
    pub const USER_CONFIG_DIR: &str = ".config/adc-sim";
    /// Prefix of environment overrides
    pub const ENV_PREFIX: &str = "ADC_SIM_";
}
