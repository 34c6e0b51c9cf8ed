// src/config/loader.rs
//! Layered configuration loader
//!
//! Sources are merged in order, later ones winning key by key:
//!
//! 1. built-in defaults
//! 2. every configuration file that exists, in the order given
//! 3. `ADC_SIM_<SECTION>_<KEY>` environment variables, e.g. `ADC_SIM_ADC_ALPHA=0.2`
//!
//! The merged tree is checked before deserialization so that a resolution written
//! as `10.5` reports `InvalidResolution` instead of a type error.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::config::constants::{paths, sampling};
use crate::config::{validate_resolution_bits, SimulationConfig};
use crate::error::AdcError;
use crate::processing::AdcPipeline;

/// Sections accepted from environment overrides
const SECTIONS: [&str; 3] = ["adc", "waveform", "run"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the given path
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// TOML that could not be read into a configuration
    #[error("configuration parse error: {0}")]
    Parse(String),

    /// Configuration that could not be written as TOML
    #[error("configuration serialize error: {0}")]
    Serialize(String),

    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Merged configuration failed validation
    #[error("invalid configuration: {0}")]
    Invalid(#[from] AdcError),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize(err.to_string())
    }
}

/// Loads and validates [`SimulationConfig`] values
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    use_environment: bool,
}

impl ConfigLoader {
    /// Loader over the standard locations
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            use_environment: true,
        }
    }

    /// Loader over explicit files, lowest precedence first
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths: paths,
            use_environment: true,
        }
    }

    /// Ignore environment overrides
    pub fn without_environment(mut self) -> Self {
        self.use_environment = false;
        self
    }

    /// Files consulted by [`load`](Self::load), lowest precedence first
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Merge every source and validate the result
    pub fn load(&self) -> Result<SimulationConfig, ConfigError> {
        let mut merged = Self::default_tree()?;

        for config_path in &self.config_paths {
            match self.load_config_file(config_path) {
                Ok(file_config) => {
                    debug!(path = %config_path.display(), "merging configuration file");
                    merge_toml_values(&mut merged, file_config);
                }
                Err(ConfigError::FileNotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }

        self.finish(merged)
    }

    /// Defaults overlaid with a TOML document, then the environment
    pub fn load_from_str(&self, content: &str) -> Result<SimulationConfig, ConfigError> {
        let mut merged = Self::default_tree()?;
        let overlay: toml::Value = toml::from_str(content)?;
        merge_toml_values(&mut merged, overlay);
        self.finish(merged)
    }

    /// Load and build a ready-to-run pipeline
    pub fn load_pipeline(&self) -> Result<AdcPipeline, ConfigError> {
        let config = self.load()?;
        Ok(AdcPipeline::from_simulation_config(&config)?)
    }

    /// Check a single file on top of the defaults, without the environment
    pub fn validate_config_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let mut merged = Self::default_tree()?;
        merge_toml_values(&mut merged, self.load_config_file(path)?);
        normalize_tree(&mut merged)?;

        let config: SimulationConfig = merged.try_into()?;
        config.validate()?;
        Ok(())
    }

    /// Write a configuration as pretty TOML
    pub fn export_config<P: AsRef<Path>>(
        &self,
        config: &SimulationConfig,
        path: P,
    ) -> Result<(), ConfigError> {
        let toml_content = toml::to_string_pretty(config)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn finish(&self, mut merged: toml::Value) -> Result<SimulationConfig, ConfigError> {
        if self.use_environment {
            apply_environment_overrides(&mut merged, std::env::vars());
        }

        normalize_tree(&mut merged)?;

        let config: SimulationConfig = merged.try_into()?;
        config.validate()?;
        Ok(config)
    }

    fn default_tree() -> Result<toml::Value, ConfigError> {
        Ok(toml::Value::try_from(SimulationConfig::default())?)
    }

    fn load_config_file<P: AsRef<Path>>(&self, path: P) -> Result<toml::Value, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut config_paths = Vec::new();

        if let Some(home_dir) = dirs::home_dir() {
            config_paths.push(home_dir.join(paths::USER_CONFIG_DIR).join("config.toml"));
        }

        config_paths.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));
        config_paths
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_toml_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                if let Some(base_value) = base_table.get_mut(&key) {
                    merge_toml_values(base_value, value);
                } else {
                    base_table.insert(key, value);
                }
            }
        }
        (base_value, overlay_value) => {
            *base_value = overlay_value;
        }
    }
}

fn apply_environment_overrides<I>(config: &mut toml::Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        let Some(rest) = key.strip_prefix(paths::ENV_PREFIX) else {
            continue;
        };

        let rest = rest.to_lowercase();
        let Some((section, field)) = rest.split_once('_') else {
            continue;
        };
        if !SECTIONS.contains(&section) || field.is_empty() {
            debug!(variable = %key, "ignoring unrecognised override");
            continue;
        }

        if let toml::Value::Table(root) = config {
            let entry = root
                .entry(section.to_string())
                .or_insert_with(|| toml::Value::Table(toml::value::Table::new()));
            if let toml::Value::Table(table) = entry {
                debug!(section, field, value = %value, "applying environment override");
                table.insert(field.to_string(), parse_env_value(&value));
            }
        }
    }
}

fn parse_env_value(value: &str) -> toml::Value {
    if let Ok(int_val) = value.parse::<i64>() {
        toml::Value::Integer(int_val)
    } else if value.parse::<u64>().is_ok() {
        // Past the TOML integer range; seeds accept the decimal string
        toml::Value::String(value.to_string())
    } else if let Ok(float_val) = value.parse::<f64>() {
        toml::Value::Float(float_val)
    } else if let Ok(bool_val) = value.parse::<bool>() {
        toml::Value::Boolean(bool_val)
    } else {
        toml::Value::String(value.to_string())
    }
}

/// Pre-deserialization checks on the merged tree
fn normalize_tree(tree: &mut toml::Value) -> Result<(), ConfigError> {
    let Some(adc) = tree.get_mut("adc").and_then(|v| v.as_table_mut()) else {
        return Ok(());
    };

    if let Some(bits) = adc.get_mut("resolution_bits") {
        let numeric = match bits {
            toml::Value::Integer(i) => Some(*i as f64),
            toml::Value::Float(f) => Some(*f),
            _ => None,
        };
        if let Some(value) = numeric {
            let checked = validate_resolution_bits(value)?;
            *bits = toml::Value::Integer(checked as i64);
        }
    }

    if let Some(toml::Value::Integer(count)) = adc.get("sample_count") {
        if *count < sampling::MIN_SAMPLE_COUNT as i64 {
            return Err(AdcError::InvalidSampleCount { count: *count }.into());
        }
    }

    Ok(())
}

mod dirs {
    use std::path::PathBuf;

    pub fn home_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var_os("USERPROFILE").map(PathBuf::from)
        }
        #[cfg(not(target_os = "windows"))]
        {
            std::env::var_os("HOME").map(PathBuf::from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutionMode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_config_loader_creation() {
        let loader = ConfigLoader::new();
        assert!(!loader.config_paths().is_empty());
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/adc-sim.toml")])
            .without_environment();
        let config = loader.load().unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn test_config_file_validation() {
        let loader = ConfigLoader::new();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[adc]
resolution_bits = 12
alpha = 0.25

[run]
seed = 1234
        "#
        )
        .unwrap();

        assert!(loader.validate_config_file(temp_file.path()).is_ok());
    }

    #[test]
    fn test_invalid_config_validation() {
        let loader = ConfigLoader::new();

        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[adc]
alpha = 1.5
        "#
        )
        .unwrap();

        let err = loader.validate_config_file(temp_file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(AdcError::InvalidFilterCoefficient { .. })));
    }

    #[test]
    fn test_fractional_resolution_is_invalid_resolution() {
        let loader = ConfigLoader::with_paths(Vec::new()).without_environment();
        let err = loader.load_from_str("[adc]\nresolution_bits = 10.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(AdcError::InvalidResolution { .. })));

        let err = loader.load_from_str("[adc]\nresolution_bits = -4\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(AdcError::InvalidResolution { .. })));

        let config = loader.load_from_str("[adc]\nresolution_bits = 8.0\n").unwrap();
        assert_eq!(config.adc.resolution_bits, 8);
    }

    #[test]
    fn test_negative_sample_count() {
        let loader = ConfigLoader::with_paths(Vec::new()).without_environment();
        let err = loader.load_from_str("[adc]\nsample_count = -3\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid(AdcError::InvalidSampleCount { count: -3 })
        ));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let loader = ConfigLoader::with_paths(Vec::new()).without_environment();
        let err = loader.load_from_str("[adc\nalpha = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_environment_overrides_apply() {
        let mut tree = ConfigLoader::default_tree().unwrap();
        apply_environment_overrides(
            &mut tree,
            vars(&[
                ("ADC_SIM_ADC_ALPHA", "0.5"),
                ("ADC_SIM_ADC_RESOLUTION_BITS", "12"),
                ("ADC_SIM_RUN_SEED", "99"),
                ("ADC_SIM_RUN_EXECUTION", "parallel"),
                ("ADC_SIM_BOGUS_KEY", "1"),
                ("PATH", "/usr/bin"),
            ]),
        );
        normalize_tree(&mut tree).unwrap();

        let config: SimulationConfig = tree.try_into().unwrap();
        assert_eq!(config.adc.alpha, 0.5);
        assert_eq!(config.adc.resolution_bits, 12);
        assert_eq!(config.run.seed, Some(99));
        assert_eq!(config.run.execution, ExecutionMode::Parallel);
    }

    #[test]
    fn test_env_seed_past_integer_range() {
        let mut tree = ConfigLoader::default_tree().unwrap();
        apply_environment_overrides(
            &mut tree,
            vars(&[("ADC_SIM_RUN_SEED", "18446744073709551615")]),
        );
        normalize_tree(&mut tree).unwrap();

        let config: SimulationConfig = tree.try_into().unwrap();
        assert_eq!(config.run.seed, Some(u64::MAX));
    }

    #[test]
    fn test_parse_env_value_kinds() {
        assert_eq!(parse_env_value("-4"), toml::Value::Integer(-4));
        assert_eq!(parse_env_value("0.25"), toml::Value::Float(0.25));
        assert_eq!(parse_env_value("true"), toml::Value::Boolean(true));
        assert_eq!(
            parse_env_value("9223372036854775808"),
            toml::Value::String("9223372036854775808".to_string())
        );
    }

    #[test]
    fn test_later_files_win() {
        let mut first = NamedTempFile::new().unwrap();
        writeln!(first, "[adc]\nalpha = 0.2\nresolution_bits = 8\n").unwrap();
        let mut second = NamedTempFile::new().unwrap();
        writeln!(second, "[adc]\nalpha = 0.7\n").unwrap();

        let loader = ConfigLoader::with_paths(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ])
        .without_environment();
        let config = loader.load().unwrap();

        assert_eq!(config.adc.alpha, 0.7);
        assert_eq!(config.adc.resolution_bits, 8);
    }

    #[test]
    fn test_config_export() {
        let loader = ConfigLoader::new();
        let temp_file = NamedTempFile::new().unwrap();

        let mut config = SimulationConfig::default();
        config.run.seed = Some(5);
        loader.export_config(&config, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("[adc]"));
        assert!(content.contains("[waveform]"));

        let reloaded = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()])
            .without_environment()
            .load()
            .unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_large_seed_export_round_trip() {
        let loader = ConfigLoader::with_paths(Vec::new()).without_environment();
        let temp_file = NamedTempFile::new().unwrap();

        for seed in [u64::MAX, i64::MAX as u64 + 1, i64::MAX as u64] {
            let mut config = SimulationConfig::default();
            config.run.seed = Some(seed);
            loader.export_config(&config, temp_file.path()).unwrap();

            let reloaded = ConfigLoader::with_paths(vec![temp_file.path().to_path_buf()])
                .without_environment()
                .load()
                .unwrap();
            assert_eq!(reloaded.run.seed, Some(seed));
        }
    }
}
