//! # Sentinel Configuration System
//!
//! Hierarchical configuration for the traffic telemetry engine.
//!
//! ## Features
//! - **Unified Configuration**: one tree covering generator, aggregation, publishing and export
//! - **Validation**: runtime validation of every tunable before an engine is started
//! - **Environment Awareness**: `SENTINEL_*` variables override file values

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod aggregation;
mod error;
mod export;
mod generator;
mod publisher;
mod telemetry;
mod validation;

pub use aggregation::AggregationConfig;
pub use error::ConfigError;
pub use export::ExportConfig;
pub use generator::{GeneratorConfig, ProtocolWeights};
pub use publisher::PublisherConfig;
pub use telemetry::TelemetryConfig;

/// Default location of the base configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/sentinel.yaml";

/// Prefix for environment overrides, nested keys are split on `__`.
const ENV_PREFIX: &str = "SENTINEL_";

/// Top‑level configuration container for all Sentinel components.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct SentinelConfig {
    /// Synthetic traffic generator parameters.
    #[validate(nested)]
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Rolling window sizing.
    #[validate(nested)]
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Snapshot cadence.
    #[validate(nested)]
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Event log export settings.
    #[validate(nested)]
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging and metrics.
    #[validate(nested)]
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl SentinelConfig {
    /// Load configuration from the default file and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/sentinel.yaml`, skipped when missing
    /// 3. `SENTINEL_*` environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SentinelConfig::default()));

        if Path::new(DEFAULT_CONFIG_PATH).exists() {
            figment = figment.merge(Yaml::file(DEFAULT_CONFIG_PATH));
        }

        Self::extract(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load configuration layered over defaults from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::extract(
            Figment::from(Serialized::defaults(SentinelConfig::default()))
                .merge(Yaml::file(path))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Runs every section validator, mapping failures to [`ConfigError::Validation`].
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.check()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_validation() {
        let config = SentinelConfig::default();
        config.validate().expect("Default config should validate");
    }

    #[test]
    fn environment_override() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SENTINEL_AGGREGATION__WINDOW_CAPACITY", "120");
            jail.set_env("SENTINEL_PUBLISHER__CADENCE_MS", "250");
            let config = SentinelConfig::load().expect("env overrides should load");
            assert_eq!(config.aggregation.window_capacity, 120);
            assert_eq!(config.publisher.cadence_ms, 250);
            Ok(())
        });
    }

    #[test]
    fn file_layers_over_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.yaml",
                r#"
generator:
  min_interval_ms: 10
  max_interval_ms: 20
  seed: 7
export:
  extension: "txt"
"#,
            )?;
            let config = SentinelConfig::load_from_path("custom.yaml").expect("file should load");
            assert_eq!(config.generator.min_interval_ms, 10);
            assert_eq!(config.generator.max_interval_ms, 20);
            assert_eq!(config.generator.seed, Some(7));
            assert_eq!(config.export.extension, "txt");
            // untouched sections keep their defaults
            assert_eq!(config.aggregation.window_capacity, 60);
            assert_eq!(config.generator.internal_pool.len(), 3);
            Ok(())
        });
    }

    #[test]
    fn printed_config_loads_back() {
        figment::Jail::expect_with(|jail| {
            let mut config = SentinelConfig::default();
            config.generator.seed = Some(11);
            config.publisher.cadence_ms = 750;
            let yaml = serde_yaml::to_string(&config).expect("config serializes");
            jail.create_file("printed.yaml", &yaml)?;
            let loaded = SentinelConfig::load_from_path("printed.yaml").expect("printed config loads");
            assert_eq!(loaded, config);
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_reported() {
        let err = SentinelConfig::load_from_path("does/not/exist.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn invalid_file_values_fail_validation() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "bad.yaml",
                r#"
generator:
  min_interval_ms: 600
  max_interval_ms: 500
"#,
            )?;
            let err = SentinelConfig::load_from_path("bad.yaml").unwrap_err();
            assert!(matches!(err, ConfigError::Validation(_)));
            Ok(())
        });
    }
}
