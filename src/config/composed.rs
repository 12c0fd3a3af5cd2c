//! Composed configuration with provenance
//!
//! Captures the composed mapping together with the sources that
//! contributed to it and a canonical digest of the result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

use super::composer::compose;
use super::configuration::{kind_of, Configuration};
use super::error::ConfigError;
use super::loader::BaseSource;

/// Schema version for composed_config
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "config-composer/composed_config@1";

/// Role of a contributing source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Base,
    Override,
}

/// A contributing config source with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for in-memory sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory sources)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Composed configuration with full provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposedConfig {
    pub schema_version: u32,

    pub schema_id: String,

    /// When this config was composed
    pub created_at: DateTime<Utc>,

    /// The composed configuration mapping
    pub config: Configuration,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,

    /// SHA-256 of the JCS-canonical composed mapping
    pub config_digest: String,
}

impl ComposedConfig {
    /// Load the base and every override layer, then compose in order
    pub fn build(
        base: &dyn BaseSource,
        overrides: &[&dyn BaseSource],
    ) -> Result<Self, ConfigError> {
        let loaded = base.load()?;
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Base,
            path: loaded.path,
            digest: loaded.digest,
        }];

        let mut composed = loaded.config;
        for layer in overrides {
            let loaded = layer.load()?;
            composed = compose(composed, loaded.config);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Override,
                path: loaded.path,
                digest: loaded.digest,
            });
        }

        Self::from_parts(composed, sources)
    }

    /// Wrap an already composed mapping
    fn from_parts(
        config: Configuration,
        sources: Vec<ConfigSource>,
    ) -> Result<Self, ConfigError> {
        Self::validate_config(&config)?;
        let config_digest = Self::canonical_digest(&config)?;

        info!(
            sources = sources.len(),
            keys = config.len(),
            digest = %config_digest,
            "composed configuration"
        );

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            sources,
            config_digest,
        })
    }

    /// SHA-256 hex digest of JCS(config)
    fn canonical_digest(config: &Configuration) -> Result<String, ConfigError> {
        let jcs_bytes = serde_json_canonicalizer::to_vec(config)
            .map_err(|e| ConfigError::Parse(format!("JCS serialization failed: {}", e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&jcs_bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Validate the fields this crate knows about
    fn validate_config(config: &Configuration) -> Result<(), ConfigError> {
        if let Some(patterns) = config.get("coveragePathIgnorePatterns") {
            let items = patterns.as_array().ok_or_else(|| {
                ConfigError::Validation(format!(
                    "coveragePathIgnorePatterns must be a sequence, got {}",
                    kind_of(patterns)
                ))
            })?;
            if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                return Err(ConfigError::Validation(format!(
                    "coveragePathIgnorePatterns entries must be strings, got {}",
                    kind_of(bad)
                )));
            }
        }

        if let Some(timeout) = config.get("testTimeout") {
            match timeout.as_f64() {
                Some(ms) if ms > 0.0 => {}
                _ => {
                    return Err(ConfigError::Validation(
                        "testTimeout must be a positive number".to_string(),
                    ))
                }
            }
        }

        Ok(())
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize only the composed mapping
    pub fn config_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.config)
    }

    /// Write to file
    pub fn write_to_file(&self, path: &Path) -> io::Result<()> {
        let json = self.to_json().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("JSON serialization failed: {}", e),
            )
        })?;
        fs::write(path, json)
    }

    /// Get a config value by path (dot-separated)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.config.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_u64(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(|v| v.as_u64())
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    /// Get a sequence of strings; None if any element is not a string
    pub fn get_strings(&self, path: &str) -> Option<Vec<&str>> {
        self.get(path)?
            .as_array()?
            .iter()
            .map(|v| v.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::{BuiltinSource, StaticSource};
    use serde_json::json;

    #[test]
    fn test_build_with_base_only() {
        let config = ComposedConfig::build(&BuiltinSource::default(), &[]).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.get_u64("testTimeout"), Some(5000));
        assert_eq!(
            config.get_strings("coveragePathIgnorePatterns"),
            Some(vec!["/node_modules/"])
        );
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Base);
    }

    #[test]
    fn test_build_with_layers() {
        let first = StaticSource::new(json!({"coveragePathIgnorePatterns": [".macro.js$"]}));
        let second = StaticSource::new(json!({"testTimeout": 10000}));

        let config =
            ComposedConfig::build(&BuiltinSource::default(), &[&first, &second]).unwrap();

        assert_eq!(
            config.get_strings("coveragePathIgnorePatterns"),
            Some(vec!["/node_modules/", ".macro.js$"])
        );
        assert_eq!(config.get_u64("testTimeout"), Some(10000));
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[2].origin, ConfigOrigin::Override);
    }

    #[test]
    fn test_null_base_fails() {
        let result = ComposedConfig::build(&StaticSource::new(Value::Null), &[]);
        assert!(matches!(result, Err(ConfigError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_validation_patterns_not_strings() {
        let base = StaticSource::new(json!({"coveragePathIgnorePatterns": ["/node_modules/"]}));
        let bad = StaticSource::new(json!({"coveragePathIgnorePatterns": [42]}));

        let result = ComposedConfig::build(&base, &[&bad]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_timeout() {
        let base = StaticSource::new(json!({"testTimeout": 0}));
        let err = ComposedConfig::build(&base, &[]).unwrap_err();
        assert!(err.to_string().contains("testTimeout"));
    }

    #[test]
    fn test_fractional_timeout_accepted() {
        let base = StaticSource::new(json!({"testTimeout": 2.5}));
        let config = ComposedConfig::build(&base, &[]).unwrap();
        assert_eq!(config.get("testTimeout"), Some(&json!(2.5)));
    }

    #[test]
    fn test_non_numeric_timeout_rejected() {
        let base = StaticSource::new(json!({"testTimeout": "5s"}));
        let result = ComposedConfig::build(&base, &[]);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_digest_ignores_key_order() {
        let a = StaticSource::new(json!({"a": 1, "b": [1, 2]}));
        let b = StaticSource::new(json!({"b": [1, 2], "a": 1}));

        let first = ComposedConfig::build(&a, &[]).unwrap();
        let second = ComposedConfig::build(&b, &[]).unwrap();
        assert_eq!(first.config_digest, second.config_digest);
        assert_eq!(first.config_digest.len(), 64);
    }

    #[test]
    fn test_digest_changes_with_content() {
        let base = StaticSource::new(json!({"a": [1]}));
        let extra = StaticSource::new(json!({"a": [2]}));

        let plain = ComposedConfig::build(&base, &[]).unwrap();
        let extended = ComposedConfig::build(&base, &[&extra]).unwrap();
        assert_ne!(plain.config_digest, extended.config_digest);
    }

    #[test]
    fn test_nested_get() {
        let base = StaticSource::new(json!({"globals": {"env": {"name": "ci"}}}));
        let config = ComposedConfig::build(&base, &[]).unwrap();

        assert_eq!(config.get_str("globals.env.name"), Some("ci"));
        assert!(config.get("globals.missing").is_none());
    }

    #[test]
    fn test_config_json_is_plain_mapping() {
        let base = StaticSource::new(json!({"a": 1}));
        let config = ComposedConfig::build(&base, &[]).unwrap();

        let parsed: Value = serde_json::from_str(&config.config_json().unwrap()).unwrap();
        assert_eq!(parsed, json!({"a": 1}));
    }
}
