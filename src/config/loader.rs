//! Base and override sources
//!
//! The composer never looks up its inputs itself; callers hand it a
//! `BaseSource`, which may read a file, return a fixture, or yield the
//! built-in defaults.

use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;

use super::configuration::Configuration;
use super::defaults::BuiltinDefaults;
use super::error::ConfigError;

/// A configuration loaded from a source, with provenance
#[derive(Debug, Clone)]
pub struct LoadedBase {
    pub config: Configuration,

    /// File path (None for in-memory sources)
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for in-memory sources)
    pub digest: Option<String>,
}

/// Something that can produce a configuration mapping
pub trait BaseSource {
    fn load(&self) -> Result<LoadedBase, ConfigError>;
}

/// Reads a JSON or TOML file (TOML when the extension is `.toml`)
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_toml(&self) -> bool {
        self.path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("toml"))
            .unwrap_or(false)
    }
}

impl BaseSource for FileSource {
    fn load(&self) -> Result<LoadedBase, ConfigError> {
        let bytes = fs::read(&self.path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", self.path.display(), e)))?;

        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        let digest = hex::encode(hasher.finalize());

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigError::Parse(format!("Invalid UTF-8: {}", e)))?;

        let value = if self.is_toml() {
            let toml_value: toml::Value = toml::from_str(&contents)
                .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e)))?;
            toml_to_json(toml_value)
        } else {
            serde_json::from_str(&contents)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e)))?
        };

        let config = Configuration::try_from(value).map_err(|e| {
            ConfigError::InvalidConfiguration(format!("{}: {}", self.path.display(), e))
        })?;

        Ok(LoadedBase {
            config,
            path: Some(self.path.to_string_lossy().to_string()),
            digest: Some(digest),
        })
    }
}

/// An in-memory configuration, typically a test fixture
#[derive(Debug, Clone)]
pub struct StaticSource {
    value: Value,
}

impl StaticSource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// The stock coverage exclusions as an override layer
    pub fn stock() -> Self {
        Self::new(BuiltinDefaults::stock_overrides().into_value())
    }
}

impl BaseSource for StaticSource {
    fn load(&self) -> Result<LoadedBase, ConfigError> {
        Ok(LoadedBase {
            config: Configuration::try_from(self.value.clone())?,
            path: None,
            digest: None,
        })
    }
}

/// The built-in runner defaults
#[derive(Debug, Clone, Default)]
pub struct BuiltinSource {
    defaults: BuiltinDefaults,
}

impl BaseSource for BuiltinSource {
    fn load(&self) -> Result<LoadedBase, ConfigError> {
        Ok(LoadedBase {
            config: self.defaults.base(),
            path: None,
            digest: None,
        })
    }
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
