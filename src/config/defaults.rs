//! Built-in runner defaults
//!
//! Used as the base when no base file is given.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::configuration::{Configuration, Overrides};

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Coverage exclusion patterns (default: ["/node_modules/"])
    pub coverage_path_ignore_patterns: Vec<String>,

    /// Files collected for coverage (default: ["src/**/*.js"])
    pub collect_coverage_from: Vec<String>,

    /// Per-test timeout in milliseconds (default: 5000)
    pub test_timeout: u64,

    /// Test environment (default: "node")
    pub test_environment: String,

    /// Watch plugins (default: none)
    pub watch_plugins: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            coverage_path_ignore_patterns: vec!["/node_modules/".to_string()],
            collect_coverage_from: vec!["src/**/*.js".to_string()],
            test_timeout: 5000,
            test_environment: "node".to_string(),
            watch_plugins: Vec::new(),
        }
    }
}

impl BuiltinDefaults {
    /// Base configuration in the runner's option naming
    pub fn base(&self) -> Configuration {
        let mut base = Configuration::new();
        base.insert(
            "coveragePathIgnorePatterns",
            json!(self.coverage_path_ignore_patterns),
        );
        base.insert("collectCoverageFrom", json!(self.collect_coverage_from));
        base.insert("testTimeout", json!(self.test_timeout));
        base.insert("testEnvironment", json!(self.test_environment));
        base.insert("watchPlugins", json!(self.watch_plugins));
        base
    }

    /// Stock override directive: macro files and the generated state
    /// change table are excluded from coverage
    pub fn stock_overrides() -> Overrides {
        let mut overrides = Configuration::new();
        overrides.insert(
            "coveragePathIgnorePatterns",
            json!([".macro.js$", "<rootDir>/src/stateChangeTypes.js"]),
        );
        overrides
    }
}
