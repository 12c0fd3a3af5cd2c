//! Configuration mapping
//!
//! A configuration is a mapping from option name to JSON value. Only
//! objects are accepted; anything else is rejected at construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ConfigError;

/// A configuration mapping (option name -> value)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(Map<String, Value>);

/// Override directive: a partial configuration combined into a base
pub type Overrides = Configuration;

impl Configuration {
    /// Empty configuration
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Get a top-level value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Insert a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Mutable access to a top-level value
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Iterate over option names
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert into a JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl TryFrom<Value> for Configuration {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Err(ConfigError::InvalidConfiguration(
                "configuration is null".to_string(),
            )),
            other => Err(ConfigError::InvalidConfiguration(format!(
                "expected a mapping, got {}",
                kind_of(&other)
            ))),
        }
    }
}

impl IntoIterator for Configuration {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Short name of a JSON value's kind, for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_object() {
        let config = Configuration::try_from(json!({"testTimeout": 5000})).unwrap();
        assert_eq!(config.len(), 1);
        assert_eq!(config.get("testTimeout"), Some(&json!(5000)));
    }

    #[test]
    fn test_null_rejected() {
        let err = Configuration::try_from(Value::Null).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_non_mapping_rejected() {
        let err = Configuration::try_from(json!(["/node_modules/"])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("sequence"));
    }

    #[test]
    fn test_empty() {
        let mut config = Configuration::new();
        assert!(config.is_empty());
        config.insert("bail", json!(true));
        assert!(!config.is_empty());
    }

    #[test]
    fn test_key_order_preserved() {
        let config = Configuration::try_from(json!({"z": 1, "a": [1], "m": "x"})).unwrap();
        let keys: Vec<&String> = config.keys().collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"z":1,"a":[1],"m":"x"}"#);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let config = Configuration::try_from(json!({"a": [1, 2]})).unwrap();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(text, r#"{"a":[1,2]}"#);
    }
}
