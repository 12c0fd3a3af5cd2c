//! Configuration composition
//!
//! Combines a base configuration with override directives:
//! - Sequences: APPEND (base elements first, override elements after)
//! - Everything else: REPLACE (override wins)
//! - Keys absent from the overrides pass through untouched
//!
//! Nested mappings are replaced, not merged recursively.

use serde_json::Value;
use tracing::debug;

use super::configuration::{Configuration, Overrides};
use super::error::ConfigError;

/// Compose a base configuration with one override directive.
///
/// For each key in `overrides`:
/// - base value is a sequence: override elements are appended in order
///   (a non-sequence override value is appended as a single element)
/// - base key missing: treated as an empty sequence, so the override
///   value is inserted as is
/// - otherwise: the override value replaces the base value
pub fn compose(base: Configuration, overrides: Overrides) -> Configuration {
    let mut composed = base;
    // Existing keys are updated in place so the base's key order survives.
    for (key, overlay) in overrides {
        match composed.get_mut(&key) {
            Some(Value::Array(items)) => {
                debug!(key = %key, "appending to sequence");
                match overlay {
                    Value::Array(extra) => items.extend(extra),
                    single => items.push(single),
                }
            }
            Some(slot) => {
                debug!(key = %key, "replacing value");
                *slot = overlay;
            }
            None => {
                debug!(key = %key, "inserting new key");
                composed.insert(key, overlay);
            }
        }
    }
    composed
}

/// Untyped entry point: both arguments must be mappings.
pub fn compose_value(base: Value, overrides: Value) -> Result<Value, ConfigError> {
    let base = Configuration::try_from(base)?;
    let overrides = Configuration::try_from(overrides)
        .map_err(|e| ConfigError::InvalidConfiguration(format!("overrides: {}", e)))?;
    Ok(compose(base, overrides).into_value())
}

/// Compose override layers in order (first layer applied first)
pub fn compose_all<I>(base: Configuration, layers: I) -> Configuration
where
    I: IntoIterator<Item = Overrides>,
{
    layers.into_iter().fold(base, compose)
}
