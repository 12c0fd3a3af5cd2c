//! Configuration composition
//!
//! Composes a base configuration with override directives:
//! 1. Base configuration (file, fixture, or built-in defaults)
//! 2. Override layers, applied in order
//!
//! Sequences are extended, everything else is replaced.

mod composer;
mod composed;
mod configuration;
mod defaults;
mod error;
mod loader;

pub use composer::{compose, compose_all, compose_value};
pub use composed::{ComposedConfig, ConfigOrigin, ConfigSource, SCHEMA_ID, SCHEMA_VERSION};
pub use configuration::{Configuration, Overrides};
pub use defaults::BuiltinDefaults;
pub use error::ConfigError;
pub use loader::{BaseSource, BuiltinSource, FileSource, LoadedBase, StaticSource};
