//! Config Composer - test-runner configuration composition
//!
//! This crate composes a base test-runner configuration with override
//! directives: sequence fields are extended, scalar fields replaced, and
//! untouched fields passed through from the base.

pub mod config;

pub use config::{
    compose, compose_all, compose_value, BaseSource, ComposedConfig, ConfigError, Configuration,
    Overrides,
};
