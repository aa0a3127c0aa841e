//! Core engine types: configuration shared by every component.

pub mod config;

pub use config::{ConfigError, EngineConfig, ResetPolicy};
