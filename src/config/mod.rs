// src/config/mod.rs

//! TOML configuration for the `entrywatch` binary.
//!
//! The library API takes a factory written in Rust; the binary instead reads
//! static entries and glob-driven dynamic rules from a config file and turns
//! the rules into a factory.

pub mod factory;
pub mod loader;
pub mod model;
pub mod validate;

pub use factory::entries_factory;
pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigFile, DynamicRule};
pub use validate::validate_config;
