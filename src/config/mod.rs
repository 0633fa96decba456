// src/config/mod.rs

//! Configuration loading and validation for tagrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate what deserialization cannot (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, load_optional};
pub use model::{ConfigFile, RawConfigFile, RunnerSection};
pub use validate::{validate_config, validate_tag};
