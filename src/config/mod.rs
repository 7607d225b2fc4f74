// src/config/mod.rs

//! Job file loading and validation.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a job file from disk.
//! - [`validate`] turns a [`RawJobFile`] into a [`JobFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ConfigSection, JobConfig, JobFile, RawJobFile};
