// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Read and deserialize a job file without validating it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawJobFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), jobs = raw.job.len(), "loaded job file");

    Ok(raw)
}

/// Read a job file and validate it.
///
/// Checks for unknown or repeated `after` entries, self-references and
/// (unless `[config].check_cycles = false`) cycles.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    JobFile::try_from(raw)
}

/// `Depgraph.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Depgraph.toml")
}
