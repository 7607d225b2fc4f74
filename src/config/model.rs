// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Job file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// check_cycles = true
///
/// [job.build]
/// cmd = "make"
///
/// [job.test]
/// cmd = "make test"
/// after = ["build"]
/// validate = ["test -f report.xml"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All jobs from `[job.<name>]`, keyed by node name.
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// A job file that passed validation. Construct it with
/// `JobFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct JobFile {
    pub config: ConfigSection,
    pub job: BTreeMap<String, JobConfig>,
}

impl JobFile {
    pub(crate) fn new_unchecked(config: ConfigSection, job: BTreeMap<String, JobConfig>) -> Self {
        Self { config, job }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Reject cycles while loading. When disabled, a cycle is only noticed
    /// if one of its members fails at run time.
    #[serde(default = "default_check_cycles")]
    pub check_cycles: bool,
}

fn default_check_cycles() -> bool {
    true
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            check_cycles: default_check_cycles(),
        }
    }
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Shell command for the job.
    pub cmd: String,

    /// Jobs that must resolve before this one runs.
    #[serde(default)]
    pub after: Vec<String>,

    /// Commands run after `cmd` succeeds; each one that exits non-zero is
    /// reported as a validation failure and fails the job.
    #[serde(default)]
    pub validate: Vec<String>,
}
