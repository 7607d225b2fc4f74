#![allow(dead_code)]

use std::collections::BTreeMap;
use depgraph::config::{ConfigSection, JobConfig, JobFile, RawJobFile};

/// Builder for `JobFile` to simplify test setup.
pub struct JobFileBuilder {
    raw: RawJobFile,
}

impl JobFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawJobFile {
                config: ConfigSection::default(),
                job: BTreeMap::new(),
            },
        }
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.raw.job.insert(name.to_string(), job);
        self
    }

    pub fn check_cycles(mut self, val: bool) -> Self {
        self.raw.config.check_cycles = val;
        self
    }

    /// The unvalidated file, for tests that exercise validation itself.
    pub fn build_raw(self) -> RawJobFile {
        self.raw
    }

    pub fn build(self) -> JobFile {
        JobFile::try_from(self.raw).expect("Failed to build valid job file from builder")
    }
}

impl Default for JobFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            job: JobConfig {
                cmd: cmd.to_string(),
                after: vec![],
                validate: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.after.push(dep.to_string());
        self
    }

    pub fn validate(mut self, cmd: &str) -> Self {
        self.job.validate.push(cmd.to_string());
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}
