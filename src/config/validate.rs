// src/config/validate.rs

use std::collections::HashSet;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{DepgraphError, Result};

impl TryFrom<RawJobFile> for JobFile {
    type Error = DepgraphError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_job_file(&raw)?;
        Ok(JobFile::new_unchecked(raw.config, raw.job))
    }
}

fn validate_raw_job_file(cfg: &RawJobFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_job_names(cfg)?;
    validate_job_dependencies(cfg)?;
    if cfg.config.check_cycles {
        validate_dag(cfg)?;
    }
    Ok(())
}

fn ensure_has_jobs(cfg: &RawJobFile) -> Result<()> {
    if cfg.job.is_empty() {
        return Err(DepgraphError::ConfigError(
            "job file must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_job_names(cfg: &RawJobFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        if name.trim().is_empty() {
            return Err(DepgraphError::EmptyName);
        }
        if job.cmd.trim().is_empty() {
            return Err(DepgraphError::ConfigError(format!(
                "job '{name}' has an empty `cmd`"
            )));
        }
    }
    Ok(())
}

fn validate_job_dependencies(cfg: &RawJobFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        let mut seen = HashSet::new();
        for dep in job.after.iter() {
            if !cfg.job.contains_key(dep) {
                return Err(DepgraphError::ConfigError(format!(
                    "job '{name}' has unknown dependency '{dep}' in `after`"
                )));
            }
            if dep == name {
                return Err(DepgraphError::SelfDependency(name.clone()));
            }
            if !seen.insert(dep.as_str()) {
                return Err(DepgraphError::DuplicateDependency {
                    dependent: name.clone(),
                    dependency: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawJobFile) -> Result<()> {
    // Edge direction: dependency -> dependent, as in the node graph.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.job.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in cfg.job.iter() {
        for dep in job.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(DepgraphError::CircularDependency(
            cycle.node_id().to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::config::model::{ConfigSection, JobConfig};

    fn job(cmd: &str, after: &[&str]) -> JobConfig {
        JobConfig {
            cmd: cmd.to_string(),
            after: after.iter().map(|s| s.to_string()).collect(),
            validate: Vec::new(),
        }
    }

    fn raw(jobs: Vec<(&str, JobConfig)>) -> RawJobFile {
        RawJobFile {
            config: ConfigSection::default(),
            job: jobs
                .into_iter()
                .map(|(n, j)| (n.to_string(), j))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn accepts_simple_chain() {
        let cfg = raw(vec![
            ("a", job("echo a", &[])),
            ("b", job("echo b", &["a"])),
        ]);
        assert!(JobFile::try_from(cfg).is_ok());
    }

    #[test]
    fn rejects_empty_file() {
        let err = JobFile::try_from(raw(vec![])).unwrap_err();
        assert!(matches!(err, DepgraphError::ConfigError(ref m) if m.contains("at least one")));
    }

    #[test]
    fn rejects_empty_cmd() {
        let err = JobFile::try_from(raw(vec![("a", job("  ", &[]))])).unwrap_err();
        assert!(matches!(err, DepgraphError::ConfigError(ref m) if m.contains("empty `cmd`")));
    }

    #[test]
    fn rejects_self_reference() {
        let err = JobFile::try_from(raw(vec![("a", job("echo a", &["a"]))])).unwrap_err();
        assert!(matches!(err, DepgraphError::SelfDependency(ref n) if n == "a"));
    }

    #[test]
    fn rejects_repeated_after_entry() {
        let cfg = raw(vec![
            ("a", job("echo a", &[])),
            ("b", job("echo b", &["a", "a"])),
        ]);
        assert!(matches!(
            JobFile::try_from(cfg).unwrap_err(),
            DepgraphError::DuplicateDependency { .. }
        ));
    }

    #[test]
    fn rejects_cycle_when_checking() {
        let cfg = raw(vec![
            ("a", job("echo a", &["b"])),
            ("b", job("echo b", &["a"])),
        ]);
        assert!(matches!(
            JobFile::try_from(cfg).unwrap_err(),
            DepgraphError::CircularDependency(_)
        ));
    }

    #[test]
    fn allows_cycle_when_check_disabled() {
        let mut cfg = raw(vec![
            ("a", job("echo a", &["b"])),
            ("b", job("echo b", &["a"])),
        ]);
        cfg.config.check_cycles = false;
        assert!(JobFile::try_from(cfg).is_ok());
    }
}
