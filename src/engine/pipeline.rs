// src/engine/pipeline.rs

//! Depth-by-depth driver over a [`DepGraph`].

use std::collections::HashSet;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::config::model::JobFile;
use crate::dag::{DepGraph, NodeId, NodeStatus, node_names, root_dependencies, step};
use crate::engine::report::RunReport;
use crate::errors::{DepgraphError, Result};
use crate::job::{JobNode, JobOutcome, ShellJob};

/// The first depth and size of a pipeline, for dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub roots: Vec<String>,
    pub jobs: usize,
}

/// A graph plus one job per node.
#[derive(Debug)]
pub struct Pipeline {
    graph: Arc<DepGraph>,
    /// Indexed by `NodeId`.
    jobs: Vec<JobNode>,
}

impl Pipeline {
    /// Pair a fully wired graph with its jobs.
    ///
    /// Every node must have exactly one job.
    pub fn new(graph: DepGraph, jobs: Vec<JobNode>) -> Result<Self> {
        let mut slots: Vec<Option<JobNode>> = vec![None; graph.len()];
        for job in jobs {
            let id = job.id();
            let name = graph.name(id)?.to_string();
            let slot = &mut slots[id.index()];
            if slot.is_some() {
                return Err(DepgraphError::ConfigError(format!(
                    "node '{name}' has more than one job"
                )));
            }
            *slot = Some(job);
        }

        let mut jobs = Vec::with_capacity(slots.len());
        for (id, slot) in graph.ids().into_iter().zip(slots) {
            match slot {
                Some(job) => jobs.push(job),
                None => {
                    return Err(DepgraphError::ConfigError(format!(
                        "node '{}' has no job",
                        graph.name(id)?
                    )));
                }
            }
        }

        Ok(Self {
            graph: Arc::new(graph),
            jobs,
        })
    }

    /// Build a pipeline of shell jobs from a validated job file.
    pub fn from_config(cfg: &JobFile) -> Result<Self> {
        let graph = DepGraph::from_config(cfg)?;

        let mut jobs = Vec::with_capacity(cfg.job.len());
        for (name, job_cfg) in cfg.job.iter() {
            let id = graph.find(name).ok_or_else(|| {
                DepgraphError::ConfigError(format!("no node named '{name}' in graph"))
            })?;
            jobs.push(JobNode::new(id, Arc::new(ShellJob::from_config(name, job_cfg))));
        }

        Self::new(graph, jobs)
    }

    pub fn graph(&self) -> &DepGraph {
        &self.graph
    }

    /// Names of the nodes that will run first.
    pub fn roots(&self) -> Result<Vec<String>> {
        let roots = root_dependencies(&self.graph, &self.graph.ids())?;
        node_names(&self.graph, &roots)
    }

    /// What [`run`](Self::run) would start with, without running anything.
    pub fn plan(&self) -> Result<Plan> {
        Ok(Plan {
            roots: self.roots()?,
            jobs: self.jobs.len(),
        })
    }

    /// Run every reachable job, one depth at a time.
    ///
    /// Jobs within a depth run concurrently. A failing job blocks its
    /// dependents but does not stop the run; an error reported by the graph
    /// itself (for example a circular dependency) aborts the run once the
    /// current depth has finished.
    pub async fn run(&self) -> Result<RunReport> {
        let mut frontier = root_dependencies(&self.graph, &self.graph.ids())?;
        let mut depths = 0;

        while !frontier.is_empty() {
            let names = node_names(&self.graph, &frontier)?;
            info!(depth = depths, nodes = ?names, "running depth");

            self.run_frontier(&frontier).await?;
            depths += 1;

            frontier = dedup(step(&self.graph, &frontier)?);
        }

        let report = RunReport::collect(&self.graph, depths)?;
        info!(
            passed = report.passed.len(),
            failed = report.failed.len(),
            blocked = report.blocked.len(),
            unresolved = report.unresolved.len(),
            depths,
            "run finished"
        );
        Ok(report)
    }

    async fn run_frontier(&self, frontier: &[NodeId]) -> Result<()> {
        let mut set = JoinSet::new();

        for &id in frontier {
            let job = self.jobs[id.index()].clone();
            let graph = Arc::clone(&self.graph);
            set.spawn(async move { job.run(&graph).await });
        }

        let mut fatal: Option<DepgraphError> = None;

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(Ok(JobOutcome::Passed)) => {}
                Ok(Ok(JobOutcome::ValidationFailed(failures))) => {
                    debug!(failures = failures.len(), "job failed validation");
                }
                Ok(Err(DepgraphError::JobFailed { job, source })) => {
                    warn!(job = %job, error = %source, "job failed");
                }
                Ok(Err(err)) => {
                    error!(error = %err, "graph rejected job result");
                    fatal.get_or_insert(err);
                }
                Err(join_err) => {
                    error!(error = %join_err, "job task did not complete");
                    fatal.get_or_insert(DepgraphError::Other(join_err.into()));
                }
            }
        }

        // Keep the frontier invariant for `step` even if a task died before
        // reporting.
        for &id in frontier {
            if self.graph.status(id)? == NodeStatus::Unresolved && fatal.is_none() {
                fatal = Some(DepgraphError::NotResolved(self.graph.name(id)?.to_string()));
            }
        }

        match fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Drop repeated handles, keeping the first occurrence.
fn dedup(nodes: Vec<NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    nodes.into_iter().filter(|id| seen.insert(*id)).collect()
}
