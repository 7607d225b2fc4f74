// src/job/mod.rs

//! Units of work bound to graph nodes.
//!
//! A [`Job`] does the actual work; a [`JobNode`] ties one job to exactly one
//! node and reports the job's outcome to the graph. [`shell`] provides the
//! job used for job files: a shell command plus optional validation
//! commands.

pub mod shell;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::dag::{DepGraph, NodeId};
use crate::errors::{DepgraphError, Error, Result};

pub use shell::ShellJob;

/// Future returned by [`Job::run`].
///
/// Resolves to the list of validation failures (empty on success), or an
/// error if the job could not do its work at all.
pub type JobFuture = Pin<Box<dyn Future<Output = std::result::Result<Vec<String>, Error>> + Send>>;

/// A unit of work.
///
/// The returned future must not borrow `self` so it can be spawned on its
/// own Tokio task.
pub trait Job: Send + Sync {
    fn run(&self) -> JobFuture;
}

/// How a job ended, as seen by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Passed,
    /// The job ran but at least one validation failed; the node was failed.
    ValidationFailed(Vec<String>),
}

/// A job bound to its node.
#[derive(Clone)]
pub struct JobNode {
    id: NodeId,
    job: Arc<dyn Job>,
}

impl std::fmt::Debug for JobNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobNode").field("id", &self.id).finish_non_exhaustive()
    }
}

impl JobNode {
    pub fn new(id: NodeId, job: Arc<dyn Job>) -> Self {
        Self { id, job }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Run the job and report its result on the node.
    ///
    /// - job error: the node is failed and the job's error is returned as
    ///   [`DepgraphError::JobFailed`].
    /// - validation failures: the node is failed; errors from the graph are
    ///   returned unchanged.
    /// - success: the node is passed; errors from the graph are returned
    ///   unchanged.
    pub async fn run(&self, graph: &DepGraph) -> Result<JobOutcome> {
        let name = graph.name(self.id)?.to_string();
        debug!(job = %name, "running job");

        match self.job.run().await {
            Err(source) => {
                if let Err(node_err) = graph.fail(self.id) {
                    warn!(job = %name, error = %node_err, "failed to record job error on node");
                }
                Err(DepgraphError::JobFailed { job: name, source })
            }
            Ok(failures) if !failures.is_empty() => {
                warn!(job = %name, failures = ?failures, "job validation failed");
                graph.fail(self.id)?;
                Ok(JobOutcome::ValidationFailed(failures))
            }
            Ok(_) => {
                graph.pass(self.id)?;
                Ok(JobOutcome::Passed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::NodeStatus;

    struct Scripted(std::result::Result<Vec<String>, &'static str>);

    impl Job for Scripted {
        fn run(&self) -> JobFuture {
            let result = self.0.clone().map_err(|msg| anyhow::anyhow!(msg));
            Box::pin(async move { result })
        }
    }

    fn single(result: std::result::Result<Vec<String>, &'static str>) -> (DepGraph, JobNode) {
        let mut graph = DepGraph::new();
        let id = graph.add_node("job").unwrap();
        (graph, JobNode::new(id, Arc::new(Scripted(result))))
    }

    #[tokio::test]
    async fn success_passes_node() {
        let (graph, job) = single(Ok(vec![]));
        assert_eq!(job.run(&graph).await.unwrap(), JobOutcome::Passed);
        assert_eq!(graph.status(job.id()).unwrap(), NodeStatus::Passed);
    }

    #[tokio::test]
    async fn validation_failures_fail_node() {
        let (graph, job) = single(Ok(vec!["missing artifact".to_string()]));
        let outcome = job.run(&graph).await.unwrap();
        assert_eq!(
            outcome,
            JobOutcome::ValidationFailed(vec!["missing artifact".to_string()])
        );
        assert_eq!(graph.status(job.id()).unwrap(), NodeStatus::Failed);
    }

    #[tokio::test]
    async fn job_error_fails_node_and_is_returned() {
        let (graph, job) = single(Err("boom"));
        let err = job.run(&graph).await.unwrap_err();
        assert!(matches!(err, DepgraphError::JobFailed { ref job, .. } if job == "job"));
        assert_eq!(graph.status(job.id()).unwrap(), NodeStatus::Failed);
    }

    #[tokio::test]
    async fn second_run_reports_already_resolved() {
        let (graph, job) = single(Ok(vec![]));
        job.run(&graph).await.unwrap();
        assert!(matches!(
            job.run(&graph).await,
            Err(DepgraphError::AlreadyResolved(_))
        ));
    }
}
