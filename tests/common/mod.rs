#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use depgraph::dag::DepGraph;
use depgraph::engine::Pipeline;
use depgraph::job::JobNode;
pub use depgraph_test_utils::fake_job::{FakeJob, Script};
pub use depgraph_test_utils::{RUN_TIMEOUT, init_tracing, with_timeout};

pub type Executed = Arc<Mutex<Vec<String>>>;

/// Build a pipeline of fake jobs.
///
/// Each entry is `(name, dependencies, script)`; dependencies refer to
/// other entries by name.
pub fn fake_pipeline(jobs: &[(&str, &[&str], Script)]) -> (Pipeline, Executed) {
    let executed: Executed = Arc::new(Mutex::new(Vec::new()));
    let mut graph = DepGraph::new();

    let ids: Vec<_> = jobs
        .iter()
        .map(|(name, _, _)| graph.add_node(*name).unwrap())
        .collect();

    for (idx, (_, deps, _)) in jobs.iter().enumerate() {
        let deps: Vec<_> = deps.iter().map(|d| graph.find(d).unwrap()).collect();
        graph.depends_on_list(ids[idx], &deps).unwrap();
    }

    let nodes = jobs
        .iter()
        .zip(&ids)
        .map(|((name, _, script), &id)| {
            JobNode::new(
                id,
                Arc::new(FakeJob::new(name, script.clone(), Arc::clone(&executed))),
            )
        })
        .collect();

    (Pipeline::new(graph, nodes).unwrap(), executed)
}

pub fn executed(log: &Executed) -> Vec<String> {
    log.lock().unwrap().clone()
}
