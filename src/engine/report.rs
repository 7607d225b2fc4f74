// src/engine/report.rs

//! Summary of a finished run.

use crate::dag::{DepGraph, NodeStatus};
use crate::errors::Result;

/// Final state of every node after a run, by name.
///
/// - `passed` / `failed`: nodes that reported a result.
/// - `blocked`: unresolved nodes cut off by an upstream failure.
/// - `unresolved`: nodes that never became ready for another reason.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub blocked: Vec<String>,
    pub unresolved: Vec<String>,
    /// Number of depths that were executed.
    pub depths: usize,
}

impl RunReport {
    pub fn collect(graph: &DepGraph, depths: usize) -> Result<Self> {
        let mut report = RunReport {
            depths,
            ..Default::default()
        };

        for id in graph.ids() {
            let snap = graph.snapshot(id)?;
            match snap.status {
                NodeStatus::Passed => report.passed.push(snap.name),
                NodeStatus::Failed => report.failed.push(snap.name),
                NodeStatus::Unresolved if snap.blocked => report.blocked.push(snap.name),
                NodeStatus::Unresolved => report.unresolved.push(snap.name),
            }
        }

        Ok(report)
    }

    /// Every node passed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.blocked.is_empty() && self.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_nodes() {
        let mut graph = DepGraph::new();
        let a = graph.add_node("a").unwrap();
        let b = graph.add_node("b").unwrap();
        let c = graph.add_node("c").unwrap();
        let d = graph.add_node("d").unwrap();
        let e = graph.add_node("e").unwrap();
        graph.depends_on(c, b).unwrap();
        // e waits on d, which never runs.
        graph.depends_on(e, d).unwrap();

        graph.pass(a).unwrap();
        graph.fail(b).unwrap();

        let report = RunReport::collect(&graph, 1).unwrap();
        assert_eq!(report.passed, vec!["a"]);
        assert_eq!(report.failed, vec!["b"]);
        assert_eq!(report.blocked, vec!["c"]);
        assert_eq!(report.unresolved, vec!["d", "e"]);
        assert!(!report.is_success());
    }

    #[test]
    fn empty_report_is_success() {
        assert!(RunReport::default().is_success());
    }
}
