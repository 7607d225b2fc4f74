// src/dag/traversal.rs

//! Graph-level queries used by the driver between execution phases.
//!
//! None of these take a global lock. They are meant to be called from a
//! single orchestrating task while no edges are being added.

use tracing::trace;

use crate::dag::{DepGraph, NodeId};
use crate::errors::{DepgraphError, Result};

/// Nodes from `nodes` that have no dependencies, in input order.
///
/// Call this after all edges are wired and before anything has run.
pub fn root_dependencies(graph: &DepGraph, nodes: &[NodeId]) -> Result<Vec<NodeId>> {
    let mut roots = Vec::new();
    for &id in nodes {
        if !graph.node(id)?.has_dependencies() {
            roots.push(id);
        }
    }
    Ok(roots)
}

/// The next depth after `frontier`: every direct dependent of a frontier
/// node that is unblocked and has no dependencies left.
///
/// Every node in `frontier` must already have passed or failed. A dependent
/// reachable from several frontier nodes is listed once per such node.
pub fn step(graph: &DepGraph, frontier: &[NodeId]) -> Result<Vec<NodeId>> {
    let mut depth = Vec::new();

    for &id in frontier {
        let node = graph.node(id)?;
        let snap = node.snapshot();
        if !snap.status.is_resolved() {
            return Err(DepgraphError::NotResolved(node.name().to_string()));
        }

        for dependent in snap.dependency_of {
            if graph.is_ready(dependent)? {
                let ready = graph.name(dependent)?;
                trace!(from = %node.name(), node = %ready, "dependent is ready");
                depth.push(dependent);
            }
        }
    }

    Ok(depth)
}

/// Names of the given nodes, in order.
pub fn node_names(graph: &DepGraph, nodes: &[NodeId]) -> Result<Vec<String>> {
    nodes
        .iter()
        .map(|&id| graph.name(id).map(str::to_string))
        .collect()
}
