// src/dag/node.rs

//! A single node of the dependency graph and its guarded state.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Stable handle to a node inside a [`DepGraph`](crate::dag::DepGraph).
///
/// Handles are plain indices into the graph's arena; they are only
/// meaningful for the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Completion status of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeStatus {
    /// The node has not reported a result yet.
    #[default]
    Unresolved,
    Passed,
    Failed,
}

impl NodeStatus {
    /// `true` once the node has passed or failed.
    pub fn is_resolved(self) -> bool {
        !matches!(self, NodeStatus::Unresolved)
    }
}

/// Mutable part of a node, always accessed under the node's lock.
#[derive(Debug, Default)]
pub(crate) struct NodeState {
    pub(crate) status: NodeStatus,
    /// Set when an upstream dependency failed. Never cleared.
    pub(crate) blocked: bool,
    /// Set once this node is the dependent side of any edge. Never cleared.
    pub(crate) has_dependencies: bool,
    pub(crate) deps_remaining: usize,
    /// Nodes that list this node as a direct dependency.
    pub(crate) dependency_of: Vec<NodeId>,
}

/// Point-in-time copy of a node's fields, taken under its lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub status: NodeStatus,
    pub blocked: bool,
    pub has_dependencies: bool,
    pub deps_remaining: usize,
    pub dependency_of: Vec<NodeId>,
}

impl NodeSnapshot {
    /// All dependencies resolved and no upstream failure.
    pub fn is_ready(&self) -> bool {
        self.deps_remaining == 0 && !self.blocked
    }
}

/// A unit in the dependency graph.
///
/// The name is immutable; everything else lives in a [`NodeState`] behind
/// the node's own mutex.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: String,
    state: Mutex<NodeState>,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            state: Mutex::new(NodeState::default()),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Acquire the node's lock.
    ///
    /// A poisoned lock is recovered: every critical section leaves the state
    /// consistent before it can panic.
    pub(crate) fn lock(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn status(&self) -> NodeStatus {
        self.lock().status
    }

    pub fn is_blocked(&self) -> bool {
        self.lock().blocked
    }

    pub fn has_dependencies(&self) -> bool {
        self.lock().has_dependencies
    }

    pub fn deps_remaining(&self) -> usize {
        self.lock().deps_remaining
    }

    pub fn is_ready(&self) -> bool {
        let state = self.lock();
        state.deps_remaining == 0 && !state.blocked
    }

    /// Direct dependents of this node.
    pub fn dependency_of(&self) -> Vec<NodeId> {
        self.lock().dependency_of.clone()
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        let state = self.lock();
        NodeSnapshot {
            id: self.id,
            name: self.name.clone(),
            status: state.status,
            blocked: state.blocked,
            has_dependencies: state.has_dependencies,
            deps_remaining: state.deps_remaining,
            dependency_of: state.dependency_of.clone(),
        }
    }
}
