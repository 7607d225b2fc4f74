// src/dag/graph.rs

//! The node arena and the operations that mutate node state across edges.

use std::collections::HashSet;
use std::sync::MutexGuard;

use tracing::{debug, trace, warn};

use crate::config::model::JobFile;
use crate::dag::node::{Node, NodeId, NodeSnapshot, NodeState, NodeStatus};
use crate::dag::node_stack::NodeStack;
use crate::errors::{DepgraphError, Result};

/// Arena of nodes addressed by [`NodeId`].
///
/// Nodes are added with `&mut self` while the graph is being built; every
/// other operation takes `&self` and relies on the per-node locks, so a
/// finished graph can be shared as `Arc<DepGraph>` between workers.
///
/// Locking rules:
/// - `pass`/`fail` commit the status under the node's own lock, then release
///   it before touching dependents one at a time.
/// - `depends_on` is the only operation that holds two node locks, and it
///   always takes the lower `NodeId` first.
#[derive(Debug, Default)]
pub struct DepGraph {
    nodes: Vec<Node>,
}

impl DepGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a validated [`JobFile`]: one node per job, in name
    /// order, wired from each job's `after` list.
    pub fn from_config(cfg: &JobFile) -> Result<Self> {
        let mut graph = DepGraph::new();

        for name in cfg.job.keys() {
            graph.add_node(name.clone())?;
        }

        for (name, job) in cfg.job.iter() {
            let dependent = graph.require(name)?;
            let deps = job
                .after
                .iter()
                .map(|dep| graph.require(dep))
                .collect::<Result<Vec<_>>>()?;
            graph.depends_on_list(dependent, &deps)?;
        }

        Ok(graph)
    }

    /// Create a new, unresolved node.
    ///
    /// Names must be unique within the graph; this is not checked.
    pub fn add_node(&mut self, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();
        if name.is_empty() {
            return Err(DepgraphError::EmptyName);
        }

        let id = NodeId(self.nodes.len());
        trace!(node = %name, %id, "adding node");
        self.nodes.push(Node::new(id, name));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node handles, in insertion order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(Node::id).collect()
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(DepgraphError::UnknownNode(id))
    }

    /// Look up a node by name (first match).
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.name() == name).map(Node::id)
    }

    fn require(&self, name: &str) -> Result<NodeId> {
        self.find(name).ok_or_else(|| {
            DepgraphError::ConfigError(format!("no node named '{name}' in graph"))
        })
    }

    pub fn name(&self, id: NodeId) -> Result<&str> {
        Ok(self.node(id)?.name())
    }

    pub fn status(&self, id: NodeId) -> Result<NodeStatus> {
        Ok(self.node(id)?.status())
    }

    pub fn is_blocked(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.is_blocked())
    }

    pub fn deps_remaining(&self, id: NodeId) -> Result<usize> {
        Ok(self.node(id)?.deps_remaining())
    }

    pub fn is_ready(&self, id: NodeId) -> Result<bool> {
        Ok(self.node(id)?.is_ready())
    }

    pub fn snapshot(&self, id: NodeId) -> Result<NodeSnapshot> {
        Ok(self.node(id)?.snapshot())
    }

    /// Register that `dependent` requires `dependency` to resolve first.
    pub fn depends_on(&self, dependent: NodeId, dependency: NodeId) -> Result<()> {
        let (dependent_node, dependency_node) = self.distinct_pair(dependent, dependency)?;

        let (mut dependent_state, mut dependency_state) = self.lock_pair(dependent, dependency);

        let duplicate = dependency_state
            .dependency_of
            .iter()
            .any(|id| self.nodes[id.0].name() == dependent_node.name());
        if duplicate {
            return Err(DepgraphError::DuplicateDependency {
                dependent: dependent_node.name().to_string(),
                dependency: dependency_node.name().to_string(),
            });
        }

        dependency_state.dependency_of.push(dependent);
        dependent_state.deps_remaining += 1;
        dependent_state.has_dependencies = true;

        debug!(
            dependent = %dependent_node.name(),
            dependency = %dependency_node.name(),
            deps_remaining = dependent_state.deps_remaining,
            "registered dependency"
        );
        Ok(())
    }

    /// Register several dependencies at once, stopping at the first error.
    ///
    /// The list itself is checked for repeated names before any edge is
    /// added.
    pub fn depends_on_list(&self, dependent: NodeId, dependencies: &[NodeId]) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for &dep in dependencies {
            let name = self.name(dep)?;
            if !seen.insert(name) {
                return Err(DepgraphError::DuplicateDependency {
                    dependent: self.name(dependent)?.to_string(),
                    dependency: name.to_string(),
                });
            }
        }

        for &dep in dependencies {
            self.depends_on(dependent, dep)?;
        }
        Ok(())
    }

    /// Like [`depends_on`](Self::depends_on), but first rejects the edge if
    /// it would close a cycle.
    ///
    /// The reachability check and the insertion are not atomic with respect
    /// to other concurrent edge registrations.
    pub fn depends_on_acyclic(&self, dependent: NodeId, dependency: NodeId) -> Result<()> {
        self.distinct_pair(dependent, dependency)?;
        if self.reaches(dependent, dependency)? {
            let name = self.name(dependency)?.to_string();
            let dependent_name = self.name(dependent)?;
            warn!(
                dependent = %dependent_name,
                dependency = %name,
                "rejecting edge that would create a cycle"
            );
            return Err(DepgraphError::CircularDependency(name));
        }
        self.depends_on(dependent, dependency)
    }

    /// Both nodes of an edge, rejecting an edge from a node to itself (same
    /// handle or same name).
    fn distinct_pair(&self, dependent: NodeId, dependency: NodeId) -> Result<(&Node, &Node)> {
        let dependent_node = self.node(dependent)?;
        let dependency_node = self.node(dependency)?;

        if dependent == dependency || dependent_node.name() == dependency_node.name() {
            return Err(DepgraphError::SelfDependency(
                dependent_node.name().to_string(),
            ));
        }
        Ok((dependent_node, dependency_node))
    }

    /// Whether `target` can be reached from `from` along dependency-of edges.
    fn reaches(&self, from: NodeId, target: NodeId) -> Result<bool> {
        let mut stack = vec![from];
        let mut visited: HashSet<NodeId> = HashSet::new();

        while let Some(id) = stack.pop() {
            if id == target {
                return Ok(true);
            }
            if visited.insert(id) {
                stack.extend(self.node(id)?.dependency_of());
            }
        }
        Ok(false)
    }

    /// Record that the node completed successfully.
    pub fn pass(&self, id: NodeId) -> Result<()> {
        self.resolve(id, NodeStatus::Passed)?;
        Ok(())
    }

    /// Record that the node failed and block everything downstream of it.
    pub fn fail(&self, id: NodeId) -> Result<()> {
        let dependents = self.resolve(id, NodeStatus::Failed)?;
        self.block_dependents(id, dependents)
    }

    /// Apply a terminal status exactly once and release one dependency slot
    /// on every direct dependent. Returns the direct dependents.
    fn resolve(&self, id: NodeId, outcome: NodeStatus) -> Result<Vec<NodeId>> {
        let node = self.node(id)?;

        let dependents = {
            let mut state = node.lock();
            if state.status.is_resolved() {
                return Err(DepgraphError::AlreadyResolved(node.name().to_string()));
            }
            state.status = outcome;
            state.dependency_of.clone()
        };

        debug!(node = %node.name(), status = ?outcome, "node resolved");

        for &dep in &dependents {
            let mut state = self.node(dep)?.lock();
            state.deps_remaining = state.deps_remaining.saturating_sub(1);
        }

        Ok(dependents)
    }

    /// Mark every node reachable from `origin`'s direct dependents as
    /// blocked.
    ///
    /// Returns `CircularDependency` if the walk leads back to `origin`; nodes
    /// blocked before that point stay blocked.
    fn block_dependents(&self, origin: NodeId, dependents: Vec<NodeId>) -> Result<()> {
        let origin_name = self.name(origin)?;

        let mut frontier = NodeStack::new();
        frontier.extend(dependents);

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(origin_name);

        while !frontier.is_empty() {
            let node = self.node(frontier.pop()?)?;

            if node.name() == origin_name {
                warn!(node = %origin_name, "failure propagated back to its origin");
                return Err(DepgraphError::CircularDependency(origin_name.to_string()));
            }

            if !visited.insert(node.name()) {
                continue;
            }

            let downstream = {
                let mut state = node.lock();
                state.blocked = true;
                state.dependency_of.clone()
            };
            debug!(node = %node.name(), failed = %origin_name, "blocked by upstream failure");

            for next in downstream {
                let name = self.name(next)?;
                if name == origin_name || !visited.contains(name) {
                    frontier.push(next);
                }
            }
        }

        Ok(())
    }

    /// Names of the nodes that directly depend on `id`.
    pub fn dependency_names(&self, id: NodeId) -> Result<Vec<String>> {
        self.node(id)?
            .dependency_of()
            .into_iter()
            .map(|dep| self.name(dep).map(str::to_string))
            .collect()
    }

    /// Lock two distinct nodes, lower handle first. Guards are returned in
    /// argument order.
    fn lock_pair(
        &self,
        first: NodeId,
        second: NodeId,
    ) -> (MutexGuard<'_, NodeState>, MutexGuard<'_, NodeState>) {
        debug_assert_ne!(first, second);
        if first < second {
            let a = self.nodes[first.0].lock();
            let b = self.nodes[second.0].lock();
            (a, b)
        } else {
            let b = self.nodes[second.0].lock();
            let a = self.nodes[first.0].lock();
            (a, b)
        }
    }
}
