// src/dag/mod.rs

//! Dependency graph core.
//!
//! - [`node`] defines a single node, its status and its guarded state.
//! - [`graph`] holds the node arena and the state transitions: edge
//!   registration, `pass`, and `fail` with blocking propagation.
//! - [`traversal`] contains root discovery and depth stepping.
//! - [`node_stack`] is the LIFO used while propagating failures.

pub mod graph;
pub(crate) mod node_stack;
pub mod node;
pub mod traversal;

pub use graph::DepGraph;
pub use node::{Node, NodeId, NodeSnapshot, NodeStatus};
pub use traversal::{node_names, root_dependencies, step};
