// src/dag/node_stack.rs

//! Mutex-guarded LIFO of node handles used by failure propagation.

use std::sync::{Mutex, PoisonError};

use crate::dag::NodeId;
use crate::errors::{DepgraphError, Result};

#[derive(Debug, Default)]
pub(crate) struct NodeStack {
    inner: Mutex<Vec<NodeId>>,
}

impl NodeStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, id: NodeId) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(id);
    }

    pub(crate) fn pop(&self) -> Result<NodeId> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or(DepgraphError::EmptyStack)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Extend<NodeId> for NodeStack {
    fn extend<I: IntoIterator<Item = NodeId>>(&mut self, iter: I) {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_lifo_order() {
        let stack = NodeStack::new();
        stack.push(NodeId(1));
        stack.push(NodeId(2));
        stack.push(NodeId(3));

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.pop().unwrap(), NodeId(3));
        assert_eq!(stack.pop().unwrap(), NodeId(2));
        assert_eq!(stack.pop().unwrap(), NodeId(1));
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_stack_is_an_error() {
        let stack = NodeStack::new();
        assert!(matches!(stack.pop(), Err(DepgraphError::EmptyStack)));
    }

    #[test]
    fn extend_pushes_in_iteration_order() {
        let mut stack = NodeStack::new();
        stack.extend([NodeId(4), NodeId(5)]);
        assert_eq!(stack.pop().unwrap(), NodeId(5));
    }
}
