// tests/graph_properties.rs

use std::collections::HashSet;

use proptest::prelude::*;

use depgraph::dag::{DepGraph, NodeId, NodeStatus, root_dependencies, step};

/// Random DAG as a list of dependency lists. Node `i` may only depend on
/// nodes `0..i`, which keeps the graph acyclic.
fn dag_strategy(max_nodes: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_nodes).prop_flat_map(|num_nodes| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_nodes),
            num_nodes,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let mut deps: Vec<usize> = potential
                        .into_iter()
                        .filter(|_| i > 0)
                        .map(|d| d % i.max(1))
                        .collect::<HashSet<_>>()
                        .into_iter()
                        .collect();
                    deps.sort_unstable();
                    deps
                })
                .collect()
        })
    })
}

fn build(deps: &[Vec<usize>]) -> (DepGraph, Vec<NodeId>) {
    let mut graph = DepGraph::new();
    let ids: Vec<NodeId> = (0..deps.len())
        .map(|i| graph.add_node(format!("n{i}")).unwrap())
        .collect();
    for (i, list) in deps.iter().enumerate() {
        let list: Vec<NodeId> = list.iter().map(|&d| ids[d]).collect();
        graph.depends_on_list(ids[i], &list).unwrap();
    }
    (graph, ids)
}

/// Whether any transitive dependency of `node` is in `failing`.
fn has_failed_ancestor(deps: &[Vec<usize>], node: usize, failing: &HashSet<usize>) -> bool {
    let mut stack = deps[node].clone();
    let mut seen = HashSet::new();
    while let Some(d) = stack.pop() {
        if !seen.insert(d) {
            continue;
        }
        if failing.contains(&d) {
            return true;
        }
        stack.extend(deps[d].iter().copied());
    }
    false
}

proptest! {
    #[test]
    fn stepping_resolves_or_blocks_every_node(
        deps in dag_strategy(12),
        failing_raw in proptest::collection::vec(0..12usize, 0..4),
    ) {
        let (graph, ids) = build(&deps);
        let failing: HashSet<usize> = failing_raw.into_iter().filter(|&i| i < ids.len()).collect();

        let mut frontier = root_dependencies(&graph, &ids).unwrap();
        let mut ran = HashSet::new();

        while !frontier.is_empty() {
            let mut unique = Vec::new();
            for id in frontier {
                if ran.insert(id) {
                    unique.push(id);
                }
            }

            for &id in &unique {
                if failing.contains(&id.index()) {
                    graph.fail(id).unwrap();
                } else {
                    graph.pass(id).unwrap();
                }
            }
            frontier = step(&graph, &unique).unwrap();

            // No node is ever offered again once it has run.
            for id in &frontier {
                prop_assert!(!ran.contains(id), "node {} offered twice", id);
            }
        }

        for (i, &id) in ids.iter().enumerate() {
            let snap = graph.snapshot(id).unwrap();
            let blocked_expected = has_failed_ancestor(&deps, i, &failing);

            prop_assert_eq!(snap.blocked, blocked_expected, "blocked flag of n{}", i);
            if blocked_expected {
                prop_assert_eq!(snap.status, NodeStatus::Unresolved);
            } else {
                prop_assert!(snap.status.is_resolved(), "n{} never ran", i);
                prop_assert_eq!(snap.deps_remaining, 0);
            }
        }
    }

    #[test]
    fn every_edge_decrements_exactly_once(deps in dag_strategy(10)) {
        let (graph, ids) = build(&deps);

        for (i, list) in deps.iter().enumerate() {
            prop_assert_eq!(graph.deps_remaining(ids[i]).unwrap(), list.len());
            prop_assert_eq!(graph.snapshot(ids[i]).unwrap().has_dependencies, !list.is_empty());
        }

        for &id in &ids {
            graph.pass(id).unwrap();
        }

        for &id in &ids {
            prop_assert_eq!(graph.deps_remaining(id).unwrap(), 0);
        }
    }
}
