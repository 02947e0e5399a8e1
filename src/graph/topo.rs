use super::DependencyGraph;
use crate::error::ScheduleError;
use petgraph::graph::NodeIndex;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::{debug, warn};

/// Order activities so every dependency precedes its dependents (Kahn's algorithm).
///
/// Among activities that become ready at the same time, the one that appears
/// first in the input comes first, which makes the order deterministic.
///
/// # Errors
/// `ScheduleError::CycleDetected` when some activities can never become ready;
/// the error names the activities of one concrete cycle.
pub fn topological_order(graph: &DependencyGraph<'_>) -> Result<Vec<NodeIndex>, ScheduleError> {
    // in-degree = number of unresolved dependencies still blocking a node
    let mut in_degree: Vec<usize> = graph.node_indices().map(|ix| graph.in_degree(ix)).collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = graph
        .node_indices()
        .filter(|ix| in_degree[ix.index()] == 0)
        .map(Reverse)
        .collect();

    let mut order: Vec<NodeIndex> = Vec::with_capacity(graph.len());

    while let Some(Reverse(node_ix)) = ready.pop() {
        order.push(node_ix);
        for dependent_ix in graph.dependents(node_ix) {
            let degree = &mut in_degree[dependent_ix.index()];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse(dependent_ix));
            }
        }
    }

    if order.len() < graph.len() {
        let cycle = find_cycle(graph, &in_degree);
        warn!(cycle = ?cycle, "circular dependency detected");
        return Err(ScheduleError::CycleDetected { cycle });
    }

    debug!(nodes = order.len(), "topological order computed");
    Ok(order)
}

/// Walks dependency edges among the nodes Kahn's algorithm could not release.
///
/// Every such node still has at least one unreleased dependency, so the walk
/// must eventually revisit a node; the revisited stretch is a cycle.
fn find_cycle(graph: &DependencyGraph<'_>, in_degree: &[usize]) -> Vec<String> {
    let blocked = |ix: &NodeIndex| in_degree[ix.index()] > 0;

    let Some(mut current) = graph.node_indices().find(|ix| blocked(ix)) else {
        return Vec::new();
    };

    let mut path: Vec<NodeIndex> = Vec::new();
    let mut seen_at: HashMap<NodeIndex, usize> = HashMap::new();

    loop {
        if let Some(&start) = seen_at.get(&current) {
            // path runs dependent -> dependency; flip it to dependency order
            let mut cycle: Vec<NodeIndex> = path[start..].iter().rev().copied().collect();
            if let Some(first) = cycle
                .iter()
                .enumerate()
                .min_by_key(|(_, ix)| **ix)
                .map(|(pos, _)| pos)
            {
                cycle.rotate_left(first);
            }
            return cycle
                .into_iter()
                .map(|ix| graph.activity(ix).name.clone())
                .collect();
        }

        seen_at.insert(current, path.len());
        path.push(current);

        match graph.dependencies(current).filter(|ix| blocked(ix)).min() {
            Some(next) => current = next,
            None => return Vec::new(),
        }
    }
}
