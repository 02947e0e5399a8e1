use crate::activity::Activity;
use crate::config::UnresolvedDependencyPolicy;
use crate::error::ScheduleError;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Validated dependency graph over a slice of activities.
///
/// Node `i` carries the position of its activity in the input slice, so
/// `NodeIndex::index()` doubles as the input order. Edges point from a
/// dependency to its dependent.
pub struct DependencyGraph<'a> {
    activities: &'a [Activity],
    graph: DiGraph<usize, ()>,
    name_to_index: HashMap<&'a str, NodeIndex>,
}

impl<'a> DependencyGraph<'a> {
    pub fn build(
        activities: &'a [Activity],
        policy: UnresolvedDependencyPolicy,
    ) -> Result<Self, ScheduleError> {
        let mut graph: DiGraph<usize, ()> =
            DiGraph::with_capacity(activities.len(), activities.len());
        let mut name_to_index: HashMap<&'a str, NodeIndex> =
            HashMap::with_capacity(activities.len());

        // Add nodes first
        for (position, activity) in activities.iter().enumerate() {
            let node_ix = graph.add_node(position);
            if name_to_index.insert(activity.name.as_str(), node_ix).is_some() {
                return Err(ScheduleError::DuplicateActivityName {
                    name: activity.name.clone(),
                });
            }
        }

        // Add edges: dependency -> dependent
        for (position, activity) in activities.iter().enumerate() {
            let dependent_ix = NodeIndex::new(position);
            for dependency in &activity.dependencies {
                if dependency == &activity.name {
                    return Err(ScheduleError::SelfDependency {
                        activity: activity.name.clone(),
                    });
                }
                match name_to_index.get(dependency.as_str()) {
                    // update_edge collapses repeated references to one edge
                    Some(&dependency_ix) => {
                        graph.update_edge(dependency_ix, dependent_ix, ());
                    }
                    None => match policy {
                        UnresolvedDependencyPolicy::Reject => {
                            warn!(
                                activity = %activity.name,
                                dependency = %dependency,
                                "unresolved dependency reference"
                            );
                            return Err(ScheduleError::UnresolvedDependency {
                                activity: activity.name.clone(),
                                dependency: dependency.clone(),
                            });
                        }
                        UnresolvedDependencyPolicy::Ignore => {
                            warn!(
                                activity = %activity.name,
                                dependency = %dependency,
                                "dropping unresolved dependency reference"
                            );
                        }
                    },
                }
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency graph"
        );

        Ok(Self {
            activities,
            graph,
            name_to_index,
        })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn activity(&self, node_ix: NodeIndex) -> &'a Activity {
        &self.activities[self.graph[node_ix]]
    }

    pub fn activities(&self) -> &'a [Activity] {
        self.activities
    }

    pub fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.name_to_index.get(name).copied()
    }

    /// Resolved, de-duplicated predecessors of `node_ix`.
    pub fn dependencies(&self, node_ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node_ix, Direction::Incoming)
    }

    /// Activities that list `node_ix` as a dependency.
    pub fn dependents(&self, node_ix: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(node_ix, Direction::Outgoing)
    }

    pub fn in_degree(&self, node_ix: NodeIndex) -> usize {
        self.dependencies(node_ix).count()
    }
}
