pub mod dependency_graph;
pub mod topo;

pub use dependency_graph::DependencyGraph;
pub use topo::topological_order;
