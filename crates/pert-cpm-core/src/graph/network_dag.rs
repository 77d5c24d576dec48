use crate::activity::Activity;
use crate::error::ScheduleError;
use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

/// Dependency graph over an activity list. Node `i` carries activity index `i`;
/// edges run from a dependency to its dependent.
pub struct NetworkDag {
    pub graph: DiGraph<usize, ()>,
}

impl NetworkDag {
    pub fn build(activities: &[Activity]) -> Result<Self, ScheduleError> {
        let edge_count = activities.iter().map(|a| a.dependencies().len()).sum();
        let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(activities.len(), edge_count);

        // Add nodes first
        for idx in 0..activities.len() {
            graph.add_node(idx);
        }

        // Add edges: dependency -> activity
        for (idx, activity) in activities.iter().enumerate() {
            for dependency in activity.dependencies() {
                if dependency.index() >= activities.len() {
                    return Err(ScheduleError::DependencyNotFound {
                        activity: activity.name().to_string(),
                        dependency: dependency.to_string(),
                    });
                }
                graph.add_edge(NodeIndex::new(dependency.index()), NodeIndex::new(idx), ());
            }
        }

        Ok(Self { graph })
    }

    /// Activity indices ordered so every dependency precedes its dependents.
    pub fn topological_order(&self, activities: &[Activity]) -> Result<Vec<usize>, ScheduleError> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix]).collect())
            .map_err(|cycle| ScheduleError::Cycle {
                activity: activities[self.graph[cycle.node_id()]].name().to_string(),
            })
    }

    pub fn predecessors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(idx), Direction::Incoming)
            .map(|ix| self.graph[ix])
    }

    pub fn successors(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(idx), Direction::Outgoing)
            .map(|ix| self.graph[ix])
    }

    /// Activities nothing depends on, in input order.
    pub fn sinks(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.graph.node_count()).filter(|&idx| self.successors(idx).next().is_none())
    }
}
