use crate::types::DependencyGraph;
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Which way an edge was followed to reach an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    /// Reached along an out-edge: the entity is used by its predecessor
    Dependency,

    /// Reached along an in-edge: the entity uses its predecessor
    Dependent,
}

/// Bounds for an impact-radius traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Hops beyond which nodes are no longer expanded
    pub max_depth: usize,

    /// Hard cap on collected nodes, start node included
    pub max_nodes: usize,

    /// Also follow in-edges
    pub include_reverse: bool,
}

impl TraversalOptions {
    #[must_use]
    pub const fn new(max_depth: usize, max_nodes: usize) -> Self {
        Self {
            max_depth,
            max_nodes,
            include_reverse: false,
        }
    }

    #[must_use]
    pub const fn with_reverse(mut self, include_reverse: bool) -> Self {
        self.include_reverse = include_reverse;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Hop {
    pub node: NodeIndex,
    pub distance: usize,
    pub direction: EdgeDirection,
}

impl DependencyGraph {
    /// Out-edges of `name` in insertion order; empty for unknown names.
    pub fn neighbors(&self, name: &str) -> Vec<String> {
        self.adjacent(name, Direction::Outgoing)
    }

    /// In-edges of `name` in insertion order; empty for unknown names.
    pub fn dependents(&self, name: &str) -> Vec<String> {
        self.adjacent(name, Direction::Incoming)
    }

    /// Breadth-first neighborhood of `name`, `name` first.
    ///
    /// Nodes deeper than `max_depth` hops are not expanded and the whole walk stops
    /// once `max_nodes` names are collected. Unknown or empty names yield nothing.
    pub fn impact_radius(&self, name: &str, max_depth: usize, max_nodes: usize) -> Vec<String> {
        self.impact_radius_with(name, TraversalOptions::new(max_depth, max_nodes))
    }

    pub fn impact_radius_with(&self, name: &str, options: TraversalOptions) -> Vec<String> {
        self.walk(name, options)
            .into_iter()
            .map(|hop| self.name_of(hop.node).to_string())
            .collect()
    }

    pub(crate) fn walk(&self, name: &str, options: TraversalOptions) -> Vec<Hop> {
        let Some(start) = self.find_node(name) else {
            return Vec::new();
        };
        if options.max_nodes == 0 {
            return Vec::new();
        }

        let mut visited = HashSet::from([start]);
        let mut queue = VecDeque::from([Hop {
            node: start,
            distance: 0,
            direction: EdgeDirection::Dependency,
        }]);
        let mut result = Vec::new();

        while let Some(hop) = queue.pop_front() {
            result.push(hop);
            if result.len() >= options.max_nodes {
                break;
            }
            if hop.distance >= options.max_depth {
                continue;
            }

            let mut expand = |next: NodeIndex, direction: EdgeDirection| {
                if visited.insert(next) {
                    queue.push_back(Hop {
                        node: next,
                        distance: hop.distance + 1,
                        direction,
                    });
                }
            };
            for next in self.ordered(hop.node, Direction::Outgoing) {
                expand(next, EdgeDirection::Dependency);
            }
            if options.include_reverse {
                for next in self.ordered(hop.node, Direction::Incoming) {
                    expand(next, EdgeDirection::Dependent);
                }
            }
        }

        result
    }

    fn adjacent(&self, name: &str, direction: Direction) -> Vec<String> {
        let Some(node) = self.find_node(name) else {
            return Vec::new();
        };
        self.ordered(node, direction)
            .into_iter()
            .map(|idx| self.name_of(idx).to_string())
            .collect()
    }

    /// petgraph lists adjacent nodes newest-first; flip to insertion order.
    fn ordered(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut nodes: Vec<NodeIndex> = self.graph.neighbors_directed(node, direction).collect();
        nodes.reverse();
        nodes
    }
}
