use crate::graph::{EdgeDirection, TraversalOptions};
use crate::types::DependencyGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Gathers the entities affected by (or affecting) a set of seeds
///
/// The assembler shares the frozen graph and never mutates it.
#[derive(Debug, Clone)]
pub struct ImpactAssembler {
    graph: Arc<DependencyGraph>,
}

/// Entity reached from a seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub name: String,
    pub distance: usize,
    pub direction: EdgeDirection,
    pub relevance_score: f32,
}

/// Seeds that were found in the graph plus their ranked neighborhood
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    pub seeds: Vec<String>,
    pub related: Vec<RelatedEntity>,
    /// Requested seeds the graph does not know, deduplicated
    #[serde(default)]
    pub unknown_seeds: Vec<String>,
}

impl ImpactReport {
    /// Seeds followed by related names, in report order
    pub fn entity_names(&self) -> Vec<String> {
        self.seeds
            .iter()
            .cloned()
            .chain(self.related.iter().map(|r| r.name.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    pub total_entities: usize,
    pub total_edges: usize,
}

impl ImpactAssembler {
    pub fn new(graph: Arc<DependencyGraph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Expand every known seed with `options` and keep the `limit` most relevant
    /// non-seed entities. Unknown seeds are reported, not expanded.
    pub fn assemble<S: AsRef<str>>(
        &self,
        seeds: &[S],
        options: TraversalOptions,
        limit: usize,
    ) -> ImpactReport {
        let mut report = ImpactReport::default();
        for seed in seeds.iter().map(AsRef::as_ref) {
            if !self.graph.contains(seed) {
                if !report.unknown_seeds.iter().any(|s| s == seed) {
                    report.unknown_seeds.push(seed.to_string());
                }
                continue;
            }
            if !report.seeds.iter().any(|s| s == seed) {
                report.seeds.push(seed.to_string());
            }
        }

        // name -> position in `related`, to keep the best hop per entity
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut related: Vec<RelatedEntity> = Vec::new();
        for seed in &report.seeds {
            for hop in self.graph.walk(seed, options) {
                let name = self.graph.name_of(hop.node);
                if hop.distance == 0 || report.seeds.iter().any(|s| s == name) {
                    continue;
                }
                let candidate = RelatedEntity {
                    name: name.to_string(),
                    distance: hop.distance,
                    direction: hop.direction,
                    relevance_score: Self::calculate_relevance(hop.distance, hop.direction),
                };
                match positions.get(name) {
                    Some(&pos) if related[pos].relevance_score >= candidate.relevance_score => {}
                    Some(&pos) => related[pos] = candidate,
                    None => {
                        positions.insert(name.to_string(), related.len());
                        related.push(candidate);
                    }
                }
            }
        }

        // Stable sort: equal scores keep discovery order
        related.sort_by(|a, b| {
            b.relevance_score
                .partial_cmp(&a.relevance_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        related.truncate(limit);
        report.related = related;
        report
    }

    /// Closer is better; being used by a seed outranks using it.
    fn calculate_relevance(distance: usize, direction: EdgeDirection) -> f32 {
        let distance_score = 1.0 / (distance as f32 + 1.0);
        let direction_score = match direction {
            EdgeDirection::Dependency => 1.0,
            EdgeDirection::Dependent => 0.7,
        };
        distance_score * direction_score
    }

    pub fn get_stats(&self) -> GraphStats {
        GraphStats {
            total_entities: self.graph.entity_count(),
            total_edges: self.graph.edge_count(),
        }
    }
}
