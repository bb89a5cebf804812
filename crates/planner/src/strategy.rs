use crate::analysis::{Complexity, Intent};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on graph hops for any plan
pub const MAX_HOPS_LIMIT: usize = 3;
/// `Low` complexity never narrows `top_k` below this
pub const MIN_NARROWED_TOP_K: usize = 2;

pub const BASE_TOKEN_BUDGET: usize = 7000;
pub const HIGH_COMPLEXITY_TOKEN_BUDGET: usize = 6000;
pub const LOW_COMPLEXITY_TOKEN_BUDGET: usize = 5000;

/// Named retrieval policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    ErrorTrace,
    DependencyGraph,
    MethodFocused,
    ConfigurationChain,
    EntityCentered,
    SimilaritySearch,
}

/// Retrieval bounds fixed by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyParams {
    pub top_k: usize,
    pub max_hops: usize,
    pub include_reverse_deps: bool,
}

impl StrategyParams {
    const fn new(top_k: usize, max_hops: usize, include_reverse_deps: bool) -> Self {
        Self {
            top_k,
            max_hops,
            include_reverse_deps,
        }
    }

    /// Widen for `High`, narrow for `Low`, keep for `Medium`.
    #[must_use]
    pub fn adjusted_for(self, complexity: Complexity) -> Self {
        match complexity {
            Complexity::High => Self {
                top_k: self.top_k + 2,
                max_hops: (self.max_hops + 1).min(MAX_HOPS_LIMIT),
                ..self
            },
            Complexity::Low => Self {
                top_k: self.top_k.saturating_sub(1).max(MIN_NARROWED_TOP_K),
                ..self
            },
            Complexity::Medium => self,
        }
    }
}

impl SearchStrategy {
    /// Direct intent mapping; intents without a dedicated strategy go entity-first
    /// when the query names entities.
    #[must_use]
    pub const fn for_intent(intent: Intent, has_entities: bool) -> Self {
        match intent {
            Intent::Debug => SearchStrategy::ErrorTrace,
            Intent::Architecture => SearchStrategy::DependencyGraph,
            Intent::Implementation => SearchStrategy::MethodFocused,
            Intent::Config => SearchStrategy::ConfigurationChain,
            Intent::Code | Intent::Tools | Intent::General if has_entities => {
                SearchStrategy::EntityCentered
            }
            Intent::Code | Intent::Tools | Intent::General => SearchStrategy::SimilaritySearch,
        }
    }

    #[must_use]
    pub const fn base_params(self) -> StrategyParams {
        match self {
            SearchStrategy::DependencyGraph => StrategyParams::new(5, 3, true),
            SearchStrategy::EntityCentered => StrategyParams::new(3, 2, false),
            SearchStrategy::MethodFocused => StrategyParams::new(4, 1, false),
            SearchStrategy::ErrorTrace => StrategyParams::new(6, 2, true),
            SearchStrategy::ConfigurationChain => StrategyParams::new(4, 2, false),
            SearchStrategy::SimilaritySearch => StrategyParams::new(3, 1, false),
        }
    }

    /// Strategy-specific cap on the token budget
    #[must_use]
    pub const fn token_ceiling(self) -> Option<usize> {
        match self {
            SearchStrategy::DependencyGraph => Some(6500),
            SearchStrategy::MethodFocused => Some(4000),
            SearchStrategy::ErrorTrace => Some(5500),
            SearchStrategy::ConfigurationChain
            | SearchStrategy::EntityCentered
            | SearchStrategy::SimilaritySearch => None,
        }
    }

    /// Complexity-based budget clipped to this strategy's ceiling
    #[must_use]
    pub fn token_budget(self, complexity: Complexity) -> usize {
        let budget = match complexity {
            Complexity::High => HIGH_COMPLEXITY_TOKEN_BUDGET,
            Complexity::Low => LOW_COMPLEXITY_TOKEN_BUDGET,
            Complexity::Medium => BASE_TOKEN_BUDGET,
        };
        match self.token_ceiling() {
            Some(ceiling) => budget.min(ceiling),
            None => budget,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchStrategy::ErrorTrace => "error_trace",
            SearchStrategy::DependencyGraph => "dependency_graph",
            SearchStrategy::MethodFocused => "method_focused",
            SearchStrategy::ConfigurationChain => "configuration_chain",
            SearchStrategy::EntityCentered => "entity_centered",
            SearchStrategy::SimilaritySearch => "similarity_search",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_mapping() {
        assert_eq!(
            SearchStrategy::for_intent(Intent::Debug, false),
            SearchStrategy::ErrorTrace
        );
        assert_eq!(
            SearchStrategy::for_intent(Intent::Config, true),
            SearchStrategy::ConfigurationChain
        );
        assert_eq!(
            SearchStrategy::for_intent(Intent::Code, true),
            SearchStrategy::EntityCentered
        );
        assert_eq!(
            SearchStrategy::for_intent(Intent::Tools, false),
            SearchStrategy::SimilaritySearch
        );
    }

    #[test]
    fn complexity_adjusts_params() {
        let graph = SearchStrategy::DependencyGraph.base_params();
        let high = graph.adjusted_for(Complexity::High);
        assert_eq!((high.top_k, high.max_hops), (7, 3));

        let entity_high = SearchStrategy::EntityCentered
            .base_params()
            .adjusted_for(Complexity::High);
        assert_eq!((entity_high.top_k, entity_high.max_hops), (5, 3));

        let similarity_low = SearchStrategy::SimilaritySearch
            .base_params()
            .adjusted_for(Complexity::Low);
        assert_eq!(similarity_low.top_k, 2);
        assert_eq!(graph.adjusted_for(Complexity::Medium), graph);
    }

    #[test]
    fn budgets_respect_ceilings() {
        assert_eq!(
            SearchStrategy::DependencyGraph.token_budget(Complexity::Medium),
            6500
        );
        assert_eq!(
            SearchStrategy::MethodFocused.token_budget(Complexity::High),
            4000
        );
        assert_eq!(SearchStrategy::ErrorTrace.token_budget(Complexity::Low), 5000);
        assert_eq!(
            SearchStrategy::SimilaritySearch.token_budget(Complexity::Medium),
            7000
        );
        assert_eq!(
            SearchStrategy::ConfigurationChain.token_budget(Complexity::High),
            6000
        );
    }

    #[test]
    fn serializes_as_snake_case_names() {
        let json = serde_json::to_string(&SearchStrategy::ConfigurationChain).expect("json");
        assert_eq!(json, "\"configuration_chain\"");
        assert_eq!(SearchStrategy::ErrorTrace.to_string(), "error_trace");
    }
}
