use crate::analysis::{Complexity, Intent};
use crate::strategy::SearchStrategy;
use serde::{Deserialize, Serialize};

/// Bounded retrieval plan for one query.
///
/// Built once by [`QueryPlanner`](crate::QueryPlanner) and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPlan {
    pub original_query: String,
    pub intent: Intent,
    pub confidence: f32,
    pub complexity: Complexity,
    pub search_strategy: SearchStrategy,
    /// Up to 8 distinct entities, first-seen order
    pub target_entities: Vec<String>,
    /// Up to 6 distinct non-stop-words, first-seen order
    pub search_keywords: Vec<String>,
    /// Inferred `<Entity>.<ext>` file names
    pub starting_files: Vec<String>,
    pub top_k: usize,
    pub max_hops: usize,
    pub include_reverse_deps: bool,
    pub token_budget: usize,
}

impl SearchPlan {
    /// Starting files with their extension removed, i.e. graph entity names
    pub fn starting_entities(&self) -> Vec<String> {
        self.starting_files
            .iter()
            .map(|file| match file.rsplit_once('.') {
                Some((stem, _)) if !stem.is_empty() => stem.to_string(),
                _ => file.clone(),
            })
            .collect()
    }
}
