use crate::analysis::{Complexity, QueryAnalysis};
use crate::error::Result;
use crate::extract::{
    extract_keywords, push_unique, EntityExtractor, PatternEntityExtractor, MAX_ENTITIES,
};
use crate::plan::SearchPlan;
use crate::strategy::SearchStrategy;
use crate::vocabulary::Vocabulary;

/// Entity fragments that mark an entity as naming a source file of its own
const FILE_BEARING_MARKERS: [&str; 3] = ["service", "config", "controller"];

/// Turns a free-text query into a [`SearchPlan`].
///
/// Planning is pure: the same query always yields the same plan.
pub struct QueryPlanner {
    vocabulary: Vocabulary,
    extractor: Box<dyn EntityExtractor>,
}

impl QueryPlanner {
    pub fn new() -> Self {
        Self {
            vocabulary: Vocabulary::builtin(),
            extractor: Box::new(PatternEntityExtractor::builtin()),
        }
    }

    /// Planner over a custom vocabulary; entity patterns are compiled from it.
    pub fn with_vocabulary(vocabulary: Vocabulary) -> Result<Self> {
        vocabulary.validate()?;
        let extractor = PatternEntityExtractor::from_vocabulary(&vocabulary)?;
        Ok(Self {
            vocabulary,
            extractor: Box::new(extractor),
        })
    }

    #[must_use]
    pub fn with_extractor(mut self, extractor: impl EntityExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn analyze(&self, query: &str) -> QueryAnalysis {
        QueryAnalysis::analyze(query, &self.vocabulary)
    }

    /// Never fails; degenerate queries produce a `GENERAL`/`similarity_search` plan.
    pub fn create_search_plan(&self, query: &str) -> SearchPlan {
        let analysis = self.analyze(query);

        let mut target_entities = Vec::new();
        for entity in self.extractor.extract(query) {
            push_unique(&mut target_entities, entity, MAX_ENTITIES);
        }
        let search_keywords = extract_keywords(query, &self.vocabulary.stop_words);

        let mut strategy = SearchStrategy::for_intent(analysis.intent, !target_entities.is_empty());
        let params = strategy.base_params().adjusted_for(analysis.complexity);

        let starting_files = self.starting_files(query, &target_entities);
        if starting_files.is_empty() {
            strategy = SearchStrategy::SimilaritySearch;
        }

        SearchPlan {
            original_query: query.to_string(),
            intent: analysis.intent,
            confidence: analysis.confidence,
            complexity: analysis.complexity,
            search_strategy: strategy,
            target_entities,
            search_keywords,
            starting_files,
            top_k: params.top_k,
            max_hops: params.max_hops,
            include_reverse_deps: params.include_reverse_deps,
            token_budget: strategy.token_budget(analysis.complexity),
        }
    }

    /// File-bearing entities first; otherwise fall back to query hint rules.
    fn starting_files(&self, query: &str, entities: &[String]) -> Vec<String> {
        let ext = self.vocabulary.source_extension.trim();
        let mut files = Vec::new();

        for entity in entities {
            let lowered = entity.to_lowercase();
            if FILE_BEARING_MARKERS.iter().any(|m| lowered.contains(*m)) {
                push_unique(&mut files, format!("{entity}.{ext}"), usize::MAX);
            }
        }
        if !files.is_empty() {
            return files;
        }

        let lowered = query.to_lowercase();
        for hint in &self.vocabulary.starting_file_hints {
            if hint.matches(&lowered) {
                push_unique(&mut files, format!("{}.{ext}", hint.entity), usize::MAX);
            }
        }
        files
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Shorthand for callers that only need the builtin planner
pub fn plan_query(query: &str) -> SearchPlan {
    QueryPlanner::new().create_search_plan(query)
}
