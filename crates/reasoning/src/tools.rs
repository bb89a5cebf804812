use crate::context::ReasoningContext;
use crate::error::{ReasoningError, Result};
use crate::state::ReasoningState;
use crate::trace::RequestTrace;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Metadata key carrying the tool label of a match
pub const TOOL_NAME_KEY: &str = "toolName";

/// Number of candidates requested per prompt
pub const DEFAULT_TOOL_CANDIDATES: usize = 3;

/// One hit returned by a [`SimilaritySearch`] backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub metadata: HashMap<String, Value>,
    #[serde(default)]
    pub score: Option<f32>,
}

impl SearchMatch {
    /// Match whose metadata names `tool`
    pub fn for_tool(tool: impl Into<String>) -> Self {
        let mut metadata = HashMap::new();
        metadata.insert(TOOL_NAME_KEY.to_string(), Value::String(tool.into()));
        Self {
            metadata,
            score: None,
        }
    }

    #[must_use]
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.metadata.get(TOOL_NAME_KEY).and_then(Value::as_str)
    }
}

/// External similarity index over tool descriptions.
///
/// Results come back best-first. Retry and timeout policy belong to the
/// implementation; the finder calls it once per prompt.
pub trait SimilaritySearch: Send + Sync {
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<SearchMatch>>;
}

impl<T: SimilaritySearch + ?Sized> SimilaritySearch for Arc<T> {
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<SearchMatch>> {
        (**self).search(query, top_k)
    }
}

impl<T: SimilaritySearch + ?Sized> SimilaritySearch for Box<T> {
    fn search(&self, query: &str, top_k: usize) -> anyhow::Result<Vec<SearchMatch>> {
        (**self).search(query, top_k)
    }
}

/// Ranks tool candidates for a prompt and records them in the request's
/// [`ReasoningState`]
pub struct ToolCandidateFinder<S> {
    index: S,
    top_k: usize,
}

impl<S: SimilaritySearch> ToolCandidateFinder<S> {
    pub fn new(index: S) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOOL_CANDIDATES,
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Tool names for `prompt` in the index's ranking order.
    ///
    /// Installs a new [`ReasoningState`] seeded with `prompt`, replacing any
    /// earlier state of this request. On search failure nothing is installed.
    pub fn find_tools_for(&self, prompt: &str) -> Result<Vec<String>> {
        let matches = self
            .index
            .search(prompt, self.top_k)
            .map_err(|e| ReasoningError::SearchFailed(format!("{e:#}")))?;

        let mut tools = Vec::with_capacity(matches.len().min(self.top_k));
        for hit in matches.iter().take(self.top_k) {
            match hit.tool_name() {
                Some(name) => tools.push(name.to_string()),
                None => log::warn!(
                    "[trace={}] similarity match without {TOOL_NAME_KEY} metadata skipped",
                    RequestTrace::id()
                ),
            }
        }

        let mut state = ReasoningState::new(prompt);
        state.set_suggested_tools(tools.clone());
        ReasoningContext::set_state(state);

        log::debug!(
            "[trace={}] suggested tools: {:?}",
            RequestTrace::id(),
            tools
        );
        Ok(tools)
    }
}
