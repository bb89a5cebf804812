//! # Context Planner
//!
//! Query understanding for retrieval: classify a free-text question about a
//! codebase and derive a bounded [`SearchPlan`].
//!
//! ## Pipeline
//!
//! ```text
//! query
//!   ├─ facets        (question form, architecture/config/debug vocabulary)
//!   ├─ intent        (strict priority, constant confidence)
//!   ├─ complexity    (token count, conjunctions)
//!   ├─ entities      (suffixed types, verb-prefixed methods, technical terms)
//!   ├─ keywords      (stop-word filtered)
//!   ├─ strategy      (intent table) ──> top_k / max_hops / reverse deps
//!   ├─ starting files (entities, then query hints; none => similarity_search)
//!   └─ token budget  (complexity base, strategy ceiling)
//! ```

mod analysis;
mod error;
mod extract;
mod plan;
mod planner;
mod strategy;
mod vocabulary;

pub use analysis::{
    Complexity, Intent, QueryAnalysis, QueryFacets, HIGH_COMPLEXITY_TOKENS,
    MEDIUM_COMPLEXITY_TOKENS,
};
pub use error::{PlannerError, Result};
pub use extract::{
    extract_keywords, EntityExtractor, PatternEntityExtractor, MAX_ENTITIES, MAX_KEYWORDS,
};
pub use plan::SearchPlan;
pub use planner::{plan_query, QueryPlanner};
pub use strategy::{
    SearchStrategy, StrategyParams, BASE_TOKEN_BUDGET, HIGH_COMPLEXITY_TOKEN_BUDGET,
    LOW_COMPLEXITY_TOKEN_BUDGET, MAX_HOPS_LIMIT,
};
pub use vocabulary::{FacetTerms, StartingFileHint, Vocabulary};
