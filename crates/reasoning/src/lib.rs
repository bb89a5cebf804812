//! # Context Reasoning
//!
//! Request-scoped state shared by the stages ("brains") of one request.
//!
//! ## Request lifecycle
//!
//! ```text
//! RequestScope::begin ──> RequestTrace (id, start time)
//!        │
//!        ├─ QueryPlanner ───────────> SearchPlan ──┐
//!        ├─ ToolCandidateFinder ───> ReasoningState ├─> ReasoningContext
//!        ├─ ImpactAssembler ───────> impact names ──┘        │
//!        │                                                   v
//!        │                                        downstream stages
//!        v
//! drop(RequestScope) ──> RequestTrace::clear + ReasoningContext::clear
//! ```
//!
//! Trace and context live in thread-local slots: concurrent requests on different
//! threads never see each other's data, while consecutive requests on one thread
//! do unless the first one is cleared.

mod context;
mod error;
mod pipeline;
mod scope;
mod state;
mod tools;
mod trace;

pub use context::ReasoningContext;
pub use error::{ReasoningError, Result};
pub use pipeline::{
    PreparedRequest, RetrievalPipeline, IMPACT_ENTITIES_KEY, IMPACT_FANOUT, SEARCH_PLAN_KEY,
};
pub use scope::RequestScope;
pub use state::ReasoningState;
pub use tools::{
    SearchMatch, SimilaritySearch, ToolCandidateFinder, DEFAULT_TOOL_CANDIDATES, TOOL_NAME_KEY,
};
pub use trace::{RequestTrace, UNTRACED_ID};
