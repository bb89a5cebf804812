use crate::context::ReasoningContext;
use crate::error::Result;
use crate::tools::{SimilaritySearch, ToolCandidateFinder};
use crate::trace::RequestTrace;
use context_graph::{DependencyGraph, ImpactAssembler, ImpactReport, TraversalOptions};
use context_planner::{QueryPlanner, SearchPlan};
use std::sync::Arc;

/// Context key holding the serialized [`SearchPlan`]
pub const SEARCH_PLAN_KEY: &str = "search_plan";
/// Context key holding the ordered impact entity names
pub const IMPACT_ENTITIES_KEY: &str = "impact_entities";
/// Traversal node cap per seed, as a multiple of the plan's `top_k`
pub const IMPACT_FANOUT: usize = 4;

/// Everything the planning stages produced for one request
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub trace_id: String,
    pub plan: SearchPlan,
    pub tools: Vec<String>,
    pub impact: ImpactReport,
}

/// Runs the planning half of a request: plan, tool candidates, impact radius.
///
/// Results are published into the [`ReasoningContext`] of the calling thread for
/// downstream stages. The pipeline never clears the context; the caller owns the
/// request boundary (see [`RequestScope`](crate::RequestScope)).
pub struct RetrievalPipeline<S> {
    planner: QueryPlanner,
    finder: ToolCandidateFinder<S>,
    assembler: ImpactAssembler,
}

impl<S: SimilaritySearch> RetrievalPipeline<S> {
    pub fn new(
        planner: QueryPlanner,
        finder: ToolCandidateFinder<S>,
        graph: Arc<DependencyGraph>,
    ) -> Self {
        Self {
            planner,
            finder,
            assembler: ImpactAssembler::new(graph),
        }
    }

    pub fn graph(&self) -> &DependencyGraph {
        self.assembler.graph()
    }

    pub fn prepare(&self, query: &str) -> Result<PreparedRequest> {
        let plan = self.planner.create_search_plan(query);
        let tools = self.finder.find_tools_for(query)?;

        let mut seeds = plan.starting_entities();
        for entity in &plan.target_entities {
            if !seeds.contains(entity) {
                seeds.push(entity.clone());
            }
        }
        let options = TraversalOptions::new(plan.max_hops, plan.top_k * IMPACT_FANOUT)
            .with_reverse(plan.include_reverse_deps);
        let impact = self.assembler.assemble(&seeds, options, plan.top_k);

        ReasoningContext::put_serialized(SEARCH_PLAN_KEY, &plan)?;
        ReasoningContext::put_serialized(IMPACT_ENTITIES_KEY, &impact.entity_names())?;

        let trace_id = RequestTrace::id();
        log::debug!(
            "[trace={trace_id}] planned intent={} complexity={} strategy={} top_k={} max_hops={} budget={}",
            plan.intent,
            plan.complexity,
            plan.search_strategy,
            plan.top_k,
            plan.max_hops,
            plan.token_budget
        );
        if !impact.unknown_seeds.is_empty() {
            log::debug!(
                "[trace={trace_id}] impact seeds not in the dependency graph: {}",
                impact.unknown_seeds.join(", ")
            );
        }
        log::debug!(
            "[trace={trace_id}] prepared {} tools, {} impact seeds, {} related",
            tools.len(),
            impact.seeds.len(),
            impact.related.len()
        );

        Ok(PreparedRequest {
            trace_id,
            plan,
            tools,
            impact,
        })
    }
}
