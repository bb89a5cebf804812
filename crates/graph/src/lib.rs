//! # Context Graph
//!
//! Lightweight dependency graph over named code entities, used to estimate the
//! "impact radius" of an entity before retrieval.
//!
//! ## Architecture
//!
//! ```text
//! source root
//!     │
//!     ├──> Graph Builder (file walk)
//!     │      ├─ Entity = file stem
//!     │      ├─ Extract suffix-shaped references (FooService, BarController, ...)
//!     │      └─ Insert idempotent, insertion-ordered edges
//!     │
//!     ├──> Dependency Graph (petgraph, frozen after build)
//!     │      ├─ neighbors / dependents
//!     │      └─ bounded breadth-first impact radius
//!     │
//!     └──> Impact Assembler
//!            ├─ Expand seed entities per traversal options
//!            └─ Rank related entities by distance and direction
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_graph::DependencyGraph;
//! use std::path::Path;
//!
//! let graph = DependencyGraph::build(Path::new("src/main/java"));
//! for name in graph.impact_radius("ChatService", 2, 10) {
//!     println!("{name}");
//! }
//! ```

mod assembler;
mod builder;
mod config;
mod error;
mod extract;
mod graph;
mod types;

pub use assembler::{GraphStats, ImpactAssembler, ImpactReport, RelatedEntity};
pub use builder::GraphBuilder;
pub use config::{GraphConfig, DEFAULT_SOURCE_SUBPATH, GRAPH_ROOT_ENV};
pub use error::{GraphError, Result};
pub use extract::{ReferenceExtractor, SuffixReferenceExtractor, DEFAULT_REFERENCE_SUFFIXES};
pub use graph::{EdgeDirection, TraversalOptions};
pub use types::DependencyGraph;
