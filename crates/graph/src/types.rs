use crate::builder::GraphBuilder;
use crate::config::GraphConfig;
use crate::error::Result;
use crate::extract::SuffixReferenceExtractor;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;

/// Directed dependency graph over named code entities.
///
/// Only [`GraphBuilder::build`] produces a populated graph and there is no mutating
/// API afterwards, so an `Arc<DependencyGraph>` can be read by any number of
/// requests at once without locking.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// Entity name per node; edges carry no payload
    pub(crate) graph: DiGraph<String, ()>,

    /// Entity name -> NodeIndex mapping for fast lookup
    pub(crate) index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Graph with no entities and no edges
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scan `source_root` with the default reference suffixes and `.java` sources.
    ///
    /// Never fails: a missing root yields an empty graph and unreadable files are
    /// logged and skipped.
    pub fn build(source_root: &Path) -> Self {
        let config = GraphConfig::default().with_source_root(source_root);
        let mut builder =
            GraphBuilder::with_extractor(SuffixReferenceExtractor::default(), config.extensions);
        builder.scan_root(source_root);
        builder.build()
    }

    /// Scan the root named by `config` using its extensions and suffixes.
    ///
    /// Only an invalid config is an error; I/O problems degrade like [`Self::build`].
    pub fn build_with(config: &GraphConfig) -> Result<Self> {
        let mut builder = GraphBuilder::new(config)?;
        builder.scan_root(&config.source_root);
        Ok(builder.build())
    }

    pub(crate) fn from_parts(
        graph: DiGraph<String, ()>,
        index: HashMap<String, NodeIndex>,
    ) -> Self {
        Self { graph, index }
    }

    /// Whether `name` is a scanned entity or the target of any edge
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn entity_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// All entity names, sorted
    pub fn entities(&self) -> Vec<String> {
        let mut names: Vec<String> = self.index.keys().cloned().collect();
        names.sort();
        names
    }

    pub(crate) fn find_node(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub(crate) fn name_of(&self, idx: NodeIndex) -> &str {
        &self.graph[idx]
    }
}
