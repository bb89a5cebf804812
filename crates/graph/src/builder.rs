use crate::config::GraphConfig;
use crate::error::Result;
use crate::extract::{ReferenceExtractor, SuffixReferenceExtractor};
use crate::types::DependencyGraph;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

/// Accumulates entities and edges, then freezes them into a [`DependencyGraph`].
pub struct GraphBuilder {
    extractor: Box<dyn ReferenceExtractor>,
    extensions: Vec<String>,
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl GraphBuilder {
    pub fn new(config: &GraphConfig) -> Result<Self> {
        config.validate()?;
        let extractor = SuffixReferenceExtractor::new(&config.reference_suffixes)?;
        Ok(Self::with_extractor(extractor, config.extensions.clone()))
    }

    pub fn with_extractor(
        extractor: impl ReferenceExtractor + 'static,
        extensions: Vec<String>,
    ) -> Self {
        Self {
            extractor: Box::new(extractor),
            extensions,
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Register an entity (no-op if already known)
    pub fn add_entity(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Insert `from -> to`; returns `false` when the edge already existed.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let from_idx = self.add_entity(from);
        let to_idx = self.add_entity(to);
        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return false;
        }
        self.graph.add_edge(from_idx, to_idx, ());
        true
    }

    /// Record `entity` and an edge to every reference found in `content`.
    ///
    /// Returns the number of new edges.
    pub fn scan_source(&mut self, entity: &str, content: &str) -> usize {
        self.add_entity(entity);
        let mut added = 0;
        for reference in self.extractor.extract(content) {
            if reference == entity {
                continue;
            }
            if self.add_edge(entity, &reference) {
                added += 1;
            }
        }
        added
    }

    /// Scan a single file; the entity is the file stem.
    pub fn scan_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let Some(entity) = path.file_stem().and_then(|stem| stem.to_str()) else {
            log::debug!("Skipping file without usable name: {}", path.display());
            return Ok(0);
        };
        Ok(self.scan_source(entity, &content))
    }

    /// Walk `root` in file-name order and scan every matching file.
    ///
    /// A missing root or unreadable entry is logged and skipped. Returns the number
    /// of files that were scanned successfully.
    pub fn scan_root(&mut self, root: &Path) -> usize {
        if !root.exists() {
            log::warn!(
                "Source root {} does not exist; dependency graph stays empty",
                root.display()
            );
            return 0;
        }

        let mut scanned = 0;
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry under {}: {e}", root.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            match self.scan_file(entry.path()) {
                Ok(_) => scanned += 1,
                Err(e) => log::warn!("Skipping {}: {e}", entry.path().display()),
            }
        }

        log::info!(
            "Scanned {} source files under {}: {} entities, {} edges",
            scanned,
            root.display(),
            self.graph.node_count(),
            self.graph.edge_count()
        );
        scanned
    }

    pub fn build(self) -> DependencyGraph {
        DependencyGraph::from_parts(self.graph, self.index)
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(ext))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builder() -> GraphBuilder {
        GraphBuilder::with_extractor(SuffixReferenceExtractor::default(), vec!["java".into()])
    }

    #[test]
    fn repeated_reference_yields_single_edge() {
        let mut b = builder();
        let added = b.scan_source("ChatController", "ChatService a; ChatService b;");
        assert_eq!(added, 1);
        let graph = b.build();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.neighbors("ChatController"), vec!["ChatService"]);
    }

    #[test]
    fn self_reference_is_not_an_edge() {
        let mut b = builder();
        b.scan_source("ChatService", "public class ChatService { ChatService() {} }");
        let graph = b.build();
        assert!(graph.contains("ChatService"));
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn add_edge_reports_duplicates() {
        let mut b = builder();
        assert!(b.add_edge("A", "B"));
        assert!(!b.add_edge("A", "B"));
        assert!(b.add_edge("B", "A"));
        assert_eq!(b.build().edge_count(), 2);
    }

    #[test]
    fn neighbors_keep_first_seen_order() {
        let mut b = builder();
        b.scan_source(
            "ChatService",
            "MemoryService m; QueryPlannerAdvisor q; MemoryService again; AuditController c;",
        );
        let graph = b.build();
        assert_eq!(
            graph.neighbors("ChatService"),
            vec!["MemoryService", "QueryPlannerAdvisor", "AuditController"]
        );
    }
}
