//! Blast radius analysis: which symbols a diff touches and what they reach.

pub mod file_refs;
pub mod graph;
pub mod propagation;
pub mod resolver;

pub use file_refs::{FileReferences, collect_file_references};
pub use graph::{ChangeGraph, node_id};
pub use propagation::{Propagator, TraversalAborted};
pub use resolver::SymbolResolver;

use crate::config::AnalysisConfig;
use crate::diff::{ChangedLines, parse_unified_diff};
use crate::error::Result;
use blastscope_api::{HierarchyItem, SymbolService};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize)]
pub struct ImpactReport {
    /// Changed lines restricted to files the service can resolve.
    pub changed: ChangedLines,
    /// Diff files the service does not know about.
    pub skipped_files: Vec<String>,
    pub graph: ChangeGraph,
}

impl ImpactReport {
    /// Files holding affected symbols that the diff itself never touched.
    pub fn files_outside_diff(&self) -> Vec<&str> {
        self.graph
            .files()
            .into_iter()
            .filter(|f| !self.changed.contains_file(f))
            .collect()
    }

    /// (path, body) of every affected symbol living outside the diff.
    pub fn related_code_outside_diff(&self) -> Vec<(&str, &str)> {
        let mut related: Vec<&HierarchyItem> = self
            .graph
            .nodes
            .iter()
            .filter(|n| !self.changed.contains_file(n.path()))
            .collect();
        related.sort();
        related
            .into_iter()
            .map(|n| (n.path(), n.source_code.as_str()))
            .collect()
    }
}

pub struct ImpactAnalyzer<'a> {
    service: &'a dyn SymbolService,
    config: AnalysisConfig,
}

impl<'a> ImpactAnalyzer<'a> {
    pub fn new(service: &'a dyn SymbolService, config: AnalysisConfig) -> Self {
        Self { service, config }
    }

    fn resolver(&self) -> SymbolResolver<'a> {
        SymbolResolver::new(self.service, self.config.read_source)
    }

    pub async fn resolve_seeds(&self, changed: &ChangedLines) -> Result<IndexSet<HierarchyItem>> {
        Ok(self.resolver().changed_symbols(changed).await?)
    }

    pub async fn propagate(&self, seeds: IndexSet<HierarchyItem>) -> Result<ChangeGraph> {
        let propagator = Propagator::new(self.resolver()).with_max_nodes(self.config.max_nodes);
        Ok(propagator.propagate(seeds).await?)
    }

    pub async fn analyze(&self, mut changed: ChangedLines) -> Result<ImpactReport> {
        let workspace: HashSet<String> = self.service.list_files().await?.into_iter().collect();
        let skipped_files = changed.retain_files(|path| workspace.contains(path));
        if !skipped_files.is_empty() {
            debug!("Skipping {} diff files outside the workspace", skipped_files.len());
        }
        info!(
            "Diff touches {} lines in {} workspace files",
            changed.total_lines(),
            changed.file_count()
        );

        let seeds = self.resolve_seeds(&changed).await?;
        let graph = self.propagate(seeds).await?;

        Ok(ImpactReport {
            changed,
            skipped_files,
            graph,
        })
    }

    pub async fn analyze_diff(&self, diff_text: &str) -> Result<ImpactReport> {
        let changed = parse_unified_diff(diff_text)?;
        self.analyze(changed).await
    }
}
