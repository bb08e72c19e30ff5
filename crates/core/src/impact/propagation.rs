//! Worklist traversal from the seed set through "is referenced within" links.
//!
//! Each popped symbol is expanded at most once: its references are grouped
//! by file, every group is mapped back to the enclosing definitions, and
//! each such definition becomes both an edge target and new work. The
//! visited check runs at dequeue time, and targets that were already
//! expanded are not re-enqueued, so duplicate work stays bounded by the
//! number of distinct definitions in the workspace.

use super::graph::ChangeGraph;
use super::resolver::SymbolResolver;
use blastscope_api::{
    Edge, FilePosition, HierarchyItem, ReferenceQuery, ServiceError, ServiceResult,
};
use indexmap::{IndexMap, IndexSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A service failure stopped the traversal. `partial` holds whatever had
/// been expanded so far; it is a best-effort diagnostic, not a closure.
#[derive(Debug, Error)]
#[error("traversal aborted after {} symbols: {source}", .partial.node_count())]
pub struct TraversalAborted {
    #[source]
    pub source: ServiceError,
    pub partial: Box<ChangeGraph>,
}

#[derive(Default)]
struct TraversalState {
    worklist: Vec<HierarchyItem>,
    nodes: IndexSet<HierarchyItem>,
    edges: IndexSet<Edge>,
}

impl TraversalState {
    fn seeded(seeds: &IndexSet<HierarchyItem>) -> Self {
        Self {
            // Reverse so the first seed is expanded first.
            worklist: seeds.iter().rev().cloned().collect(),
            ..Default::default()
        }
    }

    fn link(&mut self, from: &HierarchyItem, to: HierarchyItem) {
        if &to == from {
            return;
        }
        self.edges.insert(Edge::new(from.clone(), to.clone()));
        if !self.nodes.contains(&to) {
            self.worklist.push(to);
        }
    }

    fn finish(self, seeds: IndexSet<HierarchyItem>, truncated: bool) -> ChangeGraph {
        ChangeGraph::from_traversal(self.nodes, self.edges, seeds, truncated)
    }
}

pub struct Propagator<'a> {
    resolver: SymbolResolver<'a>,
    max_nodes: Option<usize>,
}

impl<'a> Propagator<'a> {
    pub fn new(resolver: SymbolResolver<'a>) -> Self {
        Self {
            resolver,
            max_nodes: None,
        }
    }

    /// Stop after expanding `limit` symbols and flag the graph as truncated.
    pub fn with_max_nodes(mut self, limit: Option<usize>) -> Self {
        self.max_nodes = limit;
        self
    }

    pub async fn propagate(
        &self,
        seeds: IndexSet<HierarchyItem>,
    ) -> Result<ChangeGraph, TraversalAborted> {
        info!("Propagating change from {} seed symbols", seeds.len());
        let mut state = TraversalState::seeded(&seeds);
        let mut truncated = false;

        while let Some(symbol) = state.worklist.pop() {
            if state.nodes.contains(&symbol) {
                continue;
            }
            if self.max_nodes.is_some_and(|limit| state.nodes.len() >= limit) {
                warn!(
                    "Node cap reached after {} symbols, {} still pending",
                    state.nodes.len(),
                    state.worklist.len() + 1
                );
                truncated = true;
                break;
            }
            state.nodes.insert(symbol.clone());

            let related = match self.related_symbols(&symbol).await {
                Ok(related) => related,
                Err(source) => {
                    warn!("Traversal aborted at {}: {}", symbol.defined_at, source);
                    return Err(TraversalAborted {
                        source,
                        partial: Box::new(state.finish(seeds, true)),
                    });
                }
            };
            debug!("{} reaches {} symbols", symbol.name, related.len());
            for r in related {
                state.link(&symbol, r);
            }
        }

        let graph = state.finish(seeds, truncated);
        info!(
            "Propagation finished: {} symbols, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }

    /// Symbols whose bodies contain a reference to `symbol`.
    async fn related_symbols(&self, symbol: &HierarchyItem) -> ServiceResult<Vec<HierarchyItem>> {
        let query = ReferenceQuery::usages_of(symbol.defined_at.clone());
        let response = match self.resolver.service().find_references(&query).await {
            Ok(r) => r,
            Err(e) if e.is_resolution_miss() => {
                debug!("No references resolvable for {}: {}", symbol.defined_at, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut by_file: IndexMap<String, Vec<FilePosition>> = IndexMap::new();
        for reference in response.references {
            by_file
                .entry(reference.path.clone())
                .or_default()
                .push(reference);
        }

        let mut related = Vec::new();
        for (path, positions) in &by_file {
            related.extend(self.resolver.containing(path, positions).await?);
        }
        Ok(related)
    }
}
