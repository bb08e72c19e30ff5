//! The node/edge set produced by change propagation.

use blastscope_api::{Edge, FilePosition, HierarchyItem};
use indexmap::IndexSet;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use xxhash_rust::xxh3::xxh3_64;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangeGraph {
    pub nodes: IndexSet<HierarchyItem>,
    pub edges: IndexSet<Edge>,
    /// Symbols whose bodies contain a changed line.
    pub seeds: IndexSet<HierarchyItem>,
    /// Set when a node cap stopped the traversal before the closure was complete.
    pub truncated: bool,
}

impl ChangeGraph {
    /// Finish a traversal. Edges pointing at symbols that were never
    /// expanded (only possible when truncated) are dropped so that every
    /// edge endpoint is a node.
    pub fn from_traversal(
        nodes: IndexSet<HierarchyItem>,
        mut edges: IndexSet<Edge>,
        seeds: IndexSet<HierarchyItem>,
        truncated: bool,
    ) -> Self {
        edges.retain(|e| nodes.contains(&e.from) && nodes.contains(&e.to));
        Self {
            nodes,
            edges,
            seeds,
            truncated,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_directly_changed(&self, item: &HierarchyItem) -> bool {
        self.seeds.contains(item)
    }

    pub fn direct_nodes(&self) -> impl Iterator<Item = &HierarchyItem> {
        self.nodes.iter().filter(|n| self.is_directly_changed(n))
    }

    pub fn indirect_nodes(&self) -> impl Iterator<Item = &HierarchyItem> {
        self.nodes.iter().filter(|n| !self.is_directly_changed(n))
    }

    pub fn files(&self) -> BTreeSet<&str> {
        self.nodes.iter().map(HierarchyItem::path).collect()
    }

    /// Nodes grouped by defining file, both levels in position order.
    pub fn nodes_by_file(&self) -> BTreeMap<&str, Vec<&HierarchyItem>> {
        let mut grouped: BTreeMap<&str, Vec<&HierarchyItem>> = BTreeMap::new();
        for node in &self.nodes {
            grouped.entry(node.path()).or_default().push(node);
        }
        for nodes in grouped.values_mut() {
            nodes.sort();
        }
        grouped
    }

    pub fn sorted_edges(&self) -> Vec<&Edge> {
        let mut edges: Vec<&Edge> = self.edges.iter().collect();
        edges.sort();
        edges
    }

    /// Minimum number of hops from any seed to each reachable node.
    /// Seeds sit at depth 0.
    pub fn depths(&self) -> HashMap<FilePosition, usize> {
        let mut graph: DiGraph<(), ()> = DiGraph::with_capacity(self.nodes.len() + 1, self.edges.len());
        let root = graph.add_node(());
        let index: HashMap<&FilePosition, NodeIndex> = self
            .nodes
            .iter()
            .map(|n| (&n.defined_at, graph.add_node(())))
            .collect();

        for seed in &self.seeds {
            if let Some(&idx) = index.get(&seed.defined_at) {
                graph.add_edge(root, idx, ());
            }
        }
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) =
                (index.get(&edge.from.defined_at), index.get(&edge.to.defined_at))
            {
                graph.add_edge(from, to, ());
            }
        }

        let distances = petgraph::algo::dijkstra(&graph, root, None, |_| 1usize);
        index
            .into_iter()
            .filter_map(|(pos, idx)| distances.get(&idx).map(|d| (pos.clone(), d - 1)))
            .collect()
    }
}

/// Stable diagram/export identifier derived from a definition site.
pub fn node_id(defined_at: &FilePosition) -> String {
    let key = format!(
        "{}:{}:{}",
        defined_at.path, defined_at.position.line, defined_at.position.character
    );
    format!("node{:016x}", xxh3_64(key.as_bytes()))
}
