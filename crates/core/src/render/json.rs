use crate::impact::{ChangeGraph, node_id};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportNode {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub path: String,
    pub line: u32,
    pub character: u32,
    pub direct: bool,
    /// Hops from the nearest seed; absent for nodes no seed reaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportEdge {
    pub from: String,
    pub to: String,
}

/// Flat, id-keyed form of a change graph for machine consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactExport {
    pub nodes: Vec<ExportNode>,
    pub edges: Vec<ExportEdge>,
    pub truncated: bool,
}

impl ImpactExport {
    pub fn from_graph(graph: &ChangeGraph) -> Self {
        let depths = graph.depths();

        let nodes = graph
            .nodes_by_file()
            .into_values()
            .flatten()
            .map(|n| ExportNode {
                id: node_id(&n.defined_at),
                name: n.name.clone(),
                kind: n.kind.clone(),
                path: n.defined_at.path.clone(),
                line: n.defined_at.position.line,
                character: n.defined_at.position.character,
                direct: graph.is_directly_changed(n),
                depth: depths.get(&n.defined_at).copied(),
            })
            .collect();

        let edges = graph
            .sorted_edges()
            .into_iter()
            .map(|e| ExportEdge {
                from: node_id(&e.from.defined_at),
                to: node_id(&e.to.defined_at),
            })
            .collect();

        Self {
            nodes,
            edges,
            truncated: graph.truncated,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
