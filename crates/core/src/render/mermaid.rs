//! Mermaid flowchart output for change graphs and file-level reference maps.

use crate::config::RenderConfig;
use crate::impact::{ChangeGraph, FileReferences, node_id};
use std::collections::BTreeMap;

const INDIRECT_STYLE: &str = "fill:#ffcccc,color:#000";
const DIRECT_STYLE: &str = "fill:#ffffff,color:#000";
const SOURCE_CLASS: &str = "fill:#e1f5fe,stroke:#0277bd,stroke-width:2px,color:#000";
const DEFAULT_CLASS: &str = "fill:#f9f9f9,stroke:#333,stroke-width:2px,color:#000";
const REFERENCE_CLASS: &str = "fill:#e8e7ff,stroke:#6b69d6,stroke-width:2px,color:#000";
const COMPACT: &str = "max-width:none,text-overflow:clip,padding:0px";

pub fn escape_label(text: &str) -> String {
    text.replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Keep the tail of a long path, which is usually the informative part.
pub fn truncate_left(text: &str, max_chars: usize) -> String {
    let len = text.chars().count();
    if len <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let tail: String = text.chars().skip(len - keep).collect();
    format!("...{}", tail)
}

pub fn truncate_right(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", head)
}

/// Flowchart with one subgraph per defining file. Seed symbols are drawn
/// white, indirectly affected ones red.
pub fn hierarchy_to_mermaid(graph: &ChangeGraph) -> String {
    let mut lines: Vec<String> = [
        "%%{",
        "  init: {",
        "    'flowchart': {",
        "      'rankSpacing': 100,",
        "      'nodeSpacing': 50,",
        "      'padding': 20",
        "    }",
        "  }",
        "}%%",
        "graph TD",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let mut direct = Vec::new();
    let mut indirect = Vec::new();

    for (file_idx, (path, nodes)) in graph.nodes_by_file().into_iter().enumerate() {
        lines.push(format!("    subgraph subgraph_{}[\"{}\"]", file_idx, escape_label(path)));
        for node in nodes {
            let id = node_id(&node.defined_at);
            lines.push(format!(
                "        {}[\"{}<br><i>{}</i>\"]",
                id,
                escape_label(&node.name),
                escape_label(&node.kind)
            ));
            if graph.is_directly_changed(node) {
                direct.push(id);
            } else {
                indirect.push(id);
            }
        }
        lines.push("    end".to_string());
    }

    for edge in graph.sorted_edges() {
        lines.push(format!(
            "    {} --> {}",
            node_id(&edge.from.defined_at),
            node_id(&edge.to.defined_at)
        ));
    }

    for id in &indirect {
        lines.push(format!("    style {} {}", id, INDIRECT_STYLE));
    }
    for id in &direct {
        lines.push(format!("    style {} {}", id, DIRECT_STYLE));
    }

    lines.join("\n")
}

/// File-to-file diagram: arrows run from a referencing file through a
/// reference summary node back to the file defining the symbols.
pub fn reference_diagram(refs: &FileReferences, config: &RenderConfig) -> String {
    if refs.is_empty() {
        return root_only_diagram(&refs.source_file, config);
    }

    let mut lines = vec![
        "graph LR".to_string(),
        "    %% Styling".to_string(),
        format!("    classDef default {},{};", DEFAULT_CLASS, COMPACT),
        format!("    classDef source {},{};", SOURCE_CLASS, COMPACT),
        format!("    classDef reference {},{};", REFERENCE_CLASS, COMPACT),
    ];

    let mut node_names: BTreeMap<&str, String> = BTreeMap::new();
    for (defined, referencing) in refs.by_pair.keys() {
        node_names.entry(defined.as_str()).or_default();
        node_names.entry(referencing.as_str()).or_default();
    }
    for (idx, (file, name)) in node_names.iter_mut().enumerate() {
        *name = format!("n{}", idx);
        lines.push(format!(
            "    {}[\"{}\"]",
            name,
            escape_label(&truncate_left(file, config.max_path_chars))
        ));
    }

    for (idx, ((defined, referencing), symbols)) in refs.by_pair.iter().enumerate() {
        let cleaned: Vec<String> = symbols
            .iter()
            .map(|s| truncate_right(&escape_label(s), config.max_symbol_chars))
            .collect();
        let mut listing = cleaned
            .iter()
            .take(config.max_symbols_per_edge)
            .map(|s| format!("<br/>{}", s))
            .collect::<String>();
        if cleaned.len() > config.max_symbols_per_edge {
            listing.push_str("<br/>...");
        }

        let ref_node = format!("ref{}", idx);
        lines.push(format!(
            "    {}[\"{} refs{}\"]",
            ref_node,
            symbols.len(),
            listing
        ));
        lines.push(format!(
            "    {} --> {} --> {}",
            node_names[referencing.as_str()],
            ref_node,
            node_names[defined.as_str()]
        ));
        lines.push(format!("    class {} reference", ref_node));
    }

    if let Some(source) = node_names.get(refs.source_file.as_str()) {
        lines.push(format!("    class {} source;", source));
    }

    lines.join("\n")
}

fn root_only_diagram(source_file: &str, config: &RenderConfig) -> String {
    [
        "graph LR".to_string(),
        format!(
            "    root[\"{}\"]",
            escape_label(&truncate_left(source_file, config.max_path_chars))
        ),
        format!("    classDef default {};", DEFAULT_CLASS),
        format!("    classDef source {};", SOURCE_CLASS),
        "    class root source;".to_string(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastscope_api::{Edge, FilePosition, HierarchyItem};

    fn item(name: &str, path: &str, line: u32) -> HierarchyItem {
        HierarchyItem::new(name, "function", FilePosition::new(path, line, 0), "")
    }

    #[test]
    fn test_truncation() {
        assert_eq!(truncate_left("short.rs", 28), "short.rs");
        assert_eq!(
            truncate_left("server/src/handlers/chunk_handler.rs", 28),
            "...handlers/chunk_handler.rs"
        );
        assert_eq!(truncate_right("delete_chunk_by_tracking_id", 20), "delete_chunk_by_t...");
    }

    #[test]
    fn test_hierarchy_marks_seed_and_indirect_nodes() {
        let a = item("delete_chunk", "server/ops.rs", 10);
        let b = item("handler", "server/routes.rs", 3);
        let graph = ChangeGraph::from_traversal(
            [a.clone(), b.clone()].into_iter().collect(),
            [Edge::new(a.clone(), b.clone())].into_iter().collect(),
            [a.clone()].into_iter().collect(),
            false,
        );

        let out = hierarchy_to_mermaid(&graph);
        let a_id = node_id(&a.defined_at);
        let b_id = node_id(&b.defined_at);

        assert!(out.contains("graph TD"));
        assert!(out.contains("subgraph subgraph_0[\"server/ops.rs\"]"));
        assert!(out.contains("subgraph subgraph_1[\"server/routes.rs\"]"));
        assert!(out.contains(&format!("{}[\"delete_chunk<br><i>function</i>\"]", a_id)));
        assert!(out.contains(&format!("    {} --> {}", a_id, b_id)));
        assert!(out.contains(&format!("style {} {}", a_id, DIRECT_STYLE)));
        assert!(out.contains(&format!("style {} {}", b_id, INDIRECT_STYLE)));
    }

    #[test]
    fn test_hierarchy_escapes_names() {
        let odd = HierarchyItem::new("Vec<\"T\">", "struct", FilePosition::new("a.rs", 0, 0), "");
        let graph = ChangeGraph::from_traversal(
            [odd.clone()].into_iter().collect(),
            Default::default(),
            [odd].into_iter().collect(),
            false,
        );
        assert!(hierarchy_to_mermaid(&graph).contains("Vec&lt;&quot;T&quot;&gt;"));
    }

    #[test]
    fn test_reference_diagram_lists_symbols() {
        let mut refs = FileReferences::new("server/src/handlers/analytics_handler.rs");
        for sym in ["a", "b", "c", "d", "e", "f"] {
            refs.record("server/src/main.rs", sym);
        }
        refs.record("server/src/lib.rs", "a");

        let out = reference_diagram(&refs, &RenderConfig::default());
        assert!(out.starts_with("graph LR"));
        assert!(out.contains("ref0[\"1 refs<br/>a\"]"));
        assert!(out.contains("ref1[\"6 refs<br/>a<br/>b<br/>c<br/>d<br/>e<br/>...\"]"));
        // analytics_handler sorts first, so it is n0 and the source
        assert!(out.contains("class n0 source;"));
        assert!(out.contains("n1 --> ref0 --> n0"));
    }

    #[test]
    fn test_reference_diagram_without_references() {
        let refs = FileReferences::new("lonely.rs");
        let out = reference_diagram(&refs, &RenderConfig::default());
        assert!(out.contains("root[\"lonely.rs\"]"));
        assert!(out.contains("class root source;"));
    }
}
