//! Markdown-flavoured text output for terminals and review comments.

use crate::impact::ImpactReport;
use blastscope_api::{CodeContext, Language, Reference, ReferencesResponse};
use indexmap::IndexMap;
use std::fmt::Write;

pub fn format_code(source: &str, language: &Language) -> String {
    format!("### `Code`\n---\n```{}\n\n{}\n```\n", language, source)
}

enum RefLine {
    Code(u32, String),
    Caret(u32),
    Separator,
}

/// List usages grouped by file, with a caret under each referenced column.
/// Context blocks are shown when the response carries them.
pub fn format_references(response: &ReferencesResponse, language: &Language) -> String {
    if response.references.is_empty() {
        return "\n---\n### `No references found`".to_string();
    }

    let mut by_file: IndexMap<&str, Vec<RefLine>> = IndexMap::new();
    for (idx, reference) in response.references.iter().enumerate() {
        let context = response.context.as_ref().and_then(|c| c.get(idx));
        let lines = by_file.entry(reference.path.as_str()).or_default();
        annotate(reference, context, lines);
        lines.push(RefLine::Separator);
    }

    let mut out = String::from("\n### `References`\n---\n");
    for (file, lines) in by_file {
        let _ = writeln!(out, "**{}**\n\n```{}", file, language);
        for line in lines {
            let _ = match line {
                RefLine::Code(num, text) => writeln!(out, "{:5}: {}", num + 1, text),
                RefLine::Caret(character) => {
                    writeln!(out, "{:5}  {}^", "", "_".repeat(character as usize))
                }
                RefLine::Separator => writeln!(out, "{:5}  -----", ""),
            };
        }
        out.push_str("```\n\n");
    }
    out
}

fn annotate(reference: &Reference, context: Option<&CodeContext>, lines: &mut Vec<RefLine>) {
    let target = reference.position.line;
    let Some(context) = context else {
        lines.push(RefLine::Caret(reference.position.character));
        return;
    };

    let numbered = (context.range.start.line..).zip(context.source_code.split('\n'));
    let mut caret_placed = false;
    for (num, text) in numbered {
        if num > target && !caret_placed {
            lines.push(RefLine::Caret(reference.position.character));
            caret_placed = true;
        }
        lines.push(RefLine::Code(num, text.to_string()));
    }
    if !caret_placed {
        lines.push(RefLine::Caret(reference.position.character));
    }
}

pub fn format_impact_summary(report: &ImpactReport) -> String {
    let graph = &report.graph;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Diff touches {} lines in {} files.",
        report.changed.total_lines(),
        report.changed.file_count()
    );
    if !report.skipped_files.is_empty() {
        let _ = writeln!(
            out,
            "Skipped {} files unknown to the symbol service: {}",
            report.skipped_files.len(),
            report.skipped_files.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "{} affected symbols ({} changed directly, {} affected indirectly) linked by {} edges.",
        graph.node_count(),
        graph.direct_nodes().count(),
        graph.indirect_nodes().count(),
        graph.edge_count()
    );
    if graph.truncated {
        let _ = writeln!(out, "Traversal stopped at the node cap; the graph is incomplete.");
    }

    let outside = report.files_outside_diff();
    if outside.is_empty() {
        let _ = writeln!(out, "No code paths leave the diff.");
    } else {
        let _ = writeln!(
            out,
            "Code paths cross {} files that are not in the diff:\n",
            outside.len()
        );
        for (i, file) in outside.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, file);
        }
    }
    out
}
