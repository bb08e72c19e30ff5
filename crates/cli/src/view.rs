use blastscope_api::{FilePosition, HierarchyItem, SymbolDefinition};
use blastscope_core::impact::{ChangeGraph, FileReferences};
use std::collections::HashMap;
use tabled::Tabled;

/// One affected symbol in the impact table.
#[derive(Tabled)]
pub struct ImpactRow {
    #[tabled(rename = "Symbol")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "Change")]
    pub change: &'static str,
    #[tabled(rename = "Depth")]
    pub depth: String,
}

impl ImpactRow {
    fn from_item(
        item: &HierarchyItem,
        graph: &ChangeGraph,
        depths: &HashMap<FilePosition, usize>,
    ) -> Self {
        Self {
            name: item.name.clone(),
            kind: item.kind.clone(),
            location: item.defined_at.to_string(),
            change: if graph.is_directly_changed(item) {
                "direct"
            } else {
                "indirect"
            },
            depth: depths
                .get(&item.defined_at)
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }

    /// Rows ordered by depth, then by location.
    pub fn rows(graph: &ChangeGraph) -> Vec<Self> {
        let depths = graph.depths();
        let mut items: Vec<&HierarchyItem> = graph.nodes.iter().collect();
        items.sort_by(|a, b| {
            let da = depths.get(&a.defined_at).copied().unwrap_or(usize::MAX);
            let db = depths.get(&b.defined_at).copied().unwrap_or(usize::MAX);
            da.cmp(&db).then_with(|| a.cmp(b))
        });
        items
            .into_iter()
            .map(|item| Self::from_item(item, graph, &depths))
            .collect()
    }
}

#[derive(Tabled)]
pub struct SymbolRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Line")]
    pub line: u32,
    #[tabled(rename = "Span")]
    pub span: String,
}

impl From<&SymbolDefinition> for SymbolRow {
    fn from(def: &SymbolDefinition) -> Self {
        Self {
            name: def.name.clone(),
            kind: def.kind.clone(),
            line: def.identifier_position.position.line + 1,
            span: format!(
                "{}-{} ({} lines)",
                def.range.start.line + 1,
                def.range.end.line + 1,
                def.range.line_count()
            ),
        }
    }
}

#[derive(Tabled)]
pub struct FileRefRow {
    #[tabled(rename = "Referencing File")]
    pub file: String,
    #[tabled(rename = "Refs")]
    pub count: usize,
    #[tabled(rename = "Symbols")]
    pub symbols: String,
}

impl FileRefRow {
    pub fn rows(refs: &FileReferences) -> Vec<Self> {
        refs.by_pair
            .iter()
            .map(|((_, referencing), symbols)| Self {
                file: referencing.clone(),
                count: symbols.len(),
                symbols: symbols.iter().cloned().collect::<Vec<_>>().join(", "),
            })
            .collect()
    }
}
