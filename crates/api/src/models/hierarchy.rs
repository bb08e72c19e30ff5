use super::position::FilePosition;
use super::symbol::SymbolDefinition;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// One symbol occurrence in the propagation graph.
///
/// Identity is the definition site alone: two items are equal, hash alike and
/// sort together iff their `defined_at` positions match. `name`, `kind` and
/// `source_code` are carried for display only, so the same symbol reached
/// along different paths collapses even when its cached text differs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HierarchyItem {
    pub name: String,
    pub kind: String,
    pub defined_at: FilePosition,
    pub source_code: String,
}

impl HierarchyItem {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        defined_at: FilePosition,
        source_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            defined_at,
            source_code: source_code.into(),
        }
    }

    pub fn from_definition(definition: &SymbolDefinition, source_code: String) -> Self {
        Self {
            name: definition.name.clone(),
            kind: definition.kind.clone(),
            defined_at: definition.identifier_position.clone(),
            source_code,
        }
    }

    pub fn path(&self) -> &str {
        &self.defined_at.path
    }
}

impl PartialEq for HierarchyItem {
    fn eq(&self, other: &Self) -> bool {
        self.defined_at == other.defined_at
    }
}

impl Eq for HierarchyItem {}

impl Hash for HierarchyItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defined_at.hash(state);
    }
}

impl PartialOrd for HierarchyItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HierarchyItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.defined_at.cmp(&other.defined_at)
    }
}

/// `from` is referenced inside the body of `to`: changing `from` can influence `to`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: HierarchyItem,
    pub to: HierarchyItem,
}

impl Edge {
    pub fn new(from: HierarchyItem, to: HierarchyItem) -> Self {
        Self { from, to }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}
