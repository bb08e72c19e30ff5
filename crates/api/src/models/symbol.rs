use super::position::{FilePosition, FileRange};
use serde::{Deserialize, Serialize};

/// A resolved definition site, as reported by the symbol service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymbolDefinition {
    pub name: String,
    /// Open-ended kind string ("function", "class", "variable", ...).
    pub kind: String,
    /// Points at the symbol's name token.
    pub identifier_position: FilePosition,
    /// Spans the symbol's full body.
    pub range: FileRange,
}

impl SymbolDefinition {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        identifier_position: FilePosition,
        range: FileRange,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            identifier_position,
            range,
        }
    }
}

/// One usage site of a symbol.
pub type Reference = FilePosition;

/// Source lines surrounding a reference.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CodeContext {
    pub range: FileRange,
    pub source_code: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferencesResponse {
    pub references: Vec<Reference>,
    /// Parallel to `references` when context lines were requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<CodeContext>>,
}

impl ReferencesResponse {
    pub fn new(references: Vec<Reference>) -> Self {
        Self {
            references,
            context: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReferenceQuery {
    pub identifier_position: FilePosition,
    #[serde(default)]
    pub include_declaration: bool,
    #[serde(default)]
    pub include_code_context_lines: u32,
}

impl ReferenceQuery {
    /// Usages only: the declaration itself is excluded and no context is fetched.
    pub fn usages_of(identifier_position: FilePosition) -> Self {
        Self {
            identifier_position,
            include_declaration: false,
            include_code_context_lines: 0,
        }
    }

    pub fn with_context_lines(mut self, lines: u32) -> Self {
        self.include_code_context_lines = lines;
        self
    }
}
