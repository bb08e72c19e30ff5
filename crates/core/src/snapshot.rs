//! In-memory symbol service backed by a serialized codebase snapshot.
//!
//! Used for offline runs (`--snapshot`) and as the service double in tests.

use crate::error::Result;
use async_trait::async_trait;
use blastscope_api::{
    CodeContext, FilePosition, FileRange, Position, Reference, ReferenceQuery, ReferencesResponse,
    ServiceError, ServiceResult, SymbolDefinition, SymbolService,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SnapshotFile {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub definitions: Vec<SymbolDefinition>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReferenceEntry {
    /// Identifier position of the referenced symbol.
    pub symbol: FilePosition,
    pub references: Vec<Reference>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Snapshot {
    #[serde(default)]
    pub files: BTreeMap<String, SnapshotFile>,
    #[serde(default)]
    pub references: Vec<ReferenceEntry>,
}

impl Snapshot {
    pub fn with_file(
        mut self,
        path: impl Into<String>,
        source: impl Into<String>,
        definitions: Vec<SymbolDefinition>,
    ) -> Self {
        self.files.insert(
            path.into(),
            SnapshotFile {
                source: source.into(),
                definitions,
            },
        );
        self
    }

    pub fn with_references(mut self, symbol: FilePosition, references: Vec<Reference>) -> Self {
        self.references.push(ReferenceEntry { symbol, references });
        self
    }
}

/// In-memory `SymbolService` over a [`Snapshot`].
///
/// `read_source_code` slices text the way LSP ranges are read: the end
/// character is exclusive. [`FileRange::contains`] treats the same end
/// character as inside the range, so a symbol's range still claims a
/// reference sitting on its last character.
pub struct SnapshotService {
    files: BTreeMap<String, SnapshotFile>,
    references: HashMap<FilePosition, Vec<Reference>>,
}

impl SnapshotService {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut references: HashMap<FilePosition, Vec<Reference>> = HashMap::new();
        for entry in snapshot.references {
            references
                .entry(entry.symbol)
                .or_default()
                .extend(entry.references);
        }
        Self {
            files: snapshot.files,
            references,
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(content)?))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn file(&self, path: &str) -> ServiceResult<&SnapshotFile> {
        self.files
            .get(path)
            .ok_or_else(|| ServiceError::NotFound(format!("file {}", path)))
    }

    fn context_for(&self, reference: &Reference, lines: u32) -> Option<CodeContext> {
        let file = self.files.get(&reference.path)?;
        let all: Vec<&str> = file.source.lines().collect();
        let last = all.len().checked_sub(1)? as u32;
        let start = reference.position.line.saturating_sub(lines).min(last);
        let end = reference.position.line.saturating_add(lines).min(last);
        let text = all[start as usize..=end as usize].join("\n");
        let end_character = all[end as usize].chars().count() as u32;
        Some(CodeContext {
            range: FileRange::new(
                reference.path.clone(),
                Position::new(start, 0),
                Position::new(end, end_character),
            ),
            source_code: text,
        })
    }
}

/// Slice `source` by a range whose end character is exclusive.
fn slice_source(source: &str, start: Position, end: Position) -> String {
    let mut out = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let idx = idx as u32;
        if idx < start.line {
            continue;
        }
        if idx > end.line {
            break;
        }
        let from = if idx == start.line { start.character as usize } else { 0 };
        let piece: String = if idx == end.line {
            let to = (end.character as usize).max(from);
            line.chars().skip(from).take(to - from).collect()
        } else {
            line.chars().skip(from).collect()
        };
        out.push(piece);
    }
    out.join("\n")
}

#[async_trait]
impl SymbolService for SnapshotService {
    async fn list_files(&self) -> ServiceResult<Vec<String>> {
        Ok(self.files.keys().cloned().collect())
    }

    async fn definitions_in_file(&self, path: &str) -> ServiceResult<Vec<SymbolDefinition>> {
        Ok(self.file(path)?.definitions.clone())
    }

    async fn read_source_code(&self, range: &FileRange) -> ServiceResult<String> {
        let file = self.file(&range.path)?;
        Ok(slice_source(&file.source, range.start, range.end))
    }

    async fn find_references(&self, query: &ReferenceQuery) -> ServiceResult<ReferencesResponse> {
        let target = &query.identifier_position;
        let known = self.references.get(target);
        if known.is_none() && !self.files.contains_key(&target.path) {
            return Err(ServiceError::NotFound(format!("symbol at {}", target)));
        }

        let mut references = Vec::new();
        if query.include_declaration {
            references.push(target.clone());
        }
        references.extend(known.into_iter().flatten().cloned());

        let context = (query.include_code_context_lines > 0).then(|| {
            references
                .iter()
                .filter_map(|r| self.context_for(r, query.include_code_context_lines))
                .collect()
        });

        Ok(ReferencesResponse {
            references,
            context,
        })
    }
}
