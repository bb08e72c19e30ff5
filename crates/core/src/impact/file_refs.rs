use blastscope_api::{ReferenceQuery, ServiceResult, SymbolService};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// File-level view of who uses the symbols of one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FileReferences {
    pub source_file: String,
    /// (defining file, referencing file) -> referenced symbol names
    pub by_pair: BTreeMap<(String, String), BTreeSet<String>>,
}

impl FileReferences {
    pub fn new(source_file: impl Into<String>) -> Self {
        Self {
            source_file: source_file.into(),
            by_pair: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, referencing_file: &str, symbol: &str) {
        self.by_pair
            .entry((self.source_file.clone(), referencing_file.to_string()))
            .or_default()
            .insert(symbol.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    pub fn referencing_files(&self) -> impl Iterator<Item = &str> {
        self.by_pair.keys().map(|(_, referencing)| referencing.as_str())
    }
}

/// Query references for every definition in `path` and aggregate the ones
/// that come from other files.
pub async fn collect_file_references(
    service: &dyn SymbolService,
    path: &str,
) -> ServiceResult<FileReferences> {
    let mut result = FileReferences::new(path);

    let definitions = match service.definitions_in_file(path).await {
        Ok(defs) => defs,
        Err(e) if e.is_resolution_miss() => return Ok(result),
        Err(e) => return Err(e),
    };

    for definition in &definitions {
        let query = ReferenceQuery::usages_of(definition.identifier_position.clone());
        let references = match service.find_references(&query).await {
            Ok(r) => r.references,
            Err(e) if e.is_resolution_miss() => continue,
            Err(e) => return Err(e),
        };
        for reference in references.iter().filter(|r| r.path != path) {
            result.record(&reference.path, &definition.name);
        }
    }

    debug!(
        "{} symbols in {} are used from {} files",
        definitions.len(),
        path,
        result.by_pair.len()
    );
    Ok(result)
}
