use crate::diff::ChangedLines;
use blastscope_api::{
    FilePosition, HierarchyItem, ServiceResult, SymbolDefinition, SymbolService,
};
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// Maps positions in a file to the definitions whose bodies enclose them.
#[derive(Clone, Copy)]
pub struct SymbolResolver<'a> {
    service: &'a dyn SymbolService,
    read_source: bool,
}

impl<'a> SymbolResolver<'a> {
    pub fn new(service: &'a dyn SymbolService, read_source: bool) -> Self {
        Self {
            service,
            read_source,
        }
    }

    pub fn service(&self) -> &'a dyn SymbolService {
        self.service
    }

    /// Definitions in `path` containing at least one of `positions`.
    ///
    /// The file's definitions are fetched once regardless of how many
    /// positions are probed. A file the service cannot resolve yields
    /// nothing.
    pub async fn containing(
        &self,
        path: &str,
        positions: &[FilePosition],
    ) -> ServiceResult<Vec<HierarchyItem>> {
        let definitions = match self.service.definitions_in_file(path).await {
            Ok(defs) => defs,
            Err(e) if e.is_resolution_miss() => {
                debug!("No definitions resolvable in {}: {}", path, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for definition in definitions
            .iter()
            .filter(|d| positions.iter().any(|p| d.range.contains(p)))
        {
            if !seen.insert(&definition.identifier_position) {
                continue;
            }
            items.push(self.to_item(definition).await?);
        }
        Ok(items)
    }

    /// The seed set: every symbol whose body contains a changed line.
    pub async fn changed_symbols(
        &self,
        changed: &ChangedLines,
    ) -> ServiceResult<IndexSet<HierarchyItem>> {
        let mut seeds = IndexSet::new();
        for (path, lines) in changed.iter() {
            let probes: Vec<FilePosition> = lines
                .iter()
                .map(|&line| FilePosition::line_start(path, line))
                .collect();
            let found = self.containing(path, &probes).await?;
            debug!("{} changed lines in {} touch {} symbols", lines.len(), path, found.len());
            seeds.extend(found);
        }
        Ok(seeds)
    }

    async fn to_item(&self, definition: &SymbolDefinition) -> ServiceResult<HierarchyItem> {
        let source = if self.read_source {
            match self.service.read_source_code(&definition.range).await {
                Ok(text) => text,
                Err(e) if e.is_resolution_miss() => String::new(),
                Err(e) => return Err(e),
            }
        } else {
            String::new()
        };
        Ok(HierarchyItem::from_definition(definition, source))
    }
}
