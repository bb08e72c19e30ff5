use crate::error::ServiceResult;
use crate::models::{FileRange, ReferenceQuery, ReferencesResponse, SymbolDefinition};
use async_trait::async_trait;

/// Symbol and reference analysis over a workspace.
///
/// Implementations own all language knowledge; callers only ever see
/// positions, ranges and verbatim source text. Errors other than
/// [`crate::ServiceError::NotFound`] mean the service itself failed.
#[async_trait]
pub trait SymbolService: Send + Sync {
    /// All workspace-relative file paths the service can resolve.
    async fn list_files(&self) -> ServiceResult<Vec<String>>;

    /// Every top-level and nested definition in one file.
    async fn definitions_in_file(&self, path: &str) -> ServiceResult<Vec<SymbolDefinition>>;

    /// Verbatim text covered by `range`.
    async fn read_source_code(&self, range: &FileRange) -> ServiceResult<String>;

    /// Usage sites of the symbol whose name token is at `query.identifier_position`.
    async fn find_references(&self, query: &ReferenceQuery) -> ServiceResult<ReferencesResponse>;
}
