use async_trait::async_trait;
use blastscope_api::{
    FilePosition, FileRange, Position, ReferenceQuery, ReferencesResponse, ServiceError,
    ServiceResult, SymbolDefinition, SymbolService,
};
use blastscope_core::snapshot::{Snapshot, SnapshotService};
use std::collections::HashMap;
use std::sync::Mutex;

/// Definition whose identifier sits at `(line, 4)` and whose body spans
/// `line..=end_line`.
#[allow(dead_code)]
pub fn function(name: &str, path: &str, line: u32, end_line: u32) -> SymbolDefinition {
    SymbolDefinition::new(
        name,
        "function",
        FilePosition::new(path, line, 4),
        FileRange::new(path, Position::new(line, 0), Position::new(end_line, 1)),
    )
}

#[allow(dead_code)]
pub fn at(path: &str, line: u32, character: u32) -> FilePosition {
    FilePosition::new(path, line, character)
}

/// Small two-file workspace:
///
/// ```text
/// x.py: a (0..=3) calls nothing, b (5..=8) calls a
/// y.py: c (0..=4) calls b and a, d (6..=9) is unused
/// ```
#[allow(dead_code)]
pub fn layered_snapshot() -> Snapshot {
    Snapshot::default()
        .with_file(
            "x.py",
            "def a():\n    pass\n\n\n\ndef b():\n    a()\n\n\n",
            vec![function("a", "x.py", 0, 3), function("b", "x.py", 5, 8)],
        )
        .with_file(
            "y.py",
            "def c():\n    b()\n    a()\n\n\n\ndef d():\n    pass\n\n\n",
            vec![function("c", "y.py", 0, 4), function("d", "y.py", 6, 9)],
        )
        .with_references(at("x.py", 0, 4), vec![at("x.py", 6, 4), at("y.py", 2, 4)])
        .with_references(at("x.py", 5, 4), vec![at("y.py", 1, 4)])
}

/// Records every call and delegates to an inner service.
#[allow(dead_code)]
pub struct CountingService<S> {
    inner: S,
    definitions_calls: Mutex<HashMap<String, usize>>,
    reference_calls: Mutex<usize>,
}

#[allow(dead_code)]
impl<S: SymbolService> CountingService<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            definitions_calls: Mutex::new(HashMap::new()),
            reference_calls: Mutex::new(0),
        }
    }

    pub fn definitions_calls(&self, path: &str) -> usize {
        self.definitions_calls
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    pub fn reference_calls(&self) -> usize {
        *self.reference_calls.lock().unwrap()
    }
}

#[async_trait]
impl<S: SymbolService> SymbolService for CountingService<S> {
    async fn list_files(&self) -> ServiceResult<Vec<String>> {
        self.inner.list_files().await
    }

    async fn definitions_in_file(&self, path: &str) -> ServiceResult<Vec<SymbolDefinition>> {
        *self
            .definitions_calls
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default() += 1;
        self.inner.definitions_in_file(path).await
    }

    async fn read_source_code(&self, range: &FileRange) -> ServiceResult<String> {
        self.inner.read_source_code(range).await
    }

    async fn find_references(&self, query: &ReferenceQuery) -> ServiceResult<ReferencesResponse> {
        *self.reference_calls.lock().unwrap() += 1;
        self.inner.find_references(query).await
    }
}

/// Fails reference lookups for one symbol with whatever `error` builds.
#[allow(dead_code)]
pub struct FailingService {
    pub inner: SnapshotService,
    pub fail_on: FilePosition,
    pub error: fn() -> ServiceError,
}

impl FailingService {
    /// Drops the connection on every lookup at `fail_on`.
    pub fn unavailable(inner: SnapshotService, fail_on: FilePosition) -> Self {
        Self {
            inner,
            fail_on,
            error: || ServiceError::Unavailable("connection reset".to_string()),
        }
    }
}

#[async_trait]
impl SymbolService for FailingService {
    async fn list_files(&self) -> ServiceResult<Vec<String>> {
        self.inner.list_files().await
    }

    async fn definitions_in_file(&self, path: &str) -> ServiceResult<Vec<SymbolDefinition>> {
        self.inner.definitions_in_file(path).await
    }

    async fn read_source_code(&self, range: &FileRange) -> ServiceResult<String> {
        self.inner.read_source_code(range).await
    }

    async fn find_references(&self, query: &ReferenceQuery) -> ServiceResult<ReferencesResponse> {
        if query.identifier_position == self.fail_on {
            return Err((self.error)());
        }
        self.inner.find_references(query).await
    }
}
