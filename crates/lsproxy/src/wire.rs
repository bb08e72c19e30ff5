//! Request and response bodies that differ from the shared models.

use blastscope_api::{FileRange, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct SpanRange {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReadSourceCodeRequest<'a> {
    pub path: &'a str,
    pub range: SpanRange,
}

impl<'a> From<&'a FileRange> for ReadSourceCodeRequest<'a> {
    fn from(range: &'a FileRange) -> Self {
        Self {
            path: &range.path,
            range: SpanRange {
                start: range.start,
                end: range.end,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReadSourceCodeResponse {
    pub source_code: String,
}
