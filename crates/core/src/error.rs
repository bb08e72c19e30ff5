use blastscope_api::ServiceError;
use thiserror::Error;

use crate::diff::DiffError;
use crate::impact::TraversalAborted;

#[derive(Error, Debug)]
pub enum BlastscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Diff error: {0}")]
    Diff(#[from] DiffError),
    #[error("Symbol service error: {0}")]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Traversal(#[from] TraversalAborted),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, BlastscopeError>;
