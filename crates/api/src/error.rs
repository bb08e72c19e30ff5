#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service has nothing for the requested file or position.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Service unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ServiceError {
    /// A resolution miss contributes nothing to a traversal instead of aborting it.
    pub fn is_resolution_miss(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Malformed(err.to_string())
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
