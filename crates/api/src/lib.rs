pub mod error;
pub mod models;
pub mod service;

// Re-export commonly used types
pub use error::{ServiceError, ServiceResult};
pub use models::*;
pub use service::SymbolService;
