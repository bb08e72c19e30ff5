pub mod config;
pub mod diff;
pub mod error;
pub mod impact;
pub mod logging;
pub mod render;
pub mod snapshot;

pub use error::{BlastscopeError, Result};
