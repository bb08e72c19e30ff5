//! Output formats for analysis results.

pub mod json;
pub mod mermaid;
pub mod text;

pub use json::ImpactExport;
pub use mermaid::{hierarchy_to_mermaid, reference_diagram};
pub use text::{format_code, format_impact_summary, format_references};
