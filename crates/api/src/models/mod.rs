pub mod hierarchy;
pub mod language;
pub mod position;
pub mod symbol;

pub use hierarchy::*;
pub use language::*;
pub use position::*;
pub use symbol::*;
