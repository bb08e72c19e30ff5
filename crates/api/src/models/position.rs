use serde::{Deserialize, Serialize};
use std::fmt;

/// Zero-based location inside a file.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A position anchored to a workspace-relative file path.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePosition {
    pub path: String,
    pub position: Position,
}

impl FilePosition {
    pub fn new(path: impl Into<String>, line: u32, character: u32) -> Self {
        Self {
            path: path.into(),
            position: Position::new(line, character),
        }
    }

    /// Start of a line, the probe used when mapping changed lines to symbols.
    pub fn line_start(path: impl Into<String>, line: u32) -> Self {
        Self::new(path, line, 0)
    }
}

impl fmt::Display for FilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.path,
            self.position.line + 1,
            self.position.character + 1
        )
    }
}

/// Inclusive span inside one file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileRange {
    pub path: String,
    pub start: Position,
    pub end: Position,
}

impl FileRange {
    pub fn new(path: impl Into<String>, start: Position, end: Position) -> Self {
        Self {
            path: path.into(),
            start,
            end,
        }
    }

    pub fn contains(&self, target: &FilePosition) -> bool {
        if target.path != self.path {
            return false;
        }
        let Position { line, character } = target.position;
        if line < self.start.line || line > self.end.line {
            return false;
        }
        if line == self.start.line && character < self.start.character {
            return false;
        }
        if line == self.end.line && character > self.end.character {
            return false;
        }
        true
    }

    pub fn line_count(&self) -> u32 {
        self.end.line.saturating_sub(self.start.line) + 1
    }
}
