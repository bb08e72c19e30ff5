use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Display language of a source file, used to tag fenced code in reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(Cow<'static, str>);

impl Language {
    pub const RUST: Language = Language(Cow::Borrowed("rust"));
    pub const PYTHON: Language = Language(Cow::Borrowed("python"));
    pub const TYPESCRIPT: Language = Language(Cow::Borrowed("typescript"));
    pub const JAVASCRIPT: Language = Language(Cow::Borrowed("javascript"));
    pub const JAVA: Language = Language(Cow::Borrowed("java"));
    pub const GO: Language = Language(Cow::Borrowed("go"));
    pub const CPP: Language = Language(Cow::Borrowed("cpp"));
    pub const CSHARP: Language = Language(Cow::Borrowed("csharp"));
    pub const PHP: Language = Language(Cow::Borrowed("php"));
    pub const RUBY: Language = Language(Cow::Borrowed("ruby"));
    pub const UNKNOWN: Language = Language(Cow::Borrowed(""));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => Self::RUST,
            "py" | "pyi" => Self::PYTHON,
            "ts" | "tsx" => Self::TYPESCRIPT,
            "js" | "jsx" | "mjs" | "cjs" => Self::JAVASCRIPT,
            "java" => Self::JAVA,
            "go" => Self::GO,
            "c" | "cc" | "cpp" | "cxx" | "h" | "hpp" => Self::CPP,
            "cs" => Self::CSHARP,
            "php" => Self::PHP,
            "rb" => Self::RUBY,
            _ => Self::UNKNOWN,
        }
    }

    pub fn from_path(path: &str) -> Self {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::UNKNOWN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("server/src/handlers/chunk_handler.rs"), Language::RUST);
        assert_eq!(Language::from_path("frontends/search/src/App.tsx"), Language::TYPESCRIPT);
        assert_eq!(Language::from_path("Makefile"), Language::UNKNOWN);
    }
}
