//! Layered configuration: defaults, then a TOML file, then environment.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const BASE_URL_ENV: &str = "BLASTSCOPE_BASE_URL";
pub const TOKEN_ENV: &str = "BLASTSCOPE_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlastscopeConfig {
    pub service: ServiceConfig,
    pub analysis: AnalysisConfig,
    pub render: RenderConfig,
}

/// Where the symbol service lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout_secs: u64,
    /// Serve symbols from a JSON snapshot instead of a live server.
    pub snapshot: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4444/v1".to_string(),
            auth_token: None,
            timeout_secs: 60,
            snapshot: None,
        }
    }
}

impl ServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Stop expanding after this many symbols; `None` walks the full closure.
    pub max_nodes: Option<usize>,
    /// Fetch each affected symbol's body text.
    pub read_source: bool,
    /// Context lines requested around each reference by `show`.
    pub context_lines: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_nodes: None,
            read_source: true,
            context_lines: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    pub max_path_chars: usize,
    pub max_symbol_chars: usize,
    pub max_symbols_per_edge: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_path_chars: 28,
            max_symbol_chars: 20,
            max_symbols_per_edge: 5,
        }
    }
}

impl BlastscopeConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".blastscope").join("config.toml"))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load `path` if given, else the default file when it exists, then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        let mut config = match file {
            Some(p) => {
                tracing::debug!("Loading config from {}", p.display());
                Self::from_toml_str(&std::fs::read_to_string(&p)?)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.service.base_url = url;
        }
        if let Some(token) = lookup(TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.service.auth_token = Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = BlastscopeConfig::from_toml_str(
            r#"
            [service]
            base_url = "http://lsproxy:4444/v1"

            [analysis]
            max_nodes = 200
            "#,
        )
        .unwrap();

        assert_eq!(config.service.base_url, "http://lsproxy:4444/v1");
        assert_eq!(config.service.timeout_secs, 60);
        assert_eq!(config.analysis.max_nodes, Some(200));
        assert!(config.analysis.read_source);
        assert_eq!(config.render, RenderConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [(BASE_URL_ENV, "http://other/v1"), (TOKEN_ENV, "")]
            .into_iter()
            .collect();
        let mut config = BlastscopeConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.service.base_url, "http://other/v1");
        assert_eq!(config.service.auth_token, None);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[render]\nmax_path_chars = 40\n").unwrap();

        let config = BlastscopeConfig::load(Some(&path)).unwrap();
        assert_eq!(config.render.max_path_chars, 40);
        assert_eq!(config.render.max_symbols_per_edge, 5);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(BlastscopeConfig::from_toml_str("[analysis]\nmax_nodes = \"many\"").is_err());
    }
}
