use blastscope_api::SymbolService;
use blastscope_core::config::ServiceConfig;
use blastscope_core::logging::LogOptions;
use blastscope_core::snapshot::SnapshotService;
use blastscope_lsproxy::{LsproxyClient, LsproxyConfig};
use std::sync::Arc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

/// Picks the symbol service backend for a run.
///
/// A configured snapshot file wins over the HTTP endpoint so that offline
/// analysis never touches the network.
pub fn build_symbol_service(config: &ServiceConfig) -> blastscope_core::Result<Arc<dyn SymbolService>> {
    if let Some(path) = &config.snapshot {
        info!("Using snapshot service from {}", path.display());
        return Ok(Arc::new(SnapshotService::from_json_file(path)?));
    }

    info!("Using lsproxy at {}", config.base_url);
    let client = LsproxyClient::new(LsproxyConfig {
        base_url: config.base_url.clone(),
        auth_token: config.auth_token.clone(),
        timeout: config.timeout(),
    })?;
    Ok(Arc::new(client))
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    blastscope_core::logging::init_logging(
        component,
        LogOptions {
            to_stderr,
            ..LogOptions::default()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use blastscope_core::BlastscopeError;

    #[tokio::test]
    async fn test_snapshot_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, r#"{"files": {"a.py": {"source": "x = 1\n"}}}"#).unwrap();

        let config = ServiceConfig {
            snapshot: Some(path),
            ..ServiceConfig::default()
        };
        let service = build_symbol_service(&config).unwrap();
        assert_eq!(service.list_files().await.unwrap(), vec!["a.py".to_string()]);
    }

    #[test]
    fn test_missing_snapshot_is_an_io_error() {
        let config = ServiceConfig {
            snapshot: Some("/nonexistent/snapshot.json".into()),
            ..ServiceConfig::default()
        };
        assert!(matches!(
            build_symbol_service(&config),
            Err(BlastscopeError::Io(_))
        ));
    }

    #[test]
    fn test_http_backend_by_default() {
        assert!(build_symbol_service(&ServiceConfig::default()).is_ok());
    }
}
