use crate::wire::{ReadSourceCodeRequest, ReadSourceCodeResponse};
use async_trait::async_trait;
use blastscope_api::{
    FileRange, ReferenceQuery, ReferencesResponse, ServiceError, ServiceResult, SymbolDefinition,
    SymbolService,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct LsproxyConfig {
    /// API root including the version segment, e.g. `http://localhost:4444/v1`.
    pub base_url: String,
    pub auth_token: Option<String>,
    pub timeout: Duration,
}

impl Default for LsproxyConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4444/v1".to_string(),
            auth_token: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Thin JSON client. Every call is a single request; failures are mapped
/// onto `ServiceError` and returned without retrying.
pub struct LsproxyClient {
    client: Client,
    config: LsproxyConfig,
}

impl LsproxyClient {
    pub fn new(config: LsproxyConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Unavailable(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> ServiceResult<T> {
        trace!("lsproxy request: {}", endpoint);
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("{}: {}", endpoint, e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Unavailable(format!("{}: {}", endpoint, e)))?;

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(body_message(endpoint, &body)));
        }
        if !status.is_success() {
            debug!("lsproxy {} answered {}", endpoint, status);
            return Err(ServiceError::Rejected {
                status: status.as_u16(),
                message: body_message(endpoint, &body),
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

fn body_message(endpoint: &str, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        endpoint.to_string()
    } else {
        format!("{}: {}", endpoint, text)
    }
}

#[async_trait]
impl SymbolService for LsproxyClient {
    async fn list_files(&self) -> ServiceResult<Vec<String>> {
        let endpoint = "workspace/list-files";
        self.send(endpoint, self.client.get(self.url(endpoint))).await
    }

    async fn definitions_in_file(&self, path: &str) -> ServiceResult<Vec<SymbolDefinition>> {
        let endpoint = "symbol/definitions-in-file";
        let request = self
            .client
            .get(self.url(endpoint))
            .query(&[("file_path", path)]);
        self.send(endpoint, request).await
    }

    async fn read_source_code(&self, range: &FileRange) -> ServiceResult<String> {
        let endpoint = "workspace/read-source-code";
        let request = self
            .client
            .post(self.url(endpoint))
            .json(&ReadSourceCodeRequest::from(range));
        let response: ReadSourceCodeResponse = self.send(endpoint, request).await?;
        Ok(response.source_code)
    }

    async fn find_references(&self, query: &ReferenceQuery) -> ServiceResult<ReferencesResponse> {
        let endpoint = "symbol/find-references";
        let request = self.client.post(self.url(endpoint)).json(query);
        self.send(endpoint, request).await
    }
}
