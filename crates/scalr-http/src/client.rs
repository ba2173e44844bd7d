// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! The `ApiClient` capability and its reqwest-backed implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, instrument};

use crate::error::HttpError;
use crate::jsonapi::Document;
use crate::request::{ApiRequest, JSON_API_MEDIA_TYPE, Method, RequestBody};

/// Capability for talking to the remote API.
///
/// `new_request` builds a request relative to the API base; `execute` performs
/// transport, authentication and envelope decoding. Implementations are shared
/// across tasks, so they must not rely on per-call mutable state.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Build a request. The default accepts any non-empty relative path.
    fn new_request(
        &self,
        method: Method,
        path: &str,
        body: Option<RequestBody>,
    ) -> Result<ApiRequest, HttpError> {
        if path.is_empty() || path.starts_with('/') {
            return Err(HttpError::InvalidRequest(format!(
                "path must be relative and non-empty, got {:?}",
                path
            )));
        }
        let request = ApiRequest::new(method, path);
        Ok(match body {
            Some(body) => request.with_body(body),
            None => request,
        })
    }

    /// Send a request. Returns `None` for successful responses without a body.
    async fn execute(&self, request: ApiRequest) -> Result<Option<Document>, HttpError>;
}

/// Settings for [`HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Absolute base URL of the API, e.g. `https://acme.scalr.io/api/iacp/v3/`.
    pub base_url: String,
    /// Bearer token; requests are unauthenticated when `None`.
    pub token: Option<String>,
    pub user_agent: String,
    pub skip_cert_verification: bool,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            user_agent: concat!("scalr-http/", env!("CARGO_PKG_VERSION")).to_string(),
            skip_cert_verification: false,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// `ApiClient` over HTTPS using reqwest.
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    request_timeout: Duration,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpError> {
        let base_url = parse_base_url(&config.base_url)?;

        let inner = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(config.skip_cert_verification)
            .build()
            .map_err(|e| HttpError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner,
            base_url,
            token: config.token,
            request_timeout: config.request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Absolute URL for a request, including its query string.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, HttpError> {
        let mut url = self
            .base_url
            .join(&request.path)
            .map_err(|e| HttpError::InvalidRequest(format!("bad path {:?}: {}", request.path, e)))?;
        url.set_query(request.query_string().as_deref());
        Ok(url)
    }

    fn map_send_error(&self, err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.request_timeout.as_millis() as u64)
        } else {
            HttpError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl ApiClient for HttpClient {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn execute(&self, request: ApiRequest) -> Result<Option<Document>, HttpError> {
        let url = self.url_for(&request)?;
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .inner
            .request(method, url)
            .header(reqwest::header::ACCEPT, JSON_API_MEDIA_TYPE);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = &request.body {
            let bytes = body
                .to_bytes()
                .map_err(|e| HttpError::Encode(e.to_string()))?;
            builder = builder.body(bytes);
        }

        // An explicit Content-Type header wins over the body's media type.
        if let Some(content_type) = request.content_type() {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("content-type") {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        debug!("Sending request");
        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_send_error(e))?;
        debug!(status = status.as_u16(), len = bytes.len(), "Received response");

        if !status.is_success() {
            let errors = serde_json::from_slice::<Document>(&bytes)
                .map(|doc| doc.errors)
                .unwrap_or_default();
            return Err(HttpError::Status {
                status: status.as_u16(),
                path: request.path,
                errors,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| HttpError::Decode(e.to_string()))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, HttpError> {
    // Url::join drops the last segment unless the base ends with '/'.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized)
        .map_err(|e| HttpError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(HttpError::Config(format!(
            "unsupported URL scheme {:?} in {:?}",
            other, raw
        ))),
    }
}
