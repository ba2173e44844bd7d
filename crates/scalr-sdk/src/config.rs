// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the SDK.

use std::time::Duration;

use scalr_http::HttpClientConfig;

use crate::error::{Result, SdkError};

/// Default API host.
pub const DEFAULT_ADDRESS: &str = "https://scalr.io";
/// Path of the API below the host.
pub const DEFAULT_BASE_PATH: &str = "/api/iacp/v3/";

/// Configuration for the ScalrClient.
#[derive(Clone)]
pub struct SdkConfig {
    /// Scheme and host of the Scalr account, e.g. `https://acme.scalr.io`.
    pub address: String,
    /// API path appended to `address`.
    pub base_path: String,
    /// API token sent as a bearer credential.
    pub token: Option<String>,
    /// Skip TLS certificate verification (development only).
    pub skip_cert_verification: bool,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Request timeout, applied to every call.
    pub request_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("address", &self.address)
            .field("base_path", &self.base_path)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("skip_cert_verification", &self.skip_cert_verification)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            token: None,
            skip_cert_verification: false,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("scalr-sdk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SdkConfig {
    /// Create a configuration for the given account address.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Create a configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SCALR_ADDRESS`: Account address (default: "https://scalr.io")
    /// - `SCALR_TOKEN`: API token (default: none)
    /// - `SCALR_SKIP_CERT_VERIFICATION`: Skip TLS verification (default: "false")
    /// - `SCALR_CONNECT_TIMEOUT_MS`: Connection timeout in milliseconds (default: 10000)
    /// - `SCALR_REQUEST_TIMEOUT_MS`: Request timeout in milliseconds (default: 30000)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SdkConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let address = lookup("SCALR_ADDRESS").unwrap_or(defaults.address);

        let token = lookup("SCALR_TOKEN").filter(|t| !t.trim().is_empty());

        let skip_cert_verification = lookup("SCALR_SKIP_CERT_VERIFICATION")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        let connect_timeout_ms: u64 = lookup("SCALR_CONNECT_TIMEOUT_MS")
            .unwrap_or_else(|| "10000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid SCALR_CONNECT_TIMEOUT_MS: {}", e)))?;

        let request_timeout_ms: u64 = lookup("SCALR_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|| "30000".to_string())
            .parse()
            .map_err(|e| SdkError::Config(format!("invalid SCALR_REQUEST_TIMEOUT_MS: {}", e)))?;

        Ok(Self {
            address,
            token,
            skip_cert_verification,
            connect_timeout: Duration::from_millis(connect_timeout_ms),
            request_timeout: Duration::from_millis(request_timeout_ms),
            ..defaults
        })
    }

    /// Set the account address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the API path.
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the API token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Enable or disable certificate verification skipping.
    pub fn with_skip_cert_verification(mut self, skip: bool) -> Self {
        self.skip_cert_verification = skip;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Full API base URL: address and base path joined by exactly one slash.
    pub fn base_url(&self) -> String {
        format!(
            "{}/{}",
            self.address.trim_end_matches('/'),
            self.base_path.trim_start_matches('/')
        )
    }

    pub(crate) fn to_http_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            base_url: self.base_url(),
            token: self.token.clone(),
            user_agent: self.user_agent.clone(),
            skip_cert_verification: self.skip_cert_verification,
            connect_timeout: self.connect_timeout,
            request_timeout: self.request_timeout,
        }
    }
}
