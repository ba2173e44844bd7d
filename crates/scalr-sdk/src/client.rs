// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! ScalrClient, the entry point to every operation.

use std::sync::Arc;

use scalr_http::{ApiClient, HttpClient};
use tracing::debug;

use crate::config::SdkConfig;
use crate::error::Result;
use crate::runs::Runs;
use crate::state_versions::StateVersions;

/// Client for the Scalr API.
///
/// Cheap to clone: clones share the underlying transport. The client holds no
/// mutable state, so any number of calls may run concurrently.
#[derive(Clone)]
pub struct ScalrClient {
    api: Arc<dyn ApiClient>,
    config: SdkConfig,
}

impl std::fmt::Debug for ScalrClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalrClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScalrClient {
    /// Create a client talking HTTPS to the configured account.
    pub fn new(config: SdkConfig) -> Result<Self> {
        let http = HttpClient::new(config.to_http_config())?;
        debug!(base_url = %http.base_url(), "Created Scalr client");
        Ok(Self {
            api: Arc::new(http),
            config,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = SdkConfig::from_env()?;
        Self::new(config)
    }

    /// Create a client over a custom transport.
    pub fn with_api_client(api: Arc<dyn ApiClient>, config: SdkConfig) -> Self {
        Self { api, config }
    }

    /// Get the SDK configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    /// Run operations.
    pub fn runs(&self) -> Runs<'_> {
        Runs::new(self.api.as_ref())
    }

    /// State version operations.
    pub fn state_versions(&self) -> StateVersions<'_> {
        StateVersions::new(self.api.as_ref())
    }
}
