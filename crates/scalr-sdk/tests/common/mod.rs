// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Shared fixtures for scalr-sdk integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scalr_sdk::scalr_http::{ApiClient, ApiRequest, Document, HttpError};
use scalr_sdk::{ScalrClient, SdkConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const API: &str = "/api/iacp/v3";

/// Client pointed at the mock server, authenticated with `test-token`.
pub fn client_for(server: &MockServer) -> ScalrClient {
    ScalrClient::new(SdkConfig::new(server.uri()).with_token("test-token")).unwrap()
}

/// Minimal run resource document.
pub fn run_document(id: &str, status: &str) -> Value {
    json!({
        "data": {
            "type": "runs",
            "id": id,
            "attributes": {
                "source": "api",
                "message": "Queued manually",
                "is-destroy": false,
                "created-at": "2024-03-01T12:00:00Z",
                "status": status
            },
            "relationships": {
                "workspace": {"data": {"type": "workspaces", "id": "ws-1"}},
                "configuration-version": {"data": {"type": "configuration-versions", "id": "cv-1"}}
            }
        }
    })
}

pub fn state_version_document(id: &str, serial: u64) -> Value {
    json!({
        "data": {
            "type": "state-versions",
            "id": id,
            "attributes": {
                "serial": serial,
                "lineage": "lin-abc",
                "md5": "d41d8cd98f00b204e9800998ecf8427e",
                "size": 1024,
                "force": false,
                "created-at": "2024-03-02T08:00:00Z",
                "outputs": [
                    {"name": "endpoint", "value": "https://app.example.com", "sensitive": false},
                    {"name": "db_password", "value": "hunter2", "sensitive": true}
                ],
                "resources": [
                    {"type": "aws_instance", "address": "aws_instance.web"},
                    {"type": "aws_s3_bucket", "module": "module.assets", "address": "module.assets.aws_s3_bucket.this"}
                ]
            },
            "relationships": {
                "run": {"data": {"type": "runs", "id": "run-1"}},
                "workspace": {"data": {"type": "workspaces", "id": "ws-1"}},
                "previous-state-version": {"data": {"type": "state-versions", "id": "sv-0"}},
                "next-state-version": {"data": null}
            }
        }
    })
}

/// Transport that records every executed request and answers with a canned document.
#[derive(Default)]
pub struct RecordingApi {
    pub requests: Mutex<Vec<ApiRequest>>,
    pub response: Mutex<Option<Document>>,
}

impl RecordingApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_response(value: Value) -> Arc<Self> {
        let api = Self::default();
        *api.response.lock().unwrap() = Some(serde_json::from_value(value).unwrap());
        Arc::new(api)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ApiClient for RecordingApi {
    async fn execute(&self, request: ApiRequest) -> Result<Option<Document>, HttpError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.lock().unwrap().clone())
    }
}

pub fn client_over(api: Arc<RecordingApi>) -> ScalrClient {
    ScalrClient::with_api_client(api, SdkConfig::default())
}
