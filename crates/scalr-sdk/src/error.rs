// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for scalr-sdk.

use scalr_http::HttpError;
use thiserror::Error;

use crate::id::IdKind;

/// Result type using SdkError.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors that can occur when using the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Configuration error (missing or invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// An ID argument was empty or malformed. No request was sent.
    #[error("invalid value for {kind} ID: {value:?}")]
    InvalidIdentifier { kind: IdKind, value: String },

    /// Create options failed local validation. No request was sent.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Network failure talking to the API.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// `Runs::wait_for` gave up before the run reached the awaited status.
    #[error("run did not reach the awaited status within {0}ms")]
    WaitTimeout(u64),

    /// Token missing, expired or lacking permissions.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server has no such resource.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server refused a transition for the run's current state.
    #[error("invalid run state: {0}")]
    InvalidRunState(String),

    /// Any other error response from the server.
    #[error("server error [{status}]: {message}")]
    Server { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Response did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Problems with run create options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("workspace is required")]
    MissingWorkspace,

    #[error("invalid value for workspace ID: {0:?}")]
    InvalidWorkspaceId(String),

    #[error("configuration-version is required")]
    MissingConfigurationVersion,

    #[error("invalid value for configuration-version ID: {0:?}")]
    InvalidConfigurationVersionId(String),
}

impl SdkError {
    /// Whether the server reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SdkError::NotFound(_))
    }

    /// Whether the error was raised locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            SdkError::Config(_) | SdkError::InvalidIdentifier { .. } | SdkError::Validation(_)
        )
    }
}

impl From<HttpError> for SdkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Status { status, .. } => {
                let message = err.detail();
                match status {
                    401 | 403 => SdkError::Unauthorized(message),
                    404 => SdkError::NotFound(message),
                    409 => SdkError::InvalidRunState(message),
                    _ => SdkError::Server { status, message },
                }
            }
            HttpError::Timeout(ms) => SdkError::Timeout(ms),
            HttpError::Transport(msg) => SdkError::Transport(msg),
            HttpError::Config(msg) => SdkError::Config(msg),
            HttpError::Decode(msg) | HttpError::Encode(msg) => SdkError::Serialization(msg),
            HttpError::InvalidRequest(msg) => SdkError::Transport(format!("invalid request: {}", msg)),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Serialization(err.to_string())
    }
}
