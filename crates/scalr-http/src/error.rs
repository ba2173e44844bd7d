// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for scalr-http.

use thiserror::Error;

use crate::jsonapi::ErrorObject;

/// Errors produced while building, sending or decoding an API request.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Client configuration is unusable (bad base URL, TLS setup).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Network or protocol failure before a response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured deadline.
    #[error("request timed out after {0}ms")]
    Timeout(u64),

    /// The server answered with a non-success status.
    #[error("{path} returned HTTP {status}{}", describe_errors(.errors))]
    Status {
        status: u16,
        path: String,
        errors: Vec<ErrorObject>,
    },

    /// The response body was not a valid JSON-API document.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(String),
}

impl HttpError {
    /// HTTP status code, when the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Human-readable detail from the error envelope, falling back to the path.
    pub fn detail(&self) -> String {
        match self {
            HttpError::Status { path, errors, .. } => {
                let details: Vec<&str> = errors.iter().filter_map(ErrorObject::message).collect();
                if details.is_empty() {
                    path.clone()
                } else {
                    details.join("; ")
                }
            }
            other => other.to_string(),
        }
    }
}

fn describe_errors(errors: &[ErrorObject]) -> String {
    let details: Vec<&str> = errors.iter().filter_map(ErrorObject::message).collect();
    if details.is_empty() {
        String::new()
    } else {
        format!(": {}", details.join("; "))
    }
}
