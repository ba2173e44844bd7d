// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transport-agnostic request description.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use crate::jsonapi::Document;

/// Media type of JSON-API payloads.
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";
/// Media type of plain JSON payloads.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Characters left untouched in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters left untouched in query keys and values. Commas stay literal so
/// `include=a,b` reaches the server as written.
const QUERY_COMPONENT: &AsciiSet = &PATH_SEGMENT.remove(b',');

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON-API document, sent as `application/vnd.api+json`.
    JsonApi(Document),
    /// Plain JSON, sent as `application/json`.
    Json(Value),
}

impl RequestBody {
    pub fn content_type(&self) -> &'static str {
        match self {
            RequestBody::JsonApi(_) => JSON_API_MEDIA_TYPE,
            RequestBody::Json(_) => JSON_MEDIA_TYPE,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            RequestBody::JsonApi(doc) => serde_json::to_vec(doc),
            RequestBody::Json(value) => serde_json::to_vec(value),
        }
    }
}

/// A request relative to the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base, without a leading slash (`runs/run-1`).
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header, replacing any existing value with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Effective content type: explicit header first, then the body's own.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
            .or_else(|| self.body.as_ref().map(RequestBody::content_type))
    }

    /// Encoded query string without the leading `?`, or `None` when empty.
    pub fn query_string(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        Some(
            self.query
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}={}",
                        utf8_percent_encode(k, QUERY_COMPONENT),
                        utf8_percent_encode(v, QUERY_COMPONENT)
                    )
                })
                .collect::<Vec<_>>()
                .join("&"),
        )
    }
}

/// Percent-encode a value for use as a single path segment.
pub fn escape_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_string_keeps_commas() {
        let req = ApiRequest::new(Method::Get, "runs/run-1")
            .with_query("include", "vcs-revision,status-transitions");
        assert_eq!(
            req.query_string().as_deref(),
            Some("include=vcs-revision,status-transitions")
        );
    }

    #[test]
    fn test_query_string_escapes_reserved() {
        let req = ApiRequest::new(Method::Get, "x")
            .with_query("filter[name]", "a b&c")
            .with_query("page", "2");
        assert_eq!(
            req.query_string().as_deref(),
            Some("filter%5Bname%5D=a%20b%26c&page=2")
        );
        assert!(ApiRequest::new(Method::Get, "x").query_string().is_none());
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut req = ApiRequest::new(Method::Post, "runs")
            .with_header("content-type", JSON_API_MEDIA_TYPE);
        req.set_header("Content-Type", JSON_MEDIA_TYPE);
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("CONTENT-TYPE"), Some(JSON_MEDIA_TYPE));
    }

    #[test]
    fn test_content_type_prefers_explicit_header() {
        let req = ApiRequest::new(Method::Post, "runs")
            .with_body(RequestBody::JsonApi(Document::default()));
        assert_eq!(req.content_type(), Some(JSON_API_MEDIA_TYPE));

        let req = req.with_header("Content-Type", JSON_MEDIA_TYPE);
        assert_eq!(req.content_type(), Some(JSON_MEDIA_TYPE));

        let req = ApiRequest::new(Method::Post, "x").with_body(RequestBody::Json(json!({})));
        assert_eq!(req.content_type(), Some(JSON_MEDIA_TYPE));
        assert_eq!(ApiRequest::new(Method::Get, "x").content_type(), None);
    }

    #[test]
    fn test_escape_path_segment() {
        assert_eq!(escape_path_segment("run-abc123"), "run-abc123");
        assert_eq!(escape_path_segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
    }
}
