// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Scalr HTTP transport
//!
//! The request/response plumbing shared by every Scalr API binding:
//!
//! - [`ApiRequest`] describes a call relative to the API base URL
//! - [`Document`] and friends model the JSON-API envelope
//! - [`ApiClient`] is the capability the typed SDK is written against
//! - [`HttpClient`] implements it with reqwest (auth, timeouts, error envelopes)
//!
//! Retries and rate limiting are not handled here; a failed call surfaces as
//! an [`HttpError`] to the caller.

mod client;
mod error;
pub mod jsonapi;
mod request;

pub use client::{ApiClient, HttpClient, HttpClientConfig};
pub use error::HttpError;
pub use jsonapi::{Document, ErrorObject, Linkage, PrimaryData, Relationship, Resource, ResourceIdentifier};
pub use request::{
    ApiRequest, JSON_API_MEDIA_TYPE, JSON_MEDIA_TYPE, Method, RequestBody, escape_path_segment,
};
