// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Scalr SDK
//!
//! Typed client for Scalr runs and state versions.
//!
//! The crate validates inputs locally, builds JSON-API requests through the
//! `scalr-http` transport, and maps responses onto strongly-typed models. It
//! does not own any state machine: run status transitions happen on the
//! server, and the client only reports what the server says.
//!
//! # Architecture
//!
//! - Identifier checks reject malformed IDs before any request is sent
//! - [`Runs`]: read, create, apply, cancel, discard (plus polling helpers)
//! - [`StateVersions`]: read by ID, read the current version of a workspace
//! - Errors from the server are surfaced as [`SdkError`] without retries
//!
//! # Example
//!
//! ```no_run
//! use scalr_sdk::{RunApplyOptions, RunCreateOptions, ScalrClient, WaitOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ScalrClient::from_env()?;
//!
//! // Queue a run
//! let run = client
//!     .runs()
//!     .create(RunCreateOptions::new("ws-abc123", "cv-abc123"))
//!     .await?;
//! println!("Created run {} ({})", run.id, run.status);
//!
//! // Wait for the plan, then confirm it
//! let run = client
//!     .runs()
//!     .wait_for(&run.id, WaitOptions::new(), |s| s.is_confirmable() || s.is_terminal())
//!     .await?;
//! if run.status.is_confirmable() {
//!     client
//!         .runs()
//!         .apply(&run.id, RunApplyOptions::new().with_comment("lgtm"))
//!         .await?;
//! }
//!
//! // Inspect the resulting state
//! let state = client
//!     .state_versions()
//!     .read_current_for_workspace("ws-abc123")
//!     .await?;
//! println!("Serial {} in lineage {}", state.serial, state.lineage);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod decode;
mod error;
pub mod id;
mod runs;
mod state_versions;
mod status_transition;
mod types;

pub use client::ScalrClient;
pub use config::{DEFAULT_ADDRESS, DEFAULT_BASE_PATH, SdkConfig};
pub use error::{Result, SdkError, ValidationError};
pub use id::IdKind;
pub use runs::{READ_INCLUDE, Runs, WaitOptions};
pub use state_versions::StateVersions;
pub use status_transition::{StatusTransition, StatusTransitionLog};
pub use types::{
    Apply, ConfigurationVersion, CostEstimate, OutputValue, Plan, PolicyCheck, Run,
    RunApplyOptions, RunCancelOptions, RunCreateOptions, RunDiscardOptions, RunRef, RunSource,
    RunStatus, StateVersion, StateVersionOutput, StateVersionRef, StateVersionResource,
    VcsRevision, Workspace,
};

/// Transport layer, re-exported for custom [`ApiClient`](scalr_http::ApiClient) implementations.
pub use scalr_http;
