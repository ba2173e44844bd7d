// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Run operations.
//!
//! Apply, cancel and discard are transition *requests*: success means the
//! server accepted the request, not that the run reached the target state.
//! Whether a transition is legal for the run's current status is decided by
//! the server; no status is checked locally before sending. Poll
//! [`Runs::read`] (or use [`Runs::wait_for`]) to observe the outcome.

use std::time::Duration;

use scalr_http::{ApiClient, JSON_MEDIA_TYPE, Method, RequestBody, escape_path_segment};
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::decode;
use crate::error::{Result, SdkError};
use crate::id::{self, IdKind};
use crate::types::{
    Run, RunApplyOptions, RunCancelOptions, RunCreateOptions, RunDiscardOptions, RunStatus,
};

/// Relations inlined by [`Runs::read`].
pub const READ_INCLUDE: &str = "vcs-revision,status-transitions";

/// Polling settings for [`Runs::wait_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between two reads.
    pub poll_interval: Duration,
    /// Give up after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            timeout: None,
        }
    }
}

impl WaitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Run operations, borrowed from a [`ScalrClient`](crate::ScalrClient).
pub struct Runs<'a> {
    api: &'a dyn ApiClient,
}

impl<'a> Runs<'a> {
    pub(crate) fn new(api: &'a dyn ApiClient) -> Self {
        Self { api }
    }

    /// Read a run, with its VCS revision and status history inlined.
    #[instrument(skip(self), fields(run_id = %run_id))]
    pub async fn read(&self, run_id: &str) -> Result<Run> {
        id::validate(IdKind::Run, run_id)?;
        debug!("Reading run");

        let path = format!("runs/{}", escape_path_segment(run_id));
        let request = self
            .api
            .new_request(Method::Get, &path, None)?
            .with_query("include", READ_INCLUDE);

        let document = self.api.execute(request).await?;
        decode::primary(document)
    }

    /// Create a run from a workspace and configuration version.
    ///
    /// Any caller-supplied `id` is dropped before the request is built.
    #[instrument(skip(self, options))]
    pub async fn create(&self, mut options: RunCreateOptions) -> Result<Run> {
        options.validate()?;
        options.id = None;
        debug!("Creating run");

        let request = self.api.new_request(
            Method::Post,
            "runs",
            Some(RequestBody::JsonApi(options.to_document())),
        )?;

        let document = self.api.execute(request).await?;
        let run: Run = decode::primary(document)?;
        info!(run_id = %run.id, status = %run.status, "Run created");
        Ok(run)
    }

    /// Apply a run that is paused waiting for confirmation after a plan.
    #[instrument(skip(self, options), fields(run_id = %run_id))]
    pub async fn apply(&self, run_id: &str, options: RunApplyOptions) -> Result<()> {
        self.action(run_id, "apply", &options).await
    }

    /// Interrupt a run that is currently planning or applying.
    #[instrument(skip(self, options), fields(run_id = %run_id))]
    pub async fn cancel(&self, run_id: &str, options: RunCancelOptions) -> Result<()> {
        self.action(run_id, "cancel", &options).await
    }

    /// Skip remaining work on a run paused for confirmation or waiting in the queue.
    #[instrument(skip(self, options), fields(run_id = %run_id))]
    pub async fn discard(&self, run_id: &str, options: RunDiscardOptions) -> Result<()> {
        self.action(run_id, "discard", &options).await
    }

    /// Send `POST runs/{id}/actions/{verb}` with a plain JSON body.
    async fn action<T: Serialize>(&self, run_id: &str, verb: &str, options: &T) -> Result<()> {
        id::validate(IdKind::Run, run_id)?;

        let path = format!("runs/{}/actions/{}", escape_path_segment(run_id), verb);
        let body = serde_json::to_value(options)?;
        let request = self
            .api
            .new_request(Method::Post, &path, Some(RequestBody::Json(body)))?
            .with_header("Content-Type", JSON_MEDIA_TYPE);

        self.api.execute(request).await?;
        info!(action = verb, "Run transition accepted");
        Ok(())
    }

    /// Poll a run until `done` holds for its status.
    ///
    /// Errors from any read end the wait. With a timeout set, the wait fails
    /// with [`SdkError::WaitTimeout`] once it elapses. A timeout too large to
    /// represent as a deadline waits indefinitely.
    #[instrument(skip(self, options, done), fields(run_id = %run_id))]
    pub async fn wait_for<F>(&self, run_id: &str, options: WaitOptions, done: F) -> Result<Run>
    where
        F: Fn(&RunStatus) -> bool,
    {
        id::validate(IdKind::Run, run_id)?;
        let deadline = options
            .timeout
            .and_then(|t| Instant::now().checked_add(t));

        loop {
            let run = self.read(run_id).await?;
            if done(&run.status) {
                return Ok(run);
            }
            debug!(run_id = %run_id, status = %run.status, "Run not ready yet");

            if let Some(deadline) = deadline {
                let now = Instant::now();
                if now >= deadline {
                    let waited = options.timeout.unwrap_or_default().as_millis();
                    return Err(SdkError::WaitTimeout(
                        u64::try_from(waited).unwrap_or(u64::MAX),
                    ));
                }
                tokio::time::sleep(options.poll_interval.min(deadline - now)).await;
            } else {
                tokio::time::sleep(options.poll_interval).await;
            }
        }
    }

    /// Poll a run until it reaches a terminal status.
    pub async fn wait_for_terminal(&self, run_id: &str, options: WaitOptions) -> Result<Run> {
        self.wait_for(run_id, options, RunStatus::is_terminal).await
    }
}
