// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! State version reads.

use scalr_http::{ApiClient, Method, escape_path_segment};
use tracing::{debug, instrument};

use crate::decode;
use crate::error::Result;
use crate::id::{self, IdKind};
use crate::types::StateVersion;

/// State version operations, borrowed from a [`ScalrClient`](crate::ScalrClient).
pub struct StateVersions<'a> {
    api: &'a dyn ApiClient,
}

impl<'a> StateVersions<'a> {
    pub(crate) fn new(api: &'a dyn ApiClient) -> Self {
        Self { api }
    }

    /// Read a state version by ID.
    #[instrument(skip(self), fields(state_version_id = %state_version_id))]
    pub async fn read(&self, state_version_id: &str) -> Result<StateVersion> {
        id::validate(IdKind::StateVersion, state_version_id)?;
        debug!("Reading state version");

        let path = format!("state-versions/{}", escape_path_segment(state_version_id));
        self.get(&path).await
    }

    /// Read the state version currently marked as current for a workspace.
    ///
    /// Fails with `NotFound` when the workspace has no state yet.
    #[instrument(skip(self), fields(workspace_id = %workspace_id))]
    pub async fn read_current_for_workspace(&self, workspace_id: &str) -> Result<StateVersion> {
        id::validate(IdKind::Workspace, workspace_id)?;
        debug!("Reading current state version");

        let path = format!(
            "workspaces/{}/current-state-version",
            escape_path_segment(workspace_id)
        );
        self.get(&path).await
    }

    async fn get(&self, path: &str) -> Result<StateVersion> {
        let request = self.api.new_request(Method::Get, path, None)?;
        let document = self.api.execute(request).await?;
        decode::primary(document)
    }
}
