// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Mapping of JSON-API resources onto SDK types.

use chrono::{DateTime, Utc};
use scalr_http::{Document, Resource};
use serde::Deserialize;

use crate::error::{Result, SdkError};
use crate::status_transition::{StatusTransition, StatusTransitionLog};
use crate::types::{
    Apply, ConfigurationVersion, CostEstimate, Plan, PolicyCheck, Run, RunRef, RunSource,
    RunStatus, StateVersion, StateVersionOutput, StateVersionRef, StateVersionResource,
    VcsRevision, Workspace,
};

/// A type that can be built from a resource object, consulting `included`
/// for side-loaded relations.
pub(crate) trait FromResource: Sized {
    const KIND: &'static str;

    fn from_resource(resource: &Resource, document: &Document) -> Result<Self>;
}

/// Decode the primary resource of a response.
pub(crate) fn primary<T: FromResource>(document: Option<Document>) -> Result<T> {
    let document = document.ok_or_else(|| {
        SdkError::UnexpectedResponse(format!("empty response, expected {}", T::KIND))
    })?;
    let resource = document.primary().ok_or_else(|| {
        SdkError::UnexpectedResponse(format!("response has no single {} resource", T::KIND))
    })?;
    if resource.kind != T::KIND {
        return Err(SdkError::UnexpectedResponse(format!(
            "expected {} resource, got {}",
            T::KIND,
            resource.kind
        )));
    }
    T::from_resource(resource, &document)
}

fn resource_id(resource: &Resource) -> Result<String> {
    resource
        .id
        .clone()
        .ok_or_else(|| SdkError::UnexpectedResponse(format!("{} resource without id", resource.kind)))
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RunAttributes {
    source: RunSource,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    is_destroy: Option<bool>,
    created_at: DateTime<Utc>,
    status: RunStatus,
}

impl FromResource for Run {
    const KIND: &'static str = Run::KIND;

    fn from_resource(resource: &Resource, document: &Document) -> Result<Self> {
        let attrs: RunAttributes = resource.attributes_as()?;

        let vcs_revision = match resource.to_one("vcs-revision") {
            Some(target) => Some(match document.find_included(&target.kind, &target.id) {
                Some(included) => VcsRevision::from_resource(included, document)?,
                None => VcsRevision::new(&target.id),
            }),
            None => None,
        };

        // Transitions that were not side-loaded carry no status, so they are
        // left out rather than invented.
        let transitions = resource
            .to_many("status-transitions")
            .iter()
            .filter_map(|target| document.find_included(&target.kind, &target.id))
            .map(|included| StatusTransition::from_resource(included, document))
            .collect::<Result<Vec<_>>>()?;

        Ok(Run {
            id: resource_id(resource)?,
            source: attrs.source,
            message: attrs.message.unwrap_or_default(),
            is_destroy: attrs.is_destroy.unwrap_or(false),
            created_at: attrs.created_at,
            status: attrs.status,
            vcs_revision,
            apply: resource.to_one("apply").map(|t| Apply::new(&t.id)),
            configuration_version: resource
                .to_one("configuration-version")
                .map(|t| ConfigurationVersion::new(&t.id)),
            cost_estimate: resource
                .to_one("cost-estimate")
                .map(|t| CostEstimate::new(&t.id)),
            plan: resource.to_one("plan").map(|t| Plan::new(&t.id)),
            policy_checks: resource
                .to_many("policy-checks")
                .iter()
                .map(|t| PolicyCheck::new(&t.id))
                .collect(),
            workspace: resource.to_one("workspace").map(|t| Workspace::new(&t.id)),
            status_transitions: StatusTransitionLog::from_unordered(transitions),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct VcsRevisionAttributes {
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    commit_sha: Option<String>,
    #[serde(default)]
    commit_message: Option<String>,
    #[serde(default)]
    sender_username: Option<String>,
}

impl FromResource for VcsRevision {
    const KIND: &'static str = VcsRevision::KIND;

    fn from_resource(resource: &Resource, _document: &Document) -> Result<Self> {
        let attrs: VcsRevisionAttributes = resource.attributes_as()?;
        Ok(VcsRevision {
            id: resource_id(resource)?,
            branch: attrs.branch,
            commit_sha: attrs.commit_sha,
            commit_message: attrs.commit_message,
            sender_username: attrs.sender_username,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StatusTransitionAttributes {
    status: RunStatus,
    #[serde(default)]
    reason: Option<String>,
    occurred_at: DateTime<Utc>,
}

impl FromResource for StatusTransition {
    const KIND: &'static str = StatusTransition::KIND;

    fn from_resource(resource: &Resource, _document: &Document) -> Result<Self> {
        let attrs: StatusTransitionAttributes = resource.attributes_as()?;
        Ok(StatusTransition {
            id: resource_id(resource)?,
            status: attrs.status,
            reason: attrs.reason,
            occurred_at: attrs.occurred_at,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct StateVersionAttributes {
    #[serde(default)]
    outputs: Option<Vec<StateVersionOutput>>,
    #[serde(default)]
    resources: Option<Vec<StateVersionResource>>,
    #[serde(default)]
    force: bool,
    #[serde(default)]
    lineage: String,
    #[serde(default)]
    md5: String,
    #[serde(default)]
    serial: u64,
    #[serde(default)]
    size: u64,
    created_at: DateTime<Utc>,
}

impl FromResource for StateVersion {
    const KIND: &'static str = StateVersion::KIND;

    fn from_resource(resource: &Resource, _document: &Document) -> Result<Self> {
        let attrs: StateVersionAttributes = resource.attributes_as()?;
        Ok(StateVersion {
            id: resource_id(resource)?,
            outputs: attrs.outputs.unwrap_or_default(),
            resources: attrs.resources.unwrap_or_default(),
            force: attrs.force,
            lineage: attrs.lineage,
            md5: attrs.md5,
            serial: attrs.serial,
            size: attrs.size,
            created_at: attrs.created_at,
            run: resource.to_one("run").map(|t| RunRef::new(&t.id)),
            next_state_version: resource
                .to_one("next-state-version")
                .map(|t| StateVersionRef::new(&t.id)),
            previous_state_version: resource
                .to_one("previous-state-version")
                .map(|t| StateVersionRef::new(&t.id)),
            workspace: resource.to_one("workspace").map(|t| Workspace::new(&t.id)),
        })
    }
}
