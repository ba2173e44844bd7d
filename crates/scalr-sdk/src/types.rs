// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! High-level types for the SDK.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use scalr_http::{Document, Resource, ResourceIdentifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;
use crate::id::{self, IdKind};
use crate::status_transition::StatusTransitionLog;

/// String-valued enum as sent by the server, with a fallback for values this
/// client predates. Unknown values round-trip unchanged.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Value not known to this version of the SDK.
            Unknown(String),
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( $name::$variant => $wire, )+
                    $name::Unknown(raw) => raw,
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                match raw {
                    $( $wire => $name::$variant, )+
                    other => $name::Unknown(other.to_string()),
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name::from(s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok($name::from(raw.as_str()))
            }
        }
    };
}

wire_enum! {
    /// Run state as reported by the server.
    ///
    /// The server owns the state machine; this enum only names the states.
    /// The usual path is `pending → plan_queued → planning → planned →
    /// [cost_estimating → cost_estimated] → [policy_checking → policy_checked]
    /// → confirmed → apply_queued → applying → applied`, with `canceled`,
    /// `discarded` and `errored` reachable from most non-terminal states.
    pub enum RunStatus {
        Pending => "pending",
        PlanQueued => "plan_queued",
        Planning => "planning",
        Planned => "planned",
        PlannedAndFinished => "planned_and_finished",
        CostEstimating => "cost_estimating",
        CostEstimated => "cost_estimated",
        PolicyChecking => "policy_checking",
        PolicyChecked => "policy_checked",
        PolicyOverride => "policy_override",
        PolicySoftFailed => "policy_soft_failed",
        Confirmed => "confirmed",
        ApplyQueued => "apply_queued",
        Applying => "applying",
        Applied => "applied",
        Canceled => "canceled",
        Discarded => "discarded",
        Errored => "errored",
    }
}

impl RunStatus {
    /// No further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Applied
                | RunStatus::PlannedAndFinished
                | RunStatus::Canceled
                | RunStatus::Discarded
                | RunStatus::Errored
        )
    }

    /// The run is paused after planning, waiting for apply or discard.
    ///
    /// Advisory only: `Runs::apply` never checks it and leaves the decision to
    /// the server.
    pub fn is_confirmable(&self) -> bool {
        matches!(
            self,
            RunStatus::Planned
                | RunStatus::CostEstimated
                | RunStatus::PolicyChecked
                | RunStatus::PolicyOverride
                | RunStatus::PolicySoftFailed
        )
    }

    /// The server is actively working on the run (queued, planning, applying...).
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            RunStatus::Pending
                | RunStatus::PlanQueued
                | RunStatus::Planning
                | RunStatus::CostEstimating
                | RunStatus::PolicyChecking
                | RunStatus::Confirmed
                | RunStatus::ApplyQueued
                | RunStatus::Applying
        )
    }
}

wire_enum! {
    /// What triggered a run.
    pub enum RunSource {
        Api => "api",
        ConfigurationVersion => "configuration-version",
        Ui => "ui",
        Vcs => "vcs",
        Cli => "cli",
    }
}

/// Reference to a resource owned by the server. Only the ID is known locally.
macro_rules! resource_ref {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name {
            pub id: String,
        }

        impl $name {
            /// JSON-API resource type.
            pub const KIND: &'static str = $kind;

            pub fn new(id: impl Into<String>) -> Self {
                Self { id: id.into() }
            }

            pub(crate) fn identifier(&self) -> ResourceIdentifier {
                ResourceIdentifier::new(Self::KIND, self.id.clone())
            }
        }
    };
}

resource_ref!(
    /// Workspace a run executes in.
    Workspace => "workspaces"
);
resource_ref!(
    /// Uploaded configuration a run uses as input.
    ConfigurationVersion => "configuration-versions"
);
resource_ref!(Apply => "applies");
resource_ref!(Plan => "plans");
resource_ref!(CostEstimate => "cost-estimates");
resource_ref!(PolicyCheck => "policy-checks");
resource_ref!(
    /// Run that produced a state version.
    RunRef => "runs"
);
resource_ref!(StateVersionRef => "state-versions");

/// VCS commit a run was triggered from.
///
/// Attributes are only filled when the server inlines the revision, which
/// `Runs::read` always requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsRevision {
    pub id: String,
    pub branch: Option<String>,
    pub commit_sha: Option<String>,
    pub commit_message: Option<String>,
    pub sender_username: Option<String>,
}

impl VcsRevision {
    pub const KIND: &'static str = "vcs-revisions";

    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// One execution attempt against a workspace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    pub id: String,
    pub source: RunSource,
    pub message: String,
    pub is_destroy: bool,
    pub created_at: DateTime<Utc>,
    pub status: RunStatus,

    // Relations
    pub vcs_revision: Option<VcsRevision>,
    pub apply: Option<Apply>,
    pub configuration_version: Option<ConfigurationVersion>,
    pub cost_estimate: Option<CostEstimate>,
    pub plan: Option<Plan>,
    pub policy_checks: Vec<PolicyCheck>,
    pub workspace: Option<Workspace>,
    pub status_transitions: StatusTransitionLog,
}

impl Run {
    pub const KIND: &'static str = "runs";
}

/// Options for creating a run.
#[derive(Debug, Clone, Default)]
pub struct RunCreateOptions {
    /// Never sent: the server assigns run IDs.
    pub id: Option<String>,
    /// Configuration version to use for this run.
    pub configuration_version: Option<ConfigurationVersion>,
    /// Workspace where the run will be executed.
    pub workspace: Option<Workspace>,
}

impl RunCreateOptions {
    /// Options referencing an existing workspace and configuration version.
    pub fn new(workspace_id: impl Into<String>, configuration_version_id: impl Into<String>) -> Self {
        Self {
            id: None,
            configuration_version: Some(ConfigurationVersion::new(configuration_version_id)),
            workspace: Some(Workspace::new(workspace_id)),
        }
    }

    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn with_configuration_version(mut self, cv: ConfigurationVersion) -> Self {
        self.configuration_version = Some(cv);
        self
    }

    /// Check both required references are present and well-formed.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let workspace = self
            .workspace
            .as_ref()
            .ok_or(ValidationError::MissingWorkspace)?;
        if !id::is_valid_for(IdKind::Workspace, &workspace.id) {
            return Err(ValidationError::InvalidWorkspaceId(workspace.id.clone()));
        }

        let cv = self
            .configuration_version
            .as_ref()
            .ok_or(ValidationError::MissingConfigurationVersion)?;
        if !id::is_valid_for(IdKind::ConfigurationVersion, &cv.id) {
            return Err(ValidationError::InvalidConfigurationVersionId(cv.id.clone()));
        }

        Ok(())
    }

    /// JSON-API request body.
    pub(crate) fn to_document(&self) -> Document {
        let mut resource = Resource::new(Run::KIND);
        if let Some(id) = &self.id {
            resource = resource.with_id(id.clone());
        }
        if let Some(cv) = &self.configuration_version {
            resource = resource.with_to_one("configuration-version", cv.identifier());
        }
        if let Some(workspace) = &self.workspace {
            resource = resource.with_to_one("workspace", workspace.identifier());
        }
        Document::single(resource)
    }
}

/// Options for applying a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunApplyOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Schedule the apply instead of running it right away.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_at: Option<DateTime<Utc>>,
}

impl RunApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_apply_at(mut self, at: DateTime<Utc>) -> Self {
        self.apply_at = Some(at);
        self
    }
}

/// Options for canceling a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunCancelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RunCancelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Options for discarding a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDiscardOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RunDiscardOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Value of a state output. Its shape follows the infrastructure output type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutputValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<OutputValue>),
    Map(BTreeMap<String, OutputValue>),
}

impl OutputValue {
    pub fn is_null(&self) -> bool {
        matches!(self, OutputValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OutputValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OutputValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OutputValue::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OutputValue]> {
        match self {
            OutputValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, OutputValue>> {
        match self {
            OutputValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Named output of a state version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateVersionOutput {
    pub name: String,
    #[serde(default)]
    pub value: OutputValue,
    #[serde(default)]
    pub sensitive: bool,
}

/// Resource recorded in a state version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateVersionResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub address: String,
}

/// Immutable snapshot of a workspace's infrastructure state.
///
/// Versions of a workspace form a chain through `previous_state_version` and
/// `next_state_version`. `serial` never decreases along the chain within one
/// `lineage`; a new lineage means the state was recreated from scratch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateVersion {
    pub id: String,
    pub outputs: Vec<StateVersionOutput>,
    pub resources: Vec<StateVersionResource>,
    pub force: bool,
    pub lineage: String,
    pub md5: String,
    pub serial: u64,
    pub size: u64,
    pub created_at: DateTime<Utc>,

    // Relations
    pub run: Option<RunRef>,
    pub next_state_version: Option<StateVersionRef>,
    pub previous_state_version: Option<StateVersionRef>,
    pub workspace: Option<Workspace>,
}

impl StateVersion {
    pub const KIND: &'static str = "state-versions";

    pub fn output(&self, name: &str) -> Option<&StateVersionOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn sensitive_outputs(&self) -> impl Iterator<Item = &StateVersionOutput> {
        self.outputs.iter().filter(|o| o.sensitive)
    }

    pub fn has_same_lineage(&self, other: &StateVersion) -> bool {
        self.lineage == other.lineage
    }

    /// Whether `self` can follow `previous` in one lineage's history.
    pub fn is_successor_of(&self, previous: &StateVersion) -> bool {
        self.has_same_lineage(previous) && self.serial >= previous.serial
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_run_status_has_eighteen_values() {
        assert_eq!(RunStatus::ALL.len(), 18);
        for status in RunStatus::ALL {
            assert_eq!(&RunStatus::from(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let status: RunStatus = serde_json::from_value(json!("awaiting_approval")).unwrap();
        assert_eq!(status, RunStatus::Unknown("awaiting_approval".to_string()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("awaiting_approval"));
        assert!(!status.is_terminal());
        assert!(!status.is_confirmable());
        assert!(!status.is_in_progress());
    }

    #[test]
    fn test_status_categories_do_not_overlap() {
        for status in RunStatus::ALL {
            let flags = [
                status.is_terminal(),
                status.is_confirmable(),
                status.is_in_progress(),
            ];
            assert_eq!(
                flags.iter().filter(|f| **f).count(),
                1,
                "{} must be in exactly one category",
                status
            );
        }
    }

    #[test]
    fn test_run_source_wire_values() {
        assert_eq!(RunSource::ConfigurationVersion.as_str(), "configuration-version");
        assert_eq!("vcs".parse::<RunSource>().unwrap(), RunSource::Vcs);
        assert_eq!(RunSource::ALL.len(), 5);
    }

    #[test]
    fn test_create_options_validation() {
        assert_eq!(
            RunCreateOptions::default().validate(),
            Err(ValidationError::MissingWorkspace)
        );
        assert_eq!(
            RunCreateOptions::default()
                .with_workspace(Workspace::new("ws-1"))
                .validate(),
            Err(ValidationError::MissingConfigurationVersion)
        );
        assert_eq!(
            RunCreateOptions::new("", "cv-1").validate(),
            Err(ValidationError::InvalidWorkspaceId(String::new()))
        );
        assert_eq!(
            RunCreateOptions::new("ws-1", "ws-2").validate(),
            Err(ValidationError::InvalidConfigurationVersionId("ws-2".to_string()))
        );
        assert!(RunCreateOptions::new("ws-1", "cv-1").validate().is_ok());
    }

    #[test]
    fn test_apply_options_serialization() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let opts = RunApplyOptions::new().with_comment("lgtm").with_apply_at(at);
        assert_eq!(
            serde_json::to_value(&opts).unwrap(),
            json!({"comment": "lgtm", "apply-at": "2024-05-01T10:00:00Z"})
        );
        assert_eq!(serde_json::to_value(RunApplyOptions::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_output_value_shapes() {
        let outputs: Vec<StateVersionOutput> = serde_json::from_value(json!([
            {"name": "s", "value": "hello", "sensitive": false},
            {"name": "n", "value": 3.5},
            {"name": "b", "value": true},
            {"name": "l", "value": ["a", 1]},
            {"name": "m", "value": {"k": {"nested": null}}, "sensitive": true},
            {"name": "z", "value": null},
            {"name": "missing"}
        ]))
        .unwrap();

        assert_eq!(outputs[0].value.as_str(), Some("hello"));
        assert_eq!(outputs[1].value.as_f64(), Some(3.5));
        assert_eq!(outputs[2].value.as_bool(), Some(true));
        let list = outputs[3].value.as_list().unwrap();
        assert_eq!(list[0], OutputValue::String("a".to_string()));
        assert!(matches!(list[1], OutputValue::Number(_)));
        let map = outputs[4].value.as_map().unwrap();
        assert!(map["k"].as_map().unwrap()["nested"].is_null());
        assert!(outputs[4].sensitive);
        assert!(outputs[5].value.is_null());
        assert!(outputs[6].value.is_null());
        assert!(!outputs[6].sensitive);

        // Integers keep their representation.
        let back = serde_json::to_value(&outputs[3].value).unwrap();
        assert_eq!(back, json!(["a", 1]));
    }
}
