// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! State version read tests.

mod common;

use common::{API, RecordingApi, client_for, client_over, state_version_document};
use scalr_sdk::{IdKind, RunRef, SdkError, StateVersionRef, Workspace};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_read_state_version() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/state-versions/sv-42")))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_version_document("sv-42", 7)))
        .expect(1)
        .mount(&server)
        .await;

    let sv = client_for(&server)
        .state_versions()
        .read("sv-42")
        .await
        .unwrap();

    assert_eq!(sv.id, "sv-42");
    assert_eq!(sv.serial, 7);
    assert_eq!(sv.size, 1024);
    assert_eq!(sv.lineage, "lin-abc");
    assert!(!sv.force);
    assert_eq!(sv.run, Some(RunRef::new("run-1")));
    assert_eq!(sv.workspace, Some(Workspace::new("ws-1")));
    assert_eq!(sv.previous_state_version, Some(StateVersionRef::new("sv-0")));
    assert_eq!(sv.next_state_version, None);

    assert_eq!(
        sv.output("endpoint").and_then(|o| o.value.as_str()),
        Some("https://app.example.com")
    );
    let sensitive: Vec<_> = sv.sensitive_outputs().map(|o| o.name.as_str()).collect();
    assert_eq!(sensitive, vec!["db_password"]);

    assert_eq!(sv.resources.len(), 2);
    assert_eq!(sv.resources[0].module, None);
    assert_eq!(sv.resources[1].module.as_deref(), Some("module.assets"));
}

#[tokio::test]
async fn test_read_current_for_workspace() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/workspaces/ws-1/current-state-version")))
        .respond_with(ResponseTemplate::new(200).set_body_json(state_version_document("sv-9", 9)))
        .expect(1)
        .mount(&server)
        .await;

    let sv = client_for(&server)
        .state_versions()
        .read_current_for_workspace("ws-1")
        .await
        .unwrap();
    assert_eq!(sv.id, "sv-9");
    assert_eq!(sv.serial, 9);
}

#[tokio::test]
async fn test_workspace_without_state_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{API}/workspaces/ws-empty/current-state-version")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": [{"status": "404", "title": "Not Found"}]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .state_versions()
        .read_current_for_workspace("ws-empty")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_empty_outputs_and_resources_decode_to_empty() {
    let api = RecordingApi::with_response(json!({
        "data": {
            "type": "state-versions",
            "id": "sv-1",
            "attributes": {
                "serial": 0,
                "lineage": "lin-new",
                "created-at": "2024-03-02T08:00:00Z",
                "outputs": null
            }
        }
    }));

    let sv = client_over(api)
        .state_versions()
        .read("sv-1")
        .await
        .unwrap();
    assert!(sv.outputs.is_empty());
    assert!(sv.resources.is_empty());
    assert!(sv.run.is_none());
}

#[tokio::test]
async fn test_lineage_helpers() {
    let older = client_over(RecordingApi::with_response(state_version_document("sv-1", 3)))
        .state_versions()
        .read("sv-1")
        .await
        .unwrap();
    let newer = client_over(RecordingApi::with_response(state_version_document("sv-2", 4)))
        .state_versions()
        .read("sv-2")
        .await
        .unwrap();

    assert!(newer.has_same_lineage(&older));
    assert!(newer.is_successor_of(&older));
    assert!(!older.is_successor_of(&newer));
}

#[tokio::test]
async fn test_invalid_ids_send_nothing() {
    let api = RecordingApi::new();
    let client = client_over(api.clone());
    let state_versions = client.state_versions();

    let err = state_versions.read("").await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::InvalidIdentifier {
            kind: IdKind::StateVersion,
            ..
        }
    ));
    assert!(state_versions.read("run-1").await.is_err());
    assert!(state_versions.read("sv-1?x=y").await.is_err());

    let err = state_versions
        .read_current_for_workspace("ws-")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SdkError::InvalidIdentifier {
            kind: IdKind::Workspace,
            ..
        }
    ));

    assert_eq!(api.calls(), 0);
}

#[tokio::test]
async fn test_empty_response_is_unexpected() {
    let api = RecordingApi::new();
    let err = client_over(api.clone())
        .state_versions()
        .read("sv-1")
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::UnexpectedResponse(_)));
    assert_eq!(api.calls(), 1);
}
