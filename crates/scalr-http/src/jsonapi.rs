// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! JSON-API envelope model.
//!
//! Only the parts of the JSON-API document format the Scalr API actually uses
//! are modelled: primary data (single or collection), `included` side-loaded
//! resources, relationship linkage and the `errors` array.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level JSON-API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorObject>,
}

/// Primary data of a document: one resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(Box<Resource>),
    Many(Vec<Resource>),
}

impl Document {
    /// Wrap a single resource as primary data.
    pub fn single(resource: Resource) -> Self {
        Self {
            data: Some(PrimaryData::One(Box::new(resource))),
            ..Self::default()
        }
    }

    /// The primary resource, if the document carries exactly one.
    pub fn primary(&self) -> Option<&Resource> {
        match &self.data {
            Some(PrimaryData::One(resource)) => Some(resource),
            _ => None,
        }
    }

    /// Look up a side-loaded resource by type and ID.
    pub fn find_included(&self, kind: &str, id: &str) -> Option<&Resource> {
        self.included
            .iter()
            .find(|r| r.kind == kind && r.id.as_deref() == Some(id))
    }

    /// Add a resource to `included`.
    pub fn with_included(mut self, resource: Resource) -> Self {
        self.included.push(resource);
        self
    }
}

/// A resource object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: String,
    /// Absent on create requests: the server assigns IDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl Resource {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Set a to-one relationship pointing at `target`.
    pub fn with_to_one(mut self, name: impl Into<String>, target: ResourceIdentifier) -> Self {
        self.relationships.insert(
            name.into(),
            Relationship {
                data: Some(Linkage::One(target)),
            },
        );
        self
    }

    /// Set a to-many relationship.
    pub fn with_to_many(
        mut self,
        name: impl Into<String>,
        targets: Vec<ResourceIdentifier>,
    ) -> Self {
        self.relationships.insert(
            name.into(),
            Relationship {
                data: Some(Linkage::Many(targets)),
            },
        );
        self
    }

    /// Deserialize the attribute map into a typed struct.
    pub fn attributes_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.attributes.clone()))
    }

    /// Linkage of a to-one relationship, if present and non-null.
    pub fn to_one(&self, name: &str) -> Option<&ResourceIdentifier> {
        match self.relationships.get(name)?.data.as_ref()? {
            Linkage::One(target) => Some(target),
            Linkage::Many(_) => None,
        }
    }

    /// Linkage of a to-many relationship; empty when absent.
    pub fn to_many(&self, name: &str) -> &[ResourceIdentifier] {
        match self.relationships.get(name).and_then(|r| r.data.as_ref()) {
            Some(Linkage::Many(targets)) => targets,
            _ => &[],
        }
    }
}

/// A relationship entry. `data: null` and a missing `data` both decode to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// `{ "type": ..., "id": ... }` pointer to another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

impl ResourceIdentifier {
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }
}

/// Entry of the `errors` array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorObject {
    /// `detail` when present, otherwise `title`.
    pub fn message(&self) -> Option<&str> {
        self.detail.as_deref().or(self.title.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_single_with_included() {
        let doc: Document = serde_json::from_value(json!({
            "data": {
                "type": "runs",
                "id": "run-1",
                "attributes": {"status": "planning"},
                "relationships": {
                    "workspace": {"data": {"type": "workspaces", "id": "ws-1"}},
                    "status-transitions": {"data": [
                        {"type": "status-transitions", "id": "st-1"}
                    ]},
                    "plan": {"data": null}
                }
            },
            "included": [
                {"type": "status-transitions", "id": "st-1", "attributes": {"status": "pending"}}
            ]
        }))
        .unwrap();

        let run = doc.primary().unwrap();
        assert_eq!(run.kind, "runs");
        assert_eq!(run.to_one("workspace").unwrap().id, "ws-1");
        assert!(run.to_one("plan").is_none());
        assert!(run.to_one("missing").is_none());
        assert_eq!(run.to_many("status-transitions").len(), 1);
        assert!(run.to_many("workspace").is_empty());
        assert!(doc.find_included("status-transitions", "st-1").is_some());
        assert!(doc.find_included("status-transitions", "st-2").is_none());
    }

    #[test]
    fn test_create_body_omits_id() {
        let resource = Resource::new("runs")
            .with_to_one("workspace", ResourceIdentifier::new("workspaces", "ws-1"));
        let value = serde_json::to_value(Document::single(resource)).unwrap();

        assert_eq!(
            value,
            json!({
                "data": {
                    "type": "runs",
                    "relationships": {
                        "workspace": {"data": {"type": "workspaces", "id": "ws-1"}}
                    }
                }
            })
        );
    }

    #[test]
    fn test_collection_has_no_primary() {
        let doc: Document = serde_json::from_value(json!({"data": []})).unwrap();
        assert!(matches!(doc.data, Some(PrimaryData::Many(ref v)) if v.is_empty()));
        assert!(doc.primary().is_none());
    }

    #[test]
    fn test_attributes_as() {
        #[derive(Deserialize)]
        #[serde(rename_all = "kebab-case")]
        struct Attrs {
            is_destroy: bool,
        }

        let resource = Resource::new("runs").with_attribute("is-destroy", json!(true));
        let attrs: Attrs = resource.attributes_as().unwrap();
        assert!(attrs.is_destroy);
    }

    #[test]
    fn test_error_object_message() {
        let doc: Document = serde_json::from_value(json!({
            "errors": [{"status": "404", "title": "not found"}]
        }))
        .unwrap();
        assert_eq!(doc.errors[0].message(), Some("not found"));

        let with_detail = ErrorObject {
            title: Some("Conflict".to_string()),
            detail: Some("Run cannot be applied".to_string()),
            ..ErrorObject::default()
        };
        assert_eq!(with_detail.message(), Some("Run cannot be applied"));
    }
}
