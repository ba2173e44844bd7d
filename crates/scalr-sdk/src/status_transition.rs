// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Status change history of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RunStatus;

/// A single status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub id: String,
    /// Status the run entered.
    pub status: RunStatus,
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl StatusTransition {
    pub const KIND: &'static str = "status-transitions";
}

/// Append-only, chronologically ordered transition history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusTransitionLog {
    entries: Vec<StatusTransition>,
}

impl StatusTransitionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from records in any order. Records with equal timestamps
    /// keep their relative order.
    pub fn from_unordered(mut transitions: Vec<StatusTransition>) -> Self {
        transitions.sort_by_key(|t| t.occurred_at);
        Self {
            entries: transitions,
        }
    }

    /// Append a record. A record older than the latest one is handed back.
    pub fn append(&mut self, transition: StatusTransition) -> Result<(), StatusTransition> {
        if let Some(last) = self.entries.last() {
            if transition.occurred_at < last.occurred_at {
                return Err(transition);
            }
        }
        self.entries.push(transition);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&StatusTransition> {
        self.entries.first()
    }

    /// Most recent transition.
    pub fn latest(&self) -> Option<&StatusTransition> {
        self.entries.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusTransition> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[StatusTransition] {
        &self.entries
    }

    /// Statuses in the order they were entered.
    pub fn statuses(&self) -> impl Iterator<Item = &RunStatus> {
        self.entries.iter().map(|t| &t.status)
    }

    pub fn contains(&self, status: &RunStatus) -> bool {
        self.entries.iter().any(|t| &t.status == status)
    }

    /// When the run first entered `status`.
    pub fn entered_at(&self, status: &RunStatus) -> Option<DateTime<Utc>> {
        self.entries
            .iter()
            .find(|t| &t.status == status)
            .map(|t| t.occurred_at)
    }
}

impl<'a> IntoIterator for &'a StatusTransitionLog {
    type Item = &'a StatusTransition;
    type IntoIter = std::slice::Iter<'a, StatusTransition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn transition(id: &str, status: RunStatus, secs: i64) -> StatusTransition {
        StatusTransition {
            id: id.to_string(),
            status,
            reason: None,
            occurred_at: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_from_unordered_sorts_by_time() {
        let log = StatusTransitionLog::from_unordered(vec![
            transition("st-3", RunStatus::Planned, 30),
            transition("st-1", RunStatus::Pending, 0),
            transition("st-2", RunStatus::Planning, 10),
        ]);

        let ids: Vec<&str> = log.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["st-1", "st-2", "st-3"]);
        assert_eq!(log.first().unwrap().status, RunStatus::Pending);
        assert_eq!(log.latest().unwrap().status, RunStatus::Planned);
    }

    #[test]
    fn test_from_unordered_is_stable_for_ties() {
        let log = StatusTransitionLog::from_unordered(vec![
            transition("st-a", RunStatus::Planned, 5),
            transition("st-b", RunStatus::CostEstimating, 5),
        ]);
        let ids: Vec<&str> = log.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["st-a", "st-b"]);
    }

    #[test]
    fn test_append_rejects_older_record() {
        let mut log = StatusTransitionLog::new();
        assert!(log.append(transition("st-1", RunStatus::Pending, 10)).is_ok());
        assert!(log.append(transition("st-2", RunStatus::Planning, 10)).is_ok());

        let rejected = log
            .append(transition("st-0", RunStatus::Errored, 5))
            .unwrap_err();
        assert_eq!(rejected.id, "st-0");
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_queries() {
        let log = StatusTransitionLog::from_unordered(vec![
            transition("st-1", RunStatus::Pending, 0),
            transition("st-2", RunStatus::Planning, 10),
            transition("st-3", RunStatus::Errored, 20),
        ]);

        assert!(log.contains(&RunStatus::Planning));
        assert!(!log.contains(&RunStatus::Applied));
        assert_eq!(
            log.entered_at(&RunStatus::Errored),
            Some(Utc.timestamp_opt(1_700_000_020, 0).unwrap())
        );
        assert_eq!(
            log.statuses().cloned().collect::<Vec<_>>(),
            vec![RunStatus::Pending, RunStatus::Planning, RunStatus::Errored]
        );
        assert_eq!((&log).into_iter().count(), 3);
        assert!(StatusTransitionLog::new().latest().is_none());
    }
}
