// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Resource identifier validation.
//!
//! Scalr IDs are opaque URL-safe tokens carrying a per-resource prefix
//! (`run-`, `ws-`, ...). Every operation taking an ID checks it here before
//! building a request, so a malformed ID never reaches the network.

use crate::error::{Result, SdkError};

/// Kind of resource an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Run,
    Workspace,
    ConfigurationVersion,
    StateVersion,
}

impl IdKind {
    /// Prefix every ID of this kind starts with.
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Run => "run-",
            IdKind::Workspace => "ws-",
            IdKind::ConfigurationVersion => "cv-",
            IdKind::StateVersion => "sv-",
        }
    }

    /// Name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            IdKind::Run => "run",
            IdKind::Workspace => "workspace",
            IdKind::ConfigurationVersion => "configuration-version",
            IdKind::StateVersion => "state version",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Non-empty token made only of `[A-Za-z0-9._-]`.
pub fn is_valid(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Valid token that carries the prefix of `kind` followed by at least one character.
pub fn is_valid_for(kind: IdKind, id: &str) -> bool {
    is_valid(id)
        && id
            .strip_prefix(kind.prefix())
            .is_some_and(|rest| !rest.is_empty())
}

/// Check an ID argument, producing `InvalidIdentifier` on failure.
pub fn validate(kind: IdKind, id: &str) -> Result<()> {
    if is_valid_for(kind, id) {
        Ok(())
    } else {
        Err(SdkError::InvalidIdentifier {
            kind,
            value: id.to_string(),
        })
    }
}
