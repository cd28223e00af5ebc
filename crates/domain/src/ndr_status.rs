// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! NDR status tracking and transition logic.
//!
//! This module defines the Night Duty Run lifecycle states and valid
//! transitions. Transitions are director-initiated only; the system never
//! advances status based on time alone.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle states of a Night Duty Run.
///
/// At most one NDR may be `Active` system-wide at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NdrStatus {
    /// Created alongside its operating-night event; not yet running.
    #[default]
    Pending,
    /// The night is running. Assignments and notes are editable.
    Active,
    /// The night has ended. Ride statistics are final.
    Completed,
    /// A human-readable summary has been snapshotted; read-only.
    Archived,
}

impl NdrStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(DomainError::InvalidNdrStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if the NDR's editable documents (assignments, notes)
    /// may still be modified in this status.
    #[must_use]
    pub const fn is_editable(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - `Pending` → `Active` (activate)
    /// - `Active` → `Completed` (end)
    /// - `Completed` → `Archived` (archive)
    /// - `Archived` → `Active` (reactivate)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Completed, Self::Archived)
                | (Self::Archived, Self::Active)
        )
    }

    /// Validates a transition from this status to another.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is
    /// not one of the permitted lifecycle arcs.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.can_transition_to(new_status) {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by NDR lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for NdrStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for NdrStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
