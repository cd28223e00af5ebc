// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability listing for UI gating.
//!
//! Screens enable and disable themselves from this listing instead of
//! re-deriving role and lifecycle rules: an operation appears here only
//! when the actor's role allows it and the current NDR set makes it
//! meaningful (for example, `end_ndr` only while a night is running).

use serde::{Deserialize, Serialize};

use saferide::NdrSet;
use saferide_domain::NdrStatus;

use crate::auth::Role;

/// Operations the API exposes, as capability tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create a pending NDR.
    CreateNdr,
    /// Activate a pending NDR.
    ActivateNdr,
    /// End the running NDR.
    EndNdr,
    /// Archive a completed NDR.
    ArchiveNdr,
    /// Reactivate an archived NDR.
    ReactivateNdr,
    /// Edit assignments and notes.
    UpdateAssignments,
    /// Sign up for (or withdraw from) a night.
    ManageSignup,
    /// Log a phone-in ride.
    LogRide,
    /// Add blacklist entries.
    ManageBlacklist,
}

impl Operation {
    /// Returns the string representation of the operation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateNdr => "create_ndr",
            Self::ActivateNdr => "activate_ndr",
            Self::EndNdr => "end_ndr",
            Self::ArchiveNdr => "archive_ndr",
            Self::ReactivateNdr => "reactivate_ndr",
            Self::UpdateAssignments => "update_assignments",
            Self::ManageSignup => "manage_signup",
            Self::LogRide => "log_ride",
            Self::ManageBlacklist => "manage_blacklist",
        }
    }
}

/// Lists the operations available to a role against the current NDR set.
///
/// # Arguments
///
/// * `role` - The actor's role
/// * `state` - The current NDR set
#[must_use]
pub fn capabilities_for(role: Role, state: &NdrSet) -> Vec<Operation> {
    let has_active: bool = state.active().is_some();
    let has_status =
        |status: NdrStatus| state.ndrs.iter().any(|n| n.status == status);

    let mut operations: Vec<Operation> = vec![Operation::ManageSignup];

    if matches!(role, Role::Director | Role::Deputy) {
        if has_active {
            operations.push(Operation::UpdateAssignments);
            operations.push(Operation::LogRide);
        }
        operations.push(Operation::ManageBlacklist);
    }

    if role == Role::Director {
        operations.push(Operation::CreateNdr);
        if has_status(NdrStatus::Pending) {
            operations.push(Operation::ActivateNdr);
        }
        if has_active {
            operations.push(Operation::EndNdr);
        }
        if has_status(NdrStatus::Completed) {
            operations.push(Operation::ArchiveNdr);
        }
        if has_status(NdrStatus::Archived) {
            operations.push(Operation::ReactivateNdr);
        }
    }

    operations.sort();
    operations
}
