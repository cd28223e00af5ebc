// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use saferide_audit::{AuditEvent, StateSnapshot};
use saferide_domain::{Ndr, NdrId, NdrStatus};

/// The complete NDR set this system coordinates.
///
/// The single-active invariant is a property of the whole set, so
/// transitions are computed against all NDRs, not one document at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct NdrSet {
    /// Every known NDR.
    pub ndrs: Vec<Ndr>,
}

impl NdrSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { ndrs: Vec::new() }
    }

    /// Looks up an NDR by id.
    #[must_use]
    pub fn get(&self, ndr_id: &NdrId) -> Option<&Ndr> {
        self.ndrs.iter().find(|n| &n.ndr_id == ndr_id)
    }

    /// Checks if an NDR with this id exists.
    #[must_use]
    pub fn has(&self, ndr_id: &NdrId) -> bool {
        self.get(ndr_id).is_some()
    }

    /// Returns the currently active NDR, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Ndr> {
        self.ndrs.iter().find(|n| n.status == NdrStatus::Active)
    }

    /// Counts NDRs with active status.
    ///
    /// The single-active invariant requires this to be 0 or 1 after
    /// every completed transition.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.ndrs
            .iter()
            .filter(|n| n.status == NdrStatus::Active)
            .count()
    }

    /// Renders an audit snapshot of one NDR in the set.
    ///
    /// Absent NDRs snapshot as such, for creation events.
    #[must_use]
    pub fn snapshot_of(&self, ndr_id: &NdrId) -> StateSnapshot {
        self.get(ndr_id).map_or_else(
            || StateSnapshot::new(format!("ndr={ndr_id},absent")),
            |ndr| {
                StateSnapshot::new(format!(
                    "ndr={},status={},signups={},active_total={}",
                    ndr.ndr_id,
                    ndr.status,
                    ndr.signups.len(),
                    self.active_count()
                ))
            },
        )
    }
}

impl Default for NdrSet {
    fn default() -> Self {
        Self::new()
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic at the state-value level: they either produce
/// a complete new set or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new NDR set after the transition.
    pub new_state: NdrSet,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}
