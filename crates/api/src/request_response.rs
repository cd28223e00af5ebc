// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API layer.

use saferide::{NdrSet, TransitionResult};
use saferide_audit::AuditEvent;
use saferide_domain::{
    AssignmentMap, GeoPoint, NightNotes, RideStatistics, RideStatus, StatusTally,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The result of a successful write handler: the caller-facing response
/// plus the transition for the server to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    /// The caller-facing response.
    pub response: T,
    /// The new NDR set to persist.
    pub new_state: NdrSet,
    /// The audit event to persist.
    pub audit_event: AuditEvent,
}

impl<T> ApiResult<T> {
    /// Re-packs the state and audit event for persistence.
    #[must_use]
    pub fn transition(&self) -> TransitionResult {
        TransitionResult {
            new_state: self.new_state.clone(),
            audit_event: self.audit_event.clone(),
        }
    }
}

/// Request to create an NDR for a new operating-night event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNdrRequest {
    /// The id for the new NDR.
    pub ndr_id: String,
    /// Cross-reference to the spawning calendar event.
    pub event_id: Option<String>,
    /// The operating-night event name.
    pub event_name: String,
    /// The event date/time (RFC 3339).
    pub event_date: String,
    /// The operating location.
    pub location: String,
    /// Number of cars available.
    pub car_count: u8,
}

/// Request naming one NDR, used by every lifecycle operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NdrLifecycleRequest {
    /// The target NDR.
    pub ndr_id: String,
}

/// Request to replace the editable assignment map and notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssignmentsRequest {
    /// The NDR being edited.
    pub ndr_id: String,
    /// The new assignment map.
    pub assignments: AssignmentMap,
    /// The new notes document.
    pub notes: NightNotes,
}

/// Request to sign a member up for (or withdraw from) a night.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    /// The target NDR.
    pub ndr_id: String,
    /// The member.
    pub member_id: String,
}

/// Request to log a phone-in ride.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRideRequest {
    /// The id for the new ride.
    pub ride_id: String,
    /// The owning NDR.
    pub ndr_id: String,
    /// The patron's name.
    pub patron_name: String,
    /// The patron's phone number.
    pub patron_phone: String,
    /// Pickup address.
    pub pickup_address: String,
    /// Dropoff address.
    pub dropoff_address: String,
    /// Optional pickup geocoordinates.
    pub pickup_coords: Option<GeoPoint>,
    /// Optional dropoff geocoordinates.
    pub dropoff_coords: Option<GeoPoint>,
    /// Number of riders; omitted counts as 1.
    pub riders: Option<u32>,
}

/// Request to add a blacklist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBlacklistEntryRequest {
    /// Which collection: "address" or "phone".
    pub kind: String,
    /// The blacklisted value.
    pub value: String,
    /// Why the entry was created.
    pub reason: String,
    /// "permanent" or "temporary".
    pub scope: String,
    /// The owning NDR (required for temporary scope).
    pub ndr_id: Option<String>,
}

/// Response for NDR write operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdrWriteResponse {
    /// The target NDR.
    pub ndr_id: String,
    /// The NDR's status after the operation.
    pub status: String,
    /// A human-readable confirmation.
    pub message: String,
}

/// Response for ending an NDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndNdrResponse {
    /// The ended NDR.
    pub ndr_id: String,
    /// Final ride statistics.
    pub statistics: RideStatistics,
}

/// Live per-status ride tallies for one NDR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RideStatsResponse {
    /// The NDR the tallies describe.
    pub ndr_id: String,
    /// Per-status ride/rider counts, every status present.
    pub tallies: BTreeMap<RideStatus, StatusTally>,
}
