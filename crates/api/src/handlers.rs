// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write handlers composing authorization, the core engine, and DTOs.
//!
//! Every handler follows the same shape: authorize the actor, build the
//! command, run it through `apply`, and hand the transition back to the
//! caller for persistence. Handlers never touch the database themselves.

use tracing::info;

use saferide::{Command, NdrSet, apply};
use saferide_audit::Cause;
use saferide_domain::{
    BlacklistEntry, BlacklistKind, BlacklistStatus, Member, MemberId, Ndr, NdrId, Ride, RideId,
    RideStatus, tally_by_status, validate_ride_fields,
};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::ApiError;
use crate::request_response::{
    AddBlacklistEntryRequest, ApiResult, CreateNdrRequest, EndNdrResponse, LogRideRequest,
    NdrLifecycleRequest, NdrWriteResponse, RideStatsResponse, SignupRequest,
    UpdateAssignmentsRequest,
};

fn write_response(state: &NdrSet, ndr_id: &NdrId, message: String) -> NdrWriteResponse {
    NdrWriteResponse {
        ndr_id: ndr_id.value().to_string(),
        status: state
            .get(ndr_id)
            .map_or_else(|| String::from("unknown"), |n| n.status.to_string()),
        message,
    }
}

/// Creates a pending NDR for a new operating-night event.
///
/// # Errors
///
/// Returns an error if the actor is not a Director or the fields violate
/// domain rules.
pub fn create_ndr(
    state: &NdrSet,
    request: CreateNdrRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_create_ndr(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::CreateNdr {
            ndr_id: ndr_id.clone(),
            event_id: request.event_id,
            event_name: request.event_name,
            event_date: request.event_date,
            location: request.location,
            car_count: request.car_count,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, actor_id = %actor.id, "Created NDR");

    let response: NdrWriteResponse =
        write_response(&result.new_state, &ndr_id, format!("Created NDR '{ndr_id}'"));
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Activates a pending or archived NDR, forcing any other active NDR to
/// completed first.
///
/// # Errors
///
/// Returns an error if the actor is not a Director or the transition is
/// invalid.
pub fn activate_ndr(
    state: &NdrSet,
    request: &NdrLifecycleRequest,
    at: String,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_activate_ndr(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::Activate {
            ndr_id: ndr_id.clone(),
            at,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, actor_id = %actor.id, "Activated NDR");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Activated NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Ends the active NDR, computing final ride statistics.
///
/// The caller supplies the NDR's ride set and afterwards persists the
/// transition, which also removes the NDR's temporary blacklist entries.
///
/// # Errors
///
/// Returns an error if the actor is not a Director or the NDR is not
/// active.
pub fn end_ndr(
    state: &NdrSet,
    request: &NdrLifecycleRequest,
    rides: Vec<Ride>,
    at: String,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<EndNdrResponse>, ApiError> {
    AuthorizationService::authorize_end_ndr(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::End {
            ndr_id: ndr_id.clone(),
            at,
            rides,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    let statistics = result
        .new_state
        .get(&ndr_id)
        .map(|n| n.outcome)
        .unwrap_or_default();

    info!(
        ndr_id = %ndr_id,
        actor_id = %actor.id,
        completed_rides = statistics.completed_rides,
        "Ended NDR"
    );

    Ok(ApiResult {
        response: EndNdrResponse {
            ndr_id: ndr_id.value().to_string(),
            statistics,
        },
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Archives a completed NDR with its generated summary.
///
/// # Errors
///
/// Returns an error if the actor is not a Director or the NDR is not
/// completed.
pub fn archive_ndr(
    state: &NdrSet,
    request: &NdrLifecycleRequest,
    roster: Vec<Member>,
    at: String,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_archive_ndr(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::Archive {
            ndr_id: ndr_id.clone(),
            at,
            roster,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, actor_id = %actor.id, "Archived NDR");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Archived NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Reactivates an archived NDR.
///
/// # Errors
///
/// Returns an error if the actor is not a Director or the NDR is not
/// archived.
pub fn reactivate_ndr(
    state: &NdrSet,
    request: &NdrLifecycleRequest,
    at: String,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_activate_ndr(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::Reactivate {
            ndr_id: ndr_id.clone(),
            at,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, actor_id = %actor.id, "Reactivated NDR");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Reactivated NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Replaces the editable assignment map and notes of an active NDR.
///
/// This is the flush target of the debounced autosave.
///
/// # Errors
///
/// Returns an error if the actor is not a Deputy or Director, or the NDR
/// is not active.
pub fn update_assignments(
    state: &NdrSet,
    request: UpdateAssignmentsRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_update_assignments(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let result = apply(
        state,
        Command::UpdateAssignments {
            ndr_id: ndr_id.clone(),
            assignments: request.assignments,
            notes: request.notes,
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, actor_id = %actor.id, "Updated assignments");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Updated assignments for NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Signs a member up for a pending or active NDR.
///
/// # Errors
///
/// Returns an error if the signup violates domain rules.
pub fn sign_up_member(
    state: &NdrSet,
    request: &SignupRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_signup(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let member_id: MemberId = MemberId::new(&request.member_id);
    let result = apply(
        state,
        Command::SignUpMember {
            ndr_id: ndr_id.clone(),
            member_id: member_id.clone(),
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, member_id = %member_id, "Member signed up");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Member '{member_id}' signed up for NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Withdraws a member's signup.
///
/// # Errors
///
/// Returns an error if the member is not signed up.
pub fn withdraw_member(
    state: &NdrSet,
    request: &SignupRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ApiResult<NdrWriteResponse>, ApiError> {
    AuthorizationService::authorize_signup(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let member_id: MemberId = MemberId::new(&request.member_id);
    let result = apply(
        state,
        Command::WithdrawMember {
            ndr_id: ndr_id.clone(),
            member_id: member_id.clone(),
        },
        actor.to_audit_actor(),
        cause,
    )?;

    info!(ndr_id = %ndr_id, member_id = %member_id, "Member withdrew");

    let response: NdrWriteResponse = write_response(
        &result.new_state,
        &ndr_id,
        format!("Member '{member_id}' withdrew from NDR '{ndr_id}'"),
    );
    Ok(ApiResult {
        response,
        new_state: result.new_state,
        audit_event: result.audit_event,
    })
}

/// Validates a phone-in ride request and builds the pending ride.
///
/// The caller persists the returned ride. Intake is only open while the
/// owning NDR is active.
///
/// # Errors
///
/// Returns an error if the actor may not log rides, the NDR is unknown
/// or not active, or the ride fields are invalid.
pub fn log_ride(
    state: &NdrSet,
    request: LogRideRequest,
    actor: &AuthenticatedActor,
) -> Result<Ride, ApiError> {
    AuthorizationService::authorize_log_ride(actor)?;

    let ndr_id: NdrId = NdrId::new(&request.ndr_id);
    let ndr: &Ndr = state.get(&ndr_id).ok_or_else(|| ApiError::ResourceNotFound {
        resource_type: String::from("NDR"),
        message: ndr_id.value().to_string(),
    })?;
    if !ndr.is_active() {
        return Err(ApiError::DomainRuleViolation {
            message: format!(
                "Rides can only be logged while the NDR is active (status: {})",
                ndr.status
            ),
        });
    }

    let ride: Ride = Ride {
        ride_id: RideId::new(&request.ride_id),
        ndr_id,
        patron_name: request.patron_name,
        patron_phone: request.patron_phone,
        pickup_address: request.pickup_address,
        dropoff_address: request.dropoff_address,
        pickup_coords: request.pickup_coords,
        dropoff_coords: request.dropoff_coords,
        riders: request.riders,
        status: RideStatus::Pending,
        car_number: None,
    };
    validate_ride_fields(&ride)?;

    info!(
        ride_id = %ride.ride_id.value(),
        ndr_id = %ride.ndr_id,
        actor_id = %actor.id,
        "Logged ride"
    );

    Ok(ride)
}

/// Validates a blacklist entry request and builds the entry.
///
/// The caller persists the returned entry.
///
/// # Errors
///
/// Returns an error if the actor may not manage the blacklist or the
/// entry is invalid.
pub fn add_blacklist_entry(
    request: AddBlacklistEntryRequest,
    actor: &AuthenticatedActor,
) -> Result<BlacklistEntry, ApiError> {
    AuthorizationService::authorize_manage_blacklist(actor)?;

    let kind: BlacklistKind = match request.kind.as_str() {
        "address" => BlacklistKind::Address,
        "phone" => BlacklistKind::Phone,
        other => {
            return Err(ApiError::InvalidInput {
                field: String::from("kind"),
                message: format!("'{other}' is not a blacklist collection"),
            });
        }
    };
    let scope = request.scope.parse().map_err(
        |e: saferide_domain::DomainError| ApiError::InvalidInput {
            field: String::from("scope"),
            message: e.to_string(),
        },
    )?;

    let entry: BlacklistEntry = BlacklistEntry::new(
        kind,
        request.value,
        request.reason,
        BlacklistStatus::Pending,
        scope,
        request.ndr_id.as_deref().map(NdrId::new),
    )?;

    info!(
        kind = kind.as_str(),
        scope = entry.scope.as_str(),
        actor_id = %actor.id,
        "Added blacklist entry"
    );

    Ok(entry)
}

/// Computes the live per-status ride tallies for one NDR.
#[must_use]
pub fn ride_statistics(ndr_id: &NdrId, rides: &[Ride]) -> RideStatsResponse {
    RideStatsResponse {
        ndr_id: ndr_id.value().to_string(),
        tallies: tally_by_status(rides),
    }
}
