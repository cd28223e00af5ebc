// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod autosave;
mod live;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use tracing::{error, info};

use autosave::{AssignmentAutosave, PendingEdit};
use live::LiveEvent;
use saferide::NdrSet;
use saferide_api::{
    AddBlacklistEntryRequest, ApiError, AuthenticatedActor, CreateNdrRequest, LogRideRequest,
    NdrLifecycleRequest, RideStatsResponse, Role, SignupRequest, UpdateAssignmentsRequest,
    activate_ndr, add_blacklist_entry, archive_ndr, authenticate_stub, capabilities_for,
    create_ndr, end_ndr, log_ride, reactivate_ndr, ride_statistics, sign_up_member,
    update_assignments, withdraw_member,
};
use saferide_audit::{AuditEvent, Cause};
use saferide_domain::{
    AssignmentMap, BlacklistEntry, BlacklistKind, GeoPoint, Member, MemberId, Ndr, NdrId,
    NdrStatus, NightNotes, Ride, RideStatistics,
};
use saferide_persistence::{PersistenceError, SqlitePersistence};

/// Safe Ride Server - HTTP server for the NDR coordination system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer, serialized behind a mutex.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// The live event broadcast channel.
    live: tokio::sync::broadcast::Sender<LiveEvent>,
    /// The debounced assignment autosave service.
    autosave: Arc<AssignmentAutosave>,
}

/// Actor and cause fields carried by every state-changing request.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ActorFields {
    /// The actor ID performing this action.
    actor_id: String,
    /// The role of the actor.
    actor_role: String,
    /// The cause ID for this action.
    cause_id: String,
    /// The cause description.
    cause_description: String,
}

/// API request for creating an NDR.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct CreateNdrApiRequest {
    /// Actor and cause attribution.
    #[serde(flatten)]
    actor: ActorFields,
    /// The id for the new NDR.
    ndr_id: String,
    /// Cross-reference to the spawning calendar event.
    event_id: Option<String>,
    /// The operating-night event name.
    event_name: String,
    /// The event date/time (RFC 3339).
    event_date: String,
    /// The operating location.
    location: String,
    /// Number of cars available.
    car_count: u8,
}

/// API request for lifecycle operations (activate/end/archive/reactivate).
#[derive(Debug, Clone, Deserialize, Serialize)]
struct LifecycleApiRequest {
    /// Actor and cause attribution.
    #[serde(flatten)]
    actor: ActorFields,
}

/// API request for replacing the assignment editor document.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpdateAssignmentsApiRequest {
    /// Actor and cause attribution.
    #[serde(flatten)]
    actor: ActorFields,
    /// The new assignment map.
    assignments: AssignmentMap,
    /// The new notes document.
    notes: NightNotes,
}

/// API request for signup operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct SignupApiRequest {
    /// Actor and cause attribution.
    #[serde(flatten)]
    actor: ActorFields,
    /// The member signing up or withdrawing.
    member_id: String,
}

/// API request for logging a phone-in ride.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct LogRideApiRequest {
    /// Actor attribution.
    #[serde(flatten)]
    actor: ActorFields,
    /// The id for the new ride.
    ride_id: String,
    /// The owning NDR.
    ndr_id: String,
    /// The patron's name.
    patron_name: String,
    /// The patron's phone number.
    patron_phone: String,
    /// Pickup address.
    pickup_address: String,
    /// Dropoff address.
    dropoff_address: String,
    /// Optional pickup geocoordinates.
    pickup_coords: Option<GeoPoint>,
    /// Optional dropoff geocoordinates.
    dropoff_coords: Option<GeoPoint>,
    /// Number of riders; omitted counts as 1.
    riders: Option<u32>,
}

/// API request for adding a blacklist entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct AddBlacklistApiRequest {
    /// Actor attribution.
    #[serde(flatten)]
    actor: ActorFields,
    /// Which collection: "address" or "phone".
    kind: String,
    /// The blacklisted value.
    value: String,
    /// Why the entry was created.
    reason: String,
    /// "permanent" or "temporary".
    scope: String,
    /// The owning NDR (required for temporary scope).
    ndr_id: Option<String>,
}

/// API request for upserting a member.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct UpsertMemberApiRequest {
    /// The member's id.
    member_id: String,
    /// The member's display name.
    name: String,
    /// The member's self-reported gender (free text).
    gender: String,
}

/// Query parameters for listing NDRs.
#[derive(Debug, Deserialize)]
struct ListNdrsQuery {
    /// Optional status filter.
    status: Option<String>,
}

/// Query parameters for the audit timeline endpoint.
#[derive(Debug, Deserialize)]
struct AuditTimelineQuery {
    /// The NDR scope.
    ndr_id: String,
}

/// Query parameters for the capabilities endpoint.
#[derive(Debug, Deserialize)]
struct CapabilitiesQuery {
    /// The role to list capabilities for.
    role: String,
}

/// API response for write operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// The event ID of the persisted audit event.
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<i64>,
}

/// API response for ending an NDR.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EndNdrApiResponse {
    /// Success indicator.
    success: bool,
    /// The ended NDR.
    ndr_id: String,
    /// Final ride statistics.
    statistics: RideStatistics,
    /// Temporary blacklist entries removed.
    blacklist_removed: usize,
    /// The event ID of the persisted audit event.
    event_id: i64,
}

/// API response for adding a blacklist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BlacklistWriteResponse {
    /// Success indicator.
    success: bool,
    /// The entry ID assigned by the database.
    entry_id: i64,
}

/// Summary of one NDR for list views.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NdrSummary {
    /// The NDR id.
    ndr_id: String,
    /// The event name.
    event_name: String,
    /// The event date/time.
    event_date: String,
    /// The location.
    location: String,
    /// The lifecycle status.
    status: String,
    /// Number of cars available.
    car_count: u8,
    /// Number of signed-up members.
    signup_count: usize,
}

/// API response for listing NDRs.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ListNdrsResponse {
    /// The matching NDRs.
    ndrs: Vec<NdrSummary>,
}

/// API response for the capabilities endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CapabilitiesResponse {
    /// The role the listing is for.
    role: String,
    /// The operations available right now.
    operations: Vec<String>,
}

/// Serializable representation of an `AuditEvent` for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AuditEventResponse {
    /// The event ID.
    event_id: Option<i64>,
    /// The actor ID.
    actor_id: String,
    /// The actor type.
    actor_type: String,
    /// The cause ID.
    cause_id: String,
    /// The cause description.
    cause_description: String,
    /// The action name.
    action_name: String,
    /// Optional action details.
    action_details: Option<String>,
    /// State before the transition.
    before_snapshot: String,
    /// State after the transition.
    after_snapshot: String,
    /// The NDR scope.
    ndr_id: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for HttpError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NdrNotFound(_)
            | PersistenceError::EventNotFound(_)
            | PersistenceError::RideNotFound(_)
            | PersistenceError::NotFound(_) => Self {
                status: StatusCode::NOT_FOUND,
                message: err.to_string(),
            },
            _ => {
                error!(error = %err, "Persistence error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: format!("Persistence error: {err}"),
                }
            }
        }
    }
}

/// Parses a role string into a Role enum.
fn parse_role(role_str: &str) -> Result<Role, HttpError> {
    match role_str.to_lowercase().as_str() {
        "director" => Ok(Role::Director),
        "deputy" => Ok(Role::Deputy),
        "member" => Ok(Role::Member),
        _ => Err(HttpError {
            status: StatusCode::BAD_REQUEST,
            message: format!(
                "Invalid role: '{role_str}'. Must be 'director', 'deputy', or 'member'"
            ),
        }),
    }
}

/// Authenticates the actor fields of a request.
fn authenticate(fields: &ActorFields) -> Result<(AuthenticatedActor, Cause), HttpError> {
    let role: Role = parse_role(&fields.actor_role)?;
    let actor: AuthenticatedActor =
        authenticate_stub(fields.actor_id.clone(), role).map_err(|e| HttpError {
            status: StatusCode::UNAUTHORIZED,
            message: e.to_string(),
        })?;
    let cause: Cause = Cause::new(fields.cause_id.clone(), fields.cause_description.clone());
    Ok((actor, cause))
}

/// The current time as an RFC 3339 string.
fn now_rfc3339() -> Result<String, HttpError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| HttpError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("Failed to format timestamp: {e}"),
        })
}

/// Converts an `AuditEvent` to an `AuditEventResponse`.
fn audit_event_to_response(event: &AuditEvent) -> AuditEventResponse {
    AuditEventResponse {
        event_id: event.event_id,
        actor_id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
        cause_id: event.cause.id.clone(),
        cause_description: event.cause.description.clone(),
        action_name: event.action.name.clone(),
        action_details: event.action.details.clone(),
        before_snapshot: event.before.data.clone(),
        after_snapshot: event.after.data.clone(),
        ndr_id: event.ndr_id.value().to_string(),
    }
}

/// Converts an `Ndr` to a summary row.
fn ndr_to_summary(ndr: &Ndr) -> NdrSummary {
    NdrSummary {
        ndr_id: ndr.ndr_id.value().to_string(),
        event_name: ndr.event_name.clone(),
        event_date: ndr.event_date.clone(),
        location: ndr.location.clone(),
        status: ndr.status.to_string(),
        car_count: ndr.car_count,
        signup_count: ndr.signups.len(),
    }
}

/// Handler for POST `/ndrs` endpoint.
///
/// Creates a pending NDR for a new operating-night event.
async fn handle_create_ndr(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateNdrApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %req.ndr_id,
        "Handling create_ndr request"
    );

    let (actor, cause) = authenticate(&req.actor)?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let result = create_ndr(
        &state,
        CreateNdrRequest {
            ndr_id: req.ndr_id.clone(),
            event_id: req.event_id,
            event_name: req.event_name,
            event_date: req.event_date,
            location: req.location,
            car_count: req.car_count,
        },
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::NdrCreated {
            ndr_id: req.ndr_id.clone(),
        },
    );

    info!(event_id = receipt.event_id, ndr_id = %req.ndr_id, "Successfully created NDR");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/activate` endpoint.
async fn handle_activate_ndr(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %ndr_id,
        "Handling activate_ndr request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let at: String = now_rfc3339()?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let result = activate_ndr(
        &state,
        &NdrLifecycleRequest {
            ndr_id: ndr_id.clone(),
        },
        at,
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::NdrActivated {
            ndr_id: ndr_id.clone(),
        },
    );

    info!(event_id = receipt.event_id, ndr_id = %ndr_id, "Successfully activated NDR");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/end` endpoint.
///
/// Ends the active NDR: computes final ride statistics and removes the
/// NDR's temporary blacklist entries in the same transaction.
async fn handle_end_ndr(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<EndNdrApiResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %ndr_id,
        "Handling end_ndr request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let at: String = now_rfc3339()?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    let rides: Vec<Ride> = persistence.get_rides_for_ndr(&NdrId::new(&ndr_id))?;
    drop(persistence);

    let result = end_ndr(
        &state,
        &NdrLifecycleRequest {
            ndr_id: ndr_id.clone(),
        },
        rides,
        at,
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::NdrEnded {
            ndr_id: ndr_id.clone(),
            completed_rides: result.response.statistics.completed_rides,
            completed_riders: result.response.statistics.completed_riders,
        },
    );

    info!(
        event_id = receipt.event_id,
        ndr_id = %ndr_id,
        blacklist_removed = receipt.blacklist_removed,
        "Successfully ended NDR"
    );

    Ok(Json(EndNdrApiResponse {
        success: true,
        ndr_id,
        statistics: result.response.statistics,
        blacklist_removed: receipt.blacklist_removed,
        event_id: receipt.event_id,
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/archive` endpoint.
async fn handle_archive_ndr(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %ndr_id,
        "Handling archive_ndr request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let at: String = now_rfc3339()?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    let roster: Vec<Member> = persistence.list_members()?;
    drop(persistence);

    let result = archive_ndr(
        &state,
        &NdrLifecycleRequest {
            ndr_id: ndr_id.clone(),
        },
        roster,
        at,
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::NdrArchived {
            ndr_id: ndr_id.clone(),
        },
    );

    info!(event_id = receipt.event_id, ndr_id = %ndr_id, "Successfully archived NDR");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/reactivate` endpoint.
async fn handle_reactivate_ndr(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<LifecycleApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %ndr_id,
        "Handling reactivate_ndr request"
    );

    let (actor, cause) = authenticate(&req.actor)?;
    let at: String = now_rfc3339()?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let result = reactivate_ndr(
        &state,
        &NdrLifecycleRequest {
            ndr_id: ndr_id.clone(),
        },
        at,
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::NdrActivated {
            ndr_id: ndr_id.clone(),
        },
    );

    info!(event_id = receipt.event_id, ndr_id = %ndr_id, "Successfully reactivated NDR");

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for PUT `/ndrs/{ndr_id}/assignments` endpoint.
///
/// Validates the edit against current state, then queues it for the
/// debounced autosave. The write itself lands once edits go quiet.
async fn handle_update_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<UpdateAssignmentsApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        role = %req.actor.actor_role,
        ndr_id = %ndr_id,
        "Handling update_assignments request"
    );

    let (actor, cause) = authenticate(&req.actor)?;

    let request: UpdateAssignmentsRequest = UpdateAssignmentsRequest {
        ndr_id: ndr_id.clone(),
        assignments: req.assignments,
        notes: req.notes,
    };

    // Dry-run against current state so the editor hears about rule
    // violations immediately; the accepted document is persisted by the
    // autosave once the window closes.
    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);
    let _ = update_assignments(&state, request.clone(), &actor, cause.clone())?;

    app_state
        .autosave
        .mark_dirty(PendingEdit {
            request,
            actor,
            cause,
        })
        .await;

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Assignment edits for NDR '{ndr_id}' queued for autosave")),
        event_id: None,
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/signups` endpoint.
async fn handle_sign_up(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<SignupApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        ndr_id = %ndr_id,
        member_id = %req.member_id,
        "Handling sign_up request"
    );

    let (actor, cause) = authenticate(&req.actor)?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let result = sign_up_member(
        &state,
        &SignupRequest {
            ndr_id,
            member_id: req.member_id,
        },
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for POST `/ndrs/{ndr_id}/withdrawals` endpoint.
async fn handle_withdraw(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
    Json(req): Json<SignupApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        ndr_id = %ndr_id,
        member_id = %req.member_id,
        "Handling withdraw request"
    );

    let (actor, cause) = authenticate(&req.actor)?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let result = withdraw_member(
        &state,
        &SignupRequest {
            ndr_id,
            member_id: req.member_id,
        },
        &actor,
        cause,
    )?;

    let mut persistence = app_state.persistence.lock().await;
    let receipt = persistence.persist_transition(&result.transition())?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(result.response.message),
        event_id: Some(receipt.event_id),
    }))
}

/// Handler for POST `/rides` endpoint.
///
/// Logs a phone-in ride against the active NDR.
async fn handle_log_ride(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LogRideApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        ndr_id = %req.ndr_id,
        ride_id = %req.ride_id,
        "Handling log_ride request"
    );

    let (actor, _cause) = authenticate(&req.actor)?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let ride: Ride = log_ride(
        &state,
        LogRideRequest {
            ride_id: req.ride_id.clone(),
            ndr_id: req.ndr_id.clone(),
            patron_name: req.patron_name,
            patron_phone: req.patron_phone,
            pickup_address: req.pickup_address,
            dropoff_address: req.dropoff_address,
            pickup_coords: req.pickup_coords,
            dropoff_coords: req.dropoff_coords,
            riders: req.riders,
        },
        &actor,
    )?;

    let persistence = app_state.persistence.lock().await;
    persistence.insert_ride(&ride)?;
    drop(persistence);

    live::publish(
        &app_state.live,
        LiveEvent::RideLogged {
            ndr_id: req.ndr_id,
            ride_id: req.ride_id,
        },
    );

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Ride logged")),
        event_id: None,
    }))
}

/// Handler for GET `/ndrs` endpoint.
async fn handle_list_ndrs(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListNdrsQuery>,
) -> Result<Json<ListNdrsResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let ndrs: Vec<Ndr> = match query.status {
        Some(status_str) => {
            let status: NdrStatus = status_str.parse().map_err(|_| HttpError {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid status filter: '{status_str}'"),
            })?;
            persistence.list_ndrs_by_status(status)?
        }
        None => persistence.load_state()?.ndrs,
    };
    drop(persistence);

    Ok(Json(ListNdrsResponse {
        ndrs: ndrs.iter().map(ndr_to_summary).collect(),
    }))
}

/// Handler for GET `/ndrs/active` endpoint.
///
/// The "is a night running" gate every dispatch screen keys off.
async fn handle_get_active_ndr(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Ndr>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let active: Option<Ndr> = persistence.get_active_ndr()?;
    drop(persistence);

    active.map(Json).ok_or_else(|| HttpError {
        status: StatusCode::NOT_FOUND,
        message: String::from("No NDR is currently active"),
    })
}

/// Handler for GET `/ndrs/{ndr_id}` endpoint.
async fn handle_get_ndr(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
) -> Result<Json<Ndr>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let ndr: Ndr = persistence.get_ndr(&NdrId::new(&ndr_id))?;
    drop(persistence);

    Ok(Json(ndr))
}

/// Handler for GET `/ndrs/{ndr_id}/ride_stats` endpoint.
///
/// Live per-status tallies for the dashboard stat tiles.
async fn handle_ride_stats(
    AxumState(app_state): AxumState<AppState>,
    Path(ndr_id): Path<String>,
) -> Result<Json<RideStatsResponse>, HttpError> {
    let id: NdrId = NdrId::new(&ndr_id);

    let persistence = app_state.persistence.lock().await;
    // 404 for unknown NDRs rather than an empty tally set
    let _ = persistence.get_ndr(&id)?;
    let rides: Vec<Ride> = persistence.get_rides_for_ndr(&id)?;
    drop(persistence);

    Ok(Json(ride_statistics(&id, &rides)))
}

/// Handler for POST `/blacklist` endpoint.
async fn handle_add_blacklist_entry(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<AddBlacklistApiRequest>,
) -> Result<Json<BlacklistWriteResponse>, HttpError> {
    info!(
        actor_id = %req.actor.actor_id,
        kind = %req.kind,
        scope = %req.scope,
        "Handling add_blacklist_entry request"
    );

    let (actor, _cause) = authenticate(&req.actor)?;

    let entry: BlacklistEntry = add_blacklist_entry(
        AddBlacklistEntryRequest {
            kind: req.kind,
            value: req.value,
            reason: req.reason,
            scope: req.scope,
            ndr_id: req.ndr_id,
        },
        &actor,
    )?;

    let persistence = app_state.persistence.lock().await;
    let entry_id: i64 = persistence.insert_blacklist_entry(&entry)?;
    drop(persistence);

    Ok(Json(BlacklistWriteResponse {
        success: true,
        entry_id,
    }))
}

/// Handler for GET `/blacklist/{kind}` endpoint.
async fn handle_list_blacklist(
    AxumState(app_state): AxumState<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<BlacklistEntry>>, HttpError> {
    let kind: BlacklistKind = match kind.as_str() {
        "address" => BlacklistKind::Address,
        "phone" => BlacklistKind::Phone,
        other => {
            return Err(HttpError {
                status: StatusCode::BAD_REQUEST,
                message: format!("'{other}' is not a blacklist collection"),
            });
        }
    };

    let persistence = app_state.persistence.lock().await;
    let entries: Vec<BlacklistEntry> = persistence.list_blacklist_entries(kind)?;
    drop(persistence);

    Ok(Json(entries))
}

/// Handler for POST `/members` endpoint.
async fn handle_upsert_member(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpsertMemberApiRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let member: Member = Member::new(MemberId::new(&req.member_id), req.name, req.gender);
    saferide_domain::validate_member_fields(&member).map_err(|e| HttpError {
        status: StatusCode::BAD_REQUEST,
        message: e.to_string(),
    })?;

    let persistence = app_state.persistence.lock().await;
    persistence.upsert_member(&member)?;
    drop(persistence);

    Ok(Json(WriteResponse {
        success: true,
        message: Some(format!("Member '{}' saved", req.member_id)),
        event_id: None,
    }))
}

/// Handler for GET `/members` endpoint.
async fn handle_list_members(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<Member>>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let members: Vec<Member> = persistence.list_members()?;
    drop(persistence);

    Ok(Json(members))
}

/// Handler for GET `/capabilities` endpoint.
async fn handle_capabilities(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<CapabilitiesQuery>,
) -> Result<Json<CapabilitiesResponse>, HttpError> {
    let role: Role = parse_role(&query.role)?;

    let persistence = app_state.persistence.lock().await;
    let state: NdrSet = persistence.load_state()?;
    drop(persistence);

    let operations: Vec<String> = capabilities_for(role, &state)
        .iter()
        .map(|op| op.as_str().to_string())
        .collect();

    Ok(Json(CapabilitiesResponse {
        role: role.as_str().to_string(),
        operations,
    }))
}

/// Handler for GET `/audit/timeline` endpoint.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Query(params): Query<AuditTimelineQuery>,
) -> Result<Json<Vec<AuditEventResponse>>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let events: Vec<AuditEvent> = persistence.get_audit_timeline(&NdrId::new(&params.ndr_id))?;
    drop(persistence);

    Ok(Json(events.iter().map(audit_event_to_response).collect()))
}

/// Handler for GET `/audit/event/{event_id}` endpoint.
async fn handle_get_audit_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<AuditEventResponse>, HttpError> {
    let persistence = app_state.persistence.lock().await;
    let event: AuditEvent = persistence.get_audit_event(event_id)?;
    drop(persistence);

    Ok(Json(audit_event_to_response(&event)))
}

/// Handler for GET `/live` endpoint: upgrades to the event stream.
async fn handle_live(
    AxumState(app_state): AxumState<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    live::upgrade(ws, app_state.live.clone())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/ndrs", post(handle_create_ndr))
        .route("/ndrs", get(handle_list_ndrs))
        .route("/ndrs/active", get(handle_get_active_ndr))
        .route("/ndrs/{ndr_id}", get(handle_get_ndr))
        .route("/ndrs/{ndr_id}/activate", post(handle_activate_ndr))
        .route("/ndrs/{ndr_id}/end", post(handle_end_ndr))
        .route("/ndrs/{ndr_id}/archive", post(handle_archive_ndr))
        .route("/ndrs/{ndr_id}/reactivate", post(handle_reactivate_ndr))
        .route("/ndrs/{ndr_id}/assignments", put(handle_update_assignments))
        .route("/ndrs/{ndr_id}/signups", post(handle_sign_up))
        .route("/ndrs/{ndr_id}/withdrawals", post(handle_withdraw))
        .route("/ndrs/{ndr_id}/ride_stats", get(handle_ride_stats))
        .route("/rides", post(handle_log_ride))
        .route("/blacklist", post(handle_add_blacklist_entry))
        .route("/blacklist/{kind}", get(handle_list_blacklist))
        .route("/members", post(handle_upsert_member))
        .route("/members", get(handle_list_members))
        .route("/capabilities", get(handle_capabilities))
        .route("/audit/timeline", get(handle_get_audit_timeline))
        .route("/audit/event/{event_id}", get(handle_get_audit_event))
        .route("/live", get(handle_live))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Safe Ride Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let persistence: Arc<Mutex<SqlitePersistence>> = Arc::new(Mutex::new(persistence));
    let live_tx = live::channel();
    let autosave_service: Arc<AssignmentAutosave> =
        AssignmentAutosave::new(persistence.clone(), live_tx.clone());
    tokio::spawn(autosave_service.clone().run());

    let app_state: AppState = AppState {
        persistence,
        live: live_tx,
        autosave: autosave_service.clone(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server until interrupted
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    // Final flush so the last debounce window is never lost
    autosave_service.flush().await;
    info!("Shutdown complete");

    Ok(())
}
