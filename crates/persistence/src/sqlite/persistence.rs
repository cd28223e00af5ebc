// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::{Transaction, params};
use tracing::{debug, info};

use saferide::TransitionResult;
use saferide_audit::AuditEvent;
use saferide_domain::{Ndr, NdrStatus};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::error::PersistenceError;
use crate::sqlite::blacklist;

/// What a persisted transition produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistReceipt {
    /// The event ID assigned to the persisted audit event.
    pub event_id: i64,
    /// Temporary blacklist entries removed (non-zero only for `EndNdr`).
    pub blacklist_removed: usize,
}

/// Persists a transition result: the audit event, every NDR in the new
/// set, and — for `EndNdr` — the temporary blacklist cleanup, all within
/// the caller's transaction so the steps commit or roll back together.
///
/// # Arguments
///
/// * `tx` - The active database transaction
/// * `result` - The transition result to persist
///
/// # Returns
///
/// A receipt with the assigned event ID and the blacklist removal count.
///
/// # Errors
///
/// Returns an error if persistence fails. A violation of the
/// single-active unique index surfaces here as a database error.
pub fn persist_transition(
    tx: &Transaction<'_>,
    result: &TransitionResult,
) -> Result<PersistReceipt, PersistenceError> {
    let event_id: i64 = persist_audit_event(tx, &result.audit_event)?;
    debug!(event_id, "Persisted audit event");

    // NDRs leaving active status must be written before the one entering
    // it: the single-active unique index is checked per statement.
    let mut ndrs: Vec<&Ndr> = result.new_state.ndrs.iter().collect();
    ndrs.sort_by_key(|n| usize::from(n.status == NdrStatus::Active));
    for ndr in ndrs {
        upsert_ndr(tx, ndr)?;
    }
    debug!(
        ndr_count = result.new_state.ndrs.len(),
        "Synced NDR set"
    );

    let blacklist_removed: usize = if result.audit_event.action.name.as_str() == "EndNdr" {
        let removed: usize = blacklist::delete_temporary_for_ndr(tx, &result.audit_event.ndr_id)?;
        debug!(
            ndr_id = %result.audit_event.ndr_id,
            removed,
            "Removed temporary blacklist entries"
        );
        removed
    } else {
        0
    };

    info!(
        event_id,
        action = %result.audit_event.action.name,
        ndr_id = %result.audit_event.ndr_id,
        "Persisted transition"
    );

    Ok(PersistReceipt {
        event_id,
        blacklist_removed,
    })
}

/// Inserts or updates one NDR row.
///
/// # Errors
///
/// Returns an error if the write fails.
fn upsert_ndr(tx: &Transaction<'_>, ndr: &Ndr) -> Result<(), PersistenceError> {
    let signups_json: String = serde_json::to_string(&ndr.signups)?;
    let assignments_json: String = serde_json::to_string(&ndr.assignments)?;
    let notes_json: String = serde_json::to_string(&ndr.notes)?;
    let outcome_json: String = serde_json::to_string(&ndr.outcome)?;

    tx.execute(
        "INSERT INTO ndrs (
            ndr_id, event_id, event_name, event_date, location, status,
            car_count, signups_json, assignments_json, notes_json, outcome_json,
            activated_at, activated_by, ended_at, ended_by,
            archived_at, archived_by, archive_summary
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
        ON CONFLICT(ndr_id) DO UPDATE SET
            event_id = excluded.event_id,
            event_name = excluded.event_name,
            event_date = excluded.event_date,
            location = excluded.location,
            status = excluded.status,
            car_count = excluded.car_count,
            signups_json = excluded.signups_json,
            assignments_json = excluded.assignments_json,
            notes_json = excluded.notes_json,
            outcome_json = excluded.outcome_json,
            activated_at = excluded.activated_at,
            activated_by = excluded.activated_by,
            ended_at = excluded.ended_at,
            ended_by = excluded.ended_by,
            archived_at = excluded.archived_at,
            archived_by = excluded.archived_by,
            archive_summary = excluded.archive_summary",
        params![
            ndr.ndr_id.value(),
            ndr.event_id,
            ndr.event_name,
            ndr.event_date,
            ndr.location,
            ndr.status.as_str(),
            ndr.car_count,
            signups_json,
            assignments_json,
            notes_json,
            outcome_json,
            ndr.activated_at,
            ndr.activated_by,
            ndr.ended_at,
            ndr.ended_by,
            ndr.archived_at,
            ndr.archived_by,
            ndr.archive_summary,
        ],
    )?;

    Ok(())
}

/// Persists one audit event and returns its assigned event ID.
///
/// # Errors
///
/// Returns an error if the write fails.
fn persist_audit_event(
    tx: &Transaction<'_>,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_json: String = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let cause_json: String = serde_json::to_string(&CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    tx.execute(
        "INSERT INTO audit_events (
            ndr_id, actor_json, cause_json, action_json,
            before_snapshot_json, after_snapshot_json
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.ndr_id.value(),
            actor_json,
            cause_json,
            action_json,
            before_json,
            after_json,
        ],
    )?;

    Ok(tx.last_insert_rowid())
}
