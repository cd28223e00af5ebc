// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::{Connection, Result as SqliteResult, Row, params};
use saferide::NdrSet;
use saferide_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use saferide_domain::{Ndr, NdrId, NdrStatus};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::error::PersistenceError;

/// Column list shared by every NDR select.
const NDR_COLUMNS: &str = "ndr_id, event_id, event_name, event_date, location, status, \
     car_count, signups_json, assignments_json, notes_json, outcome_json, \
     activated_at, activated_by, ended_at, ended_by, archived_at, archived_by, archive_summary";

/// An NDR row as stored, before JSON columns are interpreted.
struct RawNdr {
    ndr_id: String,
    event_id: Option<String>,
    event_name: String,
    event_date: String,
    location: String,
    status: String,
    car_count: i64,
    signups_json: String,
    assignments_json: String,
    notes_json: String,
    outcome_json: String,
    activated_at: Option<String>,
    activated_by: Option<String>,
    ended_at: Option<String>,
    ended_by: Option<String>,
    archived_at: Option<String>,
    archived_by: Option<String>,
    archive_summary: Option<String>,
}

fn raw_ndr_from_row(row: &Row<'_>) -> SqliteResult<RawNdr> {
    Ok(RawNdr {
        ndr_id: row.get(0)?,
        event_id: row.get(1)?,
        event_name: row.get(2)?,
        event_date: row.get(3)?,
        location: row.get(4)?,
        status: row.get(5)?,
        car_count: row.get(6)?,
        signups_json: row.get(7)?,
        assignments_json: row.get(8)?,
        notes_json: row.get(9)?,
        outcome_json: row.get(10)?,
        activated_at: row.get(11)?,
        activated_by: row.get(12)?,
        ended_at: row.get(13)?,
        ended_by: row.get(14)?,
        archived_at: row.get(15)?,
        archived_by: row.get(16)?,
        archive_summary: row.get(17)?,
    })
}

fn ndr_from_raw(raw: RawNdr) -> Result<Ndr, PersistenceError> {
    let status: NdrStatus =
        raw.status
            .parse()
            .map_err(|e: saferide_domain::DomainError| PersistenceError::CorruptRecord {
                table: String::from("ndrs"),
                reason: e.to_string(),
            })?;
    let car_count: u8 =
        u8::try_from(raw.car_count).map_err(|_| PersistenceError::CorruptRecord {
            table: String::from("ndrs"),
            reason: format!("car_count {} out of range", raw.car_count),
        })?;

    Ok(Ndr {
        ndr_id: NdrId::new(&raw.ndr_id),
        event_id: raw.event_id,
        event_name: raw.event_name,
        event_date: raw.event_date,
        location: raw.location,
        status,
        car_count,
        signups: serde_json::from_str(&raw.signups_json)?,
        assignments: serde_json::from_str(&raw.assignments_json)?,
        notes: serde_json::from_str(&raw.notes_json)?,
        outcome: serde_json::from_str(&raw.outcome_json)?,
        activated_at: raw.activated_at,
        activated_by: raw.activated_by,
        ended_at: raw.ended_at,
        ended_by: raw.ended_by,
        archived_at: raw.archived_at,
        archived_by: raw.archived_by,
        archive_summary: raw.archive_summary,
    })
}

/// Retrieves one NDR by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ndr_id` - The NDR id
///
/// # Errors
///
/// Returns `PersistenceError::NdrNotFound` if no such NDR exists, or an
/// error if the stored record cannot be interpreted.
pub fn get_ndr(conn: &Connection, ndr_id: &NdrId) -> Result<Ndr, PersistenceError> {
    let row_result: SqliteResult<RawNdr> = conn.query_row(
        &format!("SELECT {NDR_COLUMNS} FROM ndrs WHERE ndr_id = ?1"),
        params![ndr_id.value()],
        raw_ndr_from_row,
    );

    match row_result {
        Ok(raw) => ndr_from_raw(raw),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            Err(PersistenceError::NdrNotFound(ndr_id.value().to_string()))
        }
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Loads the complete NDR set.
///
/// This is the state every lifecycle transition is computed against.
///
/// # Errors
///
/// Returns an error if the query fails or a record cannot be interpreted.
pub fn load_state(conn: &Connection) -> Result<NdrSet, PersistenceError> {
    let mut stmt = conn.prepare(&format!("SELECT {NDR_COLUMNS} FROM ndrs ORDER BY ndr_id"))?;
    let raws = stmt.query_map([], raw_ndr_from_row)?;

    let mut ndrs: Vec<Ndr> = Vec::new();
    for raw in raws {
        ndrs.push(ndr_from_raw(raw?)?);
    }

    Ok(NdrSet { ndrs })
}

/// Lists NDRs with a given status, ordered by event date.
///
/// # Errors
///
/// Returns an error if the query fails or a record cannot be interpreted.
pub fn list_ndrs_by_status(
    conn: &Connection,
    status: NdrStatus,
) -> Result<Vec<Ndr>, PersistenceError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {NDR_COLUMNS} FROM ndrs WHERE status = ?1 ORDER BY event_date, ndr_id"
    ))?;
    let raws = stmt.query_map(params![status.as_str()], raw_ndr_from_row)?;

    let mut ndrs: Vec<Ndr> = Vec::new();
    for raw in raws {
        ndrs.push(ndr_from_raw(raw?)?);
    }

    Ok(ndrs)
}

/// Returns the currently active NDR, if any.
///
/// The partial unique index guarantees at most one row can match.
///
/// # Errors
///
/// Returns an error if the query fails or the record cannot be
/// interpreted.
pub fn get_active_ndr(conn: &Connection) -> Result<Option<Ndr>, PersistenceError> {
    let row_result: SqliteResult<RawNdr> = conn.query_row(
        &format!("SELECT {NDR_COLUMNS} FROM ndrs WHERE status = 'active'"),
        [],
        raw_ndr_from_row,
    );

    match row_result {
        Ok(raw) => Ok(Some(ndr_from_raw(raw)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

type AuditEventRow = (i64, String, String, String, String, String, String);

fn audit_event_from_row(row_data: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let (event_id, ndr_id, actor_json, cause_json, action_json, before_json, after_json) =
        row_data;

    let actor_data: ActorData = serde_json::from_str(&actor_json)?;
    let cause_data: CauseData = serde_json::from_str(&cause_json)?;
    let action_data: ActionData = serde_json::from_str(&action_json)?;
    let before_data: StateSnapshotData = serde_json::from_str(&before_json)?;
    let after_data: StateSnapshotData = serde_json::from_str(&after_json)?;

    Ok(AuditEvent::with_id(
        event_id,
        Actor::new(actor_data.id, actor_data.actor_type),
        Cause::new(cause_data.id, cause_data.description),
        Action::new(action_data.name, action_data.details),
        StateSnapshot::new(before_data.data),
        StateSnapshot::new(after_data.data),
        NdrId::new(&ndr_id),
    ))
}

/// Retrieves an audit event by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `event_id` - The event ID to retrieve
///
/// # Errors
///
/// Returns an error if the event is not found or cannot be deserialized.
pub fn get_audit_event(conn: &Connection, event_id: i64) -> Result<AuditEvent, PersistenceError> {
    let row_result: SqliteResult<AuditEventRow> = conn.query_row(
        "SELECT event_id, ndr_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json
         FROM audit_events
         WHERE event_id = ?1",
        params![event_id],
        |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        },
    );

    match row_result {
        Ok(row_data) => audit_event_from_row(row_data),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(PersistenceError::EventNotFound(event_id)),
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Retrieves the ordered audit timeline for one NDR.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ndr_id` - The NDR scope
///
/// # Errors
///
/// Returns an error if events cannot be retrieved or deserialized.
pub fn get_audit_timeline(
    conn: &Connection,
    ndr_id: &NdrId,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT event_id, ndr_id, actor_json, cause_json, action_json,
                before_snapshot_json, after_snapshot_json
         FROM audit_events
         WHERE ndr_id = ?1
         ORDER BY event_id",
    )?;

    let rows = stmt.query_map(params![ndr_id.value()], |row| {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    })?;

    let mut events: Vec<AuditEvent> = Vec::new();
    for row in rows {
        events.push(audit_event_from_row(row?)?);
    }

    Ok(events)
}
