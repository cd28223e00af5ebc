// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Blacklist storage across the address and phone collections.

use rusqlite::{Connection, Row, params};
use tracing::debug;

use saferide_domain::{BlacklistEntry, BlacklistKind, NdrId};

use crate::error::PersistenceError;

const fn table_for(kind: BlacklistKind) -> &'static str {
    match kind {
        BlacklistKind::Address => "address_blacklist",
        BlacklistKind::Phone => "phone_blacklist",
    }
}

/// Inserts a blacklist entry into its collection.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `entry` - The entry to insert
///
/// # Returns
///
/// The entry ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn insert_entry(conn: &Connection, entry: &BlacklistEntry) -> Result<i64, PersistenceError> {
    let table: &str = table_for(entry.kind);
    conn.execute(
        &format!(
            "INSERT INTO {table} (value, reason, status, scope, ndr_id)
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ),
        params![
            entry.value,
            entry.reason,
            entry.status.as_str(),
            entry.scope.as_str(),
            entry.ndr_id.as_ref().map(NdrId::value),
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

/// Deletes every temporary-scope entry owned by an NDR, across both the
/// address and phone collections.
///
/// Invoked from `persist_transition` when an NDR ends, inside the same
/// transaction as the statistics write.
///
/// # Arguments
///
/// * `conn` - The database connection (or an active transaction)
/// * `ndr_id` - The ending NDR
///
/// # Returns
///
/// The total number of entries removed.
///
/// # Errors
///
/// Returns an error if a delete fails.
pub fn delete_temporary_for_ndr(
    conn: &Connection,
    ndr_id: &NdrId,
) -> Result<usize, PersistenceError> {
    let from_addresses: usize = conn.execute(
        "DELETE FROM address_blacklist WHERE scope = 'temporary' AND ndr_id = ?1",
        params![ndr_id.value()],
    )?;
    let from_phones: usize = conn.execute(
        "DELETE FROM phone_blacklist WHERE scope = 'temporary' AND ndr_id = ?1",
        params![ndr_id.value()],
    )?;

    debug!(
        ndr_id = %ndr_id,
        from_addresses,
        from_phones,
        "Deleted temporary blacklist entries"
    );

    Ok(from_addresses + from_phones)
}

fn entry_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<(i64, String, String, String, String, Option<String>)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

/// Lists every entry in one blacklist collection.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `kind` - Which collection to list
///
/// # Errors
///
/// Returns an error if the query fails or a record cannot be interpreted.
pub fn list_entries(
    conn: &Connection,
    kind: BlacklistKind,
) -> Result<Vec<BlacklistEntry>, PersistenceError> {
    let table: &str = table_for(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT entry_id, value, reason, status, scope, ndr_id
         FROM {table}
         ORDER BY entry_id"
    ))?;

    let rows = stmt.query_map([], entry_from_row)?;

    let mut entries: Vec<BlacklistEntry> = Vec::new();
    for row in rows {
        let (entry_id, value, reason, status, scope, ndr_id) = row?;
        let status = status.parse().map_err(
            |e: saferide_domain::DomainError| PersistenceError::CorruptRecord {
                table: table.to_string(),
                reason: e.to_string(),
            },
        )?;
        let scope = scope.parse().map_err(
            |e: saferide_domain::DomainError| PersistenceError::CorruptRecord {
                table: table.to_string(),
                reason: e.to_string(),
            },
        )?;
        entries.push(BlacklistEntry {
            entry_id: Some(entry_id),
            kind,
            value,
            reason,
            status,
            scope,
            ndr_id: ndr_id.map(|id: String| NdrId::new(&id)),
        });
    }

    Ok(entries)
}
