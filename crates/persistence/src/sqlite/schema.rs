// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    // Enable foreign key enforcement
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS ndrs (
            ndr_id TEXT PRIMARY KEY NOT NULL,
            event_id TEXT,
            event_name TEXT NOT NULL,
            event_date TEXT NOT NULL,
            location TEXT NOT NULL,
            status TEXT NOT NULL
                CHECK(status IN ('pending', 'active', 'completed', 'archived')),
            car_count INTEGER NOT NULL,
            signups_json TEXT NOT NULL,
            assignments_json TEXT NOT NULL,
            notes_json TEXT NOT NULL,
            outcome_json TEXT NOT NULL,
            activated_at TEXT,
            activated_by TEXT,
            ended_at TEXT,
            ended_by TEXT,
            archived_at TEXT,
            archived_by TEXT,
            archive_summary TEXT
        );

        -- Conditional-write backstop for the single-active invariant:
        -- a second concurrent activation fails at commit instead of
        -- producing two active NDRs.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_ndrs_single_active
            ON ndrs(status) WHERE status = 'active';

        CREATE INDEX IF NOT EXISTS idx_ndrs_status
            ON ndrs(status);

        CREATE TABLE IF NOT EXISTS members (
            member_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            gender TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS rides (
            ride_id TEXT PRIMARY KEY NOT NULL,
            ndr_id TEXT NOT NULL,
            patron_name TEXT NOT NULL,
            patron_phone TEXT NOT NULL,
            pickup_address TEXT NOT NULL,
            dropoff_address TEXT NOT NULL,
            pickup_lat REAL,
            pickup_lon REAL,
            dropoff_lat REAL,
            dropoff_lon REAL,
            riders INTEGER,
            status TEXT NOT NULL
                CHECK(status IN ('pending', 'active', 'completed', 'cancelled', 'terminated')),
            car_number INTEGER,
            FOREIGN KEY(ndr_id) REFERENCES ndrs(ndr_id)
        );

        CREATE INDEX IF NOT EXISTS idx_rides_by_ndr
            ON rides(ndr_id);

        CREATE INDEX IF NOT EXISTS idx_rides_by_ndr_status
            ON rides(ndr_id, status);

        CREATE TABLE IF NOT EXISTS address_blacklist (
            entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            value TEXT NOT NULL,
            reason TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('pending', 'approved')),
            scope TEXT NOT NULL CHECK(scope IN ('permanent', 'temporary')),
            ndr_id TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_address_blacklist_scope
            ON address_blacklist(scope, ndr_id);

        CREATE TABLE IF NOT EXISTS phone_blacklist (
            entry_id INTEGER PRIMARY KEY AUTOINCREMENT,
            value TEXT NOT NULL,
            reason TEXT NOT NULL,
            status TEXT NOT NULL CHECK(status IN ('pending', 'approved')),
            scope TEXT NOT NULL CHECK(scope IN ('permanent', 'temporary')),
            ndr_id TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_phone_blacklist_scope
            ON phone_blacklist(scope, ndr_id);

        CREATE TABLE IF NOT EXISTS audit_events (
            event_id INTEGER PRIMARY KEY AUTOINCREMENT,
            ndr_id TEXT NOT NULL,
            actor_json TEXT NOT NULL,
            cause_json TEXT NOT NULL,
            action_json TEXT NOT NULL,
            before_snapshot_json TEXT NOT NULL,
            after_snapshot_json TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_audit_events_scope
            ON audit_events(ndr_id, event_id);
        ",
    )?;

    Ok(())
}
