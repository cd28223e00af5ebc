// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Safe Ride NDR coordination system.
//!
//! This crate stores the NDR set, rides, blacklists, the member roster,
//! and audit events in `SQLite` via `rusqlite`. Lifecycle transitions are
//! persisted in a single transaction: the audit event, every NDR the
//! transition touched, and — when an NDR ends — the temporary blacklist
//! cleanup commit or roll back together.
//!
//! The `ndrs` table carries a partial unique index over
//! `status = 'active'`, so even racing writers cannot commit two active
//! NDRs: the loser's transaction fails and is surfaced as an error.
//!
//! ## Testing
//!
//! Standard tests run against uniquely named in-memory databases; an
//! atomic counter eliminates time-based naming collisions.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod data_models;
mod error;
mod sqlite;

#[cfg(test)]
mod tests;

use rusqlite::{Connection, OpenFlags};
use std::sync::atomic::{AtomicU64, Ordering};

use saferide::{NdrSet, TransitionResult};
use saferide_audit::AuditEvent;
use saferide_domain::{BlacklistEntry, BlacklistKind, Member, MemberId, Ndr, NdrId, NdrStatus, Ride};

pub use error::PersistenceError;
pub use sqlite::PersistReceipt;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID, so
/// concurrent tests never share state.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `SQLite`-backed persistence for the NDR coordination system.
///
/// One value owns one connection. Callers serialize access themselves
/// (the server wraps this in a mutex).
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Creates a persistence layer backed by a unique in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let conn: Connection = Connection::open_with_flags(
            format!("file:saferide_mem_{id}?mode=memory&cache=shared"),
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        sqlite::initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates a persistence layer backed by a database file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or the schema
    /// cannot be initialized.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

        sqlite::initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Persists a lifecycle transition atomically.
    ///
    /// # Arguments
    ///
    /// * `result` - The transition result from the core engine
    ///
    /// # Returns
    ///
    /// A receipt with the assigned audit event ID and, for `EndNdr`, the
    /// number of temporary blacklist entries removed.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is committed in that
    /// case.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistReceipt, PersistenceError> {
        let tx = self.conn.transaction()?;
        let receipt: PersistReceipt = sqlite::persist_transition(&tx, result)?;
        tx.commit()?;
        Ok(receipt)
    }

    /// Loads the complete NDR set.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn load_state(&self) -> Result<NdrSet, PersistenceError> {
        sqlite::load_state(&self.conn)
    }

    /// Retrieves one NDR by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NdrNotFound` if no such NDR exists.
    pub fn get_ndr(&self, ndr_id: &NdrId) -> Result<Ndr, PersistenceError> {
        sqlite::get_ndr(&self.conn, ndr_id)
    }

    /// Lists NDRs with the given status.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn list_ndrs_by_status(&self, status: NdrStatus) -> Result<Vec<Ndr>, PersistenceError> {
        sqlite::list_ndrs_by_status(&self.conn, status)
    }

    /// Returns the currently active NDR, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_active_ndr(&self) -> Result<Option<Ndr>, PersistenceError> {
        sqlite::get_active_ndr(&self.conn)
    }

    /// Inserts a phone-in ride.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn insert_ride(&self, ride: &Ride) -> Result<(), PersistenceError> {
        sqlite::insert_ride(&self.conn, ride)
    }

    /// Retrieves every ride owned by an NDR.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_rides_for_ndr(&self, ndr_id: &NdrId) -> Result<Vec<Ride>, PersistenceError> {
        sqlite::get_rides_for_ndr(&self.conn, ndr_id)
    }

    /// Inserts a blacklist entry and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn insert_blacklist_entry(
        &self,
        entry: &BlacklistEntry,
    ) -> Result<i64, PersistenceError> {
        sqlite::insert_entry(&self.conn, entry)
    }

    /// Lists every entry in one blacklist collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn list_blacklist_entries(
        &self,
        kind: BlacklistKind,
    ) -> Result<Vec<BlacklistEntry>, PersistenceError> {
        sqlite::list_entries(&self.conn, kind)
    }

    /// Inserts or updates a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_member(&self, member: &Member) -> Result<(), PersistenceError> {
        sqlite::upsert_member(&self.conn, member)
    }

    /// Retrieves one member by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if no such member exists.
    pub fn get_member(&self, member_id: &MemberId) -> Result<Member, PersistenceError> {
        sqlite::get_member(&self.conn, member_id)
    }

    /// Lists every registered member.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn list_members(&self) -> Result<Vec<Member>, PersistenceError> {
        sqlite::list_members(&self.conn)
    }

    /// Retrieves an audit event by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if no such event exists.
    pub fn get_audit_event(&self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        sqlite::get_audit_event(&self.conn, event_id)
    }

    /// Retrieves the ordered audit timeline for one NDR.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get_audit_timeline(&self, ndr_id: &NdrId) -> Result<Vec<AuditEvent>, PersistenceError> {
        sqlite::get_audit_timeline(&self.conn, ndr_id)
    }
}
