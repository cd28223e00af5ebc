// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Member roster storage.
//!
//! The roster backs display names in archive summaries and gender
//! classification for the car 1 balance rule.

use rusqlite::{Connection, params};

use saferide_domain::{Member, MemberId};

use crate::error::PersistenceError;

/// Inserts or updates a member.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `member` - The member to upsert
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_member(conn: &Connection, member: &Member) -> Result<(), PersistenceError> {
    conn.execute(
        "INSERT INTO members (member_id, name, gender)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(member_id) DO UPDATE SET
            name = excluded.name,
            gender = excluded.gender",
        params![member.member_id.value(), member.name, member.gender],
    )?;

    Ok(())
}

/// Retrieves one member by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no such member exists.
pub fn get_member(conn: &Connection, member_id: &MemberId) -> Result<Member, PersistenceError> {
    let row_result = conn.query_row(
        "SELECT member_id, name, gender FROM members WHERE member_id = ?1",
        params![member_id.value()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        },
    );

    match row_result {
        Ok((id, name, gender)) => Ok(Member::new(MemberId::new(&id), name, gender)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(PersistenceError::NotFound(format!(
            "member '{}'",
            member_id.value()
        ))),
        Err(e) => Err(PersistenceError::DatabaseError(e.to_string())),
    }
}

/// Lists every registered member.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_members(conn: &Connection) -> Result<Vec<Member>, PersistenceError> {
    let mut stmt =
        conn.prepare("SELECT member_id, name, gender FROM members ORDER BY member_id")?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut members: Vec<Member> = Vec::new();
    for row in rows {
        let (id, name, gender) = row?;
        members.push(Member::new(MemberId::new(&id), name, gender));
    }

    Ok(members)
}
