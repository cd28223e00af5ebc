// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::NdrSet;
use saferide_audit::{Actor, Cause};
use saferide_domain::{Ndr, NdrId, NdrStatus};

/// Creates a director actor for tests.
pub fn create_test_actor() -> Actor {
    Actor::new(String::from("dir-1"), String::from("director"))
}

/// Creates a generic cause for tests.
pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// Creates a pending NDR with sensible defaults.
pub fn pending_ndr(id: &str) -> Ndr {
    Ndr::new(
        NdrId::new(id),
        None,
        format!("Run {id}"),
        String::from("2026-02-06T21:00:00Z"),
        String::from("Student Union"),
        3,
    )
}

/// Creates an NDR in an arbitrary status, stamping the fields that status
/// implies.
pub fn ndr_with_status(id: &str, status: NdrStatus) -> Ndr {
    let mut ndr = pending_ndr(id);
    match status {
        NdrStatus::Pending => {}
        NdrStatus::Active => {
            ndr.status = NdrStatus::Active;
            ndr.activated_at = Some(String::from("2026-02-06T21:05:00Z"));
            ndr.activated_by = Some(String::from("dir-1"));
        }
        NdrStatus::Completed => {
            ndr.status = NdrStatus::Completed;
            ndr.activated_at = Some(String::from("2026-02-06T21:05:00Z"));
            ndr.activated_by = Some(String::from("dir-1"));
            ndr.ended_at = Some(String::from("2026-02-07T02:30:00Z"));
            ndr.ended_by = Some(String::from("dir-1"));
        }
        NdrStatus::Archived => {
            ndr.status = NdrStatus::Archived;
            ndr.activated_at = Some(String::from("2026-02-06T21:05:00Z"));
            ndr.activated_by = Some(String::from("dir-1"));
            ndr.ended_at = Some(String::from("2026-02-07T02:30:00Z"));
            ndr.ended_by = Some(String::from("dir-1"));
            ndr.archived_at = Some(String::from("2026-02-08T12:00:00Z"));
            ndr.archived_by = Some(String::from("dir-1"));
            ndr.archive_summary = Some(String::from("archived summary"));
        }
    }
    ndr
}

/// Creates a set from the given NDRs.
pub fn set_of(ndrs: Vec<Ndr>) -> NdrSet {
    NdrSet { ndrs }
}
