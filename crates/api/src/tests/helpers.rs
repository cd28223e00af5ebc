// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, Role};
use saferide::NdrSet;
use saferide_audit::Cause;
use saferide_domain::{Ndr, NdrId, NdrStatus};

/// Creates an authenticated actor with the given role.
pub fn actor(role: Role) -> AuthenticatedActor {
    let id: &str = match role {
        Role::Director => "dir-1",
        Role::Deputy => "dep-1",
        Role::Member => "mem-1",
    };
    AuthenticatedActor::new(id.to_string(), role)
}

/// Creates a generic cause for tests.
pub fn cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// Creates an NDR in the given status.
pub fn ndr_with_status(id: &str, status: NdrStatus) -> Ndr {
    let mut ndr = Ndr::new(
        NdrId::new(id),
        None,
        format!("Run {id}"),
        String::from("2026-02-06T21:00:00Z"),
        String::from("Student Union"),
        3,
    );
    ndr.status = status;
    if status != NdrStatus::Pending {
        ndr.activated_at = Some(String::from("2026-02-06T21:05:00Z"));
        ndr.activated_by = Some(String::from("dir-1"));
    }
    if matches!(status, NdrStatus::Completed | NdrStatus::Archived) {
        ndr.ended_at = Some(String::from("2026-02-07T02:30:00Z"));
        ndr.ended_by = Some(String::from("dir-1"));
    }
    ndr
}

/// Creates a set containing one NDR in the given status.
pub fn set_with(id: &str, status: NdrStatus) -> NdrSet {
    NdrSet {
        ndrs: vec![ndr_with_status(id, status)],
    }
}
