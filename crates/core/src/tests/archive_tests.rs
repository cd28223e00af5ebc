// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for archiving and the generated summary snapshot.

use crate::{Command, CoreError, apply};
use saferide_domain::{
    DomainError, Member, MemberId, NdrId, NdrStatus, RideStatistics, generate_archive_summary,
};

use super::helpers::{create_test_actor, create_test_cause, ndr_with_status, set_of};

const AT: &str = "2026-02-08T12:00:00Z";

fn roster() -> Vec<Member> {
    vec![
        Member::new(MemberId::new("m1"), String::from("Alex"), String::from("m")),
        Member::new(MemberId::new("m2"), String::from("Bea"), String::from("f")),
    ]
}

#[test]
fn test_archive_completed_ndr_snapshots_summary() {
    let mut completed = ndr_with_status("ndr-1", NdrStatus::Completed);
    completed.outcome = RideStatistics {
        completed_rides: 8,
        completed_riders: 13,
        cancelled_rides: 1,
        cancelled_riders: 1,
        terminated_rides: 0,
        terminated_riders: 0,
    };
    let state = set_of(vec![completed]);

    let result = apply(
        &state,
        Command::Archive {
            ndr_id: NdrId::new("ndr-1"),
            at: AT.to_string(),
            roster: roster(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let ndr = result.new_state.get(&NdrId::new("ndr-1")).unwrap();
    assert_eq!(ndr.status, NdrStatus::Archived);
    assert_eq!(ndr.archived_at.as_deref(), Some(AT));
    assert_eq!(ndr.archived_by.as_deref(), Some("dir-1"));

    let summary = ndr.archive_summary.as_deref().unwrap();
    assert!(summary.contains("Completed: 8 rides, 13 riders"));
}

#[test]
fn test_archive_summary_matches_regeneration_from_same_snapshot() {
    let completed = ndr_with_status("ndr-1", NdrStatus::Completed);
    let expected = generate_archive_summary(&completed, &roster());
    let state = set_of(vec![completed]);

    let result = apply(
        &state,
        Command::Archive {
            ndr_id: NdrId::new("ndr-1"),
            at: AT.to_string(),
            roster: roster(),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    let ndr = result.new_state.get(&NdrId::new("ndr-1")).unwrap();
    assert_eq!(ndr.archive_summary.as_deref(), Some(expected.as_str()));
}

#[test]
fn test_archive_requires_completed_status() {
    for status in [NdrStatus::Pending, NdrStatus::Active, NdrStatus::Archived] {
        let state = set_of(vec![ndr_with_status("ndr-1", status)]);

        let result = apply(
            &state,
            Command::Archive {
                ndr_id: NdrId::new("ndr-1"),
                at: AT.to_string(),
                roster: roster(),
            },
            create_test_actor(),
            create_test_cause(),
        );

        assert!(
            matches!(
                result,
                Err(CoreError::DomainViolation(
                    DomainError::InvalidStatusTransition { .. }
                ))
            ),
            "archiving a {status} NDR must be rejected"
        );
    }
}

#[test]
fn test_archive_unknown_ndr_is_rejected() {
    let state = set_of(vec![]);

    let result = apply(
        &state,
        Command::Archive {
            ndr_id: NdrId::new("ghost"),
            at: AT.to_string(),
            roster: Vec::new(),
        },
        create_test_actor(),
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::NdrNotFound(_)))
    ));
}
