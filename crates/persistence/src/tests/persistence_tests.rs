// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Round-trip tests for transitions, state loading, and audit timelines.

use crate::SqlitePersistence;
use saferide::{Command, NdrSet, apply};
use saferide_domain::{Member, MemberId, NdrId, NdrStatus};

use super::helpers::{
    apply_and_persist, create_ndr, create_test_actor, create_test_cause, ride,
};
use saferide_domain::RideStatus;

#[test]
fn test_created_ndr_round_trips() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");

    let stored = persistence.get_ndr(&NdrId::new("ndr-1")).unwrap();

    assert_eq!(Some(&stored), state.get(&NdrId::new("ndr-1")));
    assert_eq!(stored.status, NdrStatus::Pending);
    assert_eq!(stored.assignments.cars.len(), 3);
}

#[test]
fn test_get_missing_ndr_is_not_found() {
    let persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.get_ndr(&NdrId::new("ghost"));

    assert!(matches!(
        result,
        Err(crate::PersistenceError::NdrNotFound(_))
    ));
}

#[test]
fn test_load_state_returns_every_ndr() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");
    let state = create_ndr(&mut persistence, &state, "ndr-2");
    let _ = create_ndr(&mut persistence, &state, "ndr-3");

    let loaded = persistence.load_state().unwrap();

    assert_eq!(loaded.ndrs.len(), 3);
}

#[test]
fn test_activation_round_trips_and_active_query_finds_it() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");

    let state = apply_and_persist(
        &mut persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-1"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
    );

    assert_eq!(state.active_count(), 1);
    let active = persistence.get_active_ndr().unwrap().unwrap();
    assert_eq!(active.ndr_id, NdrId::new("ndr-1"));
    assert_eq!(active.activated_by.as_deref(), Some("dir-1"));
}

#[test]
fn test_forced_completion_is_persisted_with_the_activation() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-a");
    let state = create_ndr(&mut persistence, &state, "ndr-b");
    let state = apply_and_persist(
        &mut persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-a"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
    );

    let _ = apply_and_persist(
        &mut persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-b"),
            at: String::from("2026-02-06T22:00:00Z"),
        },
    );

    let a = persistence.get_ndr(&NdrId::new("ndr-a")).unwrap();
    let b = persistence.get_ndr(&NdrId::new("ndr-b")).unwrap();
    assert_eq!(a.status, NdrStatus::Completed);
    assert_eq!(a.ended_at.as_deref(), Some("2026-02-06T22:00:00Z"));
    assert_eq!(b.status, NdrStatus::Active);

    let actives = persistence.list_ndrs_by_status(NdrStatus::Active).unwrap();
    assert_eq!(actives.len(), 1);
}

#[test]
fn test_end_persists_statistics() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");
    let state = apply_and_persist(
        &mut persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-1"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
    );

    persistence
        .insert_ride(&ride("r1", "ndr-1", RideStatus::Completed, Some(3)))
        .unwrap();
    persistence
        .insert_ride(&ride("r2", "ndr-1", RideStatus::Cancelled, None))
        .unwrap();

    let rides = persistence.get_rides_for_ndr(&NdrId::new("ndr-1")).unwrap();
    let _ = apply_and_persist(
        &mut persistence,
        &state,
        Command::End {
            ndr_id: NdrId::new("ndr-1"),
            at: String::from("2026-02-07T02:30:00Z"),
            rides,
        },
    );

    let stored = persistence.get_ndr(&NdrId::new("ndr-1")).unwrap();
    assert_eq!(stored.status, NdrStatus::Completed);
    assert_eq!(stored.outcome.completed_rides, 1);
    assert_eq!(stored.outcome.completed_riders, 3);
    assert_eq!(stored.outcome.cancelled_rides, 1);
    assert_eq!(stored.outcome.cancelled_riders, 1);
}

#[test]
fn test_audit_timeline_is_ordered_and_scoped() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");
    let state = create_ndr(&mut persistence, &state, "ndr-2");
    let _ = apply_and_persist(
        &mut persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-1"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
    );

    let timeline = persistence.get_audit_timeline(&NdrId::new("ndr-1")).unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].action.name, "CreateNdr");
    assert_eq!(timeline[1].action.name, "ActivateNdr");
    assert!(timeline[0].event_id.unwrap() < timeline[1].event_id.unwrap());

    let other = persistence.get_audit_timeline(&NdrId::new("ndr-2")).unwrap();
    assert_eq!(other.len(), 1);
}

#[test]
fn test_audit_event_round_trips_by_id() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let result = apply(
        &NdrSet::new(),
        Command::CreateNdr {
            ndr_id: NdrId::new("ndr-1"),
            event_id: None,
            event_name: String::from("Run"),
            event_date: String::from("2026-02-06T21:00:00Z"),
            location: String::from("Union"),
            car_count: 2,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let receipt = persistence.persist_transition(&result).unwrap();

    let stored = persistence.get_audit_event(receipt.event_id).unwrap();

    assert_eq!(stored.event_id, Some(receipt.event_id));
    assert_eq!(stored.actor.id, "dir-1");
    assert_eq!(stored.actor.actor_type, "director");
    assert_eq!(stored.action.name, "CreateNdr");
    assert_eq!(stored.ndr_id, NdrId::new("ndr-1"));
}

#[test]
fn test_missing_audit_event_is_not_found() {
    let persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.get_audit_event(999);

    assert_eq!(result, Err(crate::PersistenceError::EventNotFound(999)));
}

#[test]
fn test_member_roster_round_trips() {
    let persistence = SqlitePersistence::new_in_memory().unwrap();
    let member = Member::new(
        MemberId::new("m1"),
        String::from("Alex"),
        String::from("male"),
    );

    persistence.upsert_member(&member).unwrap();
    assert_eq!(persistence.get_member(&MemberId::new("m1")).unwrap(), member);

    let renamed = Member::new(
        MemberId::new("m1"),
        String::from("Alexandra"),
        String::from("female"),
    );
    persistence.upsert_member(&renamed).unwrap();

    let members = persistence.list_members().unwrap();
    assert_eq!(members, vec![renamed]);
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first = SqlitePersistence::new_in_memory().unwrap();
    let second = SqlitePersistence::new_in_memory().unwrap();

    let _ = create_ndr(&mut first, &NdrSet::new(), "ndr-1");

    assert_eq!(second.load_state().unwrap().ndrs.len(), 0);
}
