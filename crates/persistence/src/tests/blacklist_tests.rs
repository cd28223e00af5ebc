// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for blacklist storage and end-of-night cleanup scoping.

use crate::SqlitePersistence;
use saferide::{Command, NdrSet};
use saferide_domain::{
    BlacklistEntry, BlacklistKind, BlacklistScope, BlacklistStatus, NdrId,
};

use super::helpers::{apply_and_persist, create_ndr};

fn entry(
    kind: BlacklistKind,
    value: &str,
    scope: BlacklistScope,
    ndr: Option<&str>,
) -> BlacklistEntry {
    BlacklistEntry::new(
        kind,
        value.to_string(),
        String::from("test entry"),
        BlacklistStatus::Approved,
        scope,
        ndr.map(NdrId::new),
    )
    .expect("entry should be valid")
}

/// Activates `ndr-x` and `ndr-y` in turn, leaving `ndr-x` active last.
fn two_ndrs(persistence: &mut SqlitePersistence) -> NdrSet {
    let state = create_ndr(persistence, &NdrSet::new(), "ndr-x");
    let state = create_ndr(persistence, &state, "ndr-y");
    apply_and_persist(
        persistence,
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-x"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
    )
}

#[test]
fn test_cleanup_deletes_only_matching_temporary_entries() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = two_ndrs(&mut persistence);

    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Address,
            "13 Elm St",
            BlacklistScope::Temporary,
            Some("ndr-x"),
        ))
        .unwrap();
    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Address,
            "9 Oak St",
            BlacklistScope::Temporary,
            Some("ndr-y"),
        ))
        .unwrap();
    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Address,
            "1 Pine St",
            BlacklistScope::Permanent,
            Some("ndr-x"),
        ))
        .unwrap();

    let result = saferide::apply(
        &state,
        Command::End {
            ndr_id: NdrId::new("ndr-x"),
            at: String::from("2026-02-07T02:30:00Z"),
            rides: Vec::new(),
        },
        super::helpers::create_test_actor(),
        super::helpers::create_test_cause(),
    )
    .unwrap();
    let receipt = persistence.persist_transition(&result).unwrap();

    assert_eq!(receipt.blacklist_removed, 1);

    let remaining = persistence
        .list_blacklist_entries(BlacklistKind::Address)
        .unwrap();
    let values: Vec<&str> = remaining.iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["9 Oak St", "1 Pine St"]);
}

#[test]
fn test_cleanup_spans_both_collections() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = two_ndrs(&mut persistence);

    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Address,
            "13 Elm St",
            BlacklistScope::Temporary,
            Some("ndr-x"),
        ))
        .unwrap();
    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Phone,
            "555-0100",
            BlacklistScope::Temporary,
            Some("ndr-x"),
        ))
        .unwrap();
    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Phone,
            "555-0199",
            BlacklistScope::Permanent,
            None,
        ))
        .unwrap();

    let result = saferide::apply(
        &state,
        Command::End {
            ndr_id: NdrId::new("ndr-x"),
            at: String::from("2026-02-07T02:30:00Z"),
            rides: Vec::new(),
        },
        super::helpers::create_test_actor(),
        super::helpers::create_test_cause(),
    )
    .unwrap();
    let receipt = persistence.persist_transition(&result).unwrap();

    assert_eq!(receipt.blacklist_removed, 2);
    assert_eq!(
        persistence
            .list_blacklist_entries(BlacklistKind::Address)
            .unwrap()
            .len(),
        0
    );
    assert_eq!(
        persistence
            .list_blacklist_entries(BlacklistKind::Phone)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_non_end_transitions_do_not_touch_the_blacklist() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-x");

    persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Phone,
            "555-0100",
            BlacklistScope::Temporary,
            Some("ndr-x"),
        ))
        .unwrap();

    let result = saferide::apply(
        &state,
        Command::Activate {
            ndr_id: NdrId::new("ndr-x"),
            at: String::from("2026-02-06T21:05:00Z"),
        },
        super::helpers::create_test_actor(),
        super::helpers::create_test_cause(),
    )
    .unwrap();
    let receipt = persistence.persist_transition(&result).unwrap();

    assert_eq!(receipt.blacklist_removed, 0);
    assert_eq!(
        persistence
            .list_blacklist_entries(BlacklistKind::Phone)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_entries_round_trip_with_ids() {
    let persistence = SqlitePersistence::new_in_memory().unwrap();

    let id = persistence
        .insert_blacklist_entry(&entry(
            BlacklistKind::Phone,
            "555-0100",
            BlacklistScope::Permanent,
            None,
        ))
        .unwrap();

    let entries = persistence
        .list_blacklist_entries(BlacklistKind::Phone)
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_id, Some(id));
    assert_eq!(entries[0].value, "555-0100");
    assert_eq!(entries[0].scope, BlacklistScope::Permanent);
    assert_eq!(entries[0].ndr_id, None);
}
