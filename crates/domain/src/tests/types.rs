// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Gender, Member, MemberId, Ndr, NdrId, NdrStatus, RideStatistics};

#[test]
fn test_ndr_id_is_trimmed() {
    let id = NdrId::new("  ndr-42  ");
    assert_eq!(id.value(), "ndr-42");
}

#[test]
fn test_gender_classification_male_variants() {
    for raw in ["male", "MALE", "m", "M", "man", "Man"] {
        assert_eq!(Gender::classify(raw), Gender::Male, "{raw}");
    }
}

#[test]
fn test_gender_classification_female_variants() {
    for raw in ["female", "F", "f", "woman", "WOMAN"] {
        assert_eq!(Gender::classify(raw), Gender::Female, "{raw}");
    }
}

#[test]
fn test_gender_classification_everything_else_is_unclassified() {
    for raw in ["non-binary", "nb", "", "prefer not to say", "x"] {
        assert_eq!(Gender::classify(raw), Gender::Unclassified, "{raw:?}");
    }
}

#[test]
fn test_member_classified_gender_uses_recorded_value() {
    let member = Member::new(
        MemberId::new("m1"),
        String::from("Alex"),
        String::from("Woman"),
    );
    assert_eq!(member.classified_gender(), Gender::Female);
}

#[test]
fn test_new_ndr_starts_pending_and_zeroed() {
    let ndr = Ndr::new(
        NdrId::new("ndr-1"),
        None,
        String::from("Thursday Run"),
        String::from("2026-03-05T21:00:00Z"),
        String::from("Union"),
        3,
    );

    assert_eq!(ndr.status, NdrStatus::Pending);
    assert_eq!(ndr.outcome, RideStatistics::zeroed());
    assert!(ndr.signups.is_empty());
    assert_eq!(ndr.assignments.cars.len(), 3);
    assert!(ndr.activated_at.is_none());
    assert!(ndr.archive_summary.is_none());
}

#[test]
fn test_ndr_serde_round_trip() {
    let ndr = Ndr::new(
        NdrId::new("ndr-1"),
        Some(String::from("evt-1")),
        String::from("Thursday Run"),
        String::from("2026-03-05T21:00:00Z"),
        String::from("Union"),
        2,
    );

    let json = serde_json::to_string(&ndr).unwrap();
    let parsed: Ndr = serde_json::from_str(&json).unwrap();

    assert_eq!(ndr, parsed);
}
