// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Archive summary generation.
//!
//! When an NDR is archived, a human-readable summary of the night is
//! generated and snapshotted onto the record. Generation is a pure
//! function of the NDR snapshot and member roster: the same inputs always
//! produce byte-identical output.

use crate::types::{Member, MemberId, Ndr};
use std::fmt::Write as _;

/// Generates the archive summary text for an NDR.
///
/// The summary covers event metadata, final ride statistics, leadership,
/// the car roster, chronological progress updates, and the free-text
/// night summary.
///
/// # Arguments
///
/// * `ndr` - The NDR snapshot being archived
/// * `roster` - Members referenced by the NDR, for display names
#[must_use]
pub fn generate_archive_summary(ndr: &Ndr, roster: &[Member]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Night Duty Run: {}", ndr.event_name);
    let _ = writeln!(out, "Date: {}", ndr.event_date);
    let _ = writeln!(out, "Location: {}", ndr.location);
    if let Some(activated_at) = &ndr.activated_at {
        let _ = writeln!(out, "Activated: {activated_at}");
    }
    if let Some(ended_at) = &ndr.ended_at {
        let _ = writeln!(out, "Ended: {ended_at}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Ride statistics:");
    let _ = writeln!(
        out,
        "  Completed: {} rides, {} riders",
        ndr.outcome.completed_rides, ndr.outcome.completed_riders
    );
    let _ = writeln!(
        out,
        "  Cancelled: {} rides, {} riders",
        ndr.outcome.cancelled_rides, ndr.outcome.cancelled_riders
    );
    let _ = writeln!(
        out,
        "  Terminated: {} rides, {} riders",
        ndr.outcome.terminated_rides, ndr.outcome.terminated_riders
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Leadership:");
    let _ = writeln!(out, "  DON: {}", post_line(ndr.assignments.don.as_ref(), roster));
    let _ = writeln!(out, "  DOC: {}", post_line(ndr.assignments.doc.as_ref(), roster));
    let _ = writeln!(out, "  DUC: {}", post_line(ndr.assignments.duc.as_ref(), roster));

    let _ = writeln!(out);
    let _ = writeln!(out, "Cars:");
    for (number, car) in &ndr.assignments.cars {
        if car.is_empty() {
            let _ = writeln!(out, "  Car {number}: (unstaffed)");
        } else {
            let names: Vec<String> = car.iter().map(|id| display_name(id, roster)).collect();
            let _ = writeln!(out, "  Car {number}: {}", names.join(", "));
        }
    }

    if !ndr.notes.progress_updates.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Progress updates:");
        for update in &ndr.notes.progress_updates {
            let _ = writeln!(out, "  [{}] {}", update.at, update.text);
        }
    }

    if !ndr.notes.summary_text.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Summary:");
        let _ = writeln!(out, "{}", ndr.notes.summary_text);
    }

    out
}

fn post_line(member_id: Option<&MemberId>, roster: &[Member]) -> String {
    member_id.map_or_else(|| String::from("(unfilled)"), |id| display_name(id, roster))
}

fn display_name(member_id: &MemberId, roster: &[Member]) -> String {
    roster
        .iter()
        .find(|m| &m.member_id == member_id)
        .map_or_else(|| member_id.value().to_string(), |m| m.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{AssignmentConfirmations, AssignmentTarget};
    use crate::ride_stats::RideStatistics;
    use crate::types::{NdrId, NightNotes, ProgressUpdate};

    fn sample_ndr(roster: &[Member]) -> Ndr {
        let mut ndr = Ndr::new(
            NdrId::new("ndr-7"),
            Some(String::from("evt-7")),
            String::from("Friday Night Run"),
            String::from("2026-02-06T21:00:00Z"),
            String::from("Student Union"),
            2,
        );
        ndr.activated_at = Some(String::from("2026-02-06T21:05:00Z"));
        ndr.ended_at = Some(String::from("2026-02-07T02:30:00Z"));
        ndr.outcome = RideStatistics {
            completed_rides: 12,
            completed_riders: 19,
            cancelled_rides: 2,
            cancelled_riders: 3,
            terminated_rides: 1,
            terminated_riders: 1,
        };
        let confirm = AssignmentConfirmations {
            allow_duplicate: true,
            override_gender_warning: true,
        };
        ndr.assignments
            .assign(&roster[0], AssignmentTarget::Don, roster, confirm)
            .unwrap();
        ndr.assignments
            .assign(&roster[1], AssignmentTarget::Car(1), roster, confirm)
            .unwrap();
        ndr.assignments
            .assign(&roster[2], AssignmentTarget::Car(1), roster, confirm)
            .unwrap();
        ndr.notes = NightNotes {
            progress_updates: vec![
                ProgressUpdate {
                    at: String::from("2026-02-06T22:00:00Z"),
                    text: String::from("First wave of calls"),
                },
                ProgressUpdate {
                    at: String::from("2026-02-07T01:00:00Z"),
                    text: String::from("Car 2 refueled"),
                },
            ],
            summary_text: String::from("Busy but smooth night."),
        };
        ndr
    }

    fn sample_roster() -> Vec<Member> {
        vec![
            Member::new(MemberId::new("d1"), String::from("Dana"), String::from("F")),
            Member::new(MemberId::new("m1"), String::from("Alex"), String::from("male")),
            Member::new(MemberId::new("m2"), String::from("Bea"), String::from("female")),
        ]
    }

    #[test]
    fn test_summary_generation_is_deterministic() {
        let roster = sample_roster();
        let ndr = sample_ndr(&roster);

        let first = generate_archive_summary(&ndr, &roster);
        let second = generate_archive_summary(&ndr, &roster);

        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_contains_all_sections() {
        let roster = sample_roster();
        let ndr = sample_ndr(&roster);

        let summary = generate_archive_summary(&ndr, &roster);

        assert!(summary.contains("Night Duty Run: Friday Night Run"));
        assert!(summary.contains("Completed: 12 rides, 19 riders"));
        assert!(summary.contains("DON: Dana"));
        assert!(summary.contains("Car 1: Alex, Bea"));
        assert!(summary.contains("Car 2: (unstaffed)"));
        assert!(summary.contains("[2026-02-06T22:00:00Z] First wave of calls"));
        assert!(summary.contains("Busy but smooth night."));
    }

    #[test]
    fn test_unknown_member_falls_back_to_id() {
        let roster = sample_roster();
        let mut ndr = sample_ndr(&roster);
        ndr.assignments.duc = Some(MemberId::new("ghost"));

        let summary = generate_archive_summary(&ndr, &roster);

        assert!(summary.contains("DUC: ghost"));
    }

    #[test]
    fn test_unfilled_posts_are_marked() {
        let roster = sample_roster();
        let ndr = sample_ndr(&roster);

        let summary = generate_archive_summary(&ndr, &roster);

        assert!(summary.contains("DOC: (unfilled)"));
    }

    #[test]
    fn test_progress_updates_render_in_insertion_order() {
        let roster = sample_roster();
        let ndr = sample_ndr(&roster);

        let summary = generate_archive_summary(&ndr, &roster);
        let first = summary.find("First wave of calls").unwrap();
        let second = summary.find("Car 2 refueled").unwrap();

        assert!(first < second);
    }
}
