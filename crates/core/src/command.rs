// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use saferide_domain::{AssignmentMap, Member, MemberId, NdrId, NightNotes, Ride};

/// A command represents user or system intent as data only.
///
/// Commands are the only way to request state changes. Anything the
/// transition needs beyond the NDR set itself — timestamps, the ride set
/// at end time, the member roster at archive time — travels in the
/// command, so `apply` stays pure and deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a pending NDR for a new operating-night event.
    CreateNdr {
        /// The id for the new NDR.
        ndr_id: NdrId,
        /// Cross-reference to the spawning calendar event.
        event_id: Option<String>,
        /// The operating-night event name.
        event_name: String,
        /// The event date/time (RFC 3339).
        event_date: String,
        /// The operating location.
        location: String,
        /// Number of cars available.
        car_count: u8,
    },
    /// Activate a pending or archived NDR.
    ///
    /// Any other currently-active NDR is first forced to completed.
    Activate {
        /// The NDR to activate.
        ndr_id: NdrId,
        /// The activation timestamp (RFC 3339).
        at: String,
    },
    /// End the active NDR, computing final ride statistics.
    End {
        /// The NDR to end.
        ndr_id: NdrId,
        /// The end timestamp (RFC 3339).
        at: String,
        /// Every ride owned by this NDR at end time.
        rides: Vec<Ride>,
    },
    /// Archive a completed NDR, snapshotting its generated summary.
    Archive {
        /// The NDR to archive.
        ndr_id: NdrId,
        /// The archive timestamp (RFC 3339).
        at: String,
        /// Members referenced by the NDR, for summary display names.
        roster: Vec<Member>,
    },
    /// Reactivate an archived NDR.
    ///
    /// Same effect as `Activate`, but the source status must be archived.
    Reactivate {
        /// The NDR to reactivate.
        ndr_id: NdrId,
        /// The reactivation timestamp (RFC 3339).
        at: String,
    },
    /// Replace the editable assignment map and notes of an active NDR.
    ///
    /// This is the flush target of the debounced assignment autosave.
    UpdateAssignments {
        /// The NDR being edited.
        ndr_id: NdrId,
        /// The new assignment map.
        assignments: AssignmentMap,
        /// The new notes document.
        notes: NightNotes,
    },
    /// Sign a member up for a pending or active NDR.
    SignUpMember {
        /// The NDR to sign up for.
        ndr_id: NdrId,
        /// The member signing up.
        member_id: MemberId,
    },
    /// Withdraw a member's signup.
    WithdrawMember {
        /// The NDR to withdraw from.
        ndr_id: NdrId,
        /// The member withdrawing.
        member_id: MemberId,
    },
}
