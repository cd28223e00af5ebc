// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::assignment::AssignmentMap;
use crate::ndr_status::NdrStatus;
use crate::ride_stats::RideStatistics;
use serde::{Deserialize, Serialize};

/// Represents an NDR identifier.
///
/// Ids are opaque strings assigned at creation time and are stable for the
/// lifetime of the NDR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NdrId {
    /// The id value.
    value: String,
}

impl NdrId {
    /// Creates a new `NdrId`.
    ///
    /// Ids are trimmed of surrounding whitespace.
    ///
    /// # Arguments
    ///
    /// * `value` - The id value
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for NdrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a member identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId {
    /// The id value.
    value: String,
}

impl MemberId {
    /// Creates a new `MemberId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The id value
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Represents a ride identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RideId {
    /// The id value.
    value: String,
}

impl RideId {
    /// Creates a new `RideId`.
    ///
    /// # Arguments
    ///
    /// * `value` - The id value
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_string(),
        }
    }

    /// Returns the id value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Gender classification derived from a member's free-text gender field.
///
/// Only `Male` and `Female` participate in the car 1 balance rule; any
/// other value is `Unclassified` and neither satisfies nor violates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// Classified male.
    Male,
    /// Classified female.
    Female,
    /// Not classifiable from the recorded value.
    Unclassified,
}

impl Gender {
    /// Classifies a free-text gender value.
    ///
    /// Matching is case-insensitive against `{male, m, man}` and
    /// `{female, f, woman}`; anything else is `Unclassified`.
    ///
    /// # Arguments
    ///
    /// * `raw` - The recorded gender value
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "male" | "m" | "man" => Self::Male,
            "female" | "f" | "woman" => Self::Female,
            _ => Self::Unclassified,
        }
    }
}

/// Represents a registered member of the carpool program.
///
/// Members are referenced by id from signup lists and assignment maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's id.
    pub member_id: MemberId,
    /// The member's display name.
    pub name: String,
    /// The member's self-reported gender (free text).
    pub gender: String,
}

impl Member {
    /// Creates a new `Member`.
    ///
    /// # Arguments
    ///
    /// * `member_id` - The member's id
    /// * `name` - The member's display name
    /// * `gender` - The member's self-reported gender
    #[must_use]
    pub const fn new(member_id: MemberId, name: String, gender: String) -> Self {
        Self {
            member_id,
            name,
            gender,
        }
    }

    /// Returns the member's gender classification for the car 1 rule.
    #[must_use]
    pub fn classified_gender(&self) -> Gender {
        Gender::classify(&self.gender)
    }
}

/// A single timestamped progress update recorded during the night.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// When the update was recorded (RFC 3339).
    pub at: String,
    /// The update text.
    pub text: String,
}

/// The free-form notes structure attached to an NDR.
///
/// Progress updates are kept in chronological insertion order; the
/// archive summary generator renders them in that order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NightNotes {
    /// Chronological progress updates.
    pub progress_updates: Vec<ProgressUpdate>,
    /// Free-text summary of the night.
    pub summary_text: String,
}

impl NightNotes {
    /// Creates empty notes.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            progress_updates: Vec::new(),
            summary_text: String::new(),
        }
    }
}

/// A Night Duty Run.
///
/// An NDR is created in `Pending` status when its operating-night event is
/// created and is driven through the lifecycle by director actions. The
/// `outcome` statistics are zeroed until the NDR ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ndr {
    /// The NDR's id.
    pub ndr_id: NdrId,
    /// Cross-reference to the calendar event that spawned this NDR.
    pub event_id: Option<String>,
    /// The operating-night event name.
    pub event_name: String,
    /// The event date/time (RFC 3339).
    pub event_date: String,
    /// The operating location.
    pub location: String,
    /// The lifecycle status.
    pub status: NdrStatus,
    /// Number of cars available this night.
    pub car_count: u8,
    /// Members signed up for this night.
    pub signups: Vec<MemberId>,
    /// The role/car assignment map.
    pub assignments: AssignmentMap,
    /// Progress updates and free-text summary.
    pub notes: NightNotes,
    /// Final ride statistics; zeroed until the NDR ends.
    pub outcome: RideStatistics,
    /// When the NDR was activated (RFC 3339).
    pub activated_at: Option<String>,
    /// Who activated the NDR.
    pub activated_by: Option<String>,
    /// When the NDR ended (RFC 3339).
    pub ended_at: Option<String>,
    /// Who ended the NDR.
    pub ended_by: Option<String>,
    /// When the NDR was archived (RFC 3339).
    pub archived_at: Option<String>,
    /// Who archived the NDR.
    pub archived_by: Option<String>,
    /// The generated human-readable summary snapshotted at archive time.
    pub archive_summary: Option<String>,
}

impl Ndr {
    /// Creates a new pending NDR.
    ///
    /// # Arguments
    ///
    /// * `ndr_id` - The NDR's id
    /// * `event_id` - Optional cross-reference to the spawning event
    /// * `event_name` - The operating-night event name
    /// * `event_date` - The event date/time (RFC 3339)
    /// * `location` - The operating location
    /// * `car_count` - Number of cars available
    #[must_use]
    pub fn new(
        ndr_id: NdrId,
        event_id: Option<String>,
        event_name: String,
        event_date: String,
        location: String,
        car_count: u8,
    ) -> Self {
        Self {
            ndr_id,
            event_id,
            event_name,
            event_date,
            location,
            status: NdrStatus::Pending,
            car_count,
            signups: Vec::new(),
            assignments: AssignmentMap::new(car_count),
            notes: NightNotes::new(),
            outcome: RideStatistics::zeroed(),
            activated_at: None,
            activated_by: None,
            ended_at: None,
            ended_by: None,
            archived_at: None,
            archived_by: None,
            archive_summary: None,
        }
    }

    /// Returns true if this NDR is currently active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == NdrStatus::Active
    }
}
