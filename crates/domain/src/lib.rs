// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod assignment;
mod blacklist;
mod error;
mod ndr_status;
mod ride;
mod ride_stats;
mod summary;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use assignment::{
    AssignmentConfirmations, AssignmentMap, AssignmentOutcome, AssignmentTarget,
    AssignmentWarning, Car1Compliance, GenderRequirement,
};
pub use blacklist::{BlacklistEntry, BlacklistKind, BlacklistScope, BlacklistStatus};
pub use error::DomainError;
pub use ndr_status::NdrStatus;
pub use ride::{GeoPoint, Ride, RideStatus};
pub use ride_stats::{RideStatistics, StatusTally, tally_by_status};
pub use summary::generate_archive_summary;
pub use types::{Gender, Member, MemberId, Ndr, NdrId, NightNotes, ProgressUpdate, RideId};
pub use validation::{
    validate_member_fields, validate_ndr_fields, validate_rfc3339, validate_ride_fields,
};
