// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride statistics aggregation.
//!
//! Pure tally functions over a ride set. Used on demand when an NDR ends
//! and continuously for live dashboard stat tiles.

use crate::ride::{Ride, RideStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ride and rider counts for a single status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StatusTally {
    /// Number of rides with this status.
    pub ride_count: u32,
    /// Total riders across those rides (each ride's count defaults to 1).
    pub rider_count: u32,
}

/// Tallies a ride set per status.
///
/// Pure and stateless: given the same ride set, the result is identical.
/// Statuses with no rides are present with zero tallies so callers can
/// render complete stat tiles without probing for missing keys.
#[must_use]
pub fn tally_by_status(rides: &[Ride]) -> BTreeMap<RideStatus, StatusTally> {
    let mut tallies: BTreeMap<RideStatus, StatusTally> = RideStatus::all()
        .into_iter()
        .map(|status| (status, StatusTally::default()))
        .collect();

    for ride in rides {
        if let Some(tally) = tallies.get_mut(&ride.status) {
            tally.ride_count += 1;
            tally.rider_count += ride.rider_count();
        }
    }

    tallies
}

/// Final ride outcome counters stored on an NDR when it ends.
///
/// Only terminal outcomes are recorded; pending and active rides at end
/// time are not counted anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RideStatistics {
    /// Rides completed.
    pub completed_rides: u32,
    /// Riders delivered across completed rides.
    pub completed_riders: u32,
    /// Rides cancelled.
    pub cancelled_rides: u32,
    /// Riders across cancelled rides.
    pub cancelled_riders: u32,
    /// Rides terminated.
    pub terminated_rides: u32,
    /// Riders across terminated rides.
    pub terminated_riders: u32,
}

impl RideStatistics {
    /// Returns zeroed statistics, the state of every NDR before it ends.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            completed_rides: 0,
            completed_riders: 0,
            cancelled_rides: 0,
            cancelled_riders: 0,
            terminated_rides: 0,
            terminated_riders: 0,
        }
    }

    /// Computes final statistics from a ride set.
    ///
    /// # Arguments
    ///
    /// * `rides` - Every ride owned by the ending NDR
    #[must_use]
    pub fn from_rides(rides: &[Ride]) -> Self {
        let tallies = tally_by_status(rides);
        let get = |status: RideStatus| tallies.get(&status).copied().unwrap_or_default();

        let completed = get(RideStatus::Completed);
        let cancelled = get(RideStatus::Cancelled);
        let terminated = get(RideStatus::Terminated);

        Self {
            completed_rides: completed.ride_count,
            completed_riders: completed.rider_count,
            cancelled_rides: cancelled.ride_count,
            cancelled_riders: cancelled.rider_count,
            terminated_rides: terminated.ride_count,
            terminated_riders: terminated.rider_count,
        }
    }
}
