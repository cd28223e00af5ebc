// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for ride storage and retrieval.

use crate::SqlitePersistence;
use saferide::NdrSet;
use saferide_domain::{GeoPoint, NdrId, RideStatus, tally_by_status};

use super::helpers::{create_ndr, ride};

#[test]
fn test_ride_round_trips() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let _ = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");

    let mut logged = ride("r1", "ndr-1", RideStatus::Pending, Some(2));
    logged.pickup_coords = Some(GeoPoint {
        lat: 30.6188,
        lon: -96.3365,
    });
    logged.car_number = Some(2);
    persistence.insert_ride(&logged).unwrap();

    let rides = persistence.get_rides_for_ndr(&NdrId::new("ndr-1")).unwrap();
    assert_eq!(rides, vec![logged]);
}

#[test]
fn test_rides_are_scoped_to_their_ndr() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let state = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");
    let _ = create_ndr(&mut persistence, &state, "ndr-2");

    persistence
        .insert_ride(&ride("r1", "ndr-1", RideStatus::Pending, None))
        .unwrap();
    persistence
        .insert_ride(&ride("r2", "ndr-2", RideStatus::Pending, None))
        .unwrap();

    let rides = persistence.get_rides_for_ndr(&NdrId::new("ndr-1")).unwrap();
    assert_eq!(rides.len(), 1);
    assert_eq!(rides[0].ride_id.value(), "r1");
}

#[test]
fn test_ride_for_unknown_ndr_is_rejected_by_foreign_key() {
    let persistence = SqlitePersistence::new_in_memory().unwrap();

    let result = persistence.insert_ride(&ride("r1", "ghost", RideStatus::Pending, None));

    assert!(result.is_err());
}

#[test]
fn test_duplicate_ride_id_is_rejected() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let _ = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");

    persistence
        .insert_ride(&ride("r1", "ndr-1", RideStatus::Pending, None))
        .unwrap();
    let result = persistence.insert_ride(&ride("r1", "ndr-1", RideStatus::Pending, None));

    assert!(result.is_err());
}

#[test]
fn test_stored_rides_feed_the_aggregator() {
    let mut persistence = SqlitePersistence::new_in_memory().unwrap();
    let _ = create_ndr(&mut persistence, &NdrSet::new(), "ndr-1");

    persistence
        .insert_ride(&ride("r1", "ndr-1", RideStatus::Completed, Some(3)))
        .unwrap();
    persistence
        .insert_ride(&ride("r2", "ndr-1", RideStatus::Active, None))
        .unwrap();

    let rides = persistence.get_rides_for_ndr(&NdrId::new("ndr-1")).unwrap();
    let tallies = tally_by_status(&rides);

    assert_eq!(tallies[&RideStatus::Completed].rider_count, 3);
    assert_eq!(tallies[&RideStatus::Active].ride_count, 1);
}
