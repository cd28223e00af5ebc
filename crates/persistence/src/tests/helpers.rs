// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SqlitePersistence;
use saferide::{Command, NdrSet, apply};
use saferide_audit::{Actor, Cause};
use saferide_domain::{NdrId, Ride, RideId, RideStatus};

/// Creates a director actor for tests.
pub fn create_test_actor() -> Actor {
    Actor::new(String::from("dir-1"), String::from("director"))
}

/// Creates a generic cause for tests.
pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test request"))
}

/// Applies a command against the given state and persists the result,
/// returning the new state.
pub fn apply_and_persist(
    persistence: &mut SqlitePersistence,
    state: &NdrSet,
    command: Command,
) -> NdrSet {
    let result = apply(state, command, create_test_actor(), create_test_cause())
        .expect("apply should succeed");
    persistence
        .persist_transition(&result)
        .expect("persist should succeed");
    result.new_state
}

/// Creates a pending NDR in the store and returns the resulting state.
pub fn create_ndr(persistence: &mut SqlitePersistence, state: &NdrSet, id: &str) -> NdrSet {
    apply_and_persist(
        persistence,
        state,
        Command::CreateNdr {
            ndr_id: NdrId::new(id),
            event_id: None,
            event_name: format!("Run {id}"),
            event_date: String::from("2026-02-06T21:00:00Z"),
            location: String::from("Student Union"),
            car_count: 3,
        },
    )
}

/// Builds a ride owned by the given NDR.
pub fn ride(id: &str, ndr: &str, status: RideStatus, riders: Option<u32>) -> Ride {
    Ride {
        ride_id: RideId::new(id),
        ndr_id: NdrId::new(ndr),
        patron_name: String::from("Pat"),
        patron_phone: String::from("555-0100"),
        pickup_address: String::from("12 College Ave"),
        dropoff_address: String::from("88 Oak St"),
        pickup_coords: None,
        dropoff_coords: None,
        riders,
        status,
        car_number: None,
    }
}
