// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization matrix tests: who may drive which operations.

use crate::auth::{AuthorizationService, Role, authenticate_stub};
use crate::error::{ApiError, AuthError};
use crate::handlers::{activate_ndr, create_ndr, end_ndr, log_ride, update_assignments};
use crate::request_response::{
    CreateNdrRequest, LogRideRequest, NdrLifecycleRequest, UpdateAssignmentsRequest,
};
use saferide::NdrSet;
use saferide_domain::{AssignmentMap, NdrStatus, NightNotes};

use super::helpers::{actor, cause, set_with};

const AT: &str = "2026-02-06T21:05:00Z";

#[test]
fn test_authenticate_stub_rejects_empty_id() {
    let result = authenticate_stub(String::from("  "), Role::Director);
    assert!(matches!(
        result,
        Err(AuthError::AuthenticationFailed { .. })
    ));
}

#[test]
fn test_authenticate_stub_accepts_asserted_identity() {
    let authenticated = authenticate_stub(String::from("dir-1"), Role::Director).unwrap();
    assert_eq!(authenticated.id, "dir-1");
    assert_eq!(authenticated.role, Role::Director);
}

#[test]
fn test_lifecycle_operations_require_director() {
    for role in [Role::Deputy, Role::Member] {
        let who = actor(role);
        assert!(AuthorizationService::authorize_create_ndr(&who).is_err());
        assert!(AuthorizationService::authorize_activate_ndr(&who).is_err());
        assert!(AuthorizationService::authorize_end_ndr(&who).is_err());
        assert!(AuthorizationService::authorize_archive_ndr(&who).is_err());
    }

    let director = actor(Role::Director);
    assert!(AuthorizationService::authorize_create_ndr(&director).is_ok());
    assert!(AuthorizationService::authorize_activate_ndr(&director).is_ok());
    assert!(AuthorizationService::authorize_end_ndr(&director).is_ok());
    assert!(AuthorizationService::authorize_archive_ndr(&director).is_ok());
}

#[test]
fn test_dispatch_operations_allow_deputy() {
    for role in [Role::Director, Role::Deputy] {
        let who = actor(role);
        assert!(AuthorizationService::authorize_update_assignments(&who).is_ok());
        assert!(AuthorizationService::authorize_log_ride(&who).is_ok());
        assert!(AuthorizationService::authorize_manage_blacklist(&who).is_ok());
    }

    let member = actor(Role::Member);
    assert!(AuthorizationService::authorize_update_assignments(&member).is_err());
    assert!(AuthorizationService::authorize_log_ride(&member).is_err());
    assert!(AuthorizationService::authorize_manage_blacklist(&member).is_err());
}

#[test]
fn test_every_role_may_manage_signups() {
    for role in [Role::Director, Role::Deputy, Role::Member] {
        assert!(AuthorizationService::authorize_signup(&actor(role)).is_ok());
    }
}

#[test]
fn test_create_ndr_handler_rejects_non_directors() {
    let state = NdrSet::new();
    let request = CreateNdrRequest {
        ndr_id: String::from("ndr-1"),
        event_id: None,
        event_name: String::from("Run"),
        event_date: String::from("2026-02-06T21:00:00Z"),
        location: String::from("Union"),
        car_count: 2,
    };

    let result = create_ndr(&state, request, &actor(Role::Deputy), cause());

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_activate_handler_rejects_non_directors() {
    let state = set_with("ndr-1", NdrStatus::Pending);
    let request = NdrLifecycleRequest {
        ndr_id: String::from("ndr-1"),
    };

    let result = activate_ndr(&state, &request, AT.to_string(), &actor(Role::Member), cause());

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_end_handler_rejects_deputies() {
    let state = set_with("ndr-1", NdrStatus::Active);
    let request = NdrLifecycleRequest {
        ndr_id: String::from("ndr-1"),
    };

    let result = end_ndr(
        &state,
        &request,
        Vec::new(),
        AT.to_string(),
        &actor(Role::Deputy),
        cause(),
    );

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_update_assignments_allows_deputies() {
    let state = set_with("ndr-1", NdrStatus::Active);
    let request = UpdateAssignmentsRequest {
        ndr_id: String::from("ndr-1"),
        assignments: AssignmentMap::new(3),
        notes: NightNotes::new(),
    };

    let result = update_assignments(&state, request, &actor(Role::Deputy), cause());

    assert!(result.is_ok());
}

#[test]
fn test_log_ride_rejects_members() {
    let state = set_with("ndr-1", NdrStatus::Active);
    let request = LogRideRequest {
        ride_id: String::from("r1"),
        ndr_id: String::from("ndr-1"),
        patron_name: String::from("Pat"),
        patron_phone: String::from("555-0100"),
        pickup_address: String::from("A"),
        dropoff_address: String::from("B"),
        pickup_coords: None,
        dropoff_coords: None,
        riders: None,
    };

    let result = log_ride(&state, request, &actor(Role::Member));

    assert!(matches!(result, Err(ApiError::Unauthorized { .. })));
}

#[test]
fn test_unauthorized_error_names_the_required_role() {
    let who = actor(Role::Member);
    let err = AuthorizationService::authorize_end_ndr(&who).unwrap_err();

    assert_eq!(
        err,
        AuthError::Unauthorized {
            action: String::from("end_ndr"),
            required_role: String::from("Director"),
        }
    );
}
