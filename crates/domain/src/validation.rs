// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ride::Ride;
use crate::types::Member;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// The highest car count an NDR may be created with.
const MAX_CAR_COUNT: u8 = 9;

/// Validates the creation-time fields of an NDR.
///
/// # Arguments
///
/// * `event_name` - The operating-night event name
/// * `event_date` - The event date/time (RFC 3339)
/// * `location` - The operating location
/// * `car_count` - Number of cars available
///
/// # Errors
///
/// Returns an error if:
/// - The event name or location is empty
/// - The event date is not a valid RFC 3339 timestamp
/// - The car count is zero or above the permitted maximum
pub fn validate_ndr_fields(
    event_name: &str,
    event_date: &str,
    location: &str,
    car_count: u8,
) -> Result<(), DomainError> {
    // Rule: event name must not be empty
    if event_name.trim().is_empty() {
        return Err(DomainError::InvalidEventName(String::from(
            "Event name cannot be empty",
        )));
    }

    // Rule: location must not be empty
    if location.trim().is_empty() {
        return Err(DomainError::InvalidLocation(String::from(
            "Location cannot be empty",
        )));
    }

    validate_rfc3339(event_date)?;

    // Rule: at least one car, and no more than the fleet can supply
    if car_count == 0 || car_count > MAX_CAR_COUNT {
        return Err(DomainError::InvalidCarCount { count: car_count });
    }

    Ok(())
}

/// Validates that a string is an RFC 3339 timestamp.
///
/// Timestamps cross this crate as strings so that transitions and the
/// archive summary stay pure; the boundary validates them on the way in.
///
/// # Errors
///
/// Returns `DomainError::TimestampParseError` if parsing fails.
pub fn validate_rfc3339(timestamp: &str) -> Result<(), DomainError> {
    OffsetDateTime::parse(timestamp, &Rfc3339)
        .map(|_| ())
        .map_err(|e| DomainError::TimestampParseError {
            timestamp: timestamp.to_string(),
            error: e.to_string(),
        })
}

/// Validates a member's basic field constraints.
///
/// # Errors
///
/// Returns an error if the member id or name is empty.
pub fn validate_member_fields(member: &Member) -> Result<(), DomainError> {
    if member.member_id.value().is_empty() {
        return Err(DomainError::InvalidMemberId(String::from(
            "Member id cannot be empty",
        )));
    }

    if member.name.trim().is_empty() {
        return Err(DomainError::InvalidMemberName(String::from(
            "Member name cannot be empty",
        )));
    }

    // Gender is free text; classification happens at evaluation time.

    Ok(())
}

/// Validates a phone-in ride request's fields.
///
/// # Errors
///
/// Returns an error if:
/// - The patron name is empty
/// - The pickup or dropoff address is empty
/// - The rider count is given as zero
pub fn validate_ride_fields(ride: &Ride) -> Result<(), DomainError> {
    if ride.patron_name.trim().is_empty() {
        return Err(DomainError::InvalidPatronName(String::from(
            "Patron name cannot be empty",
        )));
    }

    if ride.pickup_address.trim().is_empty() {
        return Err(DomainError::InvalidAddress(String::from(
            "Pickup address cannot be empty",
        )));
    }

    if ride.dropoff_address.trim().is_empty() {
        return Err(DomainError::InvalidAddress(String::from(
            "Dropoff address cannot be empty",
        )));
    }

    if ride.riders == Some(0) {
        return Err(DomainError::InvalidRiderCount { riders: 0 });
    }

    Ok(())
}
