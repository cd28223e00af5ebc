// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride records and ride status.
//!
//! Rides are logged from phone intake and dispatched to cars by screens
//! outside this core. This crate creates pending rides and reads them for
//! aggregation; it never advances a ride's status.

use crate::error::DomainError;
use crate::types::{NdrId, RideId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status of a single ride request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    /// Logged, not yet dispatched.
    Pending,
    /// A car is on it.
    Active,
    /// Patron delivered.
    Completed,
    /// Cancelled before pickup.
    Cancelled,
    /// Terminated after pickup (patron removed, car recalled, etc.).
    Terminated,
}

impl RideStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Terminated => "terminated",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "terminated" => Ok(Self::Terminated),
            _ => Err(DomainError::InvalidRideStatus {
                status: s.to_string(),
            }),
        }
    }

    /// All ride statuses, in tally order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Pending,
            Self::Active,
            Self::Completed,
            Self::Cancelled,
            Self::Terminated,
        ]
    }
}

impl FromStr for RideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for RideStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A geocoordinate attached to a ride address.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

/// A phone-in ride request, owned by exactly one NDR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ride {
    /// The ride's id.
    pub ride_id: RideId,
    /// The owning NDR.
    pub ndr_id: NdrId,
    /// The patron's name.
    pub patron_name: String,
    /// The patron's phone number.
    pub patron_phone: String,
    /// Pickup address.
    pub pickup_address: String,
    /// Dropoff address.
    pub dropoff_address: String,
    /// Optional pickup geocoordinates.
    pub pickup_coords: Option<GeoPoint>,
    /// Optional dropoff geocoordinates.
    pub dropoff_coords: Option<GeoPoint>,
    /// Number of riders; counts as 1 when not recorded.
    pub riders: Option<u32>,
    /// The ride's status.
    pub status: RideStatus,
    /// The assigned car number, once dispatched.
    pub car_number: Option<u8>,
}

impl Ride {
    /// Returns the rider count, defaulting to 1 when not recorded.
    #[must_use]
    pub fn rider_count(&self) -> u32 {
        self.riders.unwrap_or(1)
    }
}
