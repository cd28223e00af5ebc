// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride storage.
//!
//! Phone intake inserts pending rides; dispatch screens outside this
//! core advance their status. This layer reads them back for the ride
//! aggregator and the live stat tiles.

use rusqlite::{Connection, Row, params};

use saferide_domain::{GeoPoint, NdrId, Ride, RideId, RideStatus};

use crate::error::PersistenceError;

/// Inserts a ride.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ride` - The ride to insert
///
/// # Errors
///
/// Returns an error if the write fails (including a duplicate ride id).
pub fn insert_ride(conn: &Connection, ride: &Ride) -> Result<(), PersistenceError> {
    conn.execute(
        "INSERT INTO rides (
            ride_id, ndr_id, patron_name, patron_phone,
            pickup_address, dropoff_address,
            pickup_lat, pickup_lon, dropoff_lat, dropoff_lon,
            riders, status, car_number
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            ride.ride_id.value(),
            ride.ndr_id.value(),
            ride.patron_name,
            ride.patron_phone,
            ride.pickup_address,
            ride.dropoff_address,
            ride.pickup_coords.map(|p| p.lat),
            ride.pickup_coords.map(|p| p.lon),
            ride.dropoff_coords.map(|p| p.lat),
            ride.dropoff_coords.map(|p| p.lon),
            ride.riders,
            ride.status.as_str(),
            ride.car_number,
        ],
    )?;

    Ok(())
}

#[allow(clippy::type_complexity)]
fn raw_ride_from_row(
    row: &Row<'_>,
) -> rusqlite::Result<(
    String,
    String,
    String,
    String,
    String,
    String,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<f64>,
    Option<u32>,
    String,
    Option<u8>,
)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
        row.get(10)?,
        row.get(11)?,
        row.get(12)?,
    ))
}

fn coords(lat: Option<f64>, lon: Option<f64>) -> Option<GeoPoint> {
    match (lat, lon) {
        (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
        _ => None,
    }
}

/// Retrieves every ride owned by an NDR.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `ndr_id` - The owning NDR
///
/// # Errors
///
/// Returns an error if the query fails or a record cannot be interpreted.
pub fn get_rides_for_ndr(
    conn: &Connection,
    ndr_id: &NdrId,
) -> Result<Vec<Ride>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT ride_id, ndr_id, patron_name, patron_phone,
                pickup_address, dropoff_address,
                pickup_lat, pickup_lon, dropoff_lat, dropoff_lon,
                riders, status, car_number
         FROM rides
         WHERE ndr_id = ?1
         ORDER BY ride_id",
    )?;

    let rows = stmt.query_map(params![ndr_id.value()], raw_ride_from_row)?;

    let mut rides: Vec<Ride> = Vec::new();
    for row in rows {
        let (
            ride_id,
            owner,
            patron_name,
            patron_phone,
            pickup_address,
            dropoff_address,
            pickup_lat,
            pickup_lon,
            dropoff_lat,
            dropoff_lon,
            riders,
            status,
            car_number,
        ) = row?;

        let status: RideStatus = status.parse().map_err(
            |e: saferide_domain::DomainError| PersistenceError::CorruptRecord {
                table: String::from("rides"),
                reason: e.to_string(),
            },
        )?;

        rides.push(Ride {
            ride_id: RideId::new(&ride_id),
            ndr_id: NdrId::new(&owner),
            patron_name,
            patron_phone,
            pickup_address,
            dropoff_address,
            pickup_coords: coords(pickup_lat, pickup_lon),
            dropoff_coords: coords(dropoff_lat, dropoff_lon),
            riders,
            status,
            car_number,
        });
    }

    Ok(rides)
}
