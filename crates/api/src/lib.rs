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

mod auth;
mod capabilities;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use capabilities::{Operation, capabilities_for};
pub use error::{ApiError, AuthError};
pub use handlers::{
    activate_ndr, add_blacklist_entry, archive_ndr, create_ndr, end_ndr, log_ride,
    reactivate_ndr, ride_statistics, sign_up_member, update_assignments, withdraw_member,
};
pub use request_response::{
    AddBlacklistEntryRequest, ApiResult, CreateNdrRequest, EndNdrResponse, LogRideRequest,
    NdrLifecycleRequest, NdrWriteResponse, RideStatsResponse, SignupRequest,
    UpdateAssignmentsRequest,
};
