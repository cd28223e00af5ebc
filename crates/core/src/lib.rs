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

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use saferide_domain::{DomainError, NdrId};

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use error::CoreError;
pub use state::{NdrSet, TransitionResult};

/// Validates that an NDR exists in the set.
///
/// This is a read-only validation that does not create audit events.
///
/// # Arguments
///
/// * `state` - The NDR set to check
/// * `ndr_id` - The NDR id to validate
///
/// # Errors
///
/// Returns `DomainError::NdrNotFound` if no NDR with this id exists.
pub fn validate_ndr_exists(state: &NdrSet, ndr_id: &NdrId) -> Result<(), DomainError> {
    if state.get(ndr_id).is_none() {
        return Err(DomainError::NdrNotFound(ndr_id.value().to_string()));
    }
    Ok(())
}
