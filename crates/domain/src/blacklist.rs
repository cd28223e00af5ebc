// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Blacklist entries for addresses and phone numbers.
//!
//! Entries live in two collections (address and phone). Temporary-scope
//! entries belong to one NDR and are deleted en masse when that NDR ends.

use crate::error::DomainError;
use crate::types::NdrId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which collection an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistKind {
    /// An address blacklist entry.
    Address,
    /// A phone-number blacklist entry.
    Phone,
}

impl BlacklistKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Phone => "phone",
        }
    }
}

/// How long an entry stays in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistScope {
    /// In force until explicitly removed.
    Permanent,
    /// In force only for its owning NDR; removed when that NDR ends.
    Temporary,
}

impl BlacklistScope {
    /// Returns the string representation of the scope.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Temporary => "temporary",
        }
    }
}

impl FromStr for BlacklistScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "permanent" => Ok(Self::Permanent),
            "temporary" => Ok(Self::Temporary),
            _ => Err(DomainError::InvalidBlacklistValue(format!(
                "unknown scope '{s}'"
            ))),
        }
    }
}

/// Review status of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlacklistStatus {
    /// Logged, awaiting director review.
    Pending,
    /// Reviewed and approved.
    Approved,
}

impl BlacklistStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

impl FromStr for BlacklistStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            _ => Err(DomainError::InvalidBlacklistValue(format!(
                "unknown status '{s}'"
            ))),
        }
    }
}

/// A single blacklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    /// Database id, `None` before first persistence.
    pub entry_id: Option<i64>,
    /// Which collection the entry belongs to.
    pub kind: BlacklistKind,
    /// The blacklisted address or phone number.
    pub value: String,
    /// Why the entry was created.
    pub reason: String,
    /// Review status.
    pub status: BlacklistStatus,
    /// How long the entry stays in force.
    pub scope: BlacklistScope,
    /// The owning NDR; required when scope is temporary.
    pub ndr_id: Option<NdrId>,
}

impl BlacklistEntry {
    /// Creates a new entry, validating the scope/owner pairing.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which collection the entry belongs to
    /// * `value` - The blacklisted address or phone number
    /// * `reason` - Why the entry was created
    /// * `status` - Review status
    /// * `scope` - How long the entry stays in force
    /// * `ndr_id` - The owning NDR (required for temporary scope)
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty, or if the scope is
    /// temporary without an owning NDR.
    pub fn new(
        kind: BlacklistKind,
        value: String,
        reason: String,
        status: BlacklistStatus,
        scope: BlacklistScope,
        ndr_id: Option<NdrId>,
    ) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::InvalidBlacklistValue(String::from(
                "value cannot be empty",
            )));
        }
        if scope == BlacklistScope::Temporary && ndr_id.is_none() {
            return Err(DomainError::TemporaryScopeRequiresNdr);
        }

        Ok(Self {
            entry_id: None,
            kind,
            value,
            reason,
            status,
            scope,
            ndr_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_entry_requires_owning_ndr() {
        let result = BlacklistEntry::new(
            BlacklistKind::Phone,
            String::from("555-0100"),
            String::from("prank calls"),
            BlacklistStatus::Pending,
            BlacklistScope::Temporary,
            None,
        );

        assert_eq!(result, Err(DomainError::TemporaryScopeRequiresNdr));
    }

    #[test]
    fn test_permanent_entry_needs_no_ndr() {
        let result = BlacklistEntry::new(
            BlacklistKind::Address,
            String::from("13 Elm St"),
            String::from("repeated no-shows"),
            BlacklistStatus::Approved,
            BlacklistScope::Permanent,
            None,
        );

        assert!(result.is_ok());
    }

    #[test]
    fn test_empty_value_is_rejected() {
        let result = BlacklistEntry::new(
            BlacklistKind::Address,
            String::from("  "),
            String::from("reason"),
            BlacklistStatus::Pending,
            BlacklistScope::Permanent,
            None,
        );

        assert!(matches!(result, Err(DomainError::InvalidBlacklistValue(_))));
    }
}
