// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Event name is empty or invalid.
    InvalidEventName(String),
    /// Location is empty or invalid.
    InvalidLocation(String),
    /// Car count is outside the permitted range.
    InvalidCarCount {
        /// The invalid count value.
        count: u8,
    },
    /// Car number does not exist on this NDR.
    InvalidCarNumber {
        /// The invalid car number.
        number: u8,
        /// The highest valid car number.
        max: u8,
    },
    /// Failed to parse a timestamp from a string.
    TimestampParseError {
        /// The invalid timestamp string.
        timestamp: String,
        /// The parsing error message.
        error: String,
    },
    /// NDR status string is not a valid status.
    InvalidNdrStatus {
        /// The invalid status string.
        status: String,
    },
    /// Ride status string is not a valid status.
    InvalidRideStatus {
        /// The invalid status string.
        status: String,
    },
    /// A lifecycle transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition is rejected.
        reason: String,
    },
    /// NDR does not exist.
    NdrNotFound(String),
    /// An NDR with this id already exists.
    DuplicateNdr(String),
    /// The operation requires an active NDR.
    NdrNotActive {
        /// The NDR id.
        ndr_id: String,
        /// The actual status.
        status: String,
    },
    /// The NDR is not editable in its current status.
    NotEditable {
        /// The NDR id.
        ndr_id: String,
        /// The actual status.
        status: String,
    },
    /// Member id is empty or invalid.
    InvalidMemberId(String),
    /// Member name is empty or invalid.
    InvalidMemberName(String),
    /// Member is already signed up for this NDR.
    DuplicateSignup {
        /// The NDR id.
        ndr_id: String,
        /// The member id.
        member_id: String,
    },
    /// Member is not signed up for this NDR.
    SignupNotFound {
        /// The NDR id.
        ndr_id: String,
        /// The member id.
        member_id: String,
    },
    /// Assignment target string is not recognized.
    InvalidAssignmentTarget(String),
    /// Member is not assigned to the given target.
    MemberNotAssigned {
        /// The member id.
        member_id: String,
        /// The target description.
        target: String,
    },
    /// Patron name is empty or invalid.
    InvalidPatronName(String),
    /// A ride address is empty or invalid.
    InvalidAddress(String),
    /// Rider count must be at least 1 when given.
    InvalidRiderCount {
        /// The invalid count value.
        riders: u32,
    },
    /// Blacklist entry value is empty or invalid.
    InvalidBlacklistValue(String),
    /// A temporary-scope blacklist entry must reference an owning NDR.
    TemporaryScopeRequiresNdr,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEventName(msg) => write!(f, "Invalid event name: {msg}"),
            Self::InvalidLocation(msg) => write!(f, "Invalid location: {msg}"),
            Self::InvalidCarCount { count } => {
                write!(f, "Invalid car count: {count}. Must be between 1 and 9")
            }
            Self::InvalidCarNumber { number, max } => {
                write!(f, "Invalid car number: {number}. Must be between 1 and {max}")
            }
            Self::TimestampParseError { timestamp, error } => {
                write!(f, "Failed to parse timestamp '{timestamp}': {error}")
            }
            Self::InvalidNdrStatus { status } => {
                write!(f, "Invalid NDR status: '{status}'")
            }
            Self::InvalidRideStatus { status } => {
                write!(f, "Invalid ride status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Invalid status transition {from} -> {to}: {reason}")
            }
            Self::NdrNotFound(id) => write!(f, "NDR '{id}' not found"),
            Self::DuplicateNdr(id) => write!(f, "NDR '{id}' already exists"),
            Self::NdrNotActive { ndr_id, status } => {
                write!(f, "NDR '{ndr_id}' is not active (status: {status})")
            }
            Self::NotEditable { ndr_id, status } => {
                write!(f, "NDR '{ndr_id}' is not editable (status: {status})")
            }
            Self::InvalidMemberId(msg) => write!(f, "Invalid member id: {msg}"),
            Self::InvalidMemberName(msg) => write!(f, "Invalid member name: {msg}"),
            Self::DuplicateSignup { ndr_id, member_id } => {
                write!(f, "Member '{member_id}' is already signed up for NDR '{ndr_id}'")
            }
            Self::SignupNotFound { ndr_id, member_id } => {
                write!(f, "Member '{member_id}' is not signed up for NDR '{ndr_id}'")
            }
            Self::InvalidAssignmentTarget(target) => {
                write!(f, "Invalid assignment target: '{target}'")
            }
            Self::MemberNotAssigned { member_id, target } => {
                write!(f, "Member '{member_id}' is not assigned to {target}")
            }
            Self::InvalidPatronName(msg) => write!(f, "Invalid patron name: {msg}"),
            Self::InvalidAddress(msg) => write!(f, "Invalid address: {msg}"),
            Self::InvalidRiderCount { riders } => {
                write!(f, "Invalid rider count: {riders}. Must be at least 1")
            }
            Self::InvalidBlacklistValue(msg) => {
                write!(f, "Invalid blacklist value: {msg}")
            }
            Self::TemporaryScopeRequiresNdr => {
                write!(f, "A temporary-scope blacklist entry must reference an owning NDR")
            }
        }
    }
}

impl std::error::Error for DomainError {}
