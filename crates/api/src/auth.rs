// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use saferide_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles determine what actions an authenticated actor may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Director: runs nights and has corrective authority.
    ///
    /// Directors may:
    /// - create, activate, end, archive, and reactivate NDRs
    /// - everything a deputy may do
    Director,
    /// Deputy: staffs the couch and phones during a night.
    ///
    /// Deputies may:
    /// - edit assignments and notes while an NDR is active
    /// - log phone-in rides
    /// - manage blacklist entries
    /// - everything a member may do
    Deputy,
    /// Member: a registered volunteer.
    ///
    /// Members may sign up for (and withdraw from) operating nights and
    /// read NDR state.
    Member,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Director => "director",
            Self::Deputy => "deputy",
            Self::Member => "member",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions to
    /// the authenticated person.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Stub authentication.
///
/// Identity is asserted by the caller; a deployment places the campus
/// single sign-on in front of this service. The stub still rejects
/// anonymous requests.
///
/// # Arguments
///
/// * `id` - The asserted actor id
/// * `role` - The asserted role
///
/// # Errors
///
/// Returns an error if the id is empty.
pub fn authenticate_stub(id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if id.trim().is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("actor id cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require(
        actor: &AuthenticatedActor,
        allowed: &[Role],
        action: &str,
        required_role: &str,
    ) -> Result<(), AuthError> {
        if allowed.contains(&actor.role) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: required_role.to_string(),
            })
        }
    }

    /// Checks if an actor may create an NDR.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director.
    pub fn authorize_create_ndr(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Director], "create_ndr", "Director")
    }

    /// Checks if an actor may activate (or reactivate) an NDR.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director.
    pub fn authorize_activate_ndr(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Director], "activate_ndr", "Director")
    }

    /// Checks if an actor may end an NDR.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director.
    pub fn authorize_end_ndr(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Director], "end_ndr", "Director")
    }

    /// Checks if an actor may archive an NDR.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director.
    pub fn authorize_archive_ndr(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Director], "archive_ndr", "Director")
    }

    /// Checks if an actor may edit assignments and notes.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director or Deputy.
    pub fn authorize_update_assignments(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            &[Role::Director, Role::Deputy],
            "update_assignments",
            "Deputy",
        )
    }

    /// Checks if an actor may log a phone-in ride.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director or Deputy.
    pub fn authorize_log_ride(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(actor, &[Role::Director, Role::Deputy], "log_ride", "Deputy")
    }

    /// Checks if an actor may add blacklist entries.
    ///
    /// # Errors
    ///
    /// Returns an error unless the actor is a Director or Deputy.
    pub fn authorize_manage_blacklist(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            &[Role::Director, Role::Deputy],
            "manage_blacklist",
            "Deputy",
        )
    }

    /// Checks if an actor may sign up for (or withdraw from) a night.
    ///
    /// Any authenticated role may manage signups.
    ///
    /// # Errors
    ///
    /// This check currently always succeeds; the signature keeps the
    /// call sites uniform.
    pub fn authorize_signup(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require(
            actor,
            &[Role::Director, Role::Deputy, Role::Member],
            "signup",
            "Member",
        )
    }
}
