// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{NdrSet, TransitionResult};
use saferide_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use saferide_domain::{
    DomainError, Member, Ndr, NdrId, NdrStatus, Ride, RideStatistics, generate_archive_summary,
    validate_ndr_fields, validate_rfc3339,
};

/// Applies a command to the current NDR set, producing a new set and an
/// audit event.
///
/// The set is never mutated in place: a transition either produces a
/// complete new state or fails without side effects. Because `Activate`
/// first forces any other active NDR to completed within the same
/// transition, the single-active invariant holds after every successful
/// call.
///
/// # Arguments
///
/// * `state` - The current NDR set (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new set and audit event
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if the command violates domain rules: unknown NDR,
/// invalid lifecycle transition, malformed timestamp, or an edit against
/// a non-editable NDR.
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &NdrSet,
    command: Command,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::CreateNdr {
            ndr_id,
            event_id,
            event_name,
            event_date,
            location,
            car_count,
        } => {
            validate_ndr_fields(&event_name, &event_date, &location, car_count)?;

            // Check for duplicate
            if state.has(&ndr_id) {
                return Err(CoreError::DomainViolation(DomainError::DuplicateNdr(
                    ndr_id.value().to_string(),
                )));
            }

            let before: StateSnapshot = state.snapshot_of(&ndr_id);

            let ndr: Ndr = Ndr::new(
                ndr_id.clone(),
                event_id,
                event_name.clone(),
                event_date,
                location,
                car_count,
            );

            let mut new_state: NdrSet = state.clone();
            new_state.ndrs.push(ndr);

            let after: StateSnapshot = new_state.snapshot_of(&ndr_id);

            let action: Action = Action::new(
                String::from("CreateNdr"),
                Some(format!(
                    "Created NDR '{ndr_id}' for event '{event_name}' with {car_count} car(s)"
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, ndr_id);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::Activate { ndr_id, at } => {
            activate(state, &ndr_id, &at, false, actor, cause)
        }
        Command::Reactivate { ndr_id, at } => {
            activate(state, &ndr_id, &at, true, actor, cause)
        }
        Command::End { ndr_id, at, rides } => end(state, &ndr_id, &at, &rides, actor, cause),
        Command::Archive { ndr_id, at, roster } => {
            archive(state, &ndr_id, &at, &roster, actor, cause)
        }
        Command::UpdateAssignments {
            ndr_id,
            assignments,
            notes,
        } => {
            let ndr: &Ndr = require_ndr(state, &ndr_id)?;

            // The editable documents persist only while the night runs;
            // completed and archived NDRs are view-only.
            if ndr.status != NdrStatus::Active {
                return Err(CoreError::DomainViolation(DomainError::NotEditable {
                    ndr_id: ndr_id.value().to_string(),
                    status: ndr.status.as_str().to_string(),
                }));
            }

            let before: StateSnapshot = state.snapshot_of(&ndr_id);

            let mut new_state: NdrSet = state.clone();
            if let Some(target) = new_state.ndrs.iter_mut().find(|n| n.ndr_id == ndr_id) {
                target.assignments = assignments;
                target.notes = notes;
            }

            let after: StateSnapshot = new_state.snapshot_of(&ndr_id);

            let action: Action = Action::new(
                String::from("UpdateAssignments"),
                Some(format!("Updated assignments and notes for NDR '{ndr_id}'")),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, ndr_id);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::SignUpMember { ndr_id, member_id } => {
            let ndr: &Ndr = require_ndr(state, &ndr_id)?;

            if !ndr.status.is_editable() {
                return Err(CoreError::DomainViolation(DomainError::NotEditable {
                    ndr_id: ndr_id.value().to_string(),
                    status: ndr.status.as_str().to_string(),
                }));
            }

            if ndr.signups.contains(&member_id) {
                return Err(CoreError::DomainViolation(DomainError::DuplicateSignup {
                    ndr_id: ndr_id.value().to_string(),
                    member_id: member_id.value().to_string(),
                }));
            }

            let before: StateSnapshot = state.snapshot_of(&ndr_id);

            let mut new_state: NdrSet = state.clone();
            if let Some(target) = new_state.ndrs.iter_mut().find(|n| n.ndr_id == ndr_id) {
                target.signups.push(member_id.clone());
            }

            let after: StateSnapshot = new_state.snapshot_of(&ndr_id);

            let action: Action = Action::new(
                String::from("SignUpMember"),
                Some(format!("Member '{member_id}' signed up for NDR '{ndr_id}'")),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, ndr_id);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
        Command::WithdrawMember { ndr_id, member_id } => {
            let ndr: &Ndr = require_ndr(state, &ndr_id)?;

            if !ndr.status.is_editable() {
                return Err(CoreError::DomainViolation(DomainError::NotEditable {
                    ndr_id: ndr_id.value().to_string(),
                    status: ndr.status.as_str().to_string(),
                }));
            }

            if !ndr.signups.contains(&member_id) {
                return Err(CoreError::DomainViolation(DomainError::SignupNotFound {
                    ndr_id: ndr_id.value().to_string(),
                    member_id: member_id.value().to_string(),
                }));
            }

            let before: StateSnapshot = state.snapshot_of(&ndr_id);

            let mut new_state: NdrSet = state.clone();
            if let Some(target) = new_state.ndrs.iter_mut().find(|n| n.ndr_id == ndr_id) {
                target.signups.retain(|m| m != &member_id);
            }

            let after: StateSnapshot = new_state.snapshot_of(&ndr_id);

            let action: Action = Action::new(
                String::from("WithdrawMember"),
                Some(format!(
                    "Member '{member_id}' withdrew from NDR '{ndr_id}'"
                )),
            );
            let audit_event: AuditEvent =
                AuditEvent::new(actor, cause, action, before, after, ndr_id);

            Ok(TransitionResult {
                new_state,
                audit_event,
            })
        }
    }
}

/// Looks up an NDR or fails with `NdrNotFound`.
fn require_ndr<'a>(state: &'a NdrSet, ndr_id: &NdrId) -> Result<&'a Ndr, CoreError> {
    state.get(ndr_id).ok_or_else(|| {
        CoreError::DomainViolation(DomainError::NdrNotFound(ndr_id.value().to_string()))
    })
}

/// Shared implementation of `Activate` and `Reactivate`.
///
/// Every other active NDR is forced to completed (with an end stamp)
/// before the target becomes active, inside the same transition.
fn activate(
    state: &NdrSet,
    ndr_id: &NdrId,
    at: &str,
    require_archived: bool,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    validate_rfc3339(at)?;

    let ndr: &Ndr = require_ndr(state, ndr_id)?;

    if require_archived && ndr.status != NdrStatus::Archived {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: ndr.status.as_str().to_string(),
                to: NdrStatus::Active.as_str().to_string(),
                reason: "reactivate requires an archived NDR".to_string(),
            },
        ));
    }

    ndr.status.validate_transition(NdrStatus::Active)?;

    let was_archived: bool = ndr.status == NdrStatus::Archived;

    let before: StateSnapshot = state.snapshot_of(ndr_id);

    let mut new_state: NdrSet = state.clone();
    let mut forced: u32 = 0;
    for other in &mut new_state.ndrs {
        if other.status == NdrStatus::Active && &other.ndr_id != ndr_id {
            other.status = NdrStatus::Completed;
            other.ended_at = Some(at.to_string());
            other.ended_by = Some(actor.id.clone());
            forced += 1;
        }
    }

    if let Some(target) = new_state.ndrs.iter_mut().find(|n| &n.ndr_id == ndr_id) {
        target.status = NdrStatus::Active;
        target.activated_at = Some(at.to_string());
        target.activated_by = Some(actor.id.clone());
        if was_archived {
            // Reactivation reopens the night; the archive snapshot no
            // longer describes its final state.
            target.archived_at = None;
            target.archived_by = None;
            target.archive_summary = None;
        }
    }

    let after: StateSnapshot = new_state.snapshot_of(ndr_id);

    let name: &str = if require_archived || was_archived {
        "ReactivateNdr"
    } else {
        "ActivateNdr"
    };
    let action: Action = Action::new(
        String::from(name),
        Some(format!(
            "Activated NDR '{ndr_id}' (forced {forced} other active NDR(s) to completed)"
        )),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, ndr_id.clone());

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

/// Implementation of `End`.
///
/// Final ride statistics are computed from the supplied ride set; rides
/// owned by other NDRs are ignored.
fn end(
    state: &NdrSet,
    ndr_id: &NdrId,
    at: &str,
    rides: &[Ride],
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    validate_rfc3339(at)?;

    let ndr: &Ndr = require_ndr(state, ndr_id)?;

    if ndr.status != NdrStatus::Active {
        return Err(CoreError::DomainViolation(DomainError::NdrNotActive {
            ndr_id: ndr_id.value().to_string(),
            status: ndr.status.as_str().to_string(),
        }));
    }

    let owned: Vec<Ride> = rides
        .iter()
        .filter(|r| &r.ndr_id == ndr_id)
        .cloned()
        .collect();
    let outcome: RideStatistics = RideStatistics::from_rides(&owned);

    let before: StateSnapshot = state.snapshot_of(ndr_id);

    let mut new_state: NdrSet = state.clone();
    if let Some(target) = new_state.ndrs.iter_mut().find(|n| &n.ndr_id == ndr_id) {
        target.status = NdrStatus::Completed;
        target.outcome = outcome;
        target.ended_at = Some(at.to_string());
        target.ended_by = Some(actor.id.clone());
    }

    let after: StateSnapshot = new_state.snapshot_of(ndr_id);

    let action: Action = Action::new(
        String::from("EndNdr"),
        Some(format!(
            "Ended NDR '{}': {} completed ride(s), {} rider(s) delivered",
            ndr_id, outcome.completed_rides, outcome.completed_riders
        )),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, ndr_id.clone());

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}

/// Implementation of `Archive`.
///
/// The summary is generated from the completed NDR snapshot before the
/// archive stamp is applied, so regeneration from the same snapshot is
/// byte-identical.
fn archive(
    state: &NdrSet,
    ndr_id: &NdrId,
    at: &str,
    roster: &[Member],
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    validate_rfc3339(at)?;

    let ndr: &Ndr = require_ndr(state, ndr_id)?;

    ndr.status.validate_transition(NdrStatus::Archived)?;

    let summary: String = generate_archive_summary(ndr, roster);

    let before: StateSnapshot = state.snapshot_of(ndr_id);

    let mut new_state: NdrSet = state.clone();
    if let Some(target) = new_state.ndrs.iter_mut().find(|n| &n.ndr_id == ndr_id) {
        target.status = NdrStatus::Archived;
        target.archived_at = Some(at.to_string());
        target.archived_by = Some(actor.id.clone());
        target.archive_summary = Some(summary);
    }

    let after: StateSnapshot = new_state.snapshot_of(ndr_id);

    let action: Action = Action::new(
        String::from("ArchiveNdr"),
        Some(format!("Archived NDR '{ndr_id}' with generated summary")),
    );
    let audit_event: AuditEvent =
        AuditEvent::new(actor, cause, action, before, after, ndr_id.clone());

    Ok(TransitionResult {
        new_state,
        audit_event,
    })
}
