// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The role/car assignment map and its validation rules.
//!
//! Assignments are edited by drag-and-drop in the dispatch UI and pushed
//! back to the owning NDR on a debounced save. Validation here is
//! advisory: outcomes carry structured warnings, and the caller decides
//! whether to re-submit with an explicit confirmation. The one soft
//! constraint is the car 1 gender balance rule.

use crate::error::DomainError;
use crate::types::{Gender, Member, MemberId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// A slot a member can be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentTarget {
    /// Director on Night (single occupancy).
    Don,
    /// Director on Call (single occupancy).
    Doc,
    /// Director Undercover (single occupancy).
    Duc,
    /// Dispatch couch crew.
    Couch,
    /// Phone intake crew.
    Phones,
    /// Northgate station crew.
    Northgate,
    /// A numbered car.
    Car(u8),
}

impl AssignmentTarget {
    /// Parses a target from its string representation.
    ///
    /// Cars are written `car:N`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAssignmentTarget` if the string is not
    /// a recognized target.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "don" => Ok(Self::Don),
            "doc" => Ok(Self::Doc),
            "duc" => Ok(Self::Duc),
            "couch" => Ok(Self::Couch),
            "phones" => Ok(Self::Phones),
            "northgate" => Ok(Self::Northgate),
            other => {
                if let Some(number) = other.strip_prefix("car:") {
                    number
                        .parse::<u8>()
                        .map(Self::Car)
                        .map_err(|_| DomainError::InvalidAssignmentTarget(other.to_string()))
                } else {
                    Err(DomainError::InvalidAssignmentTarget(other.to_string()))
                }
            }
        }
    }
}

impl FromStr for AssignmentTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AssignmentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Don => write!(f, "don"),
            Self::Doc => write!(f, "doc"),
            Self::Duc => write!(f, "duc"),
            Self::Couch => write!(f, "couch"),
            Self::Phones => write!(f, "phones"),
            Self::Northgate => write!(f, "northgate"),
            Self::Car(number) => write!(f, "car:{number}"),
        }
    }
}

/// What car 1 is still missing to satisfy the balance rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenderRequirement {
    /// No member classified male is on car 1.
    Male,
    /// No member classified female is on car 1.
    Female,
}

/// The structured result of evaluating the car 1 balance rule.
///
/// Car 1 is compliant when it is empty or carries at least one member
/// classified male and one classified female. Extra members never break
/// compliance once both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car1Compliance {
    /// Whether the rule is satisfied.
    pub compliant: bool,
    /// The requirements still unmet, empty when compliant.
    pub missing: Vec<GenderRequirement>,
}

/// Advisory warnings attached to an assignment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignmentWarning {
    /// The member already holds exactly this target; nothing was changed.
    AlreadyInTarget {
        /// The target in question.
        target: AssignmentTarget,
    },
    /// The member is already assigned elsewhere; duplicate assignment
    /// needs explicit confirmation.
    AssignedElsewhere {
        /// Every target the member currently holds.
        targets: Vec<AssignmentTarget>,
    },
    /// Car 1 still lacks a male or female member.
    Car1GenderImbalance {
        /// The requirements still unmet.
        missing: Vec<GenderRequirement>,
    },
}

/// Explicit confirmations supplied with an assignment request.
///
/// Overrides are never implicit: a warning blocks the change until the
/// caller re-submits with the matching confirmation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AssignmentConfirmations {
    /// Confirm assigning a member who already holds another target.
    pub allow_duplicate: bool,
    /// Override the car 1 gender balance warning.
    pub override_gender_warning: bool,
}

impl AssignmentConfirmations {
    /// No confirmations given.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            allow_duplicate: false,
            override_gender_warning: false,
        }
    }
}

/// The result of an assignment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    /// Whether the map was changed.
    pub applied: bool,
    /// Advisory warnings, whether or not the change was applied.
    pub warnings: Vec<AssignmentWarning>,
}

/// The mutable role/car assignment map of one NDR.
///
/// Single-occupancy leadership posts hold at most one member; crew posts
/// and cars hold lists. Cars are numbered 1 through the NDR's car count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentMap {
    /// Director on Night.
    pub don: Option<MemberId>,
    /// Director on Call.
    pub doc: Option<MemberId>,
    /// Director Undercover.
    pub duc: Option<MemberId>,
    /// Dispatch couch crew.
    pub couch: Vec<MemberId>,
    /// Phone intake crew.
    pub phones: Vec<MemberId>,
    /// Northgate station crew.
    pub northgate: Vec<MemberId>,
    /// Car rosters keyed by car number.
    pub cars: BTreeMap<u8, Vec<MemberId>>,
}

impl AssignmentMap {
    /// Creates an empty map with rosters for cars `1..=car_count`.
    ///
    /// # Arguments
    ///
    /// * `car_count` - Number of cars available this night
    #[must_use]
    pub fn new(car_count: u8) -> Self {
        Self {
            don: None,
            doc: None,
            duc: None,
            couch: Vec::new(),
            phones: Vec::new(),
            northgate: Vec::new(),
            cars: (1..=car_count).map(|n| (n, Vec::new())).collect(),
        }
    }

    /// The highest car number on this map.
    #[must_use]
    pub fn max_car(&self) -> u8 {
        self.cars.keys().next_back().copied().unwrap_or(0)
    }

    /// Returns true if the member holds exactly this target.
    #[must_use]
    pub fn contains(&self, member_id: &MemberId, target: AssignmentTarget) -> bool {
        match target {
            AssignmentTarget::Don => self.don.as_ref() == Some(member_id),
            AssignmentTarget::Doc => self.doc.as_ref() == Some(member_id),
            AssignmentTarget::Duc => self.duc.as_ref() == Some(member_id),
            AssignmentTarget::Couch => self.couch.contains(member_id),
            AssignmentTarget::Phones => self.phones.contains(member_id),
            AssignmentTarget::Northgate => self.northgate.contains(member_id),
            AssignmentTarget::Car(number) => self
                .cars
                .get(&number)
                .is_some_and(|roster| roster.contains(member_id)),
        }
    }

    /// Every target the member currently holds.
    #[must_use]
    pub fn targets_of(&self, member_id: &MemberId) -> Vec<AssignmentTarget> {
        let mut targets: Vec<AssignmentTarget> = Vec::new();
        for target in [
            AssignmentTarget::Don,
            AssignmentTarget::Doc,
            AssignmentTarget::Duc,
            AssignmentTarget::Couch,
            AssignmentTarget::Phones,
            AssignmentTarget::Northgate,
        ] {
            if self.contains(member_id, target) {
                targets.push(target);
            }
        }
        for (&number, roster) in &self.cars {
            if roster.contains(member_id) {
                targets.push(AssignmentTarget::Car(number));
            }
        }
        targets
    }

    /// Attempts to assign a member to a target.
    ///
    /// The attempt is refused (with a warning, not an error) when the
    /// member already holds the exact target, when the member is assigned
    /// elsewhere without a duplicate confirmation, or when the change
    /// would leave car 1 gender-imbalanced without an explicit override.
    /// An overridden car 1 imbalance is applied with the warning attached.
    ///
    /// # Arguments
    ///
    /// * `member` - The member being assigned
    /// * `target` - The destination slot
    /// * `roster` - Every member referenced by this map, for gender lookup
    /// * `confirmations` - Explicit confirmations from the caller
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCarNumber` if the target car does not
    /// exist on this map.
    pub fn assign(
        &mut self,
        member: &Member,
        target: AssignmentTarget,
        roster: &[Member],
        confirmations: AssignmentConfirmations,
    ) -> Result<AssignmentOutcome, DomainError> {
        if let AssignmentTarget::Car(number) = target {
            if !self.cars.contains_key(&number) {
                return Err(DomainError::InvalidCarNumber {
                    number,
                    max: self.max_car(),
                });
            }
        }

        // Dropping a member onto a slot they already hold is a no-op; the
        // warning lets the UI ask "already assigned here" instead of
        // silently ignoring the gesture.
        if self.contains(&member.member_id, target) {
            return Ok(AssignmentOutcome {
                applied: false,
                warnings: vec![AssignmentWarning::AlreadyInTarget { target }],
            });
        }

        let elsewhere: Vec<AssignmentTarget> = self.targets_of(&member.member_id);
        if !elsewhere.is_empty() && !confirmations.allow_duplicate {
            return Ok(AssignmentOutcome {
                applied: false,
                warnings: vec![AssignmentWarning::AssignedElsewhere { targets: elsewhere }],
            });
        }

        let mut warnings: Vec<AssignmentWarning> = Vec::new();

        if target == AssignmentTarget::Car(1) {
            let mut preview = self.clone();
            preview.apply_assign(&member.member_id, target);
            let compliance = preview.car1_compliance(roster);
            if !compliance.compliant {
                if confirmations.override_gender_warning {
                    warnings.push(AssignmentWarning::Car1GenderImbalance {
                        missing: compliance.missing,
                    });
                } else {
                    return Ok(AssignmentOutcome {
                        applied: false,
                        warnings: vec![AssignmentWarning::Car1GenderImbalance {
                            missing: compliance.missing,
                        }],
                    });
                }
            }
        }

        self.apply_assign(&member.member_id, target);

        Ok(AssignmentOutcome {
            applied: true,
            warnings,
        })
    }

    /// Removes a member from a target.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MemberNotAssigned` if the member does not
    /// hold the target, or `DomainError::InvalidCarNumber` for a car that
    /// does not exist on this map.
    pub fn unassign(
        &mut self,
        member_id: &MemberId,
        target: AssignmentTarget,
    ) -> Result<(), DomainError> {
        if let AssignmentTarget::Car(number) = target {
            if !self.cars.contains_key(&number) {
                return Err(DomainError::InvalidCarNumber {
                    number,
                    max: self.max_car(),
                });
            }
        }

        if !self.contains(member_id, target) {
            return Err(DomainError::MemberNotAssigned {
                member_id: member_id.value().to_string(),
                target: target.to_string(),
            });
        }

        match target {
            AssignmentTarget::Don => self.don = None,
            AssignmentTarget::Doc => self.doc = None,
            AssignmentTarget::Duc => self.duc = None,
            AssignmentTarget::Couch => self.couch.retain(|m| m != member_id),
            AssignmentTarget::Phones => self.phones.retain(|m| m != member_id),
            AssignmentTarget::Northgate => self.northgate.retain(|m| m != member_id),
            AssignmentTarget::Car(number) => {
                if let Some(roster) = self.cars.get_mut(&number) {
                    roster.retain(|m| m != member_id);
                }
            }
        }

        Ok(())
    }

    /// Evaluates the car 1 gender balance rule.
    ///
    /// # Arguments
    ///
    /// * `roster` - Every member referenced by this map, for gender lookup
    #[must_use]
    pub fn car1_compliance(&self, roster: &[Member]) -> Car1Compliance {
        let car1: &[MemberId] = self.cars.get(&1).map_or(&[], Vec::as_slice);

        if car1.is_empty() {
            return Car1Compliance {
                compliant: true,
                missing: Vec::new(),
            };
        }

        let mut has_male = false;
        let mut has_female = false;
        for member_id in car1 {
            match classified(roster, member_id) {
                Gender::Male => has_male = true,
                Gender::Female => has_female = true,
                Gender::Unclassified => {}
            }
        }

        let mut missing: Vec<GenderRequirement> = Vec::new();
        if !has_male {
            missing.push(GenderRequirement::Male);
        }
        if !has_female {
            missing.push(GenderRequirement::Female);
        }

        Car1Compliance {
            compliant: missing.is_empty(),
            missing,
        }
    }

    /// Boolean form of the car 1 rule for callers that only gate on it.
    #[must_use]
    pub fn is_car1_compliant(&self, roster: &[Member]) -> bool {
        self.car1_compliance(roster).compliant
    }

    /// Writes the member into the target without validation.
    ///
    /// Single-occupancy posts replace the current occupant.
    fn apply_assign(&mut self, member_id: &MemberId, target: AssignmentTarget) {
        match target {
            AssignmentTarget::Don => self.don = Some(member_id.clone()),
            AssignmentTarget::Doc => self.doc = Some(member_id.clone()),
            AssignmentTarget::Duc => self.duc = Some(member_id.clone()),
            AssignmentTarget::Couch => self.couch.push(member_id.clone()),
            AssignmentTarget::Phones => self.phones.push(member_id.clone()),
            AssignmentTarget::Northgate => self.northgate.push(member_id.clone()),
            AssignmentTarget::Car(number) => {
                if let Some(roster) = self.cars.get_mut(&number) {
                    roster.push(member_id.clone());
                }
            }
        }
    }
}

fn classified(roster: &[Member], member_id: &MemberId) -> Gender {
    roster
        .iter()
        .find(|m| &m.member_id == member_id)
        .map_or(Gender::Unclassified, Member::classified_gender)
}
