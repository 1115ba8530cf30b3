//! Application lifecycle state machine.
//!
//! ```text
//! submitted ──approve──▶ approved ──dispatch──▶ dispatched
//!     └──────reject───▶ rejected
//! approved: card-arrived (¬card_arrived) then collected (card_arrived ∧ ¬collected)
//! ```
//!
//! Stores apply a transition as one conditional update keyed on the guards
//! below; [`Transition::check`] restates those guards so adapters can explain
//! why a conditional update matched nothing.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Application, ApplicationDraft, ApplicationId, ApplicationStatus};
use super::ApplicationValidationError;
use crate::domain::{IdNumber, OfficerId, Role};

/// A lifecycle step requested by an admin or the owning officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Admin approval; allocates the generated ID number.
    Approve,
    /// Admin rejection.
    Reject,
    /// Admin hand-off of the printed card.
    Dispatch,
    /// Owning officer records that the card reached the station.
    MarkCardArrived,
    /// Owning officer records that the applicant collected the card.
    MarkCollected,
}

impl Transition {
    /// Every transition, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Approve,
        Self::Reject,
        Self::Dispatch,
        Self::MarkCardArrived,
        Self::MarkCollected,
    ];

    /// Stable name used in audit records and logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Dispatch => "dispatch",
            Self::MarkCardArrived => "card_arrived",
            Self::MarkCollected => "collected",
        }
    }

    /// Role allowed to request this transition.
    #[must_use]
    pub const fn actor_role(self) -> Role {
        match self {
            Self::Approve | Self::Reject | Self::Dispatch => Role::Admin,
            Self::MarkCardArrived | Self::MarkCollected => Role::Officer,
        }
    }

    /// Status the application must be in.
    #[must_use]
    pub const fn required_status(self) -> ApplicationStatus {
        match self {
            Self::Approve | Self::Reject => ApplicationStatus::Submitted,
            Self::Dispatch | Self::MarkCardArrived | Self::MarkCollected => {
                ApplicationStatus::Approved
            }
        }
    }

    /// Status after the transition applies.
    #[must_use]
    pub const fn target_status(self) -> ApplicationStatus {
        match self {
            Self::Approve | Self::MarkCardArrived | Self::MarkCollected => {
                ApplicationStatus::Approved
            }
            Self::Reject => ApplicationStatus::Rejected,
            Self::Dispatch => ApplicationStatus::Dispatched,
        }
    }

    /// Whether applying the transition allocates an ID number.
    #[must_use]
    pub const fn allocates_id_number(self) -> bool {
        matches!(self, Self::Approve)
    }

    /// Whether `actor` can see the application at all for this transition.
    ///
    /// Officers only see their own applications; anything else reads as
    /// not found.
    #[must_use]
    pub fn is_visible_to(self, application: &Application, actor: &Actor) -> bool {
        match (self.actor_role(), actor) {
            (Role::Admin, Actor::Admin(_)) => true,
            (Role::Officer, Actor::Officer(officer)) => application.officer_id() == *officer,
            _ => false,
        }
    }

    /// Evaluate the guards against the current record.
    pub fn check(self, application: &Application) -> Result<(), Ineligibility> {
        let actual = application.status();
        let required = self.required_status();
        if actual != required {
            return Err(Ineligibility::WrongStatus { required, actual });
        }
        match self {
            Self::MarkCardArrived if application.card_arrived() => {
                Err(Ineligibility::CardAlreadyArrived)
            }
            Self::MarkCollected if !application.card_arrived() => {
                Err(Ineligibility::CardNotArrived)
            }
            Self::MarkCollected if application.collected() => Err(Ineligibility::AlreadyCollected),
            _ => Ok(()),
        }
    }

    /// Produce the record after this transition.
    ///
    /// `generated_id_number` is required for [`Transition::Approve`] and
    /// ignored otherwise. The result is revalidated so a missing number is
    /// reported rather than stored.
    pub fn apply(
        self,
        application: &Application,
        generated_id_number: Option<IdNumber>,
        at: DateTime<Utc>,
    ) -> Result<Application, ApplicationValidationError> {
        let current = application.clone();
        Application::new(ApplicationDraft {
            id: current.id,
            application_number: current.application_number,
            officer_id: current.officer_id,
            application_type: current.application_type,
            applicant: current.applicant,
            supporting_documents: current.supporting_documents,
            status: self.target_status(),
            generated_id_number: if self.allocates_id_number() {
                generated_id_number
            } else {
                current.generated_id_number
            },
            card_arrived: current.card_arrived || self == Self::MarkCardArrived,
            collected: current.collected || self == Self::MarkCollected,
            created_at: current.created_at,
            updated_at: at,
        })
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Account performing a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Actor {
    /// Administrator, by account id.
    Admin(Uuid),
    /// Officer, by account id.
    Officer(OfficerId),
}

impl Actor {
    /// Role the actor acts under, used for visibility checks.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Admin(_) => Role::Admin,
            Self::Officer(_) => Role::Officer,
        }
    }

    /// Account identifier regardless of role.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        match self {
            Self::Admin(id) => *id,
            Self::Officer(id) => *id.as_uuid(),
        }
    }

    /// Rebuild an actor from stored role and id.
    #[must_use]
    pub const fn from_parts(role: Role, id: Uuid) -> Self {
        match role {
            Role::Admin => Self::Admin(id),
            Role::Officer => Self::Officer(OfficerId::from_uuid(id)),
        }
    }
}

/// Why an existing application could not take a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    /// The application is not in the status the transition starts from.
    WrongStatus {
        required: ApplicationStatus,
        actual: ApplicationStatus,
    },
    /// Collection requested before the card arrived.
    CardNotArrived,
    /// Arrival was already recorded.
    CardAlreadyArrived,
    /// Collection was already recorded.
    AlreadyCollected,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongStatus {
                required: ApplicationStatus::Submitted,
                actual,
            } => write!(f, "application already {actual}"),
            Self::WrongStatus {
                actual: ApplicationStatus::Dispatched,
                ..
            } => f.write_str("application already dispatched"),
            Self::WrongStatus { .. } => f.write_str("application not approved"),
            Self::CardNotArrived => f.write_str("card not arrived"),
            Self::CardAlreadyArrived => f.write_str("card already marked as arrived"),
            Self::AlreadyCollected => f.write_str("application already collected"),
        }
    }
}

/// Transition requested against a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRequest {
    pub application_id: ApplicationId,
    pub transition: Transition,
    /// Who asked; decides visibility.
    pub actor: Actor,
    /// Timestamp recorded on the update and the audit event.
    pub requested_at: DateTime<Utc>,
}

/// Result of one transition attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The transition applied; carries the updated record.
    Applied(Application),
    /// No application with that id is visible to the actor.
    NotFound,
    /// The application exists but its guards rejected the transition.
    NotEligible(Ineligibility),
}

impl TransitionOutcome {
    /// Classify a conditional update that matched no row, given the record
    /// as it stands now.
    #[must_use]
    pub fn from_unmatched(
        transition: Transition,
        current: Option<&Application>,
        actor: &Actor,
    ) -> Self {
        match current {
            Some(application) if transition.is_visible_to(application, actor) => {
                match transition.check(application) {
                    Err(reason) => Self::NotEligible(reason),
                    // Guards pass now, so a concurrent writer changed the row
                    // between the update and this read.
                    Ok(()) => Self::NotEligible(Ineligibility::WrongStatus {
                        required: transition.required_status(),
                        actual: application.status(),
                    }),
                }
            }
            _ => Self::NotFound,
        }
    }
}
