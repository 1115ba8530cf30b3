//! Append-only audit trail of application lifecycle changes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ApplicationId, ApplicationStatus, Transition, transition::Actor};

/// What happened to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventAction {
    /// The application was created.
    Submitted,
    /// A lifecycle transition was applied.
    Transition(Transition),
}

impl EventAction {
    /// Stable storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submit",
            Self::Transition(transition) => transition.name(),
        }
    }
}

impl fmt::Display for EventAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "submit" {
            return Ok(Self::Submitted);
        }
        Transition::ALL
            .into_iter()
            .find(|transition| transition.name() == s)
            .map(Self::Transition)
            .ok_or_else(|| format!("unknown event action: {s}"))
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEvent {
    pub id: Uuid,
    pub application_id: ApplicationId,
    pub action: EventAction,
    pub from_status: Option<ApplicationStatus>,
    pub to_status: ApplicationStatus,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

impl ApplicationEvent {
    /// Record the creation of an application by its officer.
    #[must_use]
    pub fn submitted(
        application_id: ApplicationId,
        actor: Actor,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id,
            action: EventAction::Submitted,
            from_status: None,
            to_status: ApplicationStatus::Submitted,
            actor,
            occurred_at,
        }
    }

    /// Record an applied transition.
    #[must_use]
    pub fn transitioned(
        application_id: ApplicationId,
        transition: Transition,
        from_status: ApplicationStatus,
        actor: Actor,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id,
            action: EventAction::Transition(transition),
            from_status: Some(from_status),
            to_status: transition.target_status(),
            actor,
            occurred_at,
        }
    }
}
