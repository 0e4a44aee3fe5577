//! Booking lifecycle state machine.
//!
//! The lifecycle is modeled as an explicit transition table (current state x
//! action -> next state) rather than scattered status-string checks. Every
//! transition corresponds to a backend endpoint named after the action; the
//! table mirrors exactly what those endpoints allow.

use serde::{Deserialize, Serialize};

/// Current status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Waiting for provider response
    Pending,
    /// Provider accepted
    Confirmed,
    /// Date/time set by the provider
    Scheduled,
    /// Work started
    InProgress,
    /// Provider uploaded after-photos, awaiting customer approval
    ProviderCompleted,
    /// Work finished and approved
    Completed,
    /// Customer disputed completion
    Disputed,
    /// Cancelled by either party
    Cancelled,
    /// Provider declined
    Declined,
    /// Provider never responded before the confirmation deadline
    Expired,
}

/// An action a participant (or the system) can take on a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingAction {
    Accept,
    Decline,
    Schedule,
    Start,
    Complete,
    ProviderComplete,
    Approve,
    Dispute,
    Cancel,
    Expire,
}

/// Error returned when an action is not allowed in the current status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action:?} a booking that is {status:?}")]
pub struct InvalidTransition {
    pub status: BookingStatus,
    pub action: BookingAction,
}

/// Apply an action to a status, yielding the next status.
pub fn transition(
    status: BookingStatus,
    action: BookingAction,
) -> Result<BookingStatus, InvalidTransition> {
    use BookingAction as A;
    use BookingStatus as S;

    let next = match (status, action) {
        (S::Pending, A::Accept) => S::Confirmed,
        (S::Pending, A::Decline) => S::Declined,
        (S::Pending | S::Confirmed, A::Schedule) => S::Scheduled,
        (S::Confirmed | S::Scheduled, A::Start) => S::InProgress,
        (S::Scheduled | S::InProgress, A::Complete) => S::Completed,
        (S::InProgress, A::ProviderComplete) => S::ProviderCompleted,
        (S::ProviderCompleted, A::Approve) => S::Completed,
        (S::Completed, A::Dispute) => S::Disputed,
        (S::Pending | S::Confirmed | S::Scheduled, A::Cancel) => S::Cancelled,
        (S::Pending, A::Expire) => S::Expired,
        _ => return Err(InvalidTransition { status, action }),
    };
    Ok(next)
}

impl BookingStatus {
    /// Display label shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Scheduled => "Scheduled",
            Self::InProgress => "In Progress",
            Self::ProviderCompleted => "Provider Completed",
            Self::Completed => "Completed",
            Self::Disputed => "Disputed",
            Self::Cancelled => "Cancelled",
            Self::Declined => "Declined",
            Self::Expired => "Expired",
        }
    }

    /// Statuses from which no further action is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Disputed | Self::Cancelled | Self::Declined | Self::Expired
        )
    }

    /// Whether either party may still cancel.
    pub fn is_cancellable(&self) -> bool {
        transition(*self, BookingAction::Cancel).is_ok()
    }

    /// Whether the customer may still edit the request details.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// All actions valid from this status, in display order.
    pub fn allowed_actions(&self) -> Vec<BookingAction> {
        use BookingAction as A;
        [
            A::Accept,
            A::Decline,
            A::Schedule,
            A::Start,
            A::Complete,
            A::ProviderComplete,
            A::Approve,
            A::Dispute,
            A::Cancel,
            A::Expire,
        ]
        .into_iter()
        .filter(|a| transition(*self, *a).is_ok())
        .collect()
    }
}
