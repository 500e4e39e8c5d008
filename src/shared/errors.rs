use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::venue::CapacityRule;

/// Coarse classification of domain failures.
///
/// Transport adapters map these onto status codes; the domain itself never
/// deals in transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    Validation,
    StateTransition,
    DeletionNotAllowed,
    Forbidden,
    Integrity,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Venue not found: {0}")]
    VenueNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(String),

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Invalid capacity {capacity}: {rule}")]
    InvalidCapacity { capacity: u32, rule: CapacityRule },

    #[error("Invalid reservation dates: {0}")]
    InvalidReservationDates(String),

    #[error("Venue {venue_id} is already booked on {}", format_dates(.dates))]
    AvailabilityConflict {
        venue_id: String,
        dates: Vec<NaiveDate>,
    },

    #[error("Guest count {guests} exceeds venue capacity {capacity}")]
    GuestCountExceedsCapacity { guests: u32, capacity: u32 },

    #[error("Reservation {0} is already cancelled")]
    ReservationAlreadyCancelled(String),

    #[error("Reservation {0} is completed and cannot be cancelled")]
    ReservationCompletedCannotCancel(String),

    #[error("Reservation {id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        id: String,
        from: String,
        to: String,
    },

    #[error("Cannot delete {entity} {id}: {scheduled} scheduled booking(s) remain")]
    DeletionNotAllowed {
        entity: &'static str,
        id: String,
        scheduled: usize,
    },

    #[error("Venue {0} is busy, try again")]
    BookingConflict(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VenueNotFound(_)
            | Self::EventNotFound(_)
            | Self::UserNotFound(_)
            | Self::ReservationNotFound(_)
            | Self::PaymentNotFound(_) => ErrorKind::NotFound,
            Self::AvailabilityConflict { .. }
            | Self::ReservationAlreadyCancelled(_)
            | Self::BookingConflict(_)
            | Self::Conflict(_) => ErrorKind::Conflict,
            Self::InvalidCapacity { .. }
            | Self::InvalidReservationDates(_)
            | Self::GuestCountExceedsCapacity { .. }
            | Self::Validation(_) => ErrorKind::Validation,
            Self::ReservationCompletedCannotCancel(_) | Self::InvalidStateTransition { .. } => {
                ErrorKind::StateTransition
            }
            Self::DeletionNotAllowed { .. } => ErrorKind::DeletionNotAllowed,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::Integrity(_) | Self::Storage(_) => ErrorKind::Integrity,
        }
    }
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(NaiveDate::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}
