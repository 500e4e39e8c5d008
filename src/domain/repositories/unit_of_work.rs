//! Atomic write path
//!
//! Every mutation is described as a `Change` and handed to
//! `UnitOfWork::commit` together with the other changes of the same logical
//! operation. Implementations apply the whole batch or nothing.

use async_trait::async_trait;

use crate::domain::event::Event;
use crate::domain::payment::Payment;
use crate::domain::reservation::{BookingSummary, Reservation};
use crate::domain::user::User;
use crate::domain::venue::{Venue, VenueDetails};
use crate::domain::DomainResult;

/// Aggregate that embeds a booking summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorTarget {
    Venue(String),
    Event(String),
    User(String),
}

impl MirrorTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Venue(id) | Self::Event(id) | Self::User(id) => id,
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            Self::Venue(_) => "venue",
            Self::Event(_) => "event",
            Self::User(_) => "user",
        }
    }
}

/// Upsert of one summary into one aggregate's embedded list.
///
/// Applied against the stored list at commit time with
/// [`upsert_summary`](crate::domain::reservation::upsert_summary).
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorUpdate {
    pub target: MirrorTarget,
    pub summary: BookingSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    InsertVenue(Venue),
    /// Replace editable attributes; bookings and `active` are kept
    ReviseVenue { id: String, details: VenueDetails },
    DeactivateVenue(String),
    InsertEvent(Event),
    DeactivateEvent(String),
    InsertUser(User),
    /// Fails with `Conflict` if the id is taken
    InsertReservation(Reservation),
    PutReservation(Reservation),
    /// Fails with `Conflict` if the reservation already has a payment
    InsertPayment(Payment),
    PutPayment(Payment),
    DeletePayment(String),
    Mirror(MirrorUpdate),
}

impl Change {
    pub fn label(&self) -> &'static str {
        match self {
            Self::InsertVenue(_) => "insert_venue",
            Self::ReviseVenue { .. } => "revise_venue",
            Self::DeactivateVenue(_) => "deactivate_venue",
            Self::InsertEvent(_) => "insert_event",
            Self::DeactivateEvent(_) => "deactivate_event",
            Self::InsertUser(_) => "insert_user",
            Self::InsertReservation(_) => "insert_reservation",
            Self::PutReservation(_) => "put_reservation",
            Self::InsertPayment(_) => "insert_payment",
            Self::PutPayment(_) => "put_payment",
            Self::DeletePayment(_) => "delete_payment",
            Self::Mirror(_) => "mirror",
        }
    }
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Apply all `changes` atomically.
    ///
    /// A missing mirror target or a missing record for an update aborts the
    /// batch with `Integrity`; nothing is written in that case.
    async fn commit(&self, changes: Vec<Change>) -> DomainResult<()>;
}
