//! Booking events
//!
//! Published after a unit of work commits. Consumers (e-mail notifier,
//! audit log) are outside this crate and must not be able to fail a booking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BookingEvent {
    ReservationCreated(ReservationCreatedEvent),
    ReservationCancelled(ReservationCancelledEvent),
    ReservationCompleted(ReservationCompletedEvent),
    PaymentVoided(PaymentVoidedEvent),
}

impl BookingEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReservationCreated(_) => "reservation_created",
            Self::ReservationCancelled(_) => "reservation_cancelled",
            Self::ReservationCompleted(_) => "reservation_completed",
            Self::PaymentVoided(_) => "payment_voided",
        }
    }

    pub fn reservation_id(&self) -> &str {
        match self {
            Self::ReservationCreated(e) => &e.reservation_id,
            Self::ReservationCancelled(e) => &e.reservation_id,
            Self::ReservationCompleted(e) => &e.reservation_id,
            Self::PaymentVoided(e) => &e.reservation_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreatedEvent {
    pub reservation_id: String,
    pub venue_id: String,
    pub user_id: String,
    pub dates: Vec<NaiveDate>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelledEvent {
    pub reservation_id: String,
    pub venue_id: String,
    pub user_id: String,
    pub cancelled_by: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCompletedEvent {
    pub reservation_id: String,
    pub venue_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentVoidedEvent {
    pub payment_id: String,
    pub reservation_id: String,
    /// `true` when the payment record was removed instead of marked cancelled
    pub deleted: bool,
    pub timestamp: DateTime<Utc>,
}

/// Event envelope with a unique id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMessage {
    pub id: String,
    #[serde(flatten)]
    pub event: BookingEvent,
}

impl EventMessage {
    pub fn new(event: BookingEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
        }
    }
}
