//! Embedded booking summaries
//!
//! Venue, event and user records each carry a copy of the booking state of
//! every reservation that touches them. The list holds at most one entry per
//! reservation id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::model::{EventRef, ReservationStatus, ServiceLine, UserRef, VenueRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// Same id as the canonical reservation
    pub id: String,
    pub status: ReservationStatus,
    pub venue: VenueRef,
    pub user: UserRef,
    pub event: EventRef,
    pub dates: Vec<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceLine>>,
}

/// Append `summary`, or overwrite the status of the entry with the same id.
///
/// Returns `true` when a new entry was appended.
pub fn upsert_summary(bookings: &mut Vec<BookingSummary>, summary: BookingSummary) -> bool {
    match bookings.iter_mut().find(|b| b.id == summary.id) {
        Some(existing) => {
            existing.status = summary.status;
            false
        }
        None => {
            bookings.push(summary);
            true
        }
    }
}

/// Number of bookings still in PROGRAMADA.
pub fn scheduled_count(bookings: &[BookingSummary]) -> usize {
    bookings
        .iter()
        .filter(|b| b.status == ReservationStatus::Programada)
        .count()
}
