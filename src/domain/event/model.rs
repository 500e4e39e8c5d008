//! Event domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::reservation::{scheduled_count, BookingSummary, EventRef};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
}

/// Occasion a venue is booked for (wedding, conference, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
    pub bookings: Vec<BookingSummary>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(id: impl Into<String>, new: NewEvent) -> Self {
        Self {
            id: id.into(),
            name: new.name,
            description: new.description,
            active: true,
            bookings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn to_ref(&self) -> EventRef {
        EventRef::new(&self.id, &self.name)
    }

    pub fn scheduled_bookings(&self) -> usize {
        scheduled_count(&self.bookings)
    }
}
