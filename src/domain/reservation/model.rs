//! Reservation domain entity

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::summary::BookingSummary;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    /// Booked and still ahead (initial state)
    Programada,
    /// All dates elapsed
    Completada,
    /// Cancelled explicitly
    Cancelada,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Programada => "PROGRAMADA",
            Self::Completada => "COMPLETADA",
            Self::Cancelada => "CANCELADA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PROGRAMADA" => Some(Self::Programada),
            "COMPLETADA" => Some(Self::Completada),
            "CANCELADA" => Some(Self::Cancelada),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Minimal `{id, name}` pointer to another aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

pub type VenueRef = EntityRef;
pub type EventRef = EntityRef;
pub type UserRef = EntityRef;

/// Catalog category of an ancillary service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceKind {
    Entertainment,
    Catering,
    Decoration,
    AddOn,
}

/// One selected catalog item, priced at booking time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceLine {
    pub kind: ServiceKind,
    pub id: String,
    pub name: String,
    pub price: Decimal,
}

pub fn services_total(services: &[ServiceLine]) -> Decimal {
    services.iter().map(|s| s.price).sum()
}

/// Canonical reservation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub status: ReservationStatus,
    /// Sorted, distinct
    pub dates: Vec<NaiveDate>,
    pub guest_count: u32,
    pub total_cost: Decimal,
    pub comments: String,
    pub venue: VenueRef,
    pub event: EventRef,
    pub user: UserRef,
    pub services: Vec<ServiceLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Cancel a scheduled reservation. Terminal states are rejected and the
    /// record is left untouched.
    pub fn cancel(&mut self) -> DomainResult<()> {
        match self.status {
            ReservationStatus::Cancelada => {
                Err(DomainError::ReservationAlreadyCancelled(self.id.clone()))
            }
            ReservationStatus::Completada => {
                Err(DomainError::ReservationCompletedCannotCancel(self.id.clone()))
            }
            ReservationStatus::Programada => {
                self.status = ReservationStatus::Cancelada;
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    /// Complete a scheduled reservation whose dates are all before `today`.
    pub fn complete(&mut self, today: NaiveDate) -> DomainResult<()> {
        if self.status != ReservationStatus::Programada || !self.all_dates_elapsed(today) {
            return Err(DomainError::InvalidStateTransition {
                id: self.id.clone(),
                from: self.status.to_string(),
                to: ReservationStatus::Completada.to_string(),
            });
        }
        self.status = ReservationStatus::Completada;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn all_dates_elapsed(&self, today: NaiveDate) -> bool {
        self.dates.iter().all(|d| *d < today)
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == ReservationStatus::Programada
    }

    /// Venue rental share of the total (total minus selected services).
    pub fn rental_cost(&self) -> Decimal {
        self.total_cost - services_total(&self.services)
    }

    /// Mirror of this reservation for embedding in venue/event/user records
    pub fn summary(&self) -> BookingSummary {
        BookingSummary {
            id: self.id.clone(),
            status: self.status,
            venue: self.venue.clone(),
            user: self.user.clone(),
            event: self.event.clone(),
            dates: self.dates.clone(),
            services: if self.services.is_empty() {
                None
            } else {
                Some(self.services.clone())
            },
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
