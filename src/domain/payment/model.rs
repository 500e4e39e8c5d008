//! Payment domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::reservation::Reservation;
use crate::domain::DomainResult;
use crate::shared::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pendiente,
    Completado,
    Cancelado,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Completado => "COMPLETADO",
            Self::Cancelado => "CANCELADO",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDIENTE" => Some(Self::Pendiente),
            "COMPLETADO" => Some(Self::Completado),
            "CANCELADO" => Some(Self::Cancelado),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One receipt line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentLine {
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub reservation_id: String,
    pub status: PaymentStatus,
    pub total_cost: Decimal,
    /// Venue rental first, then one line per covered service
    pub breakdown: Vec<PaymentLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Pending payment whose breakdown sums to the reservation total
    pub fn for_reservation(id: impl Into<String>, reservation: &Reservation) -> Self {
        let mut breakdown = Vec::with_capacity(reservation.services.len() + 1);
        breakdown.push(PaymentLine {
            description: format!(
                "{} ({} day(s))",
                reservation.venue.name,
                reservation.dates.len()
            ),
            amount: reservation.rental_cost(),
        });
        breakdown.extend(reservation.services.iter().map(|s| PaymentLine {
            description: s.name.clone(),
            amount: s.price,
        }));

        let now = Utc::now();
        Self {
            id: id.into(),
            reservation_id: reservation.id.clone(),
            status: PaymentStatus::Pendiente,
            total_cost: reservation.total_cost,
            breakdown,
            created_at: now,
            updated_at: now,
        }
    }

    /// Void a pending payment. Completed payments are left alone and
    /// `false` is returned; voiding twice is a no-op.
    pub fn void(&mut self) -> bool {
        match self.status {
            PaymentStatus::Pendiente => {
                self.status = PaymentStatus::Cancelado;
                self.updated_at = Utc::now();
                true
            }
            PaymentStatus::Completado | PaymentStatus::Cancelado => false,
        }
    }

    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status != PaymentStatus::Pendiente {
            return Err(DomainError::InvalidStateTransition {
                id: self.id.clone(),
                from: self.status.to_string(),
                to: PaymentStatus::Completado.to_string(),
            });
        }
        self.status = PaymentStatus::Completado;
        self.updated_at = Utc::now();
        Ok(())
    }
}
