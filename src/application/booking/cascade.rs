//! Cancellation cascade
//!
//! Decides what happens to a reservation's payment when the reservation is
//! cancelled. The resulting changes ride in the cancellation's commit.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::repositories::Change;

/// What to do with a pending payment on cancellation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CancellationPolicy {
    /// Mark it CANCELADO and keep it for audit
    #[default]
    Void,
    /// Remove the record
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeOutcome {
    NoPayment,
    Voided { payment_id: String },
    Deleted { payment_id: String },
    /// Payment already settled or already voided; left untouched
    Untouched {
        payment_id: String,
        status: PaymentStatus,
    },
}

impl CascadeOutcome {
    /// Payment id affected by the cascade, if any
    pub fn voided_payment(&self) -> Option<(&str, bool)> {
        match self {
            Self::Voided { payment_id } => Some((payment_id.as_str(), false)),
            Self::Deleted { payment_id } => Some((payment_id.as_str(), true)),
            Self::NoPayment | Self::Untouched { .. } => None,
        }
    }
}

pub fn plan_cascade(
    payment: Option<Payment>,
    policy: CancellationPolicy,
) -> (Vec<Change>, CascadeOutcome) {
    let Some(mut payment) = payment else {
        return (Vec::new(), CascadeOutcome::NoPayment);
    };

    if payment.status != PaymentStatus::Pendiente {
        if payment.status == PaymentStatus::Completado {
            warn!(
                payment_id = %payment.id,
                reservation_id = %payment.reservation_id,
                "Reservation cancelled after payment was completed; refund needs follow-up"
            );
        }
        return (
            Vec::new(),
            CascadeOutcome::Untouched {
                payment_id: payment.id,
                status: payment.status,
            },
        );
    }

    match policy {
        CancellationPolicy::Void => {
            payment.void();
            let payment_id = payment.id.clone();
            (vec![Change::PutPayment(payment)], CascadeOutcome::Voided { payment_id })
        }
        CancellationPolicy::Delete => {
            let payment_id = payment.id;
            (
                vec![Change::DeletePayment(payment_id.clone())],
                CascadeOutcome::Deleted { payment_id },
            )
        }
    }
}
