//! Payments
//!
//! One payment per reservation, created PENDIENTE with a breakdown that sums
//! to the reservation total. Voiding on cancellation is handled by the
//! cancellation cascade, not here.

use std::sync::Arc;

use tracing::info;

use crate::domain::payment::Payment;
use crate::domain::repositories::Change;
use crate::domain::reservation::Reservation;
use crate::domain::user::Caller;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::BookingLocks;

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BookingLocks>,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BookingLocks>) -> Self {
        Self { repos, locks }
    }

    async fn reservation(&self, reservation_id: &str, caller: &Caller) -> DomainResult<Reservation> {
        let reservation = self
            .repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::ReservationNotFound(reservation_id.to_string()))?;
        if !caller.may_act_for(&reservation.user.id) {
            return Err(DomainError::Forbidden(format!(
                "user {} may not pay for reservation {reservation_id}",
                caller.user_id
            )));
        }
        Ok(reservation)
    }

    /// Open the payment of a scheduled reservation.
    pub async fn create_for_reservation(
        &self,
        reservation_id: &str,
        caller: &Caller,
    ) -> DomainResult<Payment> {
        let current = self.reservation(reservation_id, caller).await?;

        // serialises with cancellation of the same reservation
        let _venue_lock = self.locks.venue(&current.venue.id).await?;
        let reservation = self.reservation(reservation_id, caller).await?;
        if !reservation.is_scheduled() {
            return Err(DomainError::Validation(format!(
                "reservation {reservation_id} is {}; only scheduled reservations can be paid",
                reservation.status
            )));
        }
        if self
            .repos
            .payments()
            .find_by_reservation(reservation_id)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "payment for reservation {reservation_id}"
            )));
        }

        let payment = Payment::for_reservation(uuid::Uuid::new_v4().to_string(), &reservation);
        self.repos
            .unit_of_work()
            .commit(vec![Change::InsertPayment(payment.clone())])
            .await?;
        info!(payment_id = %payment.id, reservation_id, total_cost = %payment.total_cost, "Payment created");
        Ok(payment)
    }

    /// PENDIENTE -> COMPLETADO, by the reservation owner or an admin.
    pub async fn complete(&self, payment_id: &str, caller: &Caller) -> DomainResult<Payment> {
        let payment = self.load(payment_id).await?;
        let reservation = self
            .repos
            .reservations()
            .find_by_id(&payment.reservation_id)
            .await?
            .ok_or_else(|| {
                DomainError::Integrity(format!(
                    "payment {payment_id} references missing reservation {}",
                    payment.reservation_id
                ))
            })?;
        if !caller.may_act_for(&reservation.user.id) {
            return Err(DomainError::Forbidden(format!(
                "user {} may not settle payment {payment_id}",
                caller.user_id
            )));
        }

        let _venue_lock = self.locks.venue(&reservation.venue.id).await?;
        let mut payment = self.load(payment_id).await?;
        payment.complete()?;
        self.repos
            .unit_of_work()
            .commit(vec![Change::PutPayment(payment.clone())])
            .await?;
        info!(payment_id, reservation_id = %payment.reservation_id, "Payment completed");
        Ok(payment)
    }

    pub async fn find_by_reservation(
        &self,
        reservation_id: &str,
        caller: &Caller,
    ) -> DomainResult<Payment> {
        self.reservation(reservation_id, caller).await?;
        self.repos
            .payments()
            .find_by_reservation(reservation_id)
            .await?
            .ok_or_else(|| DomainError::PaymentNotFound(format!("reservation {reservation_id}")))
    }

    async fn load(&self, payment_id: &str) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| DomainError::PaymentNotFound(payment_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::application::booking::{CancellationPolicy, ReservationRequest, ReservationService};
    use crate::application::fixtures::{d, Fixture};
    use crate::domain::payment::PaymentStatus;
    use crate::domain::reservation::{ServiceKind, ServiceLine};
    use crate::domain::venue::VenueType;

    async fn booked(svc: &ReservationService) -> Reservation {
        svc.create(
            ReservationRequest {
                venue_id: "v1".into(),
                event_id: "e1".into(),
                dates: vec![d(2025, 12, 10), d(2025, 12, 11)],
                guest_count: 100,
                comments: String::new(),
                services: vec![ServiceLine {
                    kind: ServiceKind::Entertainment,
                    id: "dj".into(),
                    name: "DJ set".into(),
                    price: Decimal::from(300),
                }],
            },
            &Caller::client("u1"),
        )
        .await
        .unwrap()
    }

    async fn setup() -> (Fixture, ReservationService, PaymentService) {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        fx.seed_venue("v1", "Salon A", VenueType::Medium, 150).await;
        let reservations = fx.reservations(CancellationPolicy::Void);
        let payments = PaymentService::new(fx.store.clone(), fx.locks.clone());
        (fx, reservations, payments)
    }

    #[tokio::test]
    async fn one_payment_per_reservation() {
        let (_fx, reservations, payments) = setup().await;
        let r = booked(&reservations).await;
        let ana = Caller::client("u1");

        let payment = payments.create_for_reservation(&r.id, &ana).await.unwrap();
        assert_eq!(payment.status, PaymentStatus::Pendiente);
        assert_eq!(payment.total_cost, Decimal::from(2_300));
        assert_eq!(payment.breakdown[0].description, "Salon A (2 day(s))");
        assert_eq!(payment.breakdown[1].amount, Decimal::from(300));

        assert!(matches!(
            payments.create_for_reservation(&r.id, &ana).await,
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(payments.find_by_reservation(&r.id, &ana).await.unwrap(), payment);
    }

    #[tokio::test]
    async fn cancelled_reservation_cannot_be_paid() {
        let (_fx, reservations, payments) = setup().await;
        let r = booked(&reservations).await;
        let ana = Caller::client("u1");
        reservations.cancel(&r.id, &ana).await.unwrap();

        assert!(matches!(
            payments.create_for_reservation(&r.id, &ana).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            payments.find_by_reservation(&r.id, &ana).await,
            Err(DomainError::PaymentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn complete_only_from_pending() {
        let (_fx, reservations, payments) = setup().await;
        let r = booked(&reservations).await;
        let ana = Caller::client("u1");
        let payment = payments.create_for_reservation(&r.id, &ana).await.unwrap();

        let done = payments.complete(&payment.id, &ana).await.unwrap();
        assert_eq!(done.status, PaymentStatus::Completado);
        assert!(matches!(
            payments.complete(&payment.id, &ana).await,
            Err(DomainError::InvalidStateTransition { .. })
        ));
        assert_eq!(
            payments.complete("missing", &ana).await.unwrap_err(),
            DomainError::PaymentNotFound("missing".into())
        );
    }

    #[tokio::test]
    async fn only_owner_or_admin_settles() {
        let (_fx, reservations, payments) = setup().await;
        let r = booked(&reservations).await;
        let payment = payments
            .create_for_reservation(&r.id, &Caller::client("u1"))
            .await
            .unwrap();

        assert!(matches!(
            payments.complete(&payment.id, &Caller::client("u9")).await,
            Err(DomainError::Forbidden(_))
        ));
        assert_eq!(
            payments.find_by_reservation(&r.id, &Caller::client("u1")).await.unwrap().status,
            PaymentStatus::Pendiente
        );

        let done = payments.complete(&payment.id, &Caller::admin("root")).await.unwrap();
        assert_eq!(done.status, PaymentStatus::Completado);
    }

    #[tokio::test]
    async fn strangers_cannot_pay() {
        let (_fx, reservations, payments) = setup().await;
        let r = booked(&reservations).await;
        assert!(matches!(
            payments
                .create_for_reservation(&r.id, &Caller::client("u9"))
                .await,
            Err(DomainError::Forbidden(_))
        ));
    }
}
