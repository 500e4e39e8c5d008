//! Reservation lifecycle manager
//!
//! Owns the PROGRAMADA -> {COMPLETADA, CANCELADA} state machine. Every
//! transition writes the canonical reservation, its three mirrors and any
//! payment cascade in a single commit, while holding the venue lock.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::availability::occupied_dates;
use super::capacity::validate_capacity;
use super::cascade::{plan_cascade, CancellationPolicy, CascadeOutcome};
use super::sync::mirror_changes;
use super::validator::{check_against, normalize_dates, require_future, BookingValidator};
use crate::application::events::{
    BookingEvent, PaymentVoidedEvent, ReservationCancelledEvent, ReservationCompletedEvent,
    ReservationCreatedEvent, SharedEventBus,
};
use crate::domain::event::Event;
use crate::domain::repositories::Change;
use crate::domain::reservation::{services_total, Reservation, ReservationStatus, ServiceLine};
use crate::domain::user::Caller;
use crate::domain::venue::Venue;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::errors::ErrorKind;
use crate::shared::{BookingLocks, KeyGuard, SharedClock};

/// Booking request as submitted by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub venue_id: String,
    pub event_id: String,
    pub dates: Vec<NaiveDate>,
    pub guest_count: u32,
    #[serde(default)]
    pub comments: String,
    /// Catalog items already priced by the catalog service
    #[serde(default)]
    pub services: Vec<ServiceLine>,
}

fn authorize(caller: &Caller, reservation: &Reservation) -> DomainResult<()> {
    if caller.may_act_for(&reservation.user.id) {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!(
            "user {} may not act on reservation {}",
            caller.user_id, reservation.id
        )))
    }
}

/// Venue type/capacity agreement plus guest count bounds.
fn check_fit(venue: &Venue, guest_count: u32) -> DomainResult<()> {
    validate_capacity(venue.venue_type, venue.capacity)?;
    if guest_count == 0 {
        return Err(DomainError::Validation("guest count must be positive".into()));
    }
    if guest_count > venue.capacity {
        return Err(DomainError::GuestCountExceedsCapacity {
            guests: guest_count,
            capacity: venue.capacity,
        });
    }
    Ok(())
}

fn total_cost(venue: &Venue, days: usize, services: &[ServiceLine]) -> Decimal {
    venue.cost * Decimal::from(days as u64) + services_total(services)
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    validator: BookingValidator,
    locks: Arc<BookingLocks>,
    events: SharedEventBus,
    policy: CancellationPolicy,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        clock: SharedClock,
        locks: Arc<BookingLocks>,
        events: SharedEventBus,
        policy: CancellationPolicy,
    ) -> Self {
        Self {
            validator: BookingValidator::new(repos.clone(), clock),
            repos,
            locks,
            events,
            policy,
        }
    }

    // ── create ─────────────────────────────────────────────────

    /// Book a venue for `caller`.
    ///
    /// Request-shape checks run first without locks. The occupancy check is
    /// then repeated against freshly loaded records while the venue and event
    /// locks are held, and the reservation plus its mirrors are committed
    /// before the locks are released.
    pub async fn create(
        &self,
        request: ReservationRequest,
        caller: &Caller,
    ) -> DomainResult<Reservation> {
        let user = self
            .repos
            .users()
            .find_by_id(&caller.user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(caller.user_id.clone()))?;
        let event = self.active_event(&request.event_id).await?;
        let venue = self.validator.active_venue(&request.venue_id).await?;
        check_fit(&venue, request.guest_count)?;

        let today = self.validator.today();
        let dates = normalize_dates(&request.dates)?;
        require_future(&dates, today)?;
        if request.services.iter().any(|s| s.price < Decimal::ZERO) {
            return Err(DomainError::Validation("service price cannot be negative".into()));
        }

        // venue before event, always
        let venue_lock = self.lock_venue(&venue.id).await?;
        let event_lock = self.locks.event(&event.id).await?;

        let venue = self.validator.active_venue(&venue.id).await?;
        let event = self.active_event(&event.id).await?;
        check_fit(&venue, request.guest_count)?;
        if let Err(e) = check_against(&venue, &dates, today) {
            metrics::counter!("booking_conflicts_total").increment(1);
            warn!(venue_id = %venue.id, user_id = %user.id, error = %e, "Booking rejected");
            return Err(e);
        }

        let now = Utc::now();
        let reservation = Reservation {
            id: uuid::Uuid::new_v4().to_string(),
            status: ReservationStatus::Programada,
            total_cost: total_cost(&venue, dates.len(), &request.services),
            dates,
            guest_count: request.guest_count,
            comments: request.comments,
            venue: venue.to_ref(),
            event: event.to_ref(),
            user: user.to_ref(),
            services: request.services,
            created_at: now,
            updated_at: now,
        };

        let mut changes = vec![Change::InsertReservation(reservation.clone())];
        changes.extend(mirror_changes(&reservation));
        self.commit(&reservation.id, changes).await?;
        drop(event_lock);
        drop(venue_lock);

        metrics::counter!("bookings_created_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            venue_id = %reservation.venue.id,
            user_id = %reservation.user.id,
            dates = ?reservation.dates,
            total_cost = %reservation.total_cost,
            "Reservation created"
        );
        self.events
            .publish(BookingEvent::ReservationCreated(ReservationCreatedEvent {
                reservation_id: reservation.id.clone(),
                venue_id: reservation.venue.id.clone(),
                user_id: reservation.user.id.clone(),
                dates: reservation.dates.clone(),
                timestamp: now,
            }));

        Ok(reservation)
    }

    // ── cancel ─────────────────────────────────────────────────

    pub async fn cancel(&self, reservation_id: &str, caller: &Caller) -> DomainResult<Reservation> {
        let current = self.load(reservation_id).await?;
        authorize(caller, &current)?;

        let venue_lock = self.lock_venue(&current.venue.id).await?;
        let mut reservation = self.load(reservation_id).await?;
        if let Err(e) = reservation.cancel() {
            warn!(reservation_id, status = %reservation.status, "Cancellation rejected");
            return Err(e);
        }

        let payment = self
            .repos
            .payments()
            .find_by_reservation(&reservation.id)
            .await?;
        let (cascade, outcome) = plan_cascade(payment, self.policy);

        let mut changes = vec![Change::PutReservation(reservation.clone())];
        changes.extend(mirror_changes(&reservation));
        changes.extend(cascade);
        self.commit(&reservation.id, changes).await?;
        drop(venue_lock);

        metrics::counter!("reservations_cancelled_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            venue_id = %reservation.venue.id,
            cancelled_by = %caller.user_id,
            "Reservation cancelled"
        );

        let timestamp = reservation.updated_at;
        self.events
            .publish(BookingEvent::ReservationCancelled(ReservationCancelledEvent {
                reservation_id: reservation.id.clone(),
                venue_id: reservation.venue.id.clone(),
                user_id: reservation.user.id.clone(),
                cancelled_by: caller.user_id.clone(),
                timestamp,
            }));
        self.report_cascade(&reservation.id, &outcome);

        Ok(reservation)
    }

    fn report_cascade(&self, reservation_id: &str, outcome: &CascadeOutcome) {
        if let Some((payment_id, deleted)) = outcome.voided_payment() {
            metrics::counter!("payments_voided_total").increment(1);
            info!(reservation_id, payment_id, deleted, "Payment voided by cancellation");
            self.events
                .publish(BookingEvent::PaymentVoided(PaymentVoidedEvent {
                    payment_id: payment_id.to_string(),
                    reservation_id: reservation_id.to_string(),
                    deleted,
                    timestamp: Utc::now(),
                }));
        }
    }

    // ── complete ───────────────────────────────────────────────

    /// Complete one reservation whose dates have all passed.
    pub async fn complete(&self, reservation_id: &str, caller: &Caller) -> DomainResult<Reservation> {
        let current = self.load(reservation_id).await?;
        authorize(caller, &current)?;
        self.complete_locked(&current.venue.id, reservation_id, self.validator.today())
            .await
    }

    /// Complete every scheduled reservation whose last date is before today.
    ///
    /// Reservations that fail to transition are logged and skipped.
    pub async fn complete_elapsed(&self, caller: &Caller) -> DomainResult<Vec<Reservation>> {
        caller.require_admin("run the completion sweep")?;

        let today = self.validator.today();
        let due: Vec<Reservation> = self
            .repos
            .reservations()
            .find_by_status(ReservationStatus::Programada)
            .await?
            .into_iter()
            .filter(|r| r.all_dates_elapsed(today))
            .collect();

        let mut completed = Vec::with_capacity(due.len());
        for r in due {
            match self.complete_locked(&r.venue.id, &r.id, today).await {
                Ok(done) => completed.push(done),
                Err(e) => warn!(reservation_id = %r.id, error = %e, "Skipping reservation in completion sweep"),
            }
        }
        info!(completed = completed.len(), "Completion sweep finished");
        Ok(completed)
    }

    async fn complete_locked(
        &self,
        venue_id: &str,
        reservation_id: &str,
        today: NaiveDate,
    ) -> DomainResult<Reservation> {
        let venue_lock = self.lock_venue(venue_id).await?;
        let mut reservation = self.load(reservation_id).await?;
        reservation.complete(today)?;

        let mut changes = vec![Change::PutReservation(reservation.clone())];
        changes.extend(mirror_changes(&reservation));
        self.commit(&reservation.id, changes).await?;
        drop(venue_lock);

        metrics::counter!("reservations_completed_total").increment(1);
        info!(reservation_id = %reservation.id, venue_id = %reservation.venue.id, "Reservation completed");
        self.events
            .publish(BookingEvent::ReservationCompleted(ReservationCompletedEvent {
                reservation_id: reservation.id.clone(),
                venue_id: reservation.venue.id.clone(),
                timestamp: reservation.updated_at,
            }));
        Ok(reservation)
    }

    // ── queries ────────────────────────────────────────────────

    pub async fn get(&self, reservation_id: &str, caller: &Caller) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        authorize(caller, &reservation)?;
        Ok(reservation)
    }

    pub async fn list_for_user(&self, user_id: &str, caller: &Caller) -> DomainResult<Vec<Reservation>> {
        if !caller.may_act_for(user_id) {
            return Err(DomainError::Forbidden(format!(
                "user {} may not list reservations of {user_id}",
                caller.user_id
            )));
        }
        if self.repos.users().find_by_id(user_id).await?.is_none() {
            return Err(DomainError::UserNotFound(user_id.to_string()));
        }
        self.repos.reservations().find_by_user(user_id).await
    }

    /// Every reservation of a venue, across users. Admin only.
    pub async fn list_for_venue(&self, venue_id: &str, caller: &Caller) -> DomainResult<Vec<Reservation>> {
        caller.require_admin("list a venue's reservations")?;
        if self.repos.venues().find_by_id(venue_id).await?.is_none() {
            return Err(DomainError::VenueNotFound(venue_id.to_string()));
        }
        self.repos.reservations().find_by_venue(venue_id).await
    }

    pub async fn occupied_dates(&self, venue_id: &str) -> DomainResult<Vec<NaiveDate>> {
        let venue = self.validator.active_venue(venue_id).await?;
        Ok(occupied_dates(&venue.bookings, self.validator.today()))
    }

    pub async fn are_dates_available(&self, dates: &[NaiveDate], venue_id: &str) -> DomainResult<bool> {
        self.validator.are_dates_available(dates, venue_id).await
    }

    // ── helpers ────────────────────────────────────────────────

    async fn load(&self, reservation_id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::ReservationNotFound(reservation_id.to_string()))
    }

    async fn active_event(&self, event_id: &str) -> DomainResult<Event> {
        self.repos
            .events()
            .find_by_id(event_id)
            .await?
            .filter(|e| e.active)
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()))
    }

    async fn lock_venue(&self, venue_id: &str) -> DomainResult<KeyGuard> {
        self.locks.venue(venue_id).await.map_err(|e| {
            metrics::counter!("booking_conflicts_total").increment(1);
            e
        })
    }

    async fn commit(&self, reservation_id: &str, changes: Vec<Change>) -> DomainResult<()> {
        self.repos
            .unit_of_work()
            .commit(changes)
            .await
            .map_err(|e| {
                if e.kind() == ErrorKind::Integrity {
                    error!(reservation_id, error = %e, "Reservation unit of work aborted");
                }
                e
            })
    }
}
