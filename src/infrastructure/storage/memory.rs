//! In-memory document store
//!
//! Used by tests and by `booking.storage = "memory"`. All five collections
//! live behind one `RwLock`; a commit stages every touched document and only
//! publishes them once the whole batch has applied cleanly, so readers never
//! observe half of a unit of work.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::event::{Event, EventRepository};
use crate::domain::payment::{Payment, PaymentRepository};
use crate::domain::repositories::{Change, MirrorTarget, MirrorUpdate, UnitOfWork};
use crate::domain::reservation::{
    upsert_summary, BookingSummary, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::user::{User, UserRepository};
use crate::domain::venue::{Venue, VenueRepository};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

#[derive(Default)]
struct Tables {
    venues: HashMap<String, Venue>,
    events: HashMap<String, Event>,
    users: HashMap<String, User>,
    reservations: HashMap<String, Reservation>,
    payments: HashMap<String, Payment>,
}

/// Documents touched by an in-flight commit
#[derive(Default)]
struct Staged {
    venues: HashMap<String, Venue>,
    events: HashMap<String, Event>,
    users: HashMap<String, User>,
    reservations: HashMap<String, Reservation>,
    payments: HashMap<String, Payment>,
    deleted_payments: HashSet<String>,
}

/// Copy-on-first-touch access to a document inside a commit
fn touch<'a, T: Clone>(
    staged: &'a mut HashMap<String, T>,
    base: &HashMap<String, T>,
    id: &str,
) -> Option<&'a mut T> {
    if !staged.contains_key(id) {
        let doc = base.get(id)?.clone();
        staged.insert(id.to_string(), doc);
    }
    staged.get_mut(id)
}

fn missing(entity: &str, id: &str) -> DomainError {
    DomainError::Integrity(format!("{entity} {id} does not exist"))
}

impl Staged {
    fn apply(&mut self, base: &Tables, change: Change) -> DomainResult<()> {
        match change {
            Change::InsertVenue(venue) => {
                if base.venues.contains_key(&venue.id) || self.venues.contains_key(&venue.id) {
                    return Err(DomainError::Conflict(format!("venue {}", venue.id)));
                }
                self.venues.insert(venue.id.clone(), venue);
            }
            Change::ReviseVenue { id, details } => {
                touch(&mut self.venues, &base.venues, &id)
                    .ok_or_else(|| missing("venue", &id))?
                    .revise(details);
            }
            Change::DeactivateVenue(id) => {
                touch(&mut self.venues, &base.venues, &id)
                    .ok_or_else(|| missing("venue", &id))?
                    .active = false;
            }
            Change::InsertEvent(event) => {
                if base.events.contains_key(&event.id) || self.events.contains_key(&event.id) {
                    return Err(DomainError::Conflict(format!("event {}", event.id)));
                }
                self.events.insert(event.id.clone(), event);
            }
            Change::DeactivateEvent(id) => {
                touch(&mut self.events, &base.events, &id)
                    .ok_or_else(|| missing("event", &id))?
                    .active = false;
            }
            Change::InsertUser(user) => {
                if base.users.contains_key(&user.id) || self.users.contains_key(&user.id) {
                    return Err(DomainError::Conflict(format!("user {}", user.id)));
                }
                self.users.insert(user.id.clone(), user);
            }
            Change::InsertReservation(reservation) => {
                if base.reservations.contains_key(&reservation.id)
                    || self.reservations.contains_key(&reservation.id)
                {
                    return Err(DomainError::Conflict(format!(
                        "reservation {}",
                        reservation.id
                    )));
                }
                self.reservations.insert(reservation.id.clone(), reservation);
            }
            Change::PutReservation(reservation) => {
                let slot = touch(&mut self.reservations, &base.reservations, &reservation.id)
                    .ok_or_else(|| missing("reservation", &reservation.id))?;
                *slot = reservation;
            }
            Change::InsertPayment(payment) => {
                if self.payment_for(base, &payment.reservation_id).is_some() {
                    return Err(DomainError::Conflict(format!(
                        "payment for reservation {}",
                        payment.reservation_id
                    )));
                }
                self.deleted_payments.remove(&payment.id);
                self.payments.insert(payment.id.clone(), payment);
            }
            Change::PutPayment(payment) => {
                if self.deleted_payments.contains(&payment.id) {
                    return Err(missing("payment", &payment.id));
                }
                let slot = touch(&mut self.payments, &base.payments, &payment.id)
                    .ok_or_else(|| missing("payment", &payment.id))?;
                *slot = payment;
            }
            Change::DeletePayment(id) => {
                let exists = self.payments.remove(&id).is_some() || base.payments.contains_key(&id);
                if !exists || !self.deleted_payments.insert(id.clone()) {
                    return Err(missing("payment", &id));
                }
            }
            Change::Mirror(MirrorUpdate { target, summary }) => {
                let bookings = self
                    .bookings_of(base, &target)
                    .ok_or_else(|| missing(target.entity(), target.id()))?;
                upsert_summary(bookings, summary);
            }
        }
        Ok(())
    }

    fn bookings_of(
        &mut self,
        base: &Tables,
        target: &MirrorTarget,
    ) -> Option<&mut Vec<BookingSummary>> {
        match target {
            MirrorTarget::Venue(id) => {
                touch(&mut self.venues, &base.venues, id).map(|v| &mut v.bookings)
            }
            MirrorTarget::Event(id) => {
                touch(&mut self.events, &base.events, id).map(|e| &mut e.bookings)
            }
            MirrorTarget::User(id) => {
                touch(&mut self.users, &base.users, id).map(|u| &mut u.bookings)
            }
        }
    }

    fn payment_for<'a>(&'a self, base: &'a Tables, reservation_id: &str) -> Option<&'a Payment> {
        self.payments
            .values()
            .find(|p| p.reservation_id == reservation_id)
            .or_else(|| {
                base.payments.values().find(|p| {
                    p.reservation_id == reservation_id
                        && !self.deleted_payments.contains(&p.id)
                        && !self.payments.contains_key(&p.id)
                })
            })
    }

    fn publish(self, tables: &mut Tables) {
        tables.venues.extend(self.venues);
        tables.events.extend(self.events);
        tables.users.extend(self.users);
        tables.reservations.extend(self.reservations);
        for id in &self.deleted_payments {
            tables.payments.remove(id);
        }
        tables.payments.extend(self.payments);
    }
}

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| DomainError::Storage("in-memory store lock poisoned".into()))
    }
}

fn newest_first(mut reservations: Vec<Reservation>) -> Vec<Reservation> {
    reservations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reservations
}

#[async_trait]
impl VenueRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>> {
        Ok(self.read()?.venues.get(id).cloned())
    }

    async fn find_active(&self) -> DomainResult<Vec<Venue>> {
        let mut venues: Vec<Venue> = self
            .read()?
            .venues
            .values()
            .filter(|v| v.active)
            .cloned()
            .collect();
        venues.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(venues)
    }

    async fn find_active_by_name(&self, name: &str) -> DomainResult<Option<Venue>> {
        let wanted = name.trim().to_lowercase();
        Ok(self
            .read()?
            .venues
            .values()
            .find(|v| v.active && v.name.trim().to_lowercase() == wanted)
            .cloned())
    }
}

#[async_trait]
impl EventRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self.read()?.events.get(id).cloned())
    }

    async fn find_active(&self) -> DomainResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .read()?
            .events
            .values()
            .filter(|e| e.active)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(events)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let wanted = email.trim().to_lowercase();
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email.to_lowercase() == wanted)
            .cloned())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        Ok(self.read()?.reservations.get(id).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        let found = self
            .read()?
            .reservations
            .values()
            .filter(|r| r.user.id == user_id)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn find_by_venue(&self, venue_id: &str) -> DomainResult<Vec<Reservation>> {
        let found = self
            .read()?
            .reservations
            .values()
            .filter(|r| r.venue.id == venue_id)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }

    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>> {
        let found = self
            .read()?
            .reservations
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        Ok(newest_first(found))
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>> {
        Ok(self.read()?.payments.get(id).cloned())
    }

    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Payment>> {
        Ok(self
            .read()?
            .payments
            .values()
            .find(|p| p.reservation_id == reservation_id)
            .cloned())
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn commit(&self, changes: Vec<Change>) -> DomainResult<()> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| DomainError::Storage("in-memory store lock poisoned".into()))?;

        let count = changes.len();
        let mut staged = Staged::default();
        for change in changes {
            let label = change.label();
            if let Err(e) = staged.apply(&tables, change) {
                debug!(change = label, error = %e, "Commit aborted");
                return Err(e);
            }
        }
        staged.publish(&mut tables);
        debug!(changes = count, "Commit applied");
        Ok(())
    }
}

impl RepositoryProvider for InMemoryStore {
    fn venues(&self) -> &dyn VenueRepository {
        self
    }

    fn events(&self) -> &dyn EventRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        self
    }

    fn payments(&self) -> &dyn PaymentRepository {
        self
    }

    fn unit_of_work(&self) -> &dyn UnitOfWork {
        self
    }
}
