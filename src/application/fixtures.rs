//! Test fixture shared by the service tests

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::booking::{CancellationPolicy, ReservationService};
use super::events::{create_event_bus, SharedEventBus};
use crate::domain::repositories::Change;
use crate::domain::venue::model::tests::details;
use crate::domain::{
    Event, NewEvent, NewUser, RepositoryProvider, User, UserRole, Venue, VenueType,
};
use crate::infrastructure::storage::InMemoryStore;
use crate::shared::{BookingLocks, FixedClock};

pub(crate) fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub(crate) struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub locks: Arc<BookingLocks>,
    pub bus: SharedEventBus,
}

impl Fixture {
    /// Store seeded with event `e1` ("Wedding") and client `u1` ("Ana").
    pub async fn new(today: NaiveDate) -> Self {
        let fx = Self {
            store: Arc::new(InMemoryStore::new()),
            clock: Arc::new(FixedClock::new(today)),
            locks: Arc::new(BookingLocks::new(Duration::from_millis(500))),
            bus: create_event_bus(),
        };
        fx.seed_event("e1", "Wedding").await;
        fx.seed_user("u1", "Ana", UserRole::Client).await;
        fx
    }

    pub fn reservations(&self, policy: CancellationPolicy) -> ReservationService {
        ReservationService::new(
            self.store.clone(),
            self.clock.clone(),
            self.locks.clone(),
            self.bus.clone(),
            policy,
        )
    }

    async fn seed(&self, change: Change) {
        self.store.unit_of_work().commit(vec![change]).await.unwrap();
    }

    pub async fn seed_venue(&self, id: &str, name: &str, venue_type: VenueType, capacity: u32) {
        self.seed(Change::InsertVenue(Venue::new(
            id,
            details(name, venue_type, capacity),
        )))
        .await;
    }

    pub async fn seed_event(&self, id: &str, name: &str) {
        self.seed(Change::InsertEvent(Event::new(
            id,
            NewEvent {
                name: name.into(),
                description: None,
            },
        )))
        .await;
    }

    pub async fn seed_user(&self, id: &str, name: &str, role: UserRole) {
        self.seed(Change::InsertUser(User::new(
            id,
            NewUser {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
                role,
            },
        )))
        .await;
    }

    pub async fn venue(&self, id: &str) -> Venue {
        self.store.venues().find_by_id(id).await.unwrap().unwrap()
    }
}
