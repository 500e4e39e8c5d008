//! Event management

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::event::{Event, NewEvent};
use crate::domain::repositories::Change;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::BookingLocks;

pub struct EventService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BookingLocks>,
}

impl EventService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BookingLocks>) -> Self {
        Self { repos, locks }
    }

    pub async fn create(&self, new: NewEvent) -> DomainResult<Event> {
        if new.name.trim().is_empty() {
            return Err(DomainError::Validation("event name is required".into()));
        }
        let event = Event::new(uuid::Uuid::new_v4().to_string(), new);
        self.repos
            .unit_of_work()
            .commit(vec![Change::InsertEvent(event.clone())])
            .await?;
        info!(event_id = %event.id, name = %event.name, "Event created");
        Ok(event)
    }

    pub async fn get(&self, event_id: &str) -> DomainResult<Event> {
        self.repos
            .events()
            .find_by_id(event_id)
            .await?
            .filter(|e| e.active)
            .ok_or_else(|| DomainError::EventNotFound(event_id.to_string()))
    }

    pub async fn list_active(&self) -> DomainResult<Vec<Event>> {
        self.repos.events().find_active().await
    }

    /// Soft-delete. Refused while any booking is still scheduled.
    pub async fn deactivate(&self, event_id: &str) -> DomainResult<()> {
        let _event_lock = self.locks.event(event_id).await?;
        let event = self.get(event_id).await?;

        let scheduled = event.scheduled_bookings();
        if scheduled > 0 {
            warn!(event_id, scheduled, "Event deletion refused");
            return Err(DomainError::DeletionNotAllowed {
                entity: "event",
                id: event.id,
                scheduled,
            });
        }

        self.repos
            .unit_of_work()
            .commit(vec![Change::DeactivateEvent(event.id.clone())])
            .await?;
        info!(event_id, "Event deactivated");
        Ok(())
    }
}
