//! Venue management
//!
//! Registration, full update and soft-delete. Type/capacity agreement is
//! enforced on every write; names are unique among active venues.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::booking::validate_capacity;
use crate::domain::repositories::Change;
use crate::domain::venue::{Venue, VenueDetails};
use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::shared::BookingLocks;

fn check_details(details: &VenueDetails) -> DomainResult<()> {
    if details.name.trim().is_empty() {
        return Err(DomainError::Validation("venue name is required".into()));
    }
    if details.cost < Decimal::ZERO {
        return Err(DomainError::Validation("venue cost cannot be negative".into()));
    }
    validate_capacity(details.venue_type, details.capacity)
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub struct VenueService {
    repos: Arc<dyn RepositoryProvider>,
    locks: Arc<BookingLocks>,
}

impl VenueService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, locks: Arc<BookingLocks>) -> Self {
        Self { repos, locks }
    }

    pub async fn register(&self, details: VenueDetails) -> DomainResult<Venue> {
        check_details(&details)?;

        let _name_lock = self.locks.venue_name(&details.name).await?;
        if self
            .repos
            .venues()
            .find_active_by_name(&details.name)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!("venue named '{}'", details.name)));
        }

        let venue = Venue::new(uuid::Uuid::new_v4().to_string(), details);
        self.repos
            .unit_of_work()
            .commit(vec![Change::InsertVenue(venue.clone())])
            .await?;

        info!(venue_id = %venue.id, name = %venue.name, venue_type = %venue.venue_type, capacity = venue.capacity, "Venue registered");
        Ok(venue)
    }

    /// Replace every editable attribute of an active venue.
    pub async fn update(&self, venue_id: &str, details: VenueDetails) -> DomainResult<Venue> {
        check_details(&details)?;

        let _venue_lock = self.locks.venue(venue_id).await?;
        let current = self.get(venue_id).await?;

        let _name_lock = if same_name(&current.name, &details.name) {
            None
        } else {
            let guard = self.locks.venue_name(&details.name).await?;
            let clash = self
                .repos
                .venues()
                .find_active_by_name(&details.name)
                .await?
                .filter(|other| other.id != current.id);
            if clash.is_some() {
                return Err(DomainError::Conflict(format!("venue named '{}'", details.name)));
            }
            Some(guard)
        };

        self.repos
            .unit_of_work()
            .commit(vec![Change::ReviseVenue {
                id: current.id.clone(),
                details: details.clone(),
            }])
            .await?;

        let mut venue = current;
        venue.revise(details);
        info!(venue_id = %venue.id, "Venue updated");
        Ok(venue)
    }

    /// Soft-delete. Refused while any booking is still scheduled.
    pub async fn deactivate(&self, venue_id: &str) -> DomainResult<()> {
        let _venue_lock = self.locks.venue(venue_id).await?;
        let venue = self.get(venue_id).await?;

        let scheduled = venue.scheduled_bookings();
        if scheduled > 0 {
            warn!(venue_id, scheduled, "Venue deletion refused");
            return Err(DomainError::DeletionNotAllowed {
                entity: "venue",
                id: venue.id,
                scheduled,
            });
        }

        self.repos
            .unit_of_work()
            .commit(vec![Change::DeactivateVenue(venue.id.clone())])
            .await?;
        info!(venue_id, "Venue deactivated");
        Ok(())
    }

    /// Active venue by id
    pub async fn get(&self, venue_id: &str) -> DomainResult<Venue> {
        self.repos
            .venues()
            .find_by_id(venue_id)
            .await?
            .filter(|v| v.active)
            .ok_or_else(|| DomainError::VenueNotFound(venue_id.to_string()))
    }

    pub async fn list_active(&self) -> DomainResult<Vec<Venue>> {
        self.repos.venues().find_active().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::booking::{CancellationPolicy, ReservationRequest};
    use crate::application::fixtures::{d, Fixture};
    use crate::domain::venue::model::tests::details;
    use crate::domain::venue::VenueType;
    use crate::domain::Caller;

    fn service(fx: &Fixture) -> VenueService {
        VenueService::new(fx.store.clone(), fx.locks.clone())
    }

    #[tokio::test]
    async fn register_enforces_type_rule() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = service(&fx);
        assert!(matches!(
            svc.register(details("Patio", VenueType::Small, 51)).await,
            Err(DomainError::InvalidCapacity { capacity: 51, .. })
        ));
        assert!(matches!(
            svc.register(details("Arena", VenueType::Large, 200)).await,
            Err(DomainError::InvalidCapacity { capacity: 200, .. })
        ));
        assert!(svc.register(details("Patio", VenueType::Small, 50)).await.is_ok());
        assert!(svc.register(details("Arena", VenueType::Large, 201)).await.is_ok());
    }

    #[tokio::test]
    async fn names_are_unique_among_active_venues() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = service(&fx);
        let first = svc
            .register(details("Salon A", VenueType::Medium, 150))
            .await
            .unwrap();
        assert!(matches!(
            svc.register(details("salon a", VenueType::Medium, 100)).await,
            Err(DomainError::Conflict(_))
        ));

        svc.deactivate(&first.id).await.unwrap();
        assert!(svc
            .register(details("Salon A", VenueType::Medium, 100))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn update_revalidates_and_keeps_bookings() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let svc = service(&fx);
        let a = svc
            .register(details("Salon A", VenueType::Medium, 150))
            .await
            .unwrap();
        svc.register(details("Salon B", VenueType::Medium, 150))
            .await
            .unwrap();

        assert!(matches!(
            svc.update(&a.id, details("Salon B", VenueType::Medium, 150)).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            svc.update(&a.id, details("Salon A", VenueType::Small, 150)).await,
            Err(DomainError::InvalidCapacity { .. })
        ));

        let updated = svc
            .update(&a.id, details("Salon A Grande", VenueType::Large, 400))
            .await
            .unwrap();
        assert_eq!(updated.capacity, 400);
        assert_eq!(svc.get(&a.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn negative_cost_is_rejected() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        let mut bad = details("Salon A", VenueType::Medium, 150);
        bad.cost = Decimal::from(-1);
        assert!(matches!(
            service(&fx).register(bad).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn deletion_blocked_until_booking_cancelled() {
        let fx = Fixture::new(d(2025, 12, 1)).await;
        fx.seed_venue("v1", "Salon A", VenueType::Medium, 150).await;
        let venues = service(&fx);
        let reservations = fx.reservations(CancellationPolicy::Void);
        let ana = Caller::client("u1");

        let r = reservations
            .create(
                ReservationRequest {
                    venue_id: "v1".into(),
                    event_id: "e1".into(),
                    dates: vec![d(2025, 12, 10)],
                    guest_count: 40,
                    comments: "first dance at 9".into(),
                    services: Vec::new(),
                },
                &ana,
            )
            .await
            .unwrap();

        assert_eq!(
            venues.deactivate("v1").await.unwrap_err(),
            DomainError::DeletionNotAllowed {
                entity: "venue",
                id: "v1".into(),
                scheduled: 1,
            }
        );

        reservations.cancel(&r.id, &ana).await.unwrap();
        venues.deactivate("v1").await.unwrap();

        assert_eq!(
            venues.get("v1").await.unwrap_err(),
            DomainError::VenueNotFound("v1".into())
        );
        assert!(venues.list_active().await.unwrap().is_empty());
        // soft-delete keeps the record
        assert!(!fx.venue("v1").await.active);
    }
}
