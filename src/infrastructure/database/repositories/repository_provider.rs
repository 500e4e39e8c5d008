//! SeaORM implementation of RepositoryProvider

use sea_orm::DatabaseConnection;

use crate::domain::event::EventRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::{RepositoryProvider, UnitOfWork};
use crate::domain::reservation::ReservationRepository;
use crate::domain::user::UserRepository;
use crate::domain::venue::VenueRepository;

use super::event_repository::SeaOrmEventRepository;
use super::payment_repository::SeaOrmPaymentRepository;
use super::reservation_repository::SeaOrmReservationRepository;
use super::unit_of_work::SeaOrmUnitOfWork;
use super::user_repository::SeaOrmUserRepository;
use super::venue_repository::SeaOrmVenueRepository;

/// Unified repository provider backed by SeaORM.
///
/// Holds one connection pool and exposes per-aggregate repository accessors.
///
/// ```ignore
/// let repos = SeaOrmRepositoryProvider::new(db.clone());
/// let venue = repos.venues().find_by_id("v1").await?;
/// repos.unit_of_work().commit(changes).await?;
/// ```
pub struct SeaOrmRepositoryProvider {
    venues: SeaOrmVenueRepository,
    events: SeaOrmEventRepository,
    users: SeaOrmUserRepository,
    reservations: SeaOrmReservationRepository,
    payments: SeaOrmPaymentRepository,
    unit_of_work: SeaOrmUnitOfWork,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            venues: SeaOrmVenueRepository::new(db.clone()),
            events: SeaOrmEventRepository::new(db.clone()),
            users: SeaOrmUserRepository::new(db.clone()),
            reservations: SeaOrmReservationRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db.clone()),
            unit_of_work: SeaOrmUnitOfWork::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn venues(&self) -> &dyn VenueRepository {
        &self.venues
    }

    fn events(&self) -> &dyn EventRepository {
        &self.events
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }

    fn unit_of_work(&self) -> &dyn UnitOfWork {
        &self.unit_of_work
    }
}
