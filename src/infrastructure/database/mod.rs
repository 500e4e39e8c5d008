pub mod entities;
pub mod migrator;
pub mod repositories;

pub use repositories::SeaOrmRepositoryProvider;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use migrator::Migrator;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://./venue-booking.db?mode=rwc";

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database URL (e.g., "sqlite://./venue-booking.db?mode=rwc")
    pub url: String,
    /// Pool size; in-memory SQLite needs exactly one connection
    pub max_connections: Option<u32>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: None,
        }
    }
}

impl DatabaseConfig {
    /// Create config for SQLite
    pub fn sqlite(path: &str) -> Self {
        Self {
            url: format!("sqlite://{}?mode=rwc", path),
            max_connections: None,
        }
    }

    /// Private in-memory SQLite database
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_string(),
            max_connections: Some(1),
        }
    }

    /// Create config from environment variable
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: None,
        }
    }
}

/// Initialize database connection
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", config.url);
    let mut options = ConnectOptions::new(config.url.clone());
    if let Some(max) = config.max_connections {
        options.max_connections(max).min_connections(1);
    }
    options.sqlx_logging(false);
    let db = Database::connect(options).await?;
    info!("Database connected successfully");
    Ok(db)
}

/// Apply all pending migrations
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), sea_orm::DbErr> {
    Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::booking::{
        verify_mirrors, CancellationPolicy, ReservationRequest, ReservationService,
    };
    use crate::application::events::create_event_bus;
    use crate::application::services::PaymentService;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::repositories::{Change, MirrorTarget, MirrorUpdate};
    use crate::domain::reservation::model::tests::{date, sample_reservation};
    use crate::domain::venue::model::tests::details;
    use crate::domain::{
        Caller, DomainError, Event, NewEvent, NewUser, RepositoryProvider, ReservationStatus,
        User, UserRole, Venue, VenueType,
    };
    use crate::shared::{BookingLocks, FixedClock};

    async fn seeded() -> Arc<SeaOrmRepositoryProvider> {
        let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&db).await.unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        repos
            .unit_of_work()
            .commit(vec![
                Change::InsertVenue(Venue::new("v1", details("Salon A", VenueType::Medium, 150))),
                Change::InsertEvent(Event::new(
                    "e1",
                    NewEvent {
                        name: "Wedding".into(),
                        description: Some("Evening reception".into()),
                    },
                )),
                Change::InsertUser(User::new(
                    "u1",
                    NewUser {
                        name: "Ana".into(),
                        email: "Ana@Example.com".into(),
                        role: UserRole::Client,
                    },
                )),
            ])
            .await
            .unwrap();
        repos
    }

    #[tokio::test]
    async fn rows_map_back_to_domain() {
        let repos = seeded().await;
        let venue = repos.venues().find_by_id("v1").await.unwrap().unwrap();
        assert_eq!(venue.venue_type, VenueType::Medium);
        assert_eq!(venue.cost, rust_decimal::Decimal::from(1_000));
        assert!(venue.active);

        let by_name = repos.venues().find_active_by_name(" salon a").await.unwrap();
        assert_eq!(by_name.map(|v| v.id), Some("v1".to_string()));

        let user = repos.users().find_by_email("ANA@example.com").await.unwrap();
        assert_eq!(user.map(|u| u.id), Some("u1".to_string()));

        let events = repos.events().find_active().await.unwrap();
        assert_eq!(events[0].description.as_deref(), Some("Evening reception"));
    }

    #[tokio::test]
    async fn reservation_and_mirrors_commit_together() {
        let repos = seeded().await;
        let r = sample_reservation(vec![date(2025, 12, 10), date(2025, 12, 11)]);
        let mut changes = vec![Change::InsertReservation(r.clone())];
        changes.extend(crate::application::booking::mirror_changes(&r));
        repos.unit_of_work().commit(changes).await.unwrap();

        let stored = repos.reservations().find_by_id("r1").await.unwrap().unwrap();
        assert_eq!(stored.dates, r.dates);
        assert_eq!(stored.services, r.services);
        assert_eq!(stored.total_cost, r.total_cost);
        verify_mirrors(repos.as_ref(), &stored).await.unwrap();

        assert_eq!(repos.reservations().find_by_user("u1").await.unwrap().len(), 1);
        assert_eq!(
            repos
                .reservations()
                .find_by_status(ReservationStatus::Programada)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn failed_mirror_rolls_back_everything() {
        let repos = seeded().await;
        let r = sample_reservation(vec![date(2025, 12, 10)]);
        let err = repos
            .unit_of_work()
            .commit(vec![
                Change::InsertReservation(r.clone()),
                Change::Mirror(MirrorUpdate {
                    target: MirrorTarget::Venue("v1".into()),
                    summary: r.summary(),
                }),
                Change::Mirror(MirrorUpdate {
                    target: MirrorTarget::User("ghost".into()),
                    summary: r.summary(),
                }),
            ])
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Integrity(_)));

        assert!(repos.reservations().find_by_id("r1").await.unwrap().is_none());
        let venue = repos.venues().find_by_id("v1").await.unwrap().unwrap();
        assert!(venue.bookings.is_empty());
    }

    #[tokio::test]
    async fn second_payment_for_a_reservation_is_a_conflict() {
        let repos = seeded().await;
        let r = sample_reservation(vec![date(2025, 12, 10)]);
        repos
            .unit_of_work()
            .commit(vec![Change::InsertReservation(r.clone())])
            .await
            .unwrap();

        let first = crate::domain::Payment::for_reservation("p1", &r);
        let second = crate::domain::Payment::for_reservation("p2", &r);
        repos
            .unit_of_work()
            .commit(vec![Change::InsertPayment(first)])
            .await
            .unwrap();
        assert!(matches!(
            repos
                .unit_of_work()
                .commit(vec![Change::InsertPayment(second)])
                .await,
            Err(DomainError::Conflict(_))
        ));

        repos
            .unit_of_work()
            .commit(vec![Change::DeletePayment("p1".into())])
            .await
            .unwrap();
        assert!(repos.payments().find_by_reservation("r1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn revise_keeps_embedded_bookings() {
        let repos = seeded().await;
        let r = sample_reservation(vec![date(2025, 12, 10)]);
        let mut changes = vec![Change::InsertReservation(r.clone())];
        changes.extend(crate::application::booking::mirror_changes(&r));
        changes.push(Change::ReviseVenue {
            id: "v1".into(),
            details: details("Salon A+", VenueType::Large, 250),
        });
        repos.unit_of_work().commit(changes).await.unwrap();

        let venue = repos.venues().find_by_id("v1").await.unwrap().unwrap();
        assert_eq!(venue.name, "Salon A+");
        assert_eq!(venue.bookings.len(), 1);
    }

    #[tokio::test]
    async fn full_lifecycle_on_sqlite() {
        let repos = seeded().await;
        let clock = Arc::new(FixedClock::new(date(2025, 12, 1)));
        let locks = Arc::new(BookingLocks::default());
        let reservations = ReservationService::new(
            repos.clone(),
            clock,
            locks.clone(),
            create_event_bus(),
            CancellationPolicy::Void,
        );
        let payments = PaymentService::new(repos.clone(), locks);
        let ana = Caller::client("u1");
        let request = |day| ReservationRequest {
            venue_id: "v1".into(),
            event_id: "e1".into(),
            dates: vec![day],
            guest_count: 90,
            comments: String::new(),
            services: Vec::new(),
        };

        let r = reservations.create(request(date(2025, 12, 10)), &ana).await.unwrap();
        assert!(matches!(
            reservations.create(request(date(2025, 12, 10)), &ana).await,
            Err(DomainError::AvailabilityConflict { .. })
        ));
        let payment = payments.create_for_reservation(&r.id, &ana).await.unwrap();

        let cancelled = reservations.cancel(&r.id, &ana).await.unwrap();
        verify_mirrors(repos.as_ref(), &cancelled).await.unwrap();
        let voided = repos.payments().find_by_id(&payment.id).await.unwrap().unwrap();
        assert_eq!(voided.status, PaymentStatus::Cancelado);
        assert!(reservations.occupied_dates("v1").await.unwrap().is_empty());
    }
}
