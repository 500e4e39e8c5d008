//! Repository traits for the domain layer
//!
//! Contains:
//! - `RepositoryProvider`: unified access to all per-aggregate repositories
//! - `UnitOfWork` / `Change`: the only write path; a commit is all-or-nothing
//! - `DomainResult`: standard result type for domain operations

mod unit_of_work;

pub use unit_of_work::{Change, MirrorTarget, MirrorUpdate, UnitOfWork};

use super::event::EventRepository;
use super::payment::PaymentRepository;
use super::reservation::ReservationRepository;
use super::user::UserRepository;
use super::venue::VenueRepository;
use crate::shared::errors::DomainError;

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

// ── RepositoryProvider ──────────────────────────────────────────

/// Provides access to all domain repositories.
///
/// ```ignore
/// async fn handle(repos: &dyn RepositoryProvider) {
///     let venue = repos.venues().find_by_id("v1").await?;
///     repos.unit_of_work().commit(changes).await?;
/// }
/// ```
pub trait RepositoryProvider: Send + Sync {
    fn venues(&self) -> &dyn VenueRepository;
    fn events(&self) -> &dyn EventRepository;
    fn users(&self) -> &dyn UserRepository;
    fn reservations(&self) -> &dyn ReservationRepository;
    fn payments(&self) -> &dyn PaymentRepository;
    fn unit_of_work(&self) -> &dyn UnitOfWork;
}
