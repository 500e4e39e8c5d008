//! Reservation repository interface
//!
//! Read side only; writes go through `UnitOfWork` so the canonical record and
//! its mirrors are always stored together.

use async_trait::async_trait;

use super::model::{Reservation, ReservationStatus};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Find reservation by ID
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>>;

    /// All reservations made by a user, newest first
    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>>;

    /// All reservations for a venue, newest first
    async fn find_by_venue(&self, venue_id: &str) -> DomainResult<Vec<Reservation>>;

    /// All reservations currently in `status`
    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>>;
}
