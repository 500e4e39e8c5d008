//! Venue repository interface

use async_trait::async_trait;

use super::model::Venue;
use crate::domain::DomainResult;

#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Find venue by ID, active or not
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>>;

    /// All venues with `active = true`, ordered by name
    async fn find_active(&self) -> DomainResult<Vec<Venue>>;

    /// Active venue whose name matches case-insensitively
    async fn find_active_by_name(&self, name: &str) -> DomainResult<Option<Venue>>;
}
