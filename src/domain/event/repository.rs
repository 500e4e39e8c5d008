//! Event repository interface

use async_trait::async_trait;

use super::model::Event;
use crate::domain::DomainResult;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>>;

    /// Active events ordered by name
    async fn find_active(&self) -> DomainResult<Vec<Event>>;
}
