//! Payment repository interface

use async_trait::async_trait;

use super::model::Payment;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>>;

    /// The payment of a reservation, if one was created
    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Payment>>;
}
