//! Payment DTOs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::payment::{Payment, PaymentLine};

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentLineDto {
    pub description: String,
    #[schema(value_type = String)]
    pub amount: Decimal,
}

impl From<PaymentLine> for PaymentLineDto {
    fn from(l: PaymentLine) -> Self {
        Self {
            description: l.description,
            amount: l.amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentDto {
    pub id: String,
    pub reservation_id: String,
    /// PENDIENTE, COMPLETADO or CANCELADO
    pub status: String,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
    pub breakdown: Vec<PaymentLineDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Payment> for PaymentDto {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id,
            reservation_id: p.reservation_id,
            status: p.status.to_string(),
            total_cost: p.total_cost,
            breakdown: p.breakdown.into_iter().map(PaymentLineDto::from).collect(),
            created_at: p.created_at.to_rfc3339(),
            updated_at: p.updated_at.to_rfc3339(),
        }
    }
}
