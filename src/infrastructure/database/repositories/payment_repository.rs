//! SeaORM implementation of PaymentRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::codec::{db_err, decimal, from_json, parse_enum, to_json};
use crate::domain::payment::{Payment, PaymentRepository, PaymentStatus};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::payment;

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        status: parse_enum("status", &m.status, PaymentStatus::parse)?,
        total_cost: decimal("total_cost", &m.total_cost)?,
        breakdown: from_json("breakdown_json", &m.breakdown_json)?,
        id: m.id,
        reservation_id: m.reservation_id,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(super) fn domain_to_active(p: &Payment) -> DomainResult<payment::ActiveModel> {
    Ok(payment::ActiveModel {
        id: Set(p.id.clone()),
        reservation_id: Set(p.reservation_id.clone()),
        status: Set(p.status.as_str().to_string()),
        total_cost: Set(p.total_cost.to_string()),
        breakdown_json: Set(to_json(&p.breakdown)?),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
    })
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_reservation(&self, reservation_id: &str) -> DomainResult<Option<Payment>> {
        payment::Entity::find()
            .filter(payment::Column::ReservationId.eq(reservation_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }
}
