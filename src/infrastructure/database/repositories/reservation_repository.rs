//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::codec::{db_err, decimal, from_json, parse_enum, to_i32, to_json, to_u32};
use crate::domain::reservation::{
    EntityRef, Reservation, ReservationRepository, ReservationStatus,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_where<F>(&self, filter: F) -> DomainResult<Vec<Reservation>>
    where
        F: sea_orm::sea_query::IntoCondition,
    {
        reservation::Entity::find()
            .filter(filter)
            .order_by_desc(reservation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    Ok(Reservation {
        status: parse_enum("status", &m.status, ReservationStatus::parse)?,
        dates: from_json("dates_json", &m.dates_json)?,
        guest_count: to_u32("guest_count", m.guest_count)?,
        total_cost: decimal("total_cost", &m.total_cost)?,
        services: from_json("services_json", &m.services_json)?,
        id: m.id,
        comments: m.comments,
        venue: EntityRef::new(m.venue_id, m.venue_name),
        event: EntityRef::new(m.event_id, m.event_name),
        user: EntityRef::new(m.user_id, m.user_name),
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(super) fn domain_to_active(r: &Reservation) -> DomainResult<reservation::ActiveModel> {
    Ok(reservation::ActiveModel {
        id: Set(r.id.clone()),
        status: Set(r.status.as_str().to_string()),
        dates_json: Set(to_json(&r.dates)?),
        guest_count: Set(to_i32("guest_count", r.guest_count)?),
        total_cost: Set(r.total_cost.to_string()),
        comments: Set(r.comments.clone()),
        venue_id: Set(r.venue.id.clone()),
        venue_name: Set(r.venue.name.clone()),
        event_id: Set(r.event.id.clone()),
        event_name: Set(r.event.name.clone()),
        user_id: Set(r.user.id.clone()),
        user_name: Set(r.user.name.clone()),
        services_json: Set(to_json(&r.services)?),
        created_at: Set(r.created_at),
        updated_at: Set(r.updated_at),
    })
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.find_where(reservation::Column::UserId.eq(user_id)).await
    }

    async fn find_by_venue(&self, venue_id: &str) -> DomainResult<Vec<Reservation>> {
        self.find_where(reservation::Column::VenueId.eq(venue_id)).await
    }

    async fn find_by_status(&self, status: ReservationStatus) -> DomainResult<Vec<Reservation>> {
        self.find_where(reservation::Column::Status.eq(status.as_str()))
            .await
    }
}
