//! SeaORM implementation of VenueRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::codec::{db_err, decimal, from_json, parse_enum, to_i32, to_json, to_u32};
use crate::domain::venue::{Venue, VenueRepository, VenueType};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::venue;

pub struct SeaOrmVenueRepository {
    db: DatabaseConnection,
}

impl SeaOrmVenueRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

pub(super) fn model_to_domain(m: venue::Model) -> DomainResult<Venue> {
    Ok(Venue {
        capacity: to_u32("capacity", m.capacity)?,
        venue_type: parse_enum("venue_type", &m.venue_type, VenueType::parse)?,
        cost: decimal("cost", &m.cost)?,
        bookings: from_json("bookings_json", &m.bookings_json)?,
        id: m.id,
        name: m.name,
        address: m.address,
        phone: m.phone,
        city: m.city,
        active: m.active,
        created_at: m.created_at,
    })
}

pub(super) fn domain_to_active(v: &Venue) -> DomainResult<venue::ActiveModel> {
    Ok(venue::ActiveModel {
        id: Set(v.id.clone()),
        name: Set(v.name.clone()),
        address: Set(v.address.clone()),
        phone: Set(v.phone.clone()),
        city: Set(v.city.clone()),
        capacity: Set(to_i32("capacity", v.capacity)?),
        venue_type: Set(v.venue_type.as_str().to_string()),
        cost: Set(v.cost.to_string()),
        active: Set(v.active),
        bookings_json: Set(to_json(&v.bookings)?),
        created_at: Set(v.created_at),
    })
}

fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

// ── VenueRepository impl ────────────────────────────────────────

#[async_trait]
impl VenueRepository for SeaOrmVenueRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Venue>> {
        venue::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_active(&self) -> DomainResult<Vec<Venue>> {
        venue::Entity::find()
            .filter(venue::Column::Active.eq(true))
            .order_by_asc(venue::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn find_active_by_name(&self, name: &str) -> DomainResult<Option<Venue>> {
        debug!("Looking up active venue named '{}'", name);
        let wanted = normalized(name);
        let found = venue::Entity::find()
            .filter(venue::Column::Active.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .find(|m| normalized(&m.name) == wanted);
        found.map(model_to_domain).transpose()
    }
}
