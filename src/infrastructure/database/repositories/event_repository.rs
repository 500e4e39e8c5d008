//! SeaORM implementation of EventRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use super::codec::{db_err, from_json, to_json};
use crate::domain::event::{Event, EventRepository};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::event;

pub struct SeaOrmEventRepository {
    db: DatabaseConnection,
}

impl SeaOrmEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: event::Model) -> DomainResult<Event> {
    Ok(Event {
        bookings: from_json("bookings_json", &m.bookings_json)?,
        id: m.id,
        name: m.name,
        description: m.description,
        active: m.active,
        created_at: m.created_at,
    })
}

pub(super) fn domain_to_active(e: &Event) -> DomainResult<event::ActiveModel> {
    Ok(event::ActiveModel {
        id: Set(e.id.clone()),
        name: Set(e.name.clone()),
        description: Set(e.description.clone()),
        active: Set(e.active),
        bookings_json: Set(to_json(&e.bookings)?),
        created_at: Set(e.created_at),
    })
}

#[async_trait]
impl EventRepository for SeaOrmEventRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Event>> {
        event::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_active(&self) -> DomainResult<Vec<Event>> {
        event::Entity::find()
            .filter(event::Column::Active.eq(true))
            .order_by_asc(event::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }
}
