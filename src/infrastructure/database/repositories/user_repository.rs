//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use super::codec::{db_err, from_json, parse_enum, to_json};
use crate::domain::user::{User, UserRepository, UserRole};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::user;

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

pub(super) fn model_to_domain(m: user::Model) -> DomainResult<User> {
    Ok(User {
        role: parse_enum("role", &m.role, UserRole::parse)?,
        bookings: from_json("bookings_json", &m.bookings_json)?,
        id: m.id,
        name: m.name,
        email: m.email,
        created_at: m.created_at,
    })
}

pub(super) fn domain_to_active(u: &User) -> DomainResult<user::ActiveModel> {
    Ok(user::ActiveModel {
        id: Set(u.id.clone()),
        name: Set(u.name.clone()),
        email: Set(u.email.trim().to_lowercase()),
        role: Set(u.role.as_str().to_string()),
        bookings_json: Set(to_json(&u.bookings)?),
        created_at: Set(u.created_at),
    })
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_domain)
            .transpose()
    }
}
