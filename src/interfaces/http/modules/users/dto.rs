//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::user::{NewUser, User, UserRole};
use crate::domain::DomainError;
use crate::interfaces::http::dto::{summaries, BookingSummaryDto};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    /// CLIENT (default) or ADMIN
    #[schema(example = "CLIENT")]
    pub role: Option<String>,
}

impl TryFrom<RegisterUserRequest> for NewUser {
    type Error = DomainError;

    fn try_from(req: RegisterUserRequest) -> Result<Self, Self::Error> {
        let role = match req.role.as_deref() {
            None => UserRole::Client,
            Some(raw) => UserRole::parse(raw)
                .ok_or_else(|| DomainError::Validation(format!("unknown role '{raw}'")))?,
        };
        Ok(NewUser {
            name: req.name,
            email: req.email,
            role,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub bookings: Vec<BookingSummaryDto>,
    pub created_at: String,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role.to_string(),
            bookings: summaries(u.bookings),
            created_at: u.created_at.to_rfc3339(),
        }
    }
}
