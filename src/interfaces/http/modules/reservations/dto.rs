//! Reservation DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::ReservationRequest;
use crate::domain::reservation::Reservation;
use crate::interfaces::http::dto::{EntityRefDto, ServiceLineDto};

/// Booking request. Dates are whole calendar days; order and duplicates
/// do not matter.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[validate(length(min = 1))]
    pub venue_id: String,
    #[validate(length(min = 1))]
    pub event_id: String,
    #[schema(example = json!(["2025-12-10", "2025-12-11"]))]
    pub dates: Vec<NaiveDate>,
    pub guest_count: u32,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub services: Vec<ServiceLineDto>,
}

impl From<CreateReservationRequest> for ReservationRequest {
    fn from(req: CreateReservationRequest) -> Self {
        Self {
            venue_id: req.venue_id,
            event_id: req.event_id,
            dates: req.dates,
            guest_count: req.guest_count,
            comments: req.comments,
            services: req.services.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    /// PROGRAMADA, COMPLETADA or CANCELADA
    pub status: String,
    pub dates: Vec<NaiveDate>,
    pub guest_count: u32,
    #[schema(value_type = String)]
    pub total_cost: Decimal,
    pub comments: String,
    pub venue: EntityRefDto,
    pub event: EntityRefDto,
    pub user: EntityRefDto,
    pub services: Vec<ServiceLineDto>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            status: r.status.to_string(),
            dates: r.dates,
            guest_count: r.guest_count,
            total_cost: r.total_cost,
            comments: r.comments,
            venue: r.venue.into(),
            event: r.event.into(),
            user: r.user.into(),
            services: r.services.into_iter().map(ServiceLineDto::from).collect(),
            created_at: r.created_at.to_rfc3339(),
            updated_at: r.updated_at.to_rfc3339(),
        }
    }
}
