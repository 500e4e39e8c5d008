//! DTOs shared by several resources

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::reservation::{BookingSummary, EntityRef, ServiceKind, ServiceLine};

/// `{id, name}` pointer to a venue, event or user
#[derive(Debug, Serialize, ToSchema)]
pub struct EntityRefDto {
    pub id: String,
    pub name: String,
}

impl From<EntityRef> for EntityRefDto {
    fn from(r: EntityRef) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// Selected catalog item, priced by the catalog service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceLineDto {
    /// ENTERTAINMENT, CATERING, DECORATION or ADD_ON
    #[schema(value_type = String, example = "CATERING")]
    pub kind: ServiceKind,
    pub id: String,
    pub name: String,
    #[schema(value_type = String, example = "500")]
    pub price: Decimal,
}

impl From<ServiceLine> for ServiceLineDto {
    fn from(s: ServiceLine) -> Self {
        Self {
            kind: s.kind,
            id: s.id,
            name: s.name,
            price: s.price,
        }
    }
}

impl From<ServiceLineDto> for ServiceLine {
    fn from(s: ServiceLineDto) -> Self {
        Self {
            kind: s.kind,
            id: s.id,
            name: s.name,
            price: s.price,
        }
    }
}

/// Booking state as embedded in venue, event and user records
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingSummaryDto {
    /// Reservation id
    pub id: String,
    /// PROGRAMADA, COMPLETADA or CANCELADA
    pub status: String,
    pub venue: EntityRefDto,
    pub event: EntityRefDto,
    pub user: EntityRefDto,
    pub dates: Vec<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<ServiceLineDto>>,
}

impl From<BookingSummary> for BookingSummaryDto {
    fn from(b: BookingSummary) -> Self {
        Self {
            id: b.id,
            status: b.status.to_string(),
            venue: b.venue.into(),
            event: b.event.into(),
            user: b.user.into(),
            dates: b.dates,
            services: b
                .services
                .map(|lines| lines.into_iter().map(ServiceLineDto::from).collect()),
        }
    }
}

pub fn summaries(bookings: Vec<BookingSummary>) -> Vec<BookingSummaryDto> {
    bookings.into_iter().map(BookingSummaryDto::from).collect()
}
