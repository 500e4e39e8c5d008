//! Venue DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::venue::{Venue, VenueDetails, VenueType};
use crate::domain::DomainError;
use crate::interfaces::http::dto::{summaries, BookingSummaryDto};

/// Venue attributes for registration and full update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VenueRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 200))]
    #[serde(default)]
    pub address: String,
    #[validate(length(max = 40))]
    #[serde(default)]
    pub phone: String,
    #[validate(length(max = 80))]
    #[serde(default)]
    pub city: String,
    #[validate(range(min = 1))]
    pub capacity: u32,
    /// SMALL, MEDIUM or LARGE
    #[schema(example = "MEDIUM")]
    pub venue_type: String,
    /// Price per booked date
    #[schema(value_type = String, example = "1000")]
    pub cost: Decimal,
}

impl TryFrom<VenueRequest> for VenueDetails {
    type Error = DomainError;

    fn try_from(req: VenueRequest) -> Result<Self, Self::Error> {
        let venue_type = VenueType::parse(&req.venue_type.to_ascii_uppercase()).ok_or_else(|| {
            DomainError::Validation(format!("unknown venue type '{}'", req.venue_type))
        })?;
        Ok(VenueDetails {
            name: req.name,
            address: req.address,
            phone: req.phone,
            city: req.city,
            capacity: req.capacity,
            venue_type,
            cost: req.cost,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VenueDto {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub capacity: u32,
    pub venue_type: String,
    #[schema(value_type = String)]
    pub cost: Decimal,
    pub active: bool,
    pub bookings: Vec<BookingSummaryDto>,
    pub created_at: String,
}

impl From<Venue> for VenueDto {
    fn from(v: Venue) -> Self {
        Self {
            id: v.id,
            name: v.name,
            address: v.address,
            phone: v.phone,
            city: v.city,
            capacity: v.capacity,
            venue_type: v.venue_type.to_string(),
            cost: v.cost,
            active: v.active,
            bookings: summaries(v.bookings),
            created_at: v.created_at.to_rfc3339(),
        }
    }
}

/// Dates to check against a venue's calendar
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DatesRequest {
    pub dates: Vec<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub venue_id: String,
    pub available: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OccupiedDatesResponse {
    pub venue_id: String,
    /// Sorted, today onwards
    pub dates: Vec<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(venue_type: &str) -> VenueRequest {
        VenueRequest {
            name: "Salon A".into(),
            address: String::new(),
            phone: String::new(),
            city: "Lima".into(),
            capacity: 150,
            venue_type: venue_type.into(),
            cost: Decimal::from(1_000),
        }
    }

    #[test]
    fn venue_type_is_case_insensitive() {
        let details = VenueDetails::try_from(request("medium")).unwrap();
        assert_eq!(details.venue_type, VenueType::Medium);
    }

    #[test]
    fn unknown_venue_type_is_a_validation_error() {
        let err = VenueDetails::try_from(request("HUGE")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
