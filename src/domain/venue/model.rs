//! Venue domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::reservation::{scheduled_count, BookingSummary, VenueRef};

/// Venue size class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueType {
    Small,
    Medium,
    Large,
}

impl VenueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Small => "SMALL",
            Self::Medium => "MEDIUM",
            Self::Large => "LARGE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SMALL" => Some(Self::Small),
            "MEDIUM" => Some(Self::Medium),
            "LARGE" => Some(Self::Large),
            _ => None,
        }
    }

    /// Capacity bounds this type admits
    pub fn rule(&self) -> CapacityRule {
        match self {
            Self::Small => CAPACITY_RULES[0],
            Self::Medium => CAPACITY_RULES[1],
            Self::Large => CAPACITY_RULES[2],
        }
    }
}

impl std::fmt::Display for VenueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive capacity range for one venue type. `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityRule {
    pub venue_type: VenueType,
    pub min: u32,
    pub max: Option<u32>,
}

impl CapacityRule {
    pub fn admits(&self, capacity: u32) -> bool {
        capacity >= self.min && self.max.map_or(true, |max| capacity <= max)
    }
}

impl std::fmt::Display for CapacityRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(
                f,
                "{} venues require capacity between {} and {}",
                self.venue_type, self.min, max
            ),
            None => write!(
                f,
                "{} venues require capacity of at least {}",
                self.venue_type, self.min
            ),
        }
    }
}

pub const CAPACITY_RULES: [CapacityRule; 3] = [
    CapacityRule {
        venue_type: VenueType::Small,
        min: 1,
        max: Some(50),
    },
    CapacityRule {
        venue_type: VenueType::Medium,
        min: 1,
        max: Some(200),
    },
    CapacityRule {
        venue_type: VenueType::Large,
        min: 201,
        max: None,
    },
];

/// Editable venue attributes (registration and full update)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub capacity: u32,
    pub venue_type: VenueType,
    pub cost: Decimal,
}

/// Bookable venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub capacity: u32,
    pub venue_type: VenueType,
    /// Price per booked date
    pub cost: Decimal,
    /// `false` once soft-deleted
    pub active: bool,
    pub bookings: Vec<BookingSummary>,
    pub created_at: DateTime<Utc>,
}

impl Venue {
    pub fn new(id: impl Into<String>, details: VenueDetails) -> Self {
        Self {
            id: id.into(),
            name: details.name,
            address: details.address,
            phone: details.phone,
            city: details.city,
            capacity: details.capacity,
            venue_type: details.venue_type,
            cost: details.cost,
            active: true,
            bookings: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable attributes, keeping id, state and bookings.
    pub fn revise(&mut self, details: VenueDetails) {
        self.name = details.name;
        self.address = details.address;
        self.phone = details.phone;
        self.city = details.city;
        self.capacity = details.capacity;
        self.venue_type = details.venue_type;
        self.cost = details.cost;
    }

    pub fn details(&self) -> VenueDetails {
        VenueDetails {
            name: self.name.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            city: self.city.clone(),
            capacity: self.capacity,
            venue_type: self.venue_type,
            cost: self.cost,
        }
    }

    pub fn to_ref(&self) -> VenueRef {
        VenueRef::new(&self.id, &self.name)
    }

    pub fn scheduled_bookings(&self) -> usize {
        scheduled_count(&self.bookings)
    }
}
