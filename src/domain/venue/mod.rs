//! Venue aggregate
//!
//! Venue entity, the type/capacity rule table, and repository interface.

pub mod model;
pub mod repository;

pub use model::{CapacityRule, Venue, VenueDetails, VenueType, CAPACITY_RULES};
pub use repository::VenueRepository;
