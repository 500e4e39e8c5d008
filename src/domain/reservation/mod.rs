//! Reservation aggregate
//!
//! Contains the canonical Reservation entity, the embedded BookingSummary
//! mirror, and the repository interface.

pub mod model;
pub mod repository;
pub mod summary;

pub use model::{
    services_total, EntityRef, EventRef, Reservation, ReservationStatus, ServiceKind, ServiceLine,
    UserRef, VenueRef,
};
pub use repository::ReservationRepository;
pub use summary::{scheduled_count, upsert_summary, BookingSummary};
