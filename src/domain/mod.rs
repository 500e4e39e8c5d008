//! Domain layer: aggregates, repository ports and the unit of work.

pub mod event;
pub mod payment;
pub mod repositories;
pub mod reservation;
pub mod user;
pub mod venue;

pub use event::{Event, NewEvent};
pub use payment::{Payment, PaymentLine, PaymentStatus};
pub use repositories::{
    Change, DomainResult, MirrorTarget, MirrorUpdate, RepositoryProvider, UnitOfWork,
};
pub use reservation::{BookingSummary, Reservation, ReservationStatus, ServiceKind, ServiceLine};
pub use user::{Caller, NewUser, User, UserRole};
pub use venue::{CapacityRule, Venue, VenueDetails, VenueType};

// Re-export DomainError from shared for convenience
pub use crate::shared::errors::DomainError;
