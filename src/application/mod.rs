pub mod booking;
pub mod events;
pub mod services;

#[cfg(test)]
pub(crate) mod fixtures;

// Re-export key types for convenience
pub use booking::{
    BookingValidator, CancellationPolicy, ReservationRequest, ReservationService,
};
pub use events::{create_event_bus, BookingEvent, EventBus, EventSubscriber, SharedEventBus};
pub use services::{EventService, PaymentService, UserService, VenueService};
