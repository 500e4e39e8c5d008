//! Booking events (pub/sub)

pub mod event_bus;
pub mod events;

pub use event_bus::{
    create_event_bus, spawn_event_logger, EventBus, EventSubscriber, SharedEventBus,
};
pub use events::*;
