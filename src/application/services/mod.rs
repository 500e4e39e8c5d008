//! Application services around the booking core

pub mod event;
pub mod payment;
pub mod user;
pub mod venue;

pub use event::EventService;
pub use payment::PaymentService;
pub use user::UserService;
pub use venue::VenueService;
