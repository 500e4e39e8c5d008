//! Database entities module

pub mod event;
pub mod payment;
pub mod reservation;
pub mod user;
pub mod venue;

pub use event::Entity as Event;
pub use payment::Entity as Payment;
pub use reservation::Entity as Reservation;
pub use user::Entity as User;
pub use venue::Entity as Venue;
