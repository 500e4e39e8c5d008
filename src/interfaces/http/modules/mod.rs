pub mod events;
pub mod health;
pub mod metrics;
pub mod payments;
pub mod reservations;
pub mod users;
pub mod venues;
