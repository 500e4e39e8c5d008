//! Event aggregate

pub mod model;
pub mod repository;

pub use model::{Event, NewEvent};
pub use repository::EventRepository;
