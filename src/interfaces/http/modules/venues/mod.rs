//! Venues module: registration, update, soft-delete and availability

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
