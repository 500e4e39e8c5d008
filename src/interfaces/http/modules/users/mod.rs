//! Users module: registration and booking views

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
