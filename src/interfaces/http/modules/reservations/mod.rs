//! Reservations module: booking lifecycle over HTTP

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
