//! Payment aggregate
//!
//! At most one payment exists per reservation.

pub mod model;
pub mod repository;

pub use model::{Payment, PaymentLine, PaymentStatus};
pub use repository::PaymentRepository;
