//! User aggregate
//!
//! Users own reservations; `Caller` is the identity handed to every
//! lifecycle operation by the (external) identity layer.

pub mod model;
pub mod repository;

pub use model::{Caller, NewUser, User, UserRole};
pub use repository::UserRepository;
