//! # Venue booking service
//!
//! Date-based venue reservations: availability checks, a booking lifecycle
//! with denormalized mirrors, and payment cascades on cancellation.
//!
//! ## Architecture
//!
//! - **domain**: aggregates, repository ports and the unit of work
//! - **application**: booking core (availability, validation, lifecycle,
//!   mirror sync, cancellation cascade) and the services around it
//! - **infrastructure**: in-memory and SeaORM stores
//! - **interfaces**: axum REST API with Swagger documentation
//! - **shared**: errors, clock, keyed locks, shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};
pub use infrastructure::{init_database, DatabaseConfig, InMemoryStore, SeaOrmRepositoryProvider};
pub use interfaces::http::create_api_router;
