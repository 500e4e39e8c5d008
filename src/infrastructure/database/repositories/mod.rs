//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories, the transactional unit of work and the
//! unified RepositoryProvider.

mod codec;
pub mod event_repository;
pub mod payment_repository;
pub mod repository_provider;
pub mod reservation_repository;
pub mod unit_of_work;
pub mod user_repository;
pub mod venue_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
pub use unit_of_work::SeaOrmUnitOfWork;
