//! Storage backends that live outside a database

pub mod memory;

pub use memory::InMemoryStore;
