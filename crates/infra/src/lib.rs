//! Infrastructure layer: the storage gateway.

pub mod store;

pub use store::{InMemoryStorage, Storage, UnitOfWork};
