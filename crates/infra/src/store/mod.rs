//! Storage gateway contract and its in-memory implementation.
//!
//! Services never touch storage directly; they go through [`Storage::read`] and
//! [`Storage::write`], which hand them a [`UnitOfWork`]: keyed repositories for every
//! entity type, the named queries, identifier sequences and the association graph.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{EntityTable, InMemoryStorage, MemoryState};
pub use r#trait::{
    AssociationRepository, CustomerQueries, EmployeeQueries, IdSequence, Repository, Storage,
    UnitOfWork,
};
