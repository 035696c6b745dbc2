//! Domain services.
//!
//! Every public operation validates its input first, then runs exactly one
//! [`Storage::read`](trattoria_infra::Storage::read) or
//! [`Storage::write`](trattoria_infra::Storage::write). Checks that depend on stored
//! state happen inside the same unit of work as the mutation they guard.

pub mod customer;
pub mod employee;
pub mod menu;
pub mod order;
pub mod table;

pub use customer::CustomerService;
pub use employee::EmployeeService;
pub use menu::MenuService;
pub use order::OrderService;
pub use table::TableService;

use trattoria_core::{DomainError, DomainResult, Entity};
use trattoria_infra::store::Repository;

/// Load an entity or fail with `NotFound`.
pub(crate) fn load<E, T>(tx: &T, id: &E::Id) -> DomainResult<E>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
    tx.find_by_id(id).ok_or_else(|| not_found::<E>(id))
}

/// Fail with `NotFound` unless the entity exists.
pub(crate) fn ensure_exists<E, T>(tx: &T, id: &E::Id) -> DomainResult<()>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
    if tx.exists_by_id(id) {
        Ok(())
    } else {
        Err(not_found::<E>(id))
    }
}

/// Resolve ids to stored entities, skipping ids with no row.
pub(crate) fn load_all<E, T>(tx: &T, ids: impl IntoIterator<Item = E::Id>) -> Vec<E>
where
    E: Entity,
    T: Repository<E> + ?Sized,
{
    ids.into_iter().filter_map(|id| tx.find_by_id(&id)).collect()
}

pub(crate) fn not_found<E: Entity>(id: &E::Id) -> DomainError {
    DomainError::not_found(format!("{} {id}", E::KIND))
}
