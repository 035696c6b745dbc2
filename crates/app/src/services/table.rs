//! Table service: tables, seating and the orders served at each table.

use trattoria_core::rules::{check_seats, require_non_empty};
use trattoria_core::{DomainError, DomainResult, TableId, TaxCode};
use trattoria_infra::store::{AssociationRepository, IdSequence, Repository, Storage};
use trattoria_model::{Customer, Order, RestaurantTable};

use super::{ensure_exists, load, load_all};

#[derive(Debug, Clone)]
pub struct TableService<S> {
    store: S,
}

impl<S: Storage> TableService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_table(&self, num_seats: u32, state: &str) -> DomainResult<RestaurantTable> {
        check_seats(num_seats)?;
        require_non_empty("table state", state)?;
        let table = self.store.write(|tx| {
            let id = IdSequence::<RestaurantTable>::next_id(tx);
            Ok(tx.save(RestaurantTable::new(id, num_seats, state)))
        })?;
        tracing::info!(table_id = %table.id(), num_seats, "table created");
        Ok(table)
    }

    pub fn get_table(&self, id: TableId) -> DomainResult<RestaurantTable> {
        self.store.read(|tx| load::<RestaurantTable, _>(tx, &id))
    }

    pub fn get_all_tables(&self) -> Vec<RestaurantTable> {
        self.store.read(|tx| Repository::<RestaurantTable>::find_all(tx))
    }

    pub fn update_table_state(&self, id: TableId, state: &str) -> DomainResult<RestaurantTable> {
        require_non_empty("table state", state)?;
        self.store.write(|tx| {
            let mut table = load::<RestaurantTable, _>(tx, &id)?;
            table.set_state(state);
            Ok(tx.save(table))
        })
    }

    pub fn seat_customer(&self, id: TableId, customer: &TaxCode) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<RestaurantTable, _>(tx, &id)?;
            ensure_exists::<Customer, _>(tx, customer)?;
            Ok(tx.associations_mut().seat_customer(id, customer))
        })
    }

    pub fn unseat_customer(&self, id: TableId, customer: &TaxCode) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<RestaurantTable, _>(tx, &id)?;
            ensure_exists::<Customer, _>(tx, customer)?;
            Ok(tx.associations_mut().unseat_customer(id, customer))
        })
    }

    pub fn table_customers(&self, id: TableId) -> DomainResult<Vec<Customer>> {
        self.store.read(|tx| {
            ensure_exists::<RestaurantTable, _>(tx, &id)?;
            Ok(load_all::<Customer, _>(
                tx,
                tx.associations().customers_at_table(id),
            ))
        })
    }

    pub fn table_orders(&self, id: TableId) -> DomainResult<Vec<Order>> {
        self.store.read(|tx| {
            ensure_exists::<RestaurantTable, _>(tx, &id)?;
            Ok(load_all::<Order, _>(tx, tx.associations().orders_at_table(id)))
        })
    }

    /// Delete a table with no orders and nobody seated.
    pub fn delete_table(&self, id: TableId) -> DomainResult<()> {
        let result = self.store.write(|tx| {
            ensure_exists::<RestaurantTable, _>(tx, &id)?;
            let links = tx.associations();
            if !links.orders_at_table(id).is_empty() {
                return Err(DomainError::conflict("cannot delete table with orders"));
            }
            if !links.customers_at_table(id).is_empty() {
                return Err(DomainError::conflict(
                    "cannot delete table with seated customers",
                ));
            }
            tx.associations_mut().forget_table(id);
            Repository::<RestaurantTable>::delete(tx, &id);
            Ok(())
        });
        match &result {
            Ok(()) => tracing::info!(table_id = %id, "table deleted"),
            Err(err) => tracing::warn!(table_id = %id, error = %err, "table not deleted"),
        }
        result
    }
}
