//! Order service.
//!
//! An order owns its links: which customers placed it, which employee manages it,
//! which dishes it contains and which table it sits at. Every link mutation goes
//! through [`trattoria_model::Associations`], so the reverse views on customers,
//! employees, dishes and tables change in the same unit of work.

use chrono::NaiveDate;

use trattoria_core::rules::require_non_empty;
use trattoria_core::{DishId, DomainResult, OrderId, TableId, TaxCode};
use trattoria_infra::store::{AssociationRepository, IdSequence, Repository, Storage};
use trattoria_model::{Customer, Dish, Employee, Order, RestaurantTable};

use super::{ensure_exists, load, load_all};

#[derive(Debug, Clone)]
pub struct OrderService<S> {
    store: S,
}

impl<S: Storage> OrderService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Create an order with a fresh id, optionally seated at `table`.
    ///
    /// The order starts with no customers, no dishes and no managing employee.
    pub fn place_order(
        &self,
        state: &str,
        placed_on: NaiveDate,
        table: Option<TableId>,
    ) -> DomainResult<Order> {
        require_non_empty("order state", state)?;

        let order = self.store.write(|tx| {
            if let Some(table) = table {
                ensure_exists::<RestaurantTable, _>(tx, &table)?;
            }
            let id = IdSequence::<Order>::next_id(tx);
            let order = tx.save(Order::new(id, state, placed_on));
            if let Some(table) = table {
                tx.associations_mut().assign_table(id, table);
            }
            Ok(order)
        })?;

        tracing::info!(order_id = %order.id(), table = ?table, "order placed");
        Ok(order)
    }

    pub fn get_order(&self, id: OrderId) -> DomainResult<Order> {
        self.store.read(|tx| load::<Order, _>(tx, &id))
    }

    pub fn get_all_orders(&self) -> Vec<Order> {
        self.store.read(|tx| Repository::<Order>::find_all(tx))
    }

    pub fn update_order_state(&self, id: OrderId, state: &str) -> DomainResult<Order> {
        require_non_empty("order state", state)?;
        let order = self.store.write(|tx| {
            let mut order = load::<Order, _>(tx, &id)?;
            order.set_state(state);
            Ok(tx.save(order))
        })?;
        tracing::info!(order_id = %id, state, "order state updated");
        Ok(order)
    }

    /// Returns `false` when the customer was already on the order.
    pub fn add_customer_to_order(&self, id: OrderId, customer: &TaxCode) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<Customer, _>(tx, customer)?;
            Ok(tx.associations_mut().add_order(customer, id))
        })
    }

    pub fn remove_customer_from_order(
        &self,
        id: OrderId,
        customer: &TaxCode,
    ) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<Customer, _>(tx, customer)?;
            Ok(tx.associations_mut().remove_order(customer, id))
        })
    }

    /// Make `employee` the order's manager, replacing any previous one.
    pub fn assign_employee(&self, id: OrderId, employee: &TaxCode) -> DomainResult<bool> {
        let changed = self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<Employee, _>(tx, employee)?;
            Ok(tx.associations_mut().add_managed_order(employee, id))
        })?;
        if changed {
            tracing::info!(order_id = %id, employee = %employee, "order manager assigned");
        }
        Ok(changed)
    }

    /// Clear the order's manager; returns the employee that managed it, if any.
    pub fn unassign_employee(&self, id: OrderId) -> DomainResult<Option<TaxCode>> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            let current = tx.associations().employee_of_order(id).cloned();
            if let Some(employee) = &current {
                tx.associations_mut().remove_managed_order(employee, id);
            }
            Ok(current)
        })
    }

    pub fn add_dish_to_order(&self, id: OrderId, dish: DishId) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<Dish, _>(tx, &dish)?;
            Ok(tx.associations_mut().add_dish(id, dish))
        })
    }

    pub fn remove_dish_from_order(&self, id: OrderId, dish: DishId) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<Dish, _>(tx, &dish)?;
            Ok(tx.associations_mut().remove_dish(id, dish))
        })
    }

    /// Move the order to `table`.
    pub fn assign_table(&self, id: OrderId, table: TableId) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            ensure_exists::<RestaurantTable, _>(tx, &table)?;
            Ok(tx.associations_mut().assign_table(id, table))
        })
    }

    pub fn order_customers(&self, id: OrderId) -> DomainResult<Vec<Customer>> {
        self.store.read(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            Ok(load_all::<Customer, _>(
                tx,
                tx.associations().customers_of_order(id),
            ))
        })
    }

    /// The managing employee; `None` until one is assigned.
    pub fn order_employee(&self, id: OrderId) -> DomainResult<Option<Employee>> {
        self.store.read(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            Ok(tx
                .associations()
                .employee_of_order(id)
                .and_then(|code| Repository::<Employee>::find_by_id(tx, code)))
        })
    }

    pub fn order_dishes(&self, id: OrderId) -> DomainResult<Vec<Dish>> {
        self.store.read(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            Ok(load_all::<Dish, _>(tx, tx.associations().dishes_of_order(id)))
        })
    }

    pub fn order_table(&self, id: OrderId) -> DomainResult<Option<RestaurantTable>> {
        self.store.read(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            Ok(tx
                .associations()
                .table_of_order(id)
                .and_then(|table| Repository::<RestaurantTable>::find_by_id(tx, &table)))
        })
    }

    /// Delete the order together with all of its links. Customers, employees, dishes
    /// and tables themselves are untouched.
    pub fn delete_order(&self, id: OrderId) -> DomainResult<()> {
        self.store.write(|tx| {
            ensure_exists::<Order, _>(tx, &id)?;
            tx.associations_mut().forget_order(id);
            Repository::<Order>::delete(tx, &id);
            Ok(())
        })?;
        tracing::info!(order_id = %id, "order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use trattoria_infra::InMemoryStorage;
    use trattoria_model::DishDetails;

    const MARIO: &str = "RSSMRA85M01H501Z";
    const ANNA: &str = "BNCNNA90A41F205K";
    const LUCA: &str = "FRRLCU88C03L219W";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn seeded() -> (Arc<InMemoryStorage>, OrderService<Arc<InMemoryStorage>>) {
        let storage = Arc::new(InMemoryStorage::new());
        storage
            .write(|tx| {
                tx.save(Customer::new(MARIO, "Mario", "Rossi", None, "mario@x.com"));
                tx.save(Employee::new(ANNA, "Anna", "Bianchi", 2000, "waiter", date(2020, 1, 1)));
                tx.save(Employee::new(LUCA, "Luca", "Ferri", 2500, "waiter", date(2019, 1, 1)));
                tx.save(Dish::new(
                    DishId::new(1),
                    DishDetails {
                        name: "Carbonara".into(),
                        description: None,
                        price: 1200,
                        quantity: 1,
                    },
                ));
                tx.save(RestaurantTable::new(TableId::new(1), 4, "free"));
                tx.save(RestaurantTable::new(TableId::new(2), 2, "free"));
                Ok(())
            })
            .unwrap();
        (storage.clone(), OrderService::new(storage))
    }

    #[test]
    fn placed_order_starts_unlinked_and_unmanaged() {
        let (_, service) = seeded();
        let order = service.place_order("open", date(2024, 5, 1), None).unwrap();

        assert_eq!(order.state(), "open");
        assert!(service.order_customers(order.id()).unwrap().is_empty());
        assert!(service.order_dishes(order.id()).unwrap().is_empty());
        assert_eq!(service.order_employee(order.id()).unwrap(), None);
        assert_eq!(service.order_table(order.id()).unwrap(), None);
    }

    #[test]
    fn place_order_rejects_empty_state_and_unknown_table() {
        let (_, service) = seeded();
        assert!(service.place_order(" ", date(2024, 5, 1), None).unwrap_err().is_validation());
        assert!(
            service
                .place_order("open", date(2024, 5, 1), Some(TableId::new(99)))
                .unwrap_err()
                .is_not_found()
        );
        assert!(service.get_all_orders().is_empty());
    }

    #[test]
    fn order_ids_are_sequential() {
        let (_, service) = seeded();
        let first = service.place_order("open", date(2024, 5, 1), None).unwrap();
        let second = service.place_order("open", date(2024, 5, 1), None).unwrap();
        assert_eq!(first.id(), OrderId::new(1));
        assert_eq!(second.id(), OrderId::new(2));
    }

    #[test]
    fn customer_link_is_visible_from_both_sides() {
        let (storage, service) = seeded();
        let order = service.place_order("open", date(2024, 5, 1), None).unwrap().id();
        let mario = TaxCode::from(MARIO);

        assert!(service.add_customer_to_order(order, &mario).unwrap());
        assert!(!service.add_customer_to_order(order, &mario).unwrap());

        let snapshot = storage.snapshot();
        assert_eq!(snapshot.associations().orders_of_customer(&mario), vec![order]);
        assert_eq!(service.order_customers(order).unwrap().len(), 1);

        assert!(service.remove_customer_from_order(order, &mario).unwrap());
        assert!(storage.snapshot().associations().orders_of_customer(&mario).is_empty());
    }

    #[test]
    fn linking_unknown_entities_is_not_found() {
        let (_, service) = seeded();
        let order = service.place_order("open", date(2024, 5, 1), None).unwrap().id();

        assert!(
            service
                .add_customer_to_order(order, &TaxCode::from("XXXXXX00X00X000X"))
                .unwrap_err()
                .is_not_found()
        );
        assert!(service.add_dish_to_order(order, DishId::new(42)).unwrap_err().is_not_found());
        assert!(
            service
                .add_dish_to_order(OrderId::new(42), DishId::new(1))
                .unwrap_err()
                .is_not_found()
        );
    }

    #[test]
    fn reassigning_the_manager_moves_the_order() {
        let (storage, service) = seeded();
        let order = service.place_order("open", date(2024, 5, 1), None).unwrap().id();

        service.assign_employee(order, &TaxCode::from(ANNA)).unwrap();
        service.assign_employee(order, &TaxCode::from(LUCA)).unwrap();

        let manager = service.order_employee(order).unwrap().unwrap();
        assert_eq!(manager.tax_code().as_str(), LUCA);
        let snapshot = storage.snapshot();
        assert!(snapshot.associations().orders_managed_by(&TaxCode::from(ANNA)).is_empty());

        assert_eq!(service.unassign_employee(order).unwrap(), Some(TaxCode::from(LUCA)));
        assert_eq!(service.order_employee(order).unwrap(), None);
        assert_eq!(service.unassign_employee(order).unwrap(), None);
    }

    #[test]
    fn order_moves_between_tables() {
        let (_, service) = seeded();
        let order = service
            .place_order("open", date(2024, 5, 1), Some(TableId::new(1)))
            .unwrap()
            .id();

        assert!(service.assign_table(order, TableId::new(2)).unwrap());
        assert_eq!(
            service.order_table(order).unwrap().map(|t| t.id()),
            Some(TableId::new(2))
        );
    }

    #[test]
    fn delete_order_tears_down_its_links() {
        let (storage, service) = seeded();
        let order = service
            .place_order("open", date(2024, 5, 1), Some(TableId::new(1)))
            .unwrap()
            .id();
        service.add_customer_to_order(order, &TaxCode::from(MARIO)).unwrap();
        service.assign_employee(order, &TaxCode::from(ANNA)).unwrap();
        service.add_dish_to_order(order, DishId::new(1)).unwrap();

        service.delete_order(order).unwrap();

        let snapshot = storage.snapshot();
        let links = snapshot.associations();
        assert!(links.orders_of_customer(&TaxCode::from(MARIO)).is_empty());
        assert!(links.orders_managed_by(&TaxCode::from(ANNA)).is_empty());
        assert!(links.orders_with_dish(DishId::new(1)).is_empty());
        assert!(links.orders_at_table(TableId::new(1)).is_empty());
        assert!(service.get_order(order).unwrap_err().is_not_found());
    }

    #[test]
    fn update_state_persists() {
        let (_, service) = seeded();
        let order = service.place_order("open", date(2024, 5, 1), None).unwrap().id();

        service.update_order_state(order, "served").unwrap();
        assert_eq!(service.get_order(order).unwrap().state(), "served");
        assert!(service.update_order_state(order, "").unwrap_err().is_validation());
    }
}
