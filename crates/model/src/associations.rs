//! The association graph between restaurant entities.
//!
//! Every link between two entities is stored exactly once, as a pair in a
//! [`Relation`]. What the entity model calls "the customer's orders" and "the order's
//! customers" are two read-only views over the same pairs, so they cannot drift apart.
//!
//! Two relations are single-valued on the order side (an order has at most one
//! managing employee and at most one table); the mutators enforce that by replacing
//! the previous pair.

use serde::{Deserialize, Serialize};

use trattoria_core::{DishId, IngredientId, OrderId, TableId, TaxCode};

use crate::relation::Relation;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Associations {
    /// customer tax code ↔ placed order
    customer_orders: Relation<TaxCode, OrderId>,
    /// employee tax code ↔ managed order (at most one employee per order)
    managed_orders: Relation<TaxCode, OrderId>,
    order_dishes: Relation<OrderId, DishId>,
    dish_ingredients: Relation<DishId, IngredientId>,
    /// at most one table per order
    table_orders: Relation<TableId, OrderId>,
    table_customers: Relation<TableId, TaxCode>,
}

impl Associations {
    pub fn new() -> Self {
        Self::default()
    }

    // --- customer ↔ order ---

    /// Link a customer to an order. Returns `false` if they were already linked.
    pub fn add_order(&mut self, customer: &TaxCode, order: OrderId) -> bool {
        self.customer_orders.insert(customer.clone(), order)
    }

    pub fn remove_order(&mut self, customer: &TaxCode, order: OrderId) -> bool {
        self.customer_orders.remove(customer, &order)
    }

    pub fn orders_of_customer(&self, customer: &TaxCode) -> Vec<OrderId> {
        self.customer_orders.rights(customer).copied().collect()
    }

    pub fn customers_of_order(&self, order: OrderId) -> Vec<TaxCode> {
        self.customer_orders.lefts(&order).cloned().collect()
    }

    pub fn customer_order_count(&self, customer: &TaxCode) -> usize {
        self.customer_orders.right_count(customer)
    }

    // --- employee ↔ order ---

    /// Make `employee` the manager of `order`, detaching any previous manager.
    /// Returns `false` if `employee` already managed it.
    pub fn add_managed_order(&mut self, employee: &TaxCode, order: OrderId) -> bool {
        if self.managed_orders.contains(employee, &order) {
            return false;
        }
        self.managed_orders.remove_right(&order);
        self.managed_orders.insert(employee.clone(), order)
    }

    /// Clears the order's manager only if it is `employee`.
    pub fn remove_managed_order(&mut self, employee: &TaxCode, order: OrderId) -> bool {
        self.managed_orders.remove(employee, &order)
    }

    pub fn employee_of_order(&self, order: OrderId) -> Option<&TaxCode> {
        self.managed_orders.lefts(&order).next()
    }

    pub fn orders_managed_by(&self, employee: &TaxCode) -> Vec<OrderId> {
        self.managed_orders.rights(employee).copied().collect()
    }

    pub fn managed_order_count(&self, employee: &TaxCode) -> usize {
        self.managed_orders.right_count(employee)
    }

    // --- order ↔ dish ---

    pub fn add_dish(&mut self, order: OrderId, dish: DishId) -> bool {
        self.order_dishes.insert(order, dish)
    }

    pub fn remove_dish(&mut self, order: OrderId, dish: DishId) -> bool {
        self.order_dishes.remove(&order, &dish)
    }

    pub fn dishes_of_order(&self, order: OrderId) -> Vec<DishId> {
        self.order_dishes.rights(&order).copied().collect()
    }

    pub fn orders_with_dish(&self, dish: DishId) -> Vec<OrderId> {
        self.order_dishes.lefts(&dish).copied().collect()
    }

    // --- dish ↔ ingredient ---

    /// Register `ingredient` on `dish`; the ingredient's dish view gains the dish at the
    /// same time. Adding the same pair twice is a no-op that returns `false`.
    pub fn add_ingredient(&mut self, dish: DishId, ingredient: IngredientId) -> bool {
        self.dish_ingredients.insert(dish, ingredient)
    }

    pub fn remove_ingredient(&mut self, dish: DishId, ingredient: IngredientId) -> bool {
        self.dish_ingredients.remove(&dish, &ingredient)
    }

    pub fn ingredients_of_dish(&self, dish: DishId) -> Vec<IngredientId> {
        self.dish_ingredients.rights(&dish).copied().collect()
    }

    pub fn dishes_with_ingredient(&self, ingredient: IngredientId) -> Vec<DishId> {
        self.dish_ingredients.lefts(&ingredient).copied().collect()
    }

    // --- table ↔ order ---

    /// Place `order` at `table`, moving it off any previous table.
    pub fn assign_table(&mut self, order: OrderId, table: TableId) -> bool {
        if self.table_orders.contains(&table, &order) {
            return false;
        }
        self.table_orders.remove_right(&order);
        self.table_orders.insert(table, order)
    }

    pub fn clear_table(&mut self, order: OrderId) -> Option<TableId> {
        self.table_orders.remove_right(&order).into_iter().next()
    }

    pub fn table_of_order(&self, order: OrderId) -> Option<TableId> {
        self.table_orders.lefts(&order).next().copied()
    }

    pub fn orders_at_table(&self, table: TableId) -> Vec<OrderId> {
        self.table_orders.rights(&table).copied().collect()
    }

    // --- table ↔ customer ---

    pub fn seat_customer(&mut self, table: TableId, customer: &TaxCode) -> bool {
        self.table_customers.insert(table, customer.clone())
    }

    pub fn unseat_customer(&mut self, table: TableId, customer: &TaxCode) -> bool {
        self.table_customers.remove(&table, customer)
    }

    pub fn customers_at_table(&self, table: TableId) -> Vec<TaxCode> {
        self.table_customers.rights(&table).cloned().collect()
    }

    pub fn tables_of_customer(&self, customer: &TaxCode) -> Vec<TableId> {
        self.table_customers.lefts(customer).copied().collect()
    }

    // --- teardown ---

    /// Drop every link the order takes part in.
    pub fn forget_order(&mut self, order: OrderId) {
        self.customer_orders.remove_right(&order);
        self.managed_orders.remove_right(&order);
        self.order_dishes.remove_left(&order);
        self.table_orders.remove_right(&order);
    }

    /// Drop the customer's seating. Order links are expected to be gone already.
    pub fn forget_customer(&mut self, customer: &TaxCode) {
        self.customer_orders.remove_left(customer);
        self.table_customers.remove_right(customer);
    }

    pub fn forget_employee(&mut self, employee: &TaxCode) {
        self.managed_orders.remove_left(employee);
    }

    /// Drop the dish's ingredient list. Order links are expected to be gone already.
    pub fn forget_dish(&mut self, dish: DishId) {
        self.order_dishes.remove_right(&dish);
        self.dish_ingredients.remove_left(&dish);
    }

    pub fn forget_ingredient(&mut self, ingredient: IngredientId) {
        self.dish_ingredients.remove_right(&ingredient);
    }

    pub fn forget_table(&mut self, table: TableId) {
        self.table_orders.remove_left(&table);
        self.table_customers.remove_left(&table);
    }
}
