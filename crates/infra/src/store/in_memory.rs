use std::collections::{BTreeMap, BTreeSet};
use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;

use trattoria_core::{DishId, DomainResult, Entity, IngredientId, OrderId, TableId, TaxCode};
use trattoria_model::{
    Associations, Customer, Dish, Employee, Ingredient, Order, RestaurantTable,
};

use super::r#trait::{
    AssociationRepository, CustomerQueries, EmployeeQueries, IdSequence, Repository, Storage,
};

/// Rows of one entity type, keyed and ordered by id.
#[derive(Debug, Clone)]
pub struct EntityTable<E: Entity> {
    rows: BTreeMap<E::Id, E>,
}

impl<E: Entity> Default for EntityTable<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<E: Entity> EntityTable<E> {
    fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.get(id)
    }

    fn contains(&self, id: &E::Id) -> bool {
        self.rows.contains_key(id)
    }

    fn upsert(&mut self, entity: E) -> E {
        self.rows.insert(entity.id().clone(), entity.clone());
        entity
    }

    fn remove(&mut self, id: &E::Id) -> bool {
        self.rows.remove(id).is_some()
    }

    fn iter(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn last_id(&self) -> Option<&E::Id> {
        self.rows.keys().next_back()
    }
}

/// Last identifier handed out per surrogate-keyed entity type.
#[derive(Debug, Clone, Copy, Default)]
struct Sequences {
    order: u64,
    dish: u64,
    ingredient: u64,
    table: u64,
}

/// The whole in-memory dataset: entity tables, association graph, sequences.
///
/// This is also the unit-of-work type of [`InMemoryStorage`]: a write works on a clone
/// and the clone replaces the committed state on success.
#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    customers: EntityTable<Customer>,
    employees: EntityTable<Employee>,
    orders: EntityTable<Order>,
    dishes: EntityTable<Dish>,
    ingredients: EntityTable<Ingredient>,
    tables: EntityTable<RestaurantTable>,
    associations: Associations,
    sequences: Sequences,
}

macro_rules! impl_repository {
    ($entity:ty, $field:ident) => {
        impl Repository<$entity> for MemoryState {
            fn find_by_id(&self, id: &<$entity as Entity>::Id) -> Option<$entity> {
                self.$field.get(id).cloned()
            }

            fn exists_by_id(&self, id: &<$entity as Entity>::Id) -> bool {
                self.$field.contains(id)
            }

            fn save(&mut self, entity: $entity) -> $entity {
                self.$field.upsert(entity)
            }

            fn delete(&mut self, id: &<$entity as Entity>::Id) -> bool {
                self.$field.remove(id)
            }

            fn find_all(&self) -> Vec<$entity> {
                self.$field.iter().cloned().collect()
            }

            fn count(&self) -> usize {
                self.$field.len()
            }
        }
    };
}

impl_repository!(Customer, customers);
impl_repository!(Employee, employees);
impl_repository!(Order, orders);
impl_repository!(Dish, dishes);
impl_repository!(Ingredient, ingredients);
impl_repository!(RestaurantTable, tables);

macro_rules! impl_id_sequence {
    ($entity:ty, $id:ty, $field:ident, $seq:ident) => {
        impl IdSequence<$entity> for MemoryState {
            fn next_id(&mut self) -> $id {
                // Never below an explicitly saved id, never reusing a deleted one.
                let highest = self.$field.last_id().map_or(0, |id| id.value());
                self.sequences.$seq = self.sequences.$seq.max(highest) + 1;
                <$id>::new(self.sequences.$seq)
            }
        }
    };
}

impl_id_sequence!(Order, OrderId, orders, order);
impl_id_sequence!(Dish, DishId, dishes, dish);
impl_id_sequence!(Ingredient, IngredientId, ingredients, ingredient);
impl_id_sequence!(RestaurantTable, TableId, tables, table);

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Sort by count descending; ties keep the incoming (id) order.
fn by_count_desc<E>(mut rows: Vec<(E, usize)>) -> Vec<(E, usize)> {
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows
}

impl MemoryState {
    fn customers_for(&self, tax_codes: BTreeSet<TaxCode>) -> Vec<Customer> {
        tax_codes
            .iter()
            .filter_map(|code| self.customers.get(code).cloned())
            .collect()
    }

    fn employees_for(&self, tax_codes: BTreeSet<TaxCode>) -> Vec<Employee> {
        tax_codes
            .iter()
            .filter_map(|code| self.employees.get(code).cloned())
            .collect()
    }
}

impl CustomerQueries for MemoryState {
    fn find_customer_by_email(&self, email: &str) -> Option<Customer> {
        self.customers.iter().find(|c| c.email() == email).cloned()
    }

    fn find_customer_by_phone_number(&self, phone_number: &str) -> Option<Customer> {
        self.customers
            .iter()
            .find(|c| c.phone_number() == Some(phone_number))
            .cloned()
    }

    fn find_customers_by_first_name_containing_ignore_case(&self, fragment: &str) -> Vec<Customer> {
        let needle = fragment.to_lowercase();
        self.customers
            .iter()
            .filter(|c| contains_ignore_case(c.first_name(), &needle))
            .cloned()
            .collect()
    }

    fn find_customers_by_last_name_containing_ignore_case(&self, fragment: &str) -> Vec<Customer> {
        let needle = fragment.to_lowercase();
        self.customers
            .iter()
            .filter(|c| contains_ignore_case(c.last_name(), &needle))
            .cloned()
            .collect()
    }

    fn find_customers_with_orders_managed_by_employee(&self, employee: &TaxCode) -> Vec<Customer> {
        let codes: BTreeSet<TaxCode> = self
            .associations
            .orders_managed_by(employee)
            .into_iter()
            .flat_map(|order| self.associations.customers_of_order(order))
            .collect();
        self.customers_for(codes)
    }

    fn find_customers_with_orders_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Customer> {
        let codes: BTreeSet<TaxCode> = self
            .orders
            .iter()
            .filter(|o| o.placed_on() >= start && o.placed_on() <= end)
            .flat_map(|o| self.associations.customers_of_order(o.id()))
            .collect();
        self.customers_for(codes)
    }

    fn find_customers_order_by_order_count(&self) -> Vec<(Customer, usize)> {
        by_count_desc(
            self.customers
                .iter()
                .map(|c| (c.clone(), self.associations.customer_order_count(c.tax_code())))
                .collect(),
        )
    }
}

impl EmployeeQueries for MemoryState {
    fn find_employees_by_job_title(&self, job_title: &str) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| e.job_title() == job_title)
            .cloned()
            .collect()
    }

    fn find_employees_by_hire_date_after(&self, date: NaiveDate) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| e.hire_date() > date)
            .cloned()
            .collect()
    }

    fn find_employees_by_salary_greater_than(&self, salary: i64) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| e.salary() > salary)
            .cloned()
            .collect()
    }

    fn find_first_employee_by_order_by_salary_desc(&self) -> Option<Employee> {
        // First by id among equal salaries.
        self.employees
            .iter()
            .fold(None::<&Employee>, |best, e| match best {
                Some(b) if b.salary() >= e.salary() => Some(b),
                _ => Some(e),
            })
            .cloned()
    }

    fn find_employees_who_managed_orders_for_customer(&self, customer: &TaxCode) -> Vec<Employee> {
        let codes: BTreeSet<TaxCode> = self
            .associations
            .orders_of_customer(customer)
            .into_iter()
            .filter_map(|order| self.associations.employee_of_order(order).cloned())
            .collect();
        self.employees_for(codes)
    }

    fn find_employees_order_by_order_count(&self) -> Vec<(Employee, usize)> {
        by_count_desc(
            self.employees
                .iter()
                .map(|e| (e.clone(), self.associations.managed_order_count(e.tax_code())))
                .collect(),
        )
    }
}

impl AssociationRepository for MemoryState {
    fn associations(&self) -> &Associations {
        &self.associations
    }

    fn associations_mut(&mut self) -> &mut Associations {
        &mut self.associations
    }
}

/// In-memory storage gateway.
///
/// Intended for tests/dev. Not optimized for performance: every write clones the
/// dataset to stage its changes.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    state: RwLock<MemoryState>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: MemoryState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the committed dataset.
    pub fn snapshot(&self) -> MemoryState {
        self.read(|state| state.clone())
    }
}

impl Storage for InMemoryStorage {
    type Tx = MemoryState;

    fn read<R>(&self, f: impl FnOnce(&MemoryState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<R>(&self, f: impl FnOnce(&mut MemoryState) -> DomainResult<R>) -> DomainResult<R> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let mut staged = state.clone();
        match f(&mut staged) {
            Ok(out) => {
                *state = staged;
                Ok(out)
            }
            Err(err) => {
                tracing::debug!(error = %err, "unit of work rolled back");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trattoria_core::DomainError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn customer(code: &str, first: &str, last: &str, email: &str) -> Customer {
        Customer::new(code, first, last, None, email)
    }

    fn employee(code: &str, salary: i64) -> Employee {
        Employee::new(code, "Anna", "Bianchi", salary, "waiter", date(2020, 1, 1))
    }

    #[test]
    fn failed_write_leaves_committed_state_untouched() {
        let storage = InMemoryStorage::new();
        storage
            .write(|tx| {
                tx.save(customer("RSSMRA85M01H501Z", "Mario", "Rossi", "a@x.com"));
                Ok(())
            })
            .unwrap();

        let err = storage
            .write(|tx| -> DomainResult<()> {
                tx.save(customer("VRDGPP80A01F205X", "Giuseppe", "Verdi", "b@x.com"));
                tx.associations_mut()
                    .add_order(&TaxCode::from("RSSMRA85M01H501Z"), OrderId::new(1));
                Err(DomainError::conflict("abort"))
            })
            .unwrap_err();

        assert!(err.is_conflict());
        let snapshot = storage.snapshot();
        assert_eq!(Repository::<Customer>::count(&snapshot), 1);
        assert!(
            snapshot
                .associations()
                .orders_of_customer(&TaxCode::from("RSSMRA85M01H501Z"))
                .is_empty()
        );
    }

    #[test]
    fn sequences_skip_explicit_ids_and_never_reuse() {
        let mut state = MemoryState::default();
        let first = IdSequence::<Order>::next_id(&mut state);
        assert_eq!(first, OrderId::new(1));

        state.save(Order::new(OrderId::new(10), "open", date(2024, 1, 1)));
        let next = IdSequence::<Order>::next_id(&mut state);
        assert_eq!(next, OrderId::new(11));

        state.save(Order::new(next, "open", date(2024, 1, 1)));
        Repository::<Order>::delete(&mut state, &next);
        let after_delete = IdSequence::<Order>::next_id(&mut state);
        assert_eq!(after_delete, OrderId::new(12));
    }

    #[test]
    fn name_search_is_case_insensitive_substring() {
        let mut state = MemoryState::default();
        state.save(customer("RSSMRA85M01H501Z", "Mario", "Rossi", "a@x.com"));
        state.save(customer("VRDGPP80A01F205X", "Giuseppe", "Verdi", "b@x.com"));

        let hits = state.find_customers_by_first_name_containing_ignore_case("ARI");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name(), "Mario");

        let hits = state.find_customers_by_last_name_containing_ignore_case("r");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn join_queries_return_distinct_rows() {
        let mut state = MemoryState::default();
        let mario = TaxCode::from("RSSMRA85M01H501Z");
        let anna = TaxCode::from("BNCNNA90A41F205K");
        state.save(customer(mario.as_str(), "Mario", "Rossi", "a@x.com"));
        state.save(employee(anna.as_str(), 2000));

        for n in 1..=3 {
            let order = OrderId::new(n);
            state.save(Order::new(order, "open", date(2024, 3, n as u32)));
            state.associations_mut().add_order(&mario, order);
            state.associations_mut().add_managed_order(&anna, order);
        }

        assert_eq!(state.find_customers_with_orders_managed_by_employee(&anna).len(), 1);
        assert_eq!(state.find_employees_who_managed_orders_for_customer(&mario).len(), 1);

        let in_range =
            state.find_customers_with_orders_between_dates(date(2024, 3, 2), date(2024, 3, 2));
        assert_eq!(in_range.len(), 1);
        let out_of_range =
            state.find_customers_with_orders_between_dates(date(2025, 1, 1), date(2025, 2, 1));
        assert!(out_of_range.is_empty());
    }

    #[test]
    fn order_count_ranking_is_descending_with_stable_ties() {
        let mut state = MemoryState::default();
        let a = TaxCode::from("AAAAAA00A00A000A");
        let b = TaxCode::from("BBBBBB00A00A000B");
        let c = TaxCode::from("CCCCCC00A00A000C");
        state.save(customer(a.as_str(), "A", "A", "a@x.com"));
        state.save(customer(b.as_str(), "B", "B", "b@x.com"));
        state.save(customer(c.as_str(), "C", "C", "c@x.com"));
        state.associations_mut().add_order(&c, OrderId::new(1));
        state.associations_mut().add_order(&c, OrderId::new(2));
        state.associations_mut().add_order(&b, OrderId::new(3));
        state.associations_mut().add_order(&a, OrderId::new(4));

        let ranking: Vec<(String, usize)> = state
            .find_customers_order_by_order_count()
            .into_iter()
            .map(|(c, n)| (c.tax_code().to_string(), n))
            .collect();

        assert_eq!(
            ranking,
            vec![
                (c.to_string(), 2),
                (a.to_string(), 1),
                (b.to_string(), 1),
            ]
        );
    }

    #[test]
    fn highest_salary_prefers_first_id_on_ties() {
        let mut state = MemoryState::default();
        assert!(state.find_first_employee_by_order_by_salary_desc().is_none());

        state.save(employee("BBBBBB00A00A000B", 3000));
        state.save(employee("AAAAAA00A00A000A", 3000));
        state.save(employee("CCCCCC00A00A000C", 1000));

        let top = state.find_first_employee_by_order_by_salary_desc().unwrap();
        assert_eq!(top.tax_code().as_str(), "AAAAAA00A00A000A");
    }
}
