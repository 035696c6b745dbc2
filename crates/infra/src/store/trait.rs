use std::sync::Arc;

use chrono::NaiveDate;

use trattoria_core::{DomainResult, Entity, TaxCode};
use trattoria_model::{
    Associations, Customer, Dish, Employee, Ingredient, Order, RestaurantTable,
};

/// Keyed CRUD access to one entity type.
///
/// Reads take `&self`, writes take `&mut self`: writes only ever happen inside a
/// [`Storage::write`] unit of work.
pub trait Repository<E: Entity> {
    fn find_by_id(&self, id: &E::Id) -> Option<E>;

    fn exists_by_id(&self, id: &E::Id) -> bool;

    /// Insert or replace by id; returns the stored entity.
    fn save(&mut self, entity: E) -> E;

    /// Returns `false` when nothing was stored under `id`.
    fn delete(&mut self, id: &E::Id) -> bool;

    /// All entities, ordered by id.
    fn find_all(&self) -> Vec<E>;

    fn count(&self) -> usize;
}

/// Identifier source for surrogate-keyed entities.
///
/// Identifiers are never reused, even after the entity holding one is deleted.
pub trait IdSequence<E: Entity> {
    fn next_id(&mut self) -> E::Id;
}

/// Named and join-based customer queries.
pub trait CustomerQueries {
    fn find_customer_by_email(&self, email: &str) -> Option<Customer>;

    fn find_customer_by_phone_number(&self, phone_number: &str) -> Option<Customer>;

    fn exists_customer_by_email(&self, email: &str) -> bool {
        self.find_customer_by_email(email).is_some()
    }

    fn exists_customer_by_phone_number(&self, phone_number: &str) -> bool {
        self.find_customer_by_phone_number(phone_number).is_some()
    }

    fn find_customers_by_first_name_containing_ignore_case(&self, fragment: &str) -> Vec<Customer>;

    fn find_customers_by_last_name_containing_ignore_case(&self, fragment: &str) -> Vec<Customer>;

    /// Distinct customers with at least one order managed by `employee`.
    fn find_customers_with_orders_managed_by_employee(&self, employee: &TaxCode) -> Vec<Customer>;

    /// Distinct customers with at least one order placed within `[start, end]`.
    fn find_customers_with_orders_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<Customer>;

    /// Every customer with its order count, highest count first.
    fn find_customers_order_by_order_count(&self) -> Vec<(Customer, usize)>;
}

/// Named and join-based employee queries.
pub trait EmployeeQueries {
    fn find_employees_by_job_title(&self, job_title: &str) -> Vec<Employee>;

    /// Employees hired strictly after `date`.
    fn find_employees_by_hire_date_after(&self, date: NaiveDate) -> Vec<Employee>;

    /// Employees paid strictly more than `salary`.
    fn find_employees_by_salary_greater_than(&self, salary: i64) -> Vec<Employee>;

    fn find_first_employee_by_order_by_salary_desc(&self) -> Option<Employee>;

    /// Distinct employees managing at least one order placed by `customer`.
    fn find_employees_who_managed_orders_for_customer(&self, customer: &TaxCode) -> Vec<Employee>;

    /// Every employee with its managed-order count, highest count first.
    fn find_employees_order_by_order_count(&self) -> Vec<(Employee, usize)>;
}

/// The persisted association graph.
pub trait AssociationRepository {
    fn associations(&self) -> &Associations;

    fn associations_mut(&mut self) -> &mut Associations;
}

/// Everything a service call can touch inside one unit of work.
pub trait UnitOfWork:
    Repository<Customer>
    + Repository<Employee>
    + Repository<Order>
    + Repository<Dish>
    + Repository<Ingredient>
    + Repository<RestaurantTable>
    + IdSequence<Order>
    + IdSequence<Dish>
    + IdSequence<Ingredient>
    + IdSequence<RestaurantTable>
    + CustomerQueries
    + EmployeeQueries
    + AssociationRepository
{
}

impl<T> UnitOfWork for T where
    T: Repository<Customer>
        + Repository<Employee>
        + Repository<Order>
        + Repository<Dish>
        + Repository<Ingredient>
        + Repository<RestaurantTable>
        + IdSequence<Order>
        + IdSequence<Dish>
        + IdSequence<Ingredient>
        + IdSequence<RestaurantTable>
        + CustomerQueries
        + EmployeeQueries
        + AssociationRepository
{
}

/// Storage gateway: transactional boundary around a [`UnitOfWork`].
///
/// ## Semantics
///
/// - `read` runs against one consistent snapshot.
/// - `write` runs against a staged copy; the copy is committed only when the closure
///   returns `Ok`. An `Err` discards every change made inside the closure, so a failed
///   service call leaves storage exactly as it was.
/// - Writers are serialized; across distinct calls, the last commit wins.
pub trait Storage: Send + Sync {
    type Tx: UnitOfWork;

    fn read<R>(&self, f: impl FnOnce(&Self::Tx) -> R) -> R;

    fn write<R>(&self, f: impl FnOnce(&mut Self::Tx) -> DomainResult<R>) -> DomainResult<R>;
}

impl<S> Storage for Arc<S>
where
    S: Storage,
{
    type Tx = S::Tx;

    fn read<R>(&self, f: impl FnOnce(&Self::Tx) -> R) -> R {
        (**self).read(f)
    }

    fn write<R>(&self, f: impl FnOnce(&mut Self::Tx) -> DomainResult<R>) -> DomainResult<R> {
        (**self).write(f)
    }
}
