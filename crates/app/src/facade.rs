//! Single entry point over every domain service.
//!
//! The facade takes primitive identifiers (tax codes as `&str`, surrogate ids as
//! anything convertible from `u64`) and returns entities, lists, booleans or counts.
//! It carries no transport concerns; mapping [`DomainError`](trattoria_core::DomainError)
//! kinds to responses belongs to whatever sits in front of it.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;

use trattoria_core::{
    Clock, DishId, DomainResult, IngredientId, OrderId, Rules, SystemClock, TableId, TaxCode,
};
use trattoria_infra::Storage;
use trattoria_model::{
    Customer, CustomerDetails, Dish, DishDetails, Employee, EmployeeDetails, Ingredient, Order,
    RestaurantTable,
};

use crate::config::AppConfig;
use crate::services::{CustomerService, EmployeeService, MenuService, OrderService, TableService};

pub struct RestaurantFacade<S> {
    customers: CustomerService<Arc<S>>,
    employees: EmployeeService<Arc<S>>,
    orders: OrderService<Arc<S>>,
    menu: MenuService<Arc<S>>,
    tables: TableService<Arc<S>>,
}

impl<S: Storage> RestaurantFacade<S> {
    pub fn new(storage: Arc<S>, rules: Arc<Rules>, clock: Arc<dyn Clock>) -> Self {
        Self {
            customers: CustomerService::new(storage.clone(), rules.clone()),
            employees: EmployeeService::new(storage.clone(), rules, clock),
            orders: OrderService::new(storage.clone()),
            menu: MenuService::new(storage.clone()),
            tables: TableService::new(storage),
        }
    }

    /// Build a facade from configuration.
    ///
    /// Initializes logging, installs the process-wide validation rules and wires every
    /// service to `storage`. When rules were already installed (a second bootstrap in
    /// the same process), the global rules are shared if they were compiled from the
    /// same patterns; otherwise the configured rules are used by this facade only.
    pub fn bootstrap(config: &AppConfig, storage: S) -> anyhow::Result<Self> {
        trattoria_observability::init(&config.logging);

        let rules = match Rules::install(&config.rules) {
            Ok(rules) => rules,
            Err(err) if err.is_conflict() => {
                let installed = Rules::global();
                if installed.config() == &config.rules {
                    installed
                } else {
                    tracing::warn!("validation rules already installed; using configured rules locally");
                    Arc::new(Rules::from_config(&config.rules).context("invalid validation rules")?)
                }
            }
            Err(err) => return Err(err).context("invalid validation rules"),
        };

        tracing::info!(log_format = ?config.logging.format, "restaurant facade ready");
        Ok(Self::new(Arc::new(storage), rules, Arc::new(SystemClock)))
    }

    pub fn customers(&self) -> &CustomerService<Arc<S>> {
        &self.customers
    }

    pub fn employees(&self) -> &EmployeeService<Arc<S>> {
        &self.employees
    }

    pub fn orders(&self) -> &OrderService<Arc<S>> {
        &self.orders
    }

    pub fn menu(&self) -> &MenuService<Arc<S>> {
        &self.menu
    }

    pub fn tables(&self) -> &TableService<Arc<S>> {
        &self.tables
    }

    // --- customers ---

    pub fn create_customer(&self, customer: Customer) -> DomainResult<Customer> {
        self.customers.create_customer(customer)
    }

    pub fn get_customer_by_id(&self, tax_code: &str) -> DomainResult<Customer> {
        self.customers.get_customer_by_id(&TaxCode::from(tax_code))
    }

    pub fn get_all_customers(&self) -> Vec<Customer> {
        self.customers.get_all_customers()
    }

    pub fn update_customer(
        &self,
        tax_code: &str,
        details: CustomerDetails,
    ) -> DomainResult<Customer> {
        self.customers
            .update_customer(&TaxCode::from(tax_code), details)
    }

    pub fn delete_customer(&self, tax_code: &str) -> DomainResult<()> {
        self.customers.delete_customer(&TaxCode::from(tax_code))
    }

    pub fn find_customer_by_email(&self, email: &str) -> DomainResult<Customer> {
        self.customers.find_by_email(email)
    }

    pub fn find_customer_by_phone_number(&self, phone_number: &str) -> DomainResult<Customer> {
        self.customers.find_by_phone_number(phone_number)
    }

    pub fn find_customers_by_first_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> DomainResult<Vec<Customer>> {
        self.customers
            .find_by_first_name_containing_ignore_case(fragment)
    }

    pub fn find_customers_by_last_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> DomainResult<Vec<Customer>> {
        self.customers
            .find_by_last_name_containing_ignore_case(fragment)
    }

    pub fn get_customer_orders(&self, tax_code: &str) -> DomainResult<Vec<Order>> {
        self.customers.get_customer_orders(&TaxCode::from(tax_code))
    }

    pub fn customer_has_orders(&self, tax_code: &str) -> DomainResult<bool> {
        self.customers.has_orders(&TaxCode::from(tax_code))
    }

    pub fn find_customers_with_orders_managed_by_employee(
        &self,
        employee_tax_code: &str,
    ) -> DomainResult<Vec<Customer>> {
        self.customers
            .find_customers_with_orders_managed_by_employee(&TaxCode::from(employee_tax_code))
    }

    pub fn find_customers_with_orders_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Customer>> {
        self.customers
            .find_customers_with_orders_between_dates(start, end)
    }

    pub fn customer_exists(&self, tax_code: &str) -> bool {
        self.customers.exists_by_id(&TaxCode::from(tax_code))
    }

    pub fn count_customers(&self) -> usize {
        self.customers.count()
    }

    pub fn find_customer_with_most_orders(&self) -> DomainResult<Customer> {
        self.customers.find_customer_with_most_orders()
    }

    // --- employees ---

    pub fn create_employee(&self, employee: Employee) -> DomainResult<Employee> {
        self.employees.create_employee(employee)
    }

    pub fn get_employee_by_id(&self, tax_code: &str) -> DomainResult<Employee> {
        self.employees.get_employee_by_id(&TaxCode::from(tax_code))
    }

    pub fn get_all_employees(&self) -> Vec<Employee> {
        self.employees.get_all_employees()
    }

    pub fn update_employee(
        &self,
        tax_code: &str,
        details: EmployeeDetails,
    ) -> DomainResult<Employee> {
        self.employees
            .update_employee(&TaxCode::from(tax_code), details)
    }

    pub fn delete_employee(&self, tax_code: &str) -> DomainResult<()> {
        self.employees.delete_employee(&TaxCode::from(tax_code))
    }

    pub fn find_employees_by_job_title(&self, job_title: &str) -> DomainResult<Vec<Employee>> {
        self.employees.find_by_job_title(job_title)
    }

    pub fn find_employees_by_hire_date_after(&self, date: NaiveDate) -> Vec<Employee> {
        self.employees.find_by_hire_date_after(date)
    }

    pub fn find_employees_by_salary_greater_than(
        &self,
        amount: i64,
    ) -> DomainResult<Vec<Employee>> {
        self.employees.find_by_salary_greater_than(amount)
    }

    pub fn find_first_employee_by_order_by_salary_desc(&self) -> DomainResult<Employee> {
        self.employees.find_first_by_order_by_salary_desc()
    }

    pub fn find_employee_with_highest_salary(&self) -> DomainResult<Employee> {
        self.employees.find_employee_with_highest_salary()
    }

    pub fn find_employees_who_managed_orders_for_customer(
        &self,
        customer_tax_code: &str,
    ) -> DomainResult<Vec<Employee>> {
        self.employees
            .find_employees_who_managed_orders_for_customer(&TaxCode::from(customer_tax_code))
    }

    pub fn find_employees_order_by_order_count(&self) -> Vec<(Employee, usize)> {
        self.employees.find_employees_order_by_order_count()
    }

    pub fn get_orders_managed_by_employee(&self, tax_code: &str) -> DomainResult<Vec<Order>> {
        self.employees
            .get_orders_managed_by_employee(&TaxCode::from(tax_code))
    }

    pub fn employee_exists(&self, tax_code: &str) -> bool {
        self.employees.exists_by_id(&TaxCode::from(tax_code))
    }

    pub fn count_employees(&self) -> usize {
        self.employees.count()
    }

    // --- orders ---

    pub fn place_order(
        &self,
        state: &str,
        placed_on: NaiveDate,
        table: Option<TableId>,
    ) -> DomainResult<Order> {
        self.orders.place_order(state, placed_on, table)
    }

    pub fn get_order(&self, id: impl Into<OrderId>) -> DomainResult<Order> {
        self.orders.get_order(id.into())
    }

    pub fn get_all_orders(&self) -> Vec<Order> {
        self.orders.get_all_orders()
    }

    pub fn update_order_state(&self, id: impl Into<OrderId>, state: &str) -> DomainResult<Order> {
        self.orders.update_order_state(id.into(), state)
    }

    pub fn add_customer_to_order(
        &self,
        id: impl Into<OrderId>,
        customer_tax_code: &str,
    ) -> DomainResult<bool> {
        self.orders
            .add_customer_to_order(id.into(), &TaxCode::from(customer_tax_code))
    }

    pub fn remove_customer_from_order(
        &self,
        id: impl Into<OrderId>,
        customer_tax_code: &str,
    ) -> DomainResult<bool> {
        self.orders
            .remove_customer_from_order(id.into(), &TaxCode::from(customer_tax_code))
    }

    pub fn assign_employee(
        &self,
        id: impl Into<OrderId>,
        employee_tax_code: &str,
    ) -> DomainResult<bool> {
        self.orders
            .assign_employee(id.into(), &TaxCode::from(employee_tax_code))
    }

    pub fn unassign_employee(&self, id: impl Into<OrderId>) -> DomainResult<Option<TaxCode>> {
        self.orders.unassign_employee(id.into())
    }

    pub fn add_dish_to_order(
        &self,
        id: impl Into<OrderId>,
        dish: impl Into<DishId>,
    ) -> DomainResult<bool> {
        self.orders.add_dish_to_order(id.into(), dish.into())
    }

    pub fn remove_dish_from_order(
        &self,
        id: impl Into<OrderId>,
        dish: impl Into<DishId>,
    ) -> DomainResult<bool> {
        self.orders.remove_dish_from_order(id.into(), dish.into())
    }

    pub fn assign_table(
        &self,
        id: impl Into<OrderId>,
        table: impl Into<TableId>,
    ) -> DomainResult<bool> {
        self.orders.assign_table(id.into(), table.into())
    }

    pub fn order_customers(&self, id: impl Into<OrderId>) -> DomainResult<Vec<Customer>> {
        self.orders.order_customers(id.into())
    }

    pub fn order_employee(&self, id: impl Into<OrderId>) -> DomainResult<Option<Employee>> {
        self.orders.order_employee(id.into())
    }

    pub fn order_dishes(&self, id: impl Into<OrderId>) -> DomainResult<Vec<Dish>> {
        self.orders.order_dishes(id.into())
    }

    pub fn order_table(&self, id: impl Into<OrderId>) -> DomainResult<Option<RestaurantTable>> {
        self.orders.order_table(id.into())
    }

    pub fn delete_order(&self, id: impl Into<OrderId>) -> DomainResult<()> {
        self.orders.delete_order(id.into())
    }

    // --- menu ---

    pub fn create_dish(&self, details: DishDetails) -> DomainResult<Dish> {
        self.menu.create_dish(details)
    }

    pub fn get_dish(&self, id: impl Into<DishId>) -> DomainResult<Dish> {
        self.menu.get_dish(id.into())
    }

    pub fn get_all_dishes(&self) -> Vec<Dish> {
        self.menu.get_all_dishes()
    }

    pub fn update_dish(&self, id: impl Into<DishId>, details: DishDetails) -> DomainResult<Dish> {
        self.menu.update_dish(id.into(), details)
    }

    pub fn delete_dish(&self, id: impl Into<DishId>) -> DomainResult<()> {
        self.menu.delete_dish(id.into())
    }

    pub fn create_ingredient(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DomainResult<Ingredient> {
        self.menu.create_ingredient(name, description)
    }

    pub fn get_ingredient(&self, id: impl Into<IngredientId>) -> DomainResult<Ingredient> {
        self.menu.get_ingredient(id.into())
    }

    pub fn get_all_ingredients(&self) -> Vec<Ingredient> {
        self.menu.get_all_ingredients()
    }

    pub fn delete_ingredient(&self, id: impl Into<IngredientId>) -> DomainResult<()> {
        self.menu.delete_ingredient(id.into())
    }

    pub fn add_ingredient(
        &self,
        dish: impl Into<DishId>,
        ingredient: impl Into<IngredientId>,
    ) -> DomainResult<bool> {
        self.menu.add_ingredient(dish.into(), ingredient.into())
    }

    pub fn remove_ingredient(
        &self,
        dish: impl Into<DishId>,
        ingredient: impl Into<IngredientId>,
    ) -> DomainResult<bool> {
        self.menu.remove_ingredient(dish.into(), ingredient.into())
    }

    pub fn dish_ingredients(&self, dish: impl Into<DishId>) -> DomainResult<Vec<Ingredient>> {
        self.menu.dish_ingredients(dish.into())
    }

    pub fn ingredient_dishes(&self, ingredient: impl Into<IngredientId>) -> DomainResult<Vec<Dish>> {
        self.menu.ingredient_dishes(ingredient.into())
    }

    // --- tables ---

    pub fn create_table(&self, num_seats: u32, state: &str) -> DomainResult<RestaurantTable> {
        self.tables.create_table(num_seats, state)
    }

    pub fn get_table(&self, id: impl Into<TableId>) -> DomainResult<RestaurantTable> {
        self.tables.get_table(id.into())
    }

    pub fn get_all_tables(&self) -> Vec<RestaurantTable> {
        self.tables.get_all_tables()
    }

    pub fn update_table_state(
        &self,
        id: impl Into<TableId>,
        state: &str,
    ) -> DomainResult<RestaurantTable> {
        self.tables.update_table_state(id.into(), state)
    }

    pub fn seat_customer(
        &self,
        table: impl Into<TableId>,
        customer_tax_code: &str,
    ) -> DomainResult<bool> {
        self.tables
            .seat_customer(table.into(), &TaxCode::from(customer_tax_code))
    }

    pub fn unseat_customer(
        &self,
        table: impl Into<TableId>,
        customer_tax_code: &str,
    ) -> DomainResult<bool> {
        self.tables
            .unseat_customer(table.into(), &TaxCode::from(customer_tax_code))
    }

    pub fn table_customers(&self, table: impl Into<TableId>) -> DomainResult<Vec<Customer>> {
        self.tables.table_customers(table.into())
    }

    pub fn table_orders(&self, table: impl Into<TableId>) -> DomainResult<Vec<Order>> {
        self.tables.table_orders(table.into())
    }

    pub fn delete_table(&self, table: impl Into<TableId>) -> DomainResult<()> {
        self.tables.delete_table(table.into())
    }
}
