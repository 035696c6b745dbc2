//! Employee service.

use std::sync::Arc;

use chrono::NaiveDate;

use trattoria_core::rules::{check_not_in_future, check_salary, require_non_empty};
use trattoria_core::{Clock, DomainError, DomainResult, Rules, TaxCode};
use trattoria_infra::store::{AssociationRepository, EmployeeQueries, Repository, Storage};
use trattoria_model::{Customer, Employee, EmployeeDetails, Order};

use super::{load, load_all};

/// Employee operations over a storage gateway.
///
/// Hire dates are checked against the injected [`Clock`].
#[derive(Clone)]
pub struct EmployeeService<S> {
    store: S,
    rules: Arc<Rules>,
    clock: Arc<dyn Clock>,
}

impl<S: Storage> EmployeeService<S> {
    pub fn new(store: S, rules: Arc<Rules>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            rules,
            clock,
        }
    }

    fn check_details(&self, salary: i64, hire_date: NaiveDate) -> DomainResult<()> {
        check_salary(salary)?;
        check_not_in_future("hire date", hire_date, self.clock.today())
    }

    pub fn create_employee(&self, employee: Employee) -> DomainResult<Employee> {
        self.rules.check_tax_code(employee.tax_code())?;
        self.check_details(employee.salary(), employee.hire_date())?;

        let saved = self.store.write(|tx| {
            if Repository::<Employee>::exists_by_id(tx, employee.tax_code()) {
                return Err(DomainError::conflict(format!(
                    "employee with tax code {} already exists",
                    employee.tax_code()
                )));
            }
            if Repository::<Customer>::exists_by_id(tx, employee.tax_code()) {
                return Err(DomainError::conflict(format!(
                    "tax code {} already belongs to a customer",
                    employee.tax_code()
                )));
            }
            Ok(tx.save(employee))
        })?;

        tracing::info!(
            tax_code = %saved.tax_code(),
            job_title = saved.job_title(),
            "employee created"
        );
        Ok(saved)
    }

    pub fn get_employee_by_id(&self, tax_code: &TaxCode) -> DomainResult<Employee> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.store.read(|tx| load::<Employee, _>(tx, tax_code))
    }

    pub fn get_all_employees(&self) -> Vec<Employee> {
        self.store.read(|tx| Repository::<Employee>::find_all(tx))
    }

    /// Overwrite names, salary, job title and hire date. The tax code is not part of
    /// the details and never changes.
    pub fn update_employee(
        &self,
        tax_code: &TaxCode,
        details: EmployeeDetails,
    ) -> DomainResult<Employee> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.check_details(details.salary, details.hire_date)?;

        let updated = self.store.write(|tx| {
            let mut employee = load::<Employee, _>(tx, tax_code)?;
            employee.apply_details(&details);
            Ok(tx.save(employee))
        })?;

        tracing::info!(tax_code = %tax_code, salary = updated.salary(), "employee updated");
        Ok(updated)
    }

    /// Delete an employee that manages no orders.
    pub fn delete_employee(&self, tax_code: &TaxCode) -> DomainResult<()> {
        require_non_empty("tax code", tax_code.as_str())?;
        let result = self.store.write(|tx| {
            load::<Employee, _>(tx, tax_code)?;
            if tx.associations().managed_order_count(tax_code) > 0 {
                return Err(DomainError::conflict(
                    "cannot delete employee with managed orders",
                ));
            }
            tx.associations_mut().forget_employee(tax_code);
            Repository::<Employee>::delete(tx, tax_code);
            Ok(())
        });

        match &result {
            Ok(()) => tracing::info!(tax_code = %tax_code, "employee deleted"),
            Err(err) => tracing::warn!(tax_code = %tax_code, error = %err, "employee not deleted"),
        }
        result
    }

    pub fn find_by_job_title(&self, job_title: &str) -> DomainResult<Vec<Employee>> {
        require_non_empty("job title", job_title)?;
        Ok(self.store.read(|tx| tx.find_employees_by_job_title(job_title)))
    }

    /// Employees hired strictly after `date`.
    pub fn find_by_hire_date_after(&self, date: NaiveDate) -> Vec<Employee> {
        self.store.read(|tx| tx.find_employees_by_hire_date_after(date))
    }

    /// Employees paid strictly more than `amount`.
    pub fn find_by_salary_greater_than(&self, amount: i64) -> DomainResult<Vec<Employee>> {
        check_salary(amount)?;
        Ok(self
            .store
            .read(|tx| tx.find_employees_by_salary_greater_than(amount)))
    }

    /// The highest-paid employee; ties go to the lowest tax code.
    pub fn find_first_by_order_by_salary_desc(&self) -> DomainResult<Employee> {
        self.store
            .read(|tx| tx.find_first_employee_by_order_by_salary_desc())
            .ok_or_else(|| DomainError::not_found("no employees found"))
    }

    pub fn find_employee_with_highest_salary(&self) -> DomainResult<Employee> {
        self.find_first_by_order_by_salary_desc()
    }

    pub fn find_employees_who_managed_orders_for_customer(
        &self,
        customer: &TaxCode,
    ) -> DomainResult<Vec<Employee>> {
        require_non_empty("customer tax code", customer.as_str())?;
        Ok(self
            .store
            .read(|tx| tx.find_employees_who_managed_orders_for_customer(customer)))
    }

    /// Every employee with its managed-order count, highest first.
    pub fn find_employees_order_by_order_count(&self) -> Vec<(Employee, usize)> {
        self.store.read(|tx| tx.find_employees_order_by_order_count())
    }

    pub fn get_orders_managed_by_employee(&self, tax_code: &TaxCode) -> DomainResult<Vec<Order>> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.store.read(|tx| {
            load::<Employee, _>(tx, tax_code)?;
            Ok(load_all::<Order, _>(
                tx,
                tx.associations().orders_managed_by(tax_code),
            ))
        })
    }

    pub fn exists_by_id(&self, tax_code: &TaxCode) -> bool {
        self.store
            .read(|tx| Repository::<Employee>::exists_by_id(tx, tax_code))
    }

    pub fn count(&self) -> usize {
        self.store.read(|tx| Repository::<Employee>::count(tx))
    }
}
