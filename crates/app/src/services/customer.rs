//! Customer service: creation, identity-preserving updates, guarded deletion and
//! customer lookups.

use std::sync::Arc;

use chrono::NaiveDate;

use trattoria_core::rules::{check_date_range, require_non_empty};
use trattoria_core::{DomainError, DomainResult, Rules, TaxCode};
use trattoria_infra::store::{AssociationRepository, CustomerQueries, Repository, Storage};
use trattoria_model::{Customer, CustomerDetails, Employee, Order};

use super::{load, load_all};

/// Customer operations over a storage gateway.
#[derive(Debug, Clone)]
pub struct CustomerService<S> {
    store: S,
    rules: Arc<Rules>,
}

impl<S: Storage> CustomerService<S> {
    pub fn new(store: S, rules: Arc<Rules>) -> Self {
        Self { store, rules }
    }

    /// Persist a new customer.
    ///
    /// Fails with `Validation` on a malformed tax code, email or phone number and with
    /// `Conflict` when the email or phone number is already taken, or when the tax code
    /// already belongs to a customer or an employee.
    pub fn create_customer(&self, customer: Customer) -> DomainResult<Customer> {
        self.rules.check_tax_code(customer.tax_code())?;
        self.rules.check_email(customer.email())?;
        self.rules.check_phone(customer.phone_number())?;

        let saved = self.store.write(|tx| {
            if Repository::<Customer>::exists_by_id(tx, customer.tax_code()) {
                return Err(DomainError::conflict(format!(
                    "customer with tax code {} already exists",
                    customer.tax_code()
                )));
            }
            if Repository::<Employee>::exists_by_id(tx, customer.tax_code()) {
                return Err(DomainError::conflict(format!(
                    "tax code {} already belongs to an employee",
                    customer.tax_code()
                )));
            }
            if tx.exists_customer_by_email(customer.email()) {
                return Err(DomainError::conflict(format!(
                    "email already in use: {}",
                    customer.email()
                )));
            }
            if let Some(phone) = customer.phone_number() {
                if tx.exists_customer_by_phone_number(phone) {
                    return Err(DomainError::conflict(format!(
                        "phone number already in use: {phone}"
                    )));
                }
            }
            Ok(tx.save(customer))
        })?;

        tracing::info!(tax_code = %saved.tax_code(), "customer created");
        Ok(saved)
    }

    pub fn get_customer_by_id(&self, tax_code: &TaxCode) -> DomainResult<Customer> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.store.read(|tx| load::<Customer, _>(tx, tax_code))
    }

    pub fn get_all_customers(&self) -> Vec<Customer> {
        self.store.read(|tx| Repository::<Customer>::find_all(tx))
    }

    /// Overwrite names, email and phone number. The tax code never changes, so
    /// `details.tax_code` must equal `tax_code`.
    pub fn update_customer(
        &self,
        tax_code: &TaxCode,
        details: CustomerDetails,
    ) -> DomainResult<Customer> {
        require_non_empty("tax code", tax_code.as_str())?;
        if &details.tax_code != tax_code {
            return Err(DomainError::validation(format!(
                "tax code cannot be changed: {} != {}",
                details.tax_code, tax_code
            )));
        }

        let phone = details.phone_number.as_deref().filter(|p| !p.is_empty());

        let updated = self.store.write(|tx| {
            let mut customer = load::<Customer, _>(tx, tax_code)?;

            if customer.email() != details.email {
                self.rules.check_email(&details.email)?;
                if tx.exists_customer_by_email(&details.email) {
                    return Err(DomainError::conflict(format!(
                        "email already in use: {}",
                        details.email
                    )));
                }
            }
            if let Some(phone) = phone {
                if customer.phone_number() != Some(phone) {
                    self.rules.check_phone(Some(phone))?;
                    if tx.exists_customer_by_phone_number(phone) {
                        return Err(DomainError::conflict(format!(
                            "phone number already in use: {phone}"
                        )));
                    }
                }
            }

            customer.apply_details(&details);
            Ok(tx.save(customer))
        })?;

        tracing::info!(tax_code = %tax_code, "customer updated");
        Ok(updated)
    }

    /// Delete a customer that has no orders. Its table seating goes with it; orders are
    /// never cascaded.
    pub fn delete_customer(&self, tax_code: &TaxCode) -> DomainResult<()> {
        require_non_empty("tax code", tax_code.as_str())?;
        let result = self.store.write(|tx| {
            load::<Customer, _>(tx, tax_code)?;
            if tx.associations().customer_order_count(tax_code) > 0 {
                return Err(DomainError::conflict(
                    "cannot delete customer with existing orders",
                ));
            }
            tx.associations_mut().forget_customer(tax_code);
            Repository::<Customer>::delete(tx, tax_code);
            Ok(())
        });

        match &result {
            Ok(()) => tracing::info!(tax_code = %tax_code, "customer deleted"),
            Err(err) => tracing::warn!(tax_code = %tax_code, error = %err, "customer not deleted"),
        }
        result
    }

    pub fn find_by_email(&self, email: &str) -> DomainResult<Customer> {
        require_non_empty("email", email)?;
        self.store
            .read(|tx| tx.find_customer_by_email(email))
            .ok_or_else(|| DomainError::not_found(format!("customer with email {email}")))
    }

    pub fn find_by_phone_number(&self, phone_number: &str) -> DomainResult<Customer> {
        require_non_empty("phone number", phone_number)?;
        self.store
            .read(|tx| tx.find_customer_by_phone_number(phone_number))
            .ok_or_else(|| {
                DomainError::not_found(format!("customer with phone number {phone_number}"))
            })
    }

    pub fn find_by_first_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> DomainResult<Vec<Customer>> {
        require_non_empty("first name", fragment)?;
        Ok(self
            .store
            .read(|tx| tx.find_customers_by_first_name_containing_ignore_case(fragment)))
    }

    pub fn find_by_last_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> DomainResult<Vec<Customer>> {
        require_non_empty("last name", fragment)?;
        Ok(self
            .store
            .read(|tx| tx.find_customers_by_last_name_containing_ignore_case(fragment)))
    }

    /// Orders placed by the customer, by order id.
    pub fn get_customer_orders(&self, tax_code: &TaxCode) -> DomainResult<Vec<Order>> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.store.read(|tx| {
            load::<Customer, _>(tx, tax_code)?;
            Ok(load_all::<Order, _>(
                tx,
                tx.associations().orders_of_customer(tax_code),
            ))
        })
    }

    pub fn has_orders(&self, tax_code: &TaxCode) -> DomainResult<bool> {
        require_non_empty("tax code", tax_code.as_str())?;
        self.store.read(|tx| {
            load::<Customer, _>(tx, tax_code)?;
            Ok(tx.associations().customer_order_count(tax_code) > 0)
        })
    }

    pub fn find_customers_with_orders_managed_by_employee(
        &self,
        employee: &TaxCode,
    ) -> DomainResult<Vec<Customer>> {
        require_non_empty("employee tax code", employee.as_str())?;
        Ok(self
            .store
            .read(|tx| tx.find_customers_with_orders_managed_by_employee(employee)))
    }

    /// Customers with an order placed within `[start, end]`. The range is checked
    /// before storage is consulted.
    pub fn find_customers_with_orders_between_dates(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DomainResult<Vec<Customer>> {
        check_date_range(start, end)?;
        Ok(self
            .store
            .read(|tx| tx.find_customers_with_orders_between_dates(start, end)))
    }

    pub fn exists_by_id(&self, tax_code: &TaxCode) -> bool {
        self.store
            .read(|tx| Repository::<Customer>::exists_by_id(tx, tax_code))
    }

    pub fn count(&self) -> usize {
        self.store.read(|tx| Repository::<Customer>::count(tx))
    }

    /// The customer with the most orders; ties go to the lowest tax code.
    pub fn find_customer_with_most_orders(&self) -> DomainResult<Customer> {
        self.store
            .read(|tx| tx.find_customers_order_by_order_count())
            .into_iter()
            .next()
            .map(|(customer, _)| customer)
            .ok_or_else(|| DomainError::validation("no customers found"))
    }
}
