//! End-to-end scenarios through the facade.
//!
//! Verifies:
//! - uniqueness and identity rules on customers and employees, with one tax code space
//! - guarded deletion leaves storage unchanged
//! - association views stay mirrored across services
//! - concurrent writers are serialized

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;

use trattoria_app::{AppConfig, RestaurantFacade};
use trattoria_core::{DomainError, FixedClock, OrderId, Rules, RulesConfig, TableId, TaxCode};
use trattoria_infra::InMemoryStorage;
use trattoria_model::{Customer, DishDetails, Employee};

const C1: &str = "RSSMRA85M01H501Z";
const C2: &str = "VRDGPP80A01F205X";
const E1: &str = "GLLLGU75B12L219P";
const E2: &str = "BNCNNA90A41F205K";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn facade() -> RestaurantFacade<InMemoryStorage> {
    RestaurantFacade::new(
        Arc::new(InMemoryStorage::new()),
        Arc::new(Rules::default()),
        Arc::new(FixedClock(date(2024, 6, 30))),
    )
}

fn customer(code: &str, email: &str) -> Customer {
    Customer::new(code, "Mario", "Rossi", None, email)
}

fn pasta() -> DishDetails {
    DishDetails {
        name: "Cacio e pepe".into(),
        description: None,
        price: 1100,
        quantity: 1,
    }
}

#[test]
fn highest_salary_scenario() {
    let facade = facade();
    facade
        .create_employee(Employee::new(E1, "Mario", "Rossi", 2000, "cook", date(2020, 1, 1)))
        .unwrap();
    facade
        .create_employee(Employee::new(E2, "Anna", "Bianchi", 3000, "chef", date(2021, 1, 1)))
        .unwrap();

    let top = facade.find_employee_with_highest_salary().unwrap();
    assert_eq!(top.tax_code().as_str(), E2);
    assert_eq!(facade.find_first_employee_by_order_by_salary_desc().unwrap(), top);
}

#[test]
fn duplicate_email_scenario() {
    let facade = facade();
    facade.create_customer(customer(C1, "a@x.com")).unwrap();

    let err = facade.create_customer(customer(C2, "a@x.com")).unwrap_err();
    match err {
        DomainError::Conflict(_) => {}
        _ => panic!("Expected Conflict error"),
    }
    assert_eq!(facade.count_customers(), 1);
    assert!(!facade.customer_exists(C2));
}

#[test]
fn tax_codes_are_shared_between_customers_and_employees() {
    let facade = facade();
    facade
        .create_employee(Employee::new(E1, "Luigi", "Galli", 2000, "cook", date(2020, 1, 1)))
        .unwrap();
    facade.create_customer(customer(C1, "a@x.com")).unwrap();

    assert!(facade.create_customer(customer(E1, "b@x.com")).unwrap_err().is_conflict());
    let err = facade
        .create_employee(Employee::new(C1, "Mario", "Rossi", 1000, "waiter", date(2021, 1, 1)))
        .unwrap_err();
    assert!(err.is_conflict());

    assert_eq!(facade.count_customers(), 1);
    assert_eq!(facade.count_employees(), 1);
    assert!(!facade.customer_exists(E1));
    assert!(!facade.employee_exists(C1));
}

#[test]
fn created_customer_keeps_its_tax_code() {
    let facade = facade();
    let created = facade.create_customer(customer(C1, "a@x.com")).unwrap();

    assert_eq!(created.tax_code().as_str(), C1);
    assert!(facade.customer_exists(C1));
}

#[test]
fn identity_change_on_update_is_rejected_and_nothing_changes() {
    let facade = facade();
    let created = facade.create_customer(customer(C1, "a@x.com")).unwrap();

    let mut details = created.details();
    details.tax_code = TaxCode::from(C2);
    details.email = "changed@x.com".into();

    assert!(facade.update_customer(C1, details).unwrap_err().is_validation());
    assert_eq!(facade.get_customer_by_id(C1).unwrap(), created);
    assert!(!facade.customer_exists(C2));
}

#[test]
fn customer_with_orders_cannot_be_deleted() {
    let facade = facade();
    facade.create_customer(customer(C1, "a@x.com")).unwrap();
    let order = facade.place_order("open", date(2024, 5, 1), None).unwrap();
    facade.add_customer_to_order(order.id(), C1).unwrap();

    let err = facade.delete_customer(C1).unwrap_err();
    assert!(err.is_conflict());

    assert!(facade.customer_exists(C1));
    assert_eq!(facade.get_customer_orders(C1).unwrap(), vec![order.clone()]);
    assert_eq!(facade.order_customers(order.id()).unwrap().len(), 1);

    facade.delete_order(order.id()).unwrap();
    facade.delete_customer(C1).unwrap();
    assert_eq!(facade.count_customers(), 0);
}

#[test]
fn ingredient_is_linked_to_a_dish_once() {
    let facade = facade();
    let dish = facade.create_dish(pasta()).unwrap().id();
    let pepper = facade.create_ingredient("pepper", None).unwrap().id();

    facade.add_ingredient(dish, pepper).unwrap();
    facade.add_ingredient(dish, pepper).unwrap();

    let dishes = facade.ingredient_dishes(pepper).unwrap();
    assert_eq!(dishes.iter().filter(|d| d.id() == dish).count(), 1);
}

#[test]
fn inverted_date_range_is_validation() {
    let facade = facade();
    let err = facade
        .find_customers_with_orders_between_dates(date(2024, 3, 1), date(2024, 2, 1))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn join_queries_follow_order_links() {
    let facade = facade();
    facade.create_customer(customer(C1, "a@x.com")).unwrap();
    facade.create_customer(customer(C2, "b@x.com")).unwrap();
    facade
        .create_employee(Employee::new(E2, "Anna", "Bianchi", 3000, "waiter", date(2021, 1, 1)))
        .unwrap();

    let table = facade.create_table(4, "free").unwrap().id();
    let early = facade.place_order("open", date(2024, 1, 10), Some(table)).unwrap().id();
    let late = facade.place_order("open", date(2024, 4, 10), None).unwrap().id();
    facade.add_customer_to_order(early, C1).unwrap();
    facade.add_customer_to_order(late, C1).unwrap();
    facade.add_customer_to_order(late, C2).unwrap();
    facade.assign_employee(early, E2).unwrap();

    let managed = facade.find_customers_with_orders_managed_by_employee(E2).unwrap();
    assert_eq!(managed.len(), 1);
    assert_eq!(managed[0].tax_code().as_str(), C1);

    let managers = facade.find_employees_who_managed_orders_for_customer(C1).unwrap();
    assert_eq!(managers.len(), 1);

    let in_april = facade
        .find_customers_with_orders_between_dates(date(2024, 4, 1), date(2024, 4, 30))
        .unwrap();
    assert_eq!(in_april.len(), 2);

    assert_eq!(facade.find_customer_with_most_orders().unwrap().tax_code().as_str(), C1);
    assert_eq!(facade.table_orders(table).unwrap().len(), 1);
    assert_eq!(facade.find_employees_order_by_order_count()[0].1, 1);
    assert!(facade.delete_employee(E2).unwrap_err().is_conflict());
    assert!(facade.delete_table(table).unwrap_err().is_conflict());
}

#[test]
fn order_employee_is_absent_until_assigned() {
    let facade = facade();
    let order = facade.place_order("open", date(2024, 5, 1), None).unwrap();
    assert_eq!(facade.order_employee(order.id()).unwrap(), None);
    assert!(facade.get_order(OrderId::new(999)).unwrap_err().is_not_found());
    assert!(facade.get_table(TableId::new(999)).unwrap_err().is_not_found());
}

#[test]
fn concurrent_creates_with_the_same_email_admit_one() {
    let facade = Arc::new(facade());
    let codes = [C1, C2, E2, "FRRLCU88C03L219W"];

    let handles: Vec<_> = codes
        .into_iter()
        .map(|code| {
            let facade = facade.clone();
            thread::spawn(move || facade.create_customer(customer(code, "same@x.com")).is_ok())
        })
        .collect();

    let created = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(created, 1);
    assert_eq!(facade.count_customers(), 1);
}

#[test]
fn bootstrap_from_default_config_is_repeatable() {
    let config = AppConfig::from_toml_str("[logging]\nformat = \"pretty\"").unwrap();

    let first = RestaurantFacade::bootstrap(&config, InMemoryStorage::new()).unwrap();
    let second = RestaurantFacade::bootstrap(&config, InMemoryStorage::new()).unwrap();

    first.create_customer(customer(C1, "a@x.com")).unwrap();
    assert_eq!(first.count_customers(), 1);
    assert_eq!(second.count_customers(), 0);
}

#[test]
fn bootstrap_installs_global_rules_and_applies_the_configured_ones() {
    let config = AppConfig::from_toml_str("[rules]\nphone_pattern = '^[0-9]{4}$'").unwrap();
    let facade = RestaurantFacade::bootstrap(&config, InMemoryStorage::new()).unwrap();

    let short_phone = Customer::new(C1, "Mario", "Rossi", Some("1234".into()), "a@x.com");
    facade.create_customer(short_phone).unwrap();
    let long_phone = Customer::new(C2, "Giuseppe", "Verdi", Some("+393331234567".into()), "b@x.com");
    assert!(facade.create_customer(long_phone).unwrap_err().is_validation());

    assert!(Rules::install(&RulesConfig::default()).unwrap_err().is_conflict());
}
