//! Restaurant entity model.
//!
//! Plain record types (customers, employees, orders, dishes, ingredients, tables) and
//! the association graph that links them, implemented purely as deterministic domain
//! logic (no IO, no storage).

pub mod associations;
pub mod customer;
pub mod employee;
pub mod menu;
pub mod order;
pub mod person;
pub mod relation;
pub mod table;

pub use associations::Associations;
pub use customer::{Customer, CustomerDetails};
pub use employee::{Employee, EmployeeDetails};
pub use menu::{Dish, DishDetails, Ingredient};
pub use order::Order;
pub use person::Person;
pub use relation::Relation;
pub use table::RestaurantTable;
