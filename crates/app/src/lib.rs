//! Application layer: domain services, the facade and bootstrap.
//!
//! ```text
//! RestaurantFacade
//!   ↓
//! {Customer, Employee, Order, Menu, Table}Service
//!   ↓
//! Rules (validation) + Storage (one unit of work per call)
//! ```

pub mod config;
pub mod facade;
pub mod services;

pub use config::{AppConfig, ConfigError};
pub use facade::RestaurantFacade;
pub use services::{CustomerService, EmployeeService, MenuService, OrderService, TableService};
