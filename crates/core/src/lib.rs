//! `trattoria-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error model, the entity trait, the clock and the validation rules.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod rules;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DishId, IngredientId, OrderId, TableId, TaxCode};
pub use rules::{Rules, RulesConfig};
