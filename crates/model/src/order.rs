use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use trattoria_core::{Entity, OrderId};

/// An order placed at the restaurant.
///
/// Customers, the managing employee, dishes and the table are kept in
/// [`Associations`](crate::Associations). A freshly built order therefore has no
/// managing employee until one is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    /// Free-form status ("open", "served", "paid", ...).
    state: String,
    placed_on: NaiveDate,
}

impl Order {
    pub fn new(id: OrderId, state: impl Into<String>, placed_on: NaiveDate) -> Self {
        Self {
            id,
            state: state.into(),
            placed_on,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn placed_on(&self) -> NaiveDate {
        self.placed_on
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }
}

impl Entity for Order {
    type Id = OrderId;
    const KIND: &'static str = "order";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
