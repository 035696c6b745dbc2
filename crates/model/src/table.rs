use serde::{Deserialize, Serialize};

use trattoria_core::{Entity, TableId};

/// A physical table in the dining room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantTable {
    id: TableId,
    num_seats: u32,
    state: String,
}

impl RestaurantTable {
    pub fn new(id: TableId, num_seats: u32, state: impl Into<String>) -> Self {
        Self {
            id,
            num_seats,
            state: state.into(),
        }
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn num_seats(&self) -> u32 {
        self.num_seats
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }
}

impl Entity for RestaurantTable {
    type Id = TableId;
    const KIND: &'static str = "table";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
