//! Menu entities: dishes and the ingredients they are made of.

use serde::{Deserialize, Serialize};

use trattoria_core::{DishId, Entity, IngredientId};

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: String,
    description: Option<String>,
    /// Price in smallest currency unit (e.g., cents).
    price: i64,
    quantity: i64,
}

/// Values for creating or replacing a dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishDetails {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub quantity: i64,
}

impl Dish {
    pub fn new(id: DishId, details: DishDetails) -> Self {
        Self {
            id,
            name: details.name,
            description: details.description,
            price: details.price,
            quantity: details.quantity,
        }
    }

    pub fn id(&self) -> DishId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn apply_details(&mut self, details: DishDetails) {
        self.name = details.name;
        self.description = details.description;
        self.price = details.price;
        self.quantity = details.quantity;
    }
}

impl Entity for Dish {
    type Id = DishId;
    const KIND: &'static str = "dish";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// An ingredient used by one or more dishes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    id: IngredientId,
    name: String,
    description: Option<String>,
}

impl Ingredient {
    pub fn new(id: IngredientId, name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description,
        }
    }

    pub fn id(&self) -> IngredientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Entity for Ingredient {
    type Id = IngredientId;
    const KIND: &'static str = "ingredient";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
