//! Menu service: dishes, ingredients and the dish ↔ ingredient link.

use trattoria_core::rules::{check_price, check_quantity, require_non_empty};
use trattoria_core::{DishId, DomainError, DomainResult, IngredientId};
use trattoria_infra::store::{AssociationRepository, IdSequence, Repository, Storage};
use trattoria_model::{Dish, DishDetails, Ingredient};

use super::{ensure_exists, load, load_all};

#[derive(Debug, Clone)]
pub struct MenuService<S> {
    store: S,
}

fn check_dish(details: &DishDetails) -> DomainResult<()> {
    require_non_empty("dish name", &details.name)?;
    check_price(details.price)?;
    check_quantity(details.quantity)
}

impl<S: Storage> MenuService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_dish(&self, details: DishDetails) -> DomainResult<Dish> {
        check_dish(&details)?;
        let dish = self.store.write(|tx| {
            let id = IdSequence::<Dish>::next_id(tx);
            Ok(tx.save(Dish::new(id, details)))
        })?;
        tracing::info!(dish_id = %dish.id(), name = dish.name(), "dish created");
        Ok(dish)
    }

    pub fn get_dish(&self, id: DishId) -> DomainResult<Dish> {
        self.store.read(|tx| load::<Dish, _>(tx, &id))
    }

    pub fn get_all_dishes(&self) -> Vec<Dish> {
        self.store.read(|tx| Repository::<Dish>::find_all(tx))
    }

    /// Replace name, description, price and quantity. Ingredients and orders are kept.
    pub fn update_dish(&self, id: DishId, details: DishDetails) -> DomainResult<Dish> {
        check_dish(&details)?;
        let dish = self.store.write(|tx| {
            let mut dish = load::<Dish, _>(tx, &id)?;
            dish.apply_details(details);
            Ok(tx.save(dish))
        })?;
        tracing::info!(dish_id = %id, "dish updated");
        Ok(dish)
    }

    /// Delete a dish no order refers to. Its ingredient list goes with it.
    pub fn delete_dish(&self, id: DishId) -> DomainResult<()> {
        self.store.write(|tx| {
            ensure_exists::<Dish, _>(tx, &id)?;
            if !tx.associations().orders_with_dish(id).is_empty() {
                return Err(DomainError::conflict(
                    "cannot delete dish referenced by orders",
                ));
            }
            tx.associations_mut().forget_dish(id);
            Repository::<Dish>::delete(tx, &id);
            Ok(())
        })?;
        tracing::info!(dish_id = %id, "dish deleted");
        Ok(())
    }

    pub fn create_ingredient(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DomainResult<Ingredient> {
        require_non_empty("ingredient name", name)?;
        let ingredient = self.store.write(|tx| {
            let id = IdSequence::<Ingredient>::next_id(tx);
            Ok(tx.save(Ingredient::new(id, name, description)))
        })?;
        tracing::info!(ingredient_id = %ingredient.id(), name, "ingredient created");
        Ok(ingredient)
    }

    pub fn get_ingredient(&self, id: IngredientId) -> DomainResult<Ingredient> {
        self.store.read(|tx| load::<Ingredient, _>(tx, &id))
    }

    pub fn get_all_ingredients(&self) -> Vec<Ingredient> {
        self.store.read(|tx| Repository::<Ingredient>::find_all(tx))
    }

    /// Delete an ingredient no dish uses.
    pub fn delete_ingredient(&self, id: IngredientId) -> DomainResult<()> {
        self.store.write(|tx| {
            ensure_exists::<Ingredient, _>(tx, &id)?;
            if !tx.associations().dishes_with_ingredient(id).is_empty() {
                return Err(DomainError::conflict(
                    "cannot delete ingredient used by dishes",
                ));
            }
            tx.associations_mut().forget_ingredient(id);
            Repository::<Ingredient>::delete(tx, &id);
            Ok(())
        })?;
        tracing::info!(ingredient_id = %id, "ingredient deleted");
        Ok(())
    }

    /// Put `ingredient` on `dish`. Adding it again is a no-op returning `false`.
    pub fn add_ingredient(&self, dish: DishId, ingredient: IngredientId) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Dish, _>(tx, &dish)?;
            ensure_exists::<Ingredient, _>(tx, &ingredient)?;
            Ok(tx.associations_mut().add_ingredient(dish, ingredient))
        })
    }

    pub fn remove_ingredient(&self, dish: DishId, ingredient: IngredientId) -> DomainResult<bool> {
        self.store.write(|tx| {
            ensure_exists::<Dish, _>(tx, &dish)?;
            ensure_exists::<Ingredient, _>(tx, &ingredient)?;
            Ok(tx.associations_mut().remove_ingredient(dish, ingredient))
        })
    }

    pub fn dish_ingredients(&self, dish: DishId) -> DomainResult<Vec<Ingredient>> {
        self.store.read(|tx| {
            ensure_exists::<Dish, _>(tx, &dish)?;
            Ok(load_all::<Ingredient, _>(
                tx,
                tx.associations().ingredients_of_dish(dish),
            ))
        })
    }

    pub fn ingredient_dishes(&self, ingredient: IngredientId) -> DomainResult<Vec<Dish>> {
        self.store.read(|tx| {
            ensure_exists::<Ingredient, _>(tx, &ingredient)?;
            Ok(load_all::<Dish, _>(
                tx,
                tx.associations().dishes_with_ingredient(ingredient),
            ))
        })
    }
}
