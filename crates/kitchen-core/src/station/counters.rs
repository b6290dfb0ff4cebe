//! Stations that act instantly: ingredient crates, the serving hatch and
//! the bin.

use super::{Interaction, InteractionKind};
use crate::item::{Ingredient, Item};
use tracing::info;

// ---------------------------------------------------------------------------
// Ingredient crate
// ---------------------------------------------------------------------------

/// An endless supply of one raw ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientCrate {
    ingredient: String,
    choppable: bool,
}

impl IngredientCrate {
    pub fn new(ingredient: impl Into<String>, choppable: bool) -> Self {
        Self {
            ingredient: ingredient.into(),
            choppable,
        }
    }

    pub fn ingredient(&self) -> &str {
        &self.ingredient
    }

    pub fn interact(&mut self, held: Option<Item>) -> (Interaction, Option<Item>) {
        match held {
            None => (
                Interaction::Applied(InteractionKind::SpawnedIngredient),
                Some(Item::Ingredient(Ingredient::new(
                    self.ingredient.clone(),
                    self.choppable,
                ))),
            ),
            other => (Interaction::Ignored, other),
        }
    }
}

// ---------------------------------------------------------------------------
// Serving counter
// ---------------------------------------------------------------------------

/// Takes plated food. The plate goes back to storage via the stage.
#[derive(Debug, Clone, Default)]
pub struct ServingCounter {
    served: u32,
}

impl ServingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dishes handed in here so far.
    pub fn served(&self) -> u32 {
        self.served
    }

    pub fn interact(&mut self, held: Option<Item>) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Plate(mut plate)) if plate.is_clean() && plate.has_food() => {
                match plate.take_dish() {
                    Some(dish) => {
                        self.served += 1;
                        info!(%dish, "dish served");
                        (Interaction::Served { dish, plate }, None)
                    }
                    None => (Interaction::Ignored, Some(Item::Plate(plate))),
                }
            }
            other => (Interaction::Ignored, other),
        }
    }
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trash;

impl Trash {
    /// 1. ingredient: thrown away
    /// 2. plate with a dish: the dish is thrown away, the plate kept
    pub fn interact(&mut self, held: Option<Item>) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Ingredient(ingredient)) => {
                info!(ingredient = ingredient.name(), "ingredient trashed");
                (Interaction::Applied(InteractionKind::Trashed), None)
            }
            Some(Item::Plate(mut plate)) if plate.dish().is_some() => {
                plate.take_dish();
                (
                    Interaction::Applied(InteractionKind::EmptiedPlate),
                    Some(Item::Plate(plate)),
                )
            }
            other => (Interaction::Ignored, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{IngredientState, Plate};
    use crate::test_utils::chopped;

    #[test]
    fn crate_spawns_raw_ingredient() {
        let mut tomatoes = IngredientCrate::new("tomato", true);
        let (outcome, back) = tomatoes.interact(None);
        assert_eq!(outcome, Interaction::Applied(InteractionKind::SpawnedIngredient));
        let item = back.unwrap();
        let tomato = item.as_ingredient().unwrap();
        assert_eq!(tomato.name(), "tomato");
        assert_eq!(tomato.state(), IngredientState::Raw);
        assert!(tomato.is_choppable());
    }

    #[test]
    fn crate_ignores_full_hand() {
        let mut tomatoes = IngredientCrate::new("tomato", true);
        let plate = Item::from(Plate::new());
        let (outcome, back) = tomatoes.interact(Some(plate.clone()));
        assert!(outcome.is_ignored());
        assert_eq!(back, Some(plate));
    }

    #[test]
    fn serving_takes_dish_and_returns_plate_to_caller() {
        let mut hatch = ServingCounter::new();
        let mut plate = Plate::new();
        plate.add_to_dish(chopped("tomato")).unwrap();
        let (outcome, back) = hatch.interact(Some(Item::from(plate)));
        assert!(back.is_none());
        match outcome {
            Interaction::Served { dish, plate } => {
                assert_eq!(dish.component_names(), vec!["tomato"]);
                assert!(plate.dish().is_none());
            }
            other => panic!("expected Served, got {other:?}"),
        }
        assert_eq!(hatch.served(), 1);
    }

    #[test]
    fn serving_ignores_empty_plate() {
        let mut hatch = ServingCounter::new();
        let plate = Item::from(Plate::new());
        let (outcome, back) = hatch.interact(Some(plate.clone()));
        assert!(outcome.is_ignored());
        assert_eq!(back, Some(plate));
        assert_eq!(hatch.served(), 0);
    }

    #[test]
    fn trash_discards_ingredient_and_empties_plate() {
        let mut bin = Trash;
        let (outcome, back) = bin.interact(Some(Item::from(chopped("fish"))));
        assert_eq!(outcome, Interaction::Applied(InteractionKind::Trashed));
        assert!(back.is_none());

        let mut plate = Plate::new();
        plate.add_to_dish(chopped("fish")).unwrap();
        let (outcome, back) = bin.interact(Some(Item::from(plate)));
        assert_eq!(outcome, Interaction::Applied(InteractionKind::EmptiedPlate));
        let plate = back.unwrap();
        assert!(plate.as_plate().unwrap().dish().is_none());
        assert!(plate.as_plate().unwrap().is_clean());

        let (outcome, back) = bin.interact(None);
        assert!(outcome.is_ignored());
        assert!(back.is_none());
    }
}
