//! Plating: a plate slot plus a queue of prepared ingredients waiting for
//! it. Shared by the assembly counter and the cutting board.
//!
//! Whenever a plate is present, every waiting ingredient is folded into its
//! dish straight away, so "plate present" implies "nothing waiting".

use super::{Interaction, InteractionKind};
use crate::item::{Ingredient, IngredientState, Item, Plate};

#[derive(Debug, Clone, Default)]
pub struct PlatingArea {
    plate: Option<Plate>,
    pending: Vec<Ingredient>,
}

impl PlatingArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plate(&self) -> Option<&Plate> {
        self.plate.as_ref()
    }

    pub fn has_plate(&self) -> bool {
        self.plate.is_some()
    }

    /// Ingredients waiting for a plate, oldest first.
    pub fn pending(&self) -> &[Ingredient] {
        &self.pending
    }

    /// Put a plate down. The caller checks the slot is free.
    pub(crate) fn place_plate(&mut self, plate: Plate) {
        self.plate = Some(plate);
        self.fold();
    }

    pub(crate) fn add(&mut self, ingredient: Ingredient) {
        self.pending.push(ingredient);
        self.fold();
    }

    pub(crate) fn can_take_plate(&self) -> bool {
        self.plate.is_some() && self.pending.is_empty()
    }

    pub(crate) fn can_take_ingredient(&self) -> bool {
        self.plate.is_none() && !self.pending.is_empty()
    }

    pub(crate) fn take_plate(&mut self) -> Option<Plate> {
        if !self.can_take_plate() {
            return None;
        }
        self.plate.take()
    }

    pub(crate) fn take_ingredient(&mut self) -> Option<Ingredient> {
        if !self.can_take_ingredient() {
            return None;
        }
        Some(self.pending.remove(0))
    }

    /// Move every waiting ingredient onto the plate's dish, in order.
    fn fold(&mut self) {
        let Some(plate) = self.plate.as_mut() else {
            return;
        };
        let mut refused = Vec::new();
        for ingredient in self.pending.drain(..) {
            if let Err(ingredient) = plate.add_to_dish(ingredient) {
                refused.push(ingredient);
            }
        }
        self.pending = refused;
    }
}

// ---------------------------------------------------------------------------
// Assembly counter
// ---------------------------------------------------------------------------

/// A counter for putting dishes together from prepared ingredients.
#[derive(Debug, Clone, Default)]
pub struct AssemblyStation {
    area: PlatingArea,
}

impl AssemblyStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self) -> &PlatingArea {
        &self.area
    }

    pub fn interact(&mut self, held: Option<Item>) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Plate(plate)) if plate.is_clean() && !self.area.has_plate() => {
                self.area.place_plate(plate);
                (Interaction::Applied(InteractionKind::PlacedPlate), None)
            }
            Some(Item::Ingredient(ingredient)) if ingredient.is_prepared() => {
                self.area.add(ingredient);
                (Interaction::Applied(InteractionKind::AddedIngredient), None)
            }
            None if self.area.can_take_plate() => (
                Interaction::Applied(InteractionKind::TookPlate),
                self.area.take_plate().map(Item::Plate),
            ),
            None if self.area.can_take_ingredient() => (
                Interaction::Applied(InteractionKind::TookIngredient),
                self.area.take_ingredient().map(Item::Ingredient),
            ),
            other => (Interaction::Ignored, other),
        }
    }
}

/// Chopped only: what the cutting board lets a chef stack.
pub(crate) fn is_chopped(ingredient: &Ingredient) -> bool {
    ingredient.state() == IngredientState::Chopped
}
