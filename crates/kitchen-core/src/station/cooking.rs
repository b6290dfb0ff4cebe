//! The stove. Cooking runs on its own timer once an ingredient is put on;
//! no chef is tied up, and the stage's tick finishes the job.

use super::{Interaction, InteractionKind};
use crate::config::LevelSettings;
use crate::id::Millis;
use crate::item::{Ingredient, IngredientState, Item};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pot {
    ingredient: Ingredient,
    started_at: Millis,
}

#[derive(Debug, Clone, Default)]
pub struct CookingStation {
    pot: Option<Pot>,
}

impl CookingStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&Ingredient> {
        self.pot.as_ref().map(|p| &p.ingredient)
    }

    pub fn is_cooking(&self) -> bool {
        self.pot
            .as_ref()
            .is_some_and(|p| p.ingredient.state() != IngredientState::Cooked)
    }

    pub fn is_done(&self) -> bool {
        self.pot
            .as_ref()
            .is_some_and(|p| p.ingredient.state() == IngredientState::Cooked)
    }

    /// 1. cookable ingredient onto an empty stove
    /// 2. empty hand takes a finished ingredient
    pub fn interact(&mut self, held: Option<Item>, now: Millis) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Ingredient(ingredient))
                if ingredient.can_be_cooked() && self.pot.is_none() =>
            {
                info!(ingredient = ingredient.name(), "cooking started");
                self.pot = Some(Pot {
                    ingredient,
                    started_at: now,
                });
                (Interaction::Applied(InteractionKind::StartedCooking), None)
            }
            None if self.is_done() => (
                Interaction::Applied(InteractionKind::TookCooked),
                self.pot.take().map(|p| Item::Ingredient(p.ingredient)),
            ),
            other => (Interaction::Ignored, other),
        }
    }

    /// Finish the pot if its time is up. True when it finished on this call.
    pub fn update(&mut self, now: Millis, settings: &LevelSettings) -> bool {
        let Some(pot) = self.pot.as_mut() else {
            return false;
        };
        if pot.ingredient.state() == IngredientState::Cooked
            || now.saturating_sub(pot.started_at) < settings.cook_duration_ms()
        {
            return false;
        }
        let cooked = pot.ingredient.cook();
        if cooked {
            info!(ingredient = pot.ingredient.name(), "cooking complete");
        }
        cooked
    }

    /// 0..=1 share of the cook time elapsed.
    pub fn progress(&self, now: Millis, settings: &LevelSettings) -> f64 {
        let Some(pot) = &self.pot else {
            return 0.0;
        };
        let total = settings.cook_duration_ms();
        if pot.ingredient.state() == IngredientState::Cooked || total == 0 {
            return 1.0;
        }
        now.saturating_sub(pot.started_at).min(total) as f64 / total as f64
    }
}
