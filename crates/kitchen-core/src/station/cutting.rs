//! The cutting board: a resumable timed job plus a plating area.
//!
//! # Job states
//!
//! - **Idle** -- nothing bound.
//! - **Cutting** -- an ingredient is on the board and bound to the chef
//!   working it. Progress is reconciled against the clock on every tick.
//! - **Paused** -- the bound chef stopped before finishing. The binding is
//!   released and the ingredient waits on the board.
//! - **Lifted** -- the unfinished ingredient was taken off the board. Its
//!   saved progress stays here; putting the same ingredient back resumes
//!   the cut, anything else starts over.
//!
//! Progress is kept in milliseconds and never exceeds the cut duration.
//! A resumed cut runs for the full duration minus the whole seconds already
//! saved.
//!
//! # Case order
//!
//! 1. clean plate onto an empty plate slot
//! 2. chopped ingredient onto the finished pile
//! 3. take the plate (nothing waiting for it)
//! 4. take the oldest finished ingredient (no plate)
//! 5. raw choppable ingredient onto a free board: resume if it is the
//!    lifted ingredient, otherwise start cutting
//! 6. empty hand on an unfinished ingredient: take it off the board,
//!    interrupting its cutter first

use super::plating::{PlatingArea, is_chopped};
use super::{InteractCtx, Interaction, InteractionKind};
use crate::busy::{ActionKind, Completion};
use crate::chef::Chef;
use crate::config::LevelSettings;
use crate::id::{ChefId, Millis, StationId};
use crate::item::{Ingredient, Item, Plate};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CutState {
    #[default]
    Idle,
    Cutting {
        ingredient: Ingredient,
        chef: ChefId,
        saved_ms: Millis,
        /// When `saved_ms` was last brought up to date.
        mark: Millis,
    },
    Paused {
        ingredient: Ingredient,
        saved_ms: Millis,
    },
    Lifted {
        /// What was taken, to recognise it when it comes back.
        ingredient: Ingredient,
        saved_ms: Millis,
    },
}

/// What a call to [`CuttingStation::save_progress`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUpdate {
    /// No job is bound to that chef.
    NotBound,
    /// The chef is still cutting; saved progress was brought up to date.
    Advanced { saved_ms: Millis },
    /// The chef stopped; the job is paused and open to anyone.
    Released { saved_ms: Millis },
    /// The chef stopped before any progress was saved; the binding stays.
    Unchanged,
}

#[derive(Debug, Clone, Default)]
pub struct CuttingStation {
    state: CutState,
    plating: PlatingArea,
}

impl CuttingStation {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Queries --

    pub fn state(&self) -> &CutState {
        &self.state
    }

    /// The unfinished ingredient on the board, if any.
    pub fn ingredient_being_cut(&self) -> Option<&Ingredient> {
        match &self.state {
            CutState::Idle | CutState::Lifted { .. } => None,
            CutState::Cutting { ingredient, .. } | CutState::Paused { ingredient, .. } => {
                Some(ingredient)
            }
        }
    }

    /// The chef the job is bound to, if any.
    pub fn bound_chef(&self) -> Option<ChefId> {
        match &self.state {
            CutState::Cutting { chef, .. } => Some(*chef),
            CutState::Idle | CutState::Paused { .. } | CutState::Lifted { .. } => None,
        }
    }

    pub fn saved_progress_ms(&self) -> Millis {
        match &self.state {
            CutState::Idle => 0,
            CutState::Cutting { saved_ms, .. }
            | CutState::Paused { saved_ms, .. }
            | CutState::Lifted { saved_ms, .. } => *saved_ms,
        }
    }

    /// Saved progress as a 0..=1 fraction of the cut duration.
    pub fn progress_fraction(&self, settings: &LevelSettings) -> f64 {
        let total = settings.cut_duration_ms();
        if self.ingredient_being_cut().is_none() || total == 0 {
            return 0.0;
        }
        self.saved_progress_ms() as f64 / total as f64
    }

    pub fn plate(&self) -> Option<&Plate> {
        self.plating.plate()
    }

    pub fn has_plate(&self) -> bool {
        self.plating.has_plate()
    }

    /// Chopped ingredients waiting on the board, oldest first.
    pub fn finished(&self) -> &[Ingredient] {
        self.plating.pending()
    }

    // -- Interaction --

    pub fn interact(
        &mut self,
        held: Option<Item>,
        ctx: &mut InteractCtx<'_>,
    ) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Plate(plate)) if plate.is_clean() && !self.plating.has_plate() => {
                self.plating.place_plate(plate);
                debug!("plate placed on cutting board");
                (Interaction::Applied(InteractionKind::PlacedPlate), None)
            }
            Some(Item::Ingredient(ingredient)) if is_chopped(&ingredient) => {
                debug!(ingredient = ingredient.name(), "chopped ingredient stacked");
                self.plating.add(ingredient);
                (Interaction::Applied(InteractionKind::AddedIngredient), None)
            }
            None if self.plating.can_take_plate() => (
                Interaction::Applied(InteractionKind::TookPlate),
                self.plating.take_plate().map(Item::Plate),
            ),
            None if self.plating.can_take_ingredient() => (
                Interaction::Applied(InteractionKind::TookIngredient),
                self.plating.take_ingredient().map(Item::Ingredient),
            ),
            Some(Item::Ingredient(ingredient))
                if ingredient.can_be_chopped() && self.ingredient_being_cut().is_none() =>
            {
                self.start_cut(ingredient, ctx)
            }
            None if self.ingredient_being_cut().is_some() => self.take_unfinished(ctx),
            other => (Interaction::Ignored, other),
        }
    }

    /// Start a cut, or resume one if `ingredient` is the one lifted off.
    fn start_cut(
        &mut self,
        ingredient: Ingredient,
        ctx: &mut InteractCtx<'_>,
    ) -> (Interaction, Option<Item>) {
        let resumed_from = match &self.state {
            CutState::Lifted {
                ingredient: lifted,
                saved_ms,
            } if *lifted == ingredient => Some(*saved_ms),
            _ => None,
        };
        let saved_ms = resumed_from.unwrap_or(0);
        let saved_secs = u32::try_from(saved_ms / 1000).unwrap_or(u32::MAX);
        let secs = ctx.settings.cut_duration_secs.saturating_sub(saved_secs);
        let completion = Completion::FinishCut {
            station: ctx.station,
        };
        if !ctx.start_actor_busy(ActionKind::Cutting, secs, completion) {
            return (Interaction::Ignored, Some(Item::Ingredient(ingredient)));
        }

        let kind = match resumed_from {
            Some(saved_ms) => {
                info!(ingredient = ingredient.name(), secs, saved_ms, "cut resumed");
                InteractionKind::ResumedCut
            }
            None => {
                if let CutState::Lifted { ingredient: lifted, .. } = &self.state {
                    debug!(lifted = lifted.name(), "lifted cut abandoned");
                }
                info!(ingredient = ingredient.name(), secs, "cut started");
                InteractionKind::StartedCut
            }
        };
        self.state = CutState::Cutting {
            ingredient,
            chef: ctx.actor,
            saved_ms,
            mark: ctx.now,
        };
        (Interaction::Applied(kind), None)
    }

    fn take_unfinished(&mut self, ctx: &mut InteractCtx<'_>) -> (Interaction, Option<Item>) {
        let active_cutter = self
            .bound_chef()
            .filter(|&cutter| ctx.is_working_here(cutter, ActionKind::Cutting));
        if let Some(cutter) = active_cutter {
            // Bank the elapsed time before the scheduler forgets it.
            let chef = ctx.chefs.get(cutter);
            self.save_progress(ctx.station, cutter, chef, ctx.now, ctx.settings);
            if let Some(chef) = ctx.chefs.get_mut(cutter) {
                chef.interrupt_busy();
                info!(chef = chef.name(), "cutting interrupted");
            }
        }
        match std::mem::take(&mut self.state) {
            CutState::Cutting {
                ingredient,
                saved_ms,
                ..
            }
            | CutState::Paused {
                ingredient,
                saved_ms,
            } => {
                info!(
                    ingredient = ingredient.name(),
                    saved_ms,
                    "unfinished ingredient taken off the board"
                );
                if saved_ms > 0 {
                    self.state = CutState::Lifted {
                        ingredient: ingredient.clone(),
                        saved_ms,
                    };
                }
                (
                    Interaction::Applied(InteractionKind::TookUnfinished),
                    Some(Item::Ingredient(ingredient)),
                )
            }
            other => {
                self.state = other;
                (Interaction::Ignored, None)
            }
        }
    }

    // -- Reconciliation --

    /// Bring the job bound to `chef_id` up to date with the clock.
    ///
    /// Safe to call every tick. While the chef is still cutting here, saved
    /// progress grows by the time since the last call, clamped to the cut
    /// duration. Once the chef has stopped with progress on the board, the
    /// job is paused and the binding dropped.
    pub fn save_progress(
        &mut self,
        station: StationId,
        chef_id: ChefId,
        chef: Option<&Chef>,
        now: Millis,
        settings: &LevelSettings,
    ) -> ProgressUpdate {
        let total = settings.cut_duration_ms();
        let CutState::Cutting {
            chef: bound,
            saved_ms,
            mark,
            ..
        } = &mut self.state
        else {
            return ProgressUpdate::NotBound;
        };
        if *bound != chef_id {
            return ProgressUpdate::NotBound;
        }

        let working = chef.is_some_and(|c| c.busy().is_working_at(ActionKind::Cutting, station));
        if working {
            *saved_ms = (*saved_ms + now.saturating_sub(*mark)).min(total);
            *mark = now;
            return ProgressUpdate::Advanced {
                saved_ms: *saved_ms,
            };
        }
        if *saved_ms == 0 {
            return ProgressUpdate::Unchanged;
        }

        let saved_ms = *saved_ms;
        if let CutState::Cutting { ingredient, .. } = std::mem::take(&mut self.state) {
            info!(
                ingredient = ingredient.name(),
                saved_ms, total, "cut paused, progress saved"
            );
            self.state = CutState::Paused {
                ingredient,
                saved_ms,
            };
        }
        ProgressUpdate::Released { saved_ms }
    }

    /// Completion of a cut started by `chef_id`: the ingredient is chopped
    /// and moves to the finished pile. False if no such job is bound.
    pub fn finish_cut(&mut self, chef_id: ChefId) -> bool {
        if self.bound_chef() != Some(chef_id) {
            return false;
        }
        let CutState::Cutting { mut ingredient, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        ingredient.chop();
        info!(ingredient = ingredient.name(), "cut complete");
        self.plating.add(ingredient);
        true
    }
}
