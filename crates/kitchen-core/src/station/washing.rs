//! The sink. Washing a dirty plate keeps the chef busy; clean plates pile
//! up on a rack beside it.

use super::{InteractCtx, Interaction, InteractionKind};
use crate::busy::{ActionKind, Completion};
use crate::id::ChefId;
use crate::item::{Item, Plate};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Basin {
    plate: Plate,
    /// Who is washing it. Lookup only; may be stale.
    washer: Option<ChefId>,
}

#[derive(Debug, Clone, Default)]
pub struct WashingStation {
    basin: Option<Basin>,
    rack: Vec<Plate>,
}

impl WashingStation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plate_in_sink(&self) -> Option<&Plate> {
        self.basin.as_ref().map(|b| &b.plate)
    }

    pub fn washer(&self) -> Option<ChefId> {
        self.basin.as_ref().and_then(|b| b.washer)
    }

    pub fn clean_plates(&self) -> usize {
        self.rack.len()
    }

    /// Washed plates, oldest first.
    pub fn rack(&self) -> &[Plate] {
        &self.rack
    }

    /// 1. dirty plate into an empty sink: start washing
    /// 2. empty hand takes a clean plate off the rack
    /// 3. empty hand restarts an abandoned wash
    pub fn interact(
        &mut self,
        held: Option<Item>,
        ctx: &mut InteractCtx<'_>,
    ) -> (Interaction, Option<Item>) {
        match held {
            Some(Item::Plate(plate)) if !plate.is_clean() && self.basin.is_none() => {
                if !self.start_wash(ctx) {
                    return (Interaction::Ignored, Some(Item::Plate(plate)));
                }
                self.basin = Some(Basin {
                    plate,
                    washer: Some(ctx.actor),
                });
                (Interaction::Applied(InteractionKind::StartedWash), None)
            }
            None if !self.rack.is_empty() => (
                Interaction::Applied(InteractionKind::TookCleanPlate),
                self.rack.pop().map(Item::Plate),
            ),
            None if self.basin.is_some() && !self.wash_in_progress(ctx) => {
                if !self.start_wash(ctx) {
                    return (Interaction::Ignored, None);
                }
                if let Some(basin) = self.basin.as_mut() {
                    basin.washer = Some(ctx.actor);
                }
                (Interaction::Applied(InteractionKind::ResumedWash), None)
            }
            other => (Interaction::Ignored, other),
        }
    }

    fn wash_in_progress(&self, ctx: &InteractCtx<'_>) -> bool {
        self.washer()
            .is_some_and(|w| ctx.is_working_here(w, ActionKind::Washing))
    }

    fn start_wash(&self, ctx: &mut InteractCtx<'_>) -> bool {
        let secs = ctx.settings.wash_duration_secs;
        let started = ctx.start_actor_busy(
            ActionKind::Washing,
            secs,
            Completion::FinishWash {
                station: ctx.station,
            },
        );
        if started {
            info!(secs, "washing started");
        }
        started
    }

    /// Completion of a wash by `chef_id`. False if that chef is not the one
    /// washing.
    pub fn finish_wash(&mut self, chef_id: ChefId) -> bool {
        if self.washer() != Some(chef_id) {
            return false;
        }
        let Some(Basin { mut plate, .. }) = self.basin.take() else {
            return false;
        };
        plate.wash();
        self.rack.push(plate);
        info!(rack = self.rack.len(), "plate washed");
        true
    }
}
