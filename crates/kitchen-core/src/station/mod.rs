//! Stations and the interaction protocol.
//!
//! Every station answers a single entry point, [`Station::interact`]. The
//! chef's hand is lent to the station for the duration of the call: the
//! station receives the held item by value and returns whatever the chef
//! should be holding afterwards. Each variant checks an ordered list of
//! mutually exclusive cases (a `match` with guards, evaluated top to
//! bottom); the first case that matches runs and nothing falls through.
//! When no case matches, the item goes straight back and the result is
//! [`Interaction::Ignored`].
//!
//! Dispatch is by enum match, no trait objects.

pub mod cooking;
pub mod counters;
pub mod cutting;
pub mod plate_storage;
pub mod plating;
pub mod washing;

use crate::busy::{ActionKind, Completion};
use crate::chef::Chef;
use crate::config::LevelSettings;
use crate::grid::Position;
use crate::id::{ChefId, Millis, StationId};
use crate::item::{Dish, Item, Plate};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::warn;

pub use cooking::CookingStation;
pub use counters::{IngredientCrate, ServingCounter, Trash};
pub use cutting::{CutState, CuttingStation, ProgressUpdate};
pub use plate_storage::PlateStorage;
pub use plating::{AssemblyStation, PlatingArea};
pub use washing::WashingStation;

// ---------------------------------------------------------------------------
// Interaction results
// ---------------------------------------------------------------------------

/// Which case of a station's protocol ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InteractionKind {
    PlacedPlate,
    AddedIngredient,
    TookPlate,
    TookIngredient,
    StartedCut,
    ResumedCut,
    TookUnfinished,
    TookStoredPlate,
    SpawnedIngredient,
    StartedCooking,
    TookCooked,
    StartedWash,
    ResumedWash,
    TookCleanPlate,
    Trashed,
    EmptiedPlate,
    ServedDish,
}

/// Outcome of one interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// A case matched and ran.
    Applied(InteractionKind),
    /// A dish was handed in. The stage records the dish and sends the plate
    /// back to storage.
    Served { dish: Dish, plate: Plate },
    /// No case matched; nothing changed.
    Ignored,
}

impl Interaction {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Interaction::Ignored)
    }

    pub fn kind(&self) -> Option<InteractionKind> {
        match self {
            Interaction::Applied(kind) => Some(*kind),
            Interaction::Served { .. } => Some(InteractionKind::ServedDish),
            Interaction::Ignored => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Interaction context
// ---------------------------------------------------------------------------

/// Everything a station may touch while a chef interacts with it.
///
/// The acting chef's hand has already been emptied into the `held`
/// argument of `interact`; `chefs` is there for busy actions (starting one
/// on the actor, or interrupting another chef bound to the station).
pub struct InteractCtx<'a> {
    pub station: StationId,
    pub actor: ChefId,
    pub chefs: &'a mut SlotMap<ChefId, Chef>,
    pub settings: &'a LevelSettings,
    pub now: Millis,
}

impl InteractCtx<'_> {
    /// Start a busy action on the acting chef. False if it could not start,
    /// in which case the station must leave its state untouched.
    pub(crate) fn start_actor_busy(
        &mut self,
        kind: ActionKind,
        duration_secs: u32,
        completion: Completion,
    ) -> bool {
        let Some(chef) = self.chefs.get_mut(self.actor) else {
            warn!(actor = ?self.actor, "acting chef is not on the stage");
            return false;
        };
        match chef.start_busy(kind, duration_secs, self.now, completion) {
            Ok(()) => true,
            Err(err) => {
                warn!(chef = chef.name(), %err, "busy action refused");
                false
            }
        }
    }

    /// Whether `chef` is currently busy with `kind` at this station.
    pub(crate) fn is_working_here(&self, chef: ChefId, kind: ActionKind) -> bool {
        self.chefs
            .get(chef)
            .is_some_and(|c| c.busy().is_working_at(kind, self.station))
    }
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// Type tag for presentation and lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    Cutting,
    PlateStorage,
    Assembly,
    Cooking,
    Serving,
    Washing,
    IngredientCrate,
    Trash,
}

/// Variant-specific slot state.
#[derive(Debug, Clone)]
pub enum StationKind {
    Cutting(CuttingStation),
    PlateStorage(PlateStorage),
    Assembly(AssemblyStation),
    Cooking(CookingStation),
    Serving(ServingCounter),
    Washing(WashingStation),
    IngredientCrate(IngredientCrate),
    Trash(Trash),
}

/// A fixed station on the grid.
#[derive(Debug, Clone)]
pub struct Station {
    position: Position,
    kind: StationKind,
}

impl Station {
    pub fn new(position: Position, kind: StationKind) -> Self {
        Self { position, kind }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> &StationKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut StationKind {
        &mut self.kind
    }

    pub fn station_type(&self) -> StationType {
        match &self.kind {
            StationKind::Cutting(_) => StationType::Cutting,
            StationKind::PlateStorage(_) => StationType::PlateStorage,
            StationKind::Assembly(_) => StationType::Assembly,
            StationKind::Cooking(_) => StationType::Cooking,
            StationKind::Serving(_) => StationType::Serving,
            StationKind::Washing(_) => StationType::Washing,
            StationKind::IngredientCrate(_) => StationType::IngredientCrate,
            StationKind::Trash(_) => StationType::Trash,
        }
    }

    /// Run the station's interaction protocol. Returns the outcome and what
    /// the chef holds afterwards.
    pub fn interact(
        &mut self,
        held: Option<Item>,
        ctx: &mut InteractCtx<'_>,
    ) -> (Interaction, Option<Item>) {
        match &mut self.kind {
            StationKind::Cutting(s) => s.interact(held, ctx),
            StationKind::PlateStorage(s) => s.interact(held),
            StationKind::Assembly(s) => s.interact(held),
            StationKind::Cooking(s) => s.interact(held, ctx.now),
            StationKind::Serving(s) => s.interact(held),
            StationKind::Washing(s) => s.interact(held, ctx),
            StationKind::IngredientCrate(s) => s.interact(held),
            StationKind::Trash(s) => s.interact(held),
        }
    }

    pub fn as_cutting(&self) -> Option<&CuttingStation> {
        match &self.kind {
            StationKind::Cutting(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cutting_mut(&mut self) -> Option<&mut CuttingStation> {
        match &mut self.kind {
            StationKind::Cutting(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_plate_storage(&self) -> Option<&PlateStorage> {
        match &self.kind {
            StationKind::PlateStorage(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_plate_storage_mut(&mut self) -> Option<&mut PlateStorage> {
        match &mut self.kind {
            StationKind::PlateStorage(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cooking(&self) -> Option<&CookingStation> {
        match &self.kind {
            StationKind::Cooking(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_cooking_mut(&mut self) -> Option<&mut CookingStation> {
        match &mut self.kind {
            StationKind::Cooking(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_washing(&self) -> Option<&WashingStation> {
        match &self.kind {
            StationKind::Washing(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_washing_mut(&mut self) -> Option<&mut WashingStation> {
        match &mut self.kind {
            StationKind::Washing(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_assembly(&self) -> Option<&AssemblyStation> {
        match &self.kind {
            StationKind::Assembly(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_serving(&self) -> Option<&ServingCounter> {
        match &self.kind {
            StationKind::Serving(s) => Some(s),
            _ => None,
        }
    }
}
