//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available to this crate's unit tests and, through the `test-utils`
//! feature, to the other crates in the workspace.

use crate::chef::Chef;
use crate::clock::ManualClock;
use crate::config::LevelSettings;
use crate::grid::Position;
use crate::id::{ChefId, Millis, StationId};
use crate::item::{Ingredient, Plate};
use crate::map::KitchenMap;
use crate::stage::Stage;
use crate::station::InteractCtx;
use slotmap::SlotMap;

// ===========================================================================
// Tracing
// ===========================================================================

/// Install a TRACE-level fmt subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

// ===========================================================================
// Item constructors
// ===========================================================================

pub fn raw(name: &str) -> Ingredient {
    Ingredient::new(name, true)
}

pub fn chopped(name: &str) -> Ingredient {
    let mut ingredient = Ingredient::new(name, true);
    ingredient.chop();
    ingredient
}

/// Chopped, then cooked.
pub fn cooked(name: &str) -> Ingredient {
    let mut ingredient = chopped(name);
    ingredient.cook();
    ingredient
}

pub fn dirty_plate() -> Plate {
    let mut plate = Plate::new();
    plate.mark_dirty();
    plate
}

// ===========================================================================
// Station rig
// ===========================================================================

/// Everything a station needs to be driven without a stage: a chef roster,
/// a station id, settings and a hand-advanced clock.
pub struct InteractRig {
    pub chefs: SlotMap<ChefId, Chef>,
    pub actor: ChefId,
    pub station: StationId,
    pub settings: LevelSettings,
    pub now: Millis,
}

impl Default for InteractRig {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractRig {
    /// One chef, default settings, time zero.
    pub fn new() -> Self {
        let mut chefs = SlotMap::with_key();
        let actor = chefs.insert(Chef::new("Remy", Position::new(0, 0)));
        let mut stations: SlotMap<StationId, ()> = SlotMap::with_key();
        let station = stations.insert(());
        Self {
            chefs,
            actor,
            station,
            settings: LevelSettings::default(),
            now: 0,
        }
    }

    pub fn with_settings(settings: LevelSettings) -> Self {
        Self {
            settings,
            ..Self::new()
        }
    }

    pub fn add_chef(&mut self, name: &str) -> ChefId {
        let x = i32::try_from(self.chefs.len()).unwrap_or(i32::MAX);
        self.chefs.insert(Chef::new(name, Position::new(x, 0)))
    }

    pub fn advance_ms(&mut self, ms: Millis) {
        self.now += ms;
    }

    /// Context with the default chef acting.
    pub fn ctx(&mut self) -> InteractCtx<'_> {
        self.ctx_as(self.actor)
    }

    pub fn ctx_as(&mut self, actor: ChefId) -> InteractCtx<'_> {
        InteractCtx {
            station: self.station,
            actor,
            chefs: &mut self.chefs,
            settings: &self.settings,
            now: self.now,
        }
    }
}

// ===========================================================================
// Stage builders
// ===========================================================================

/// An open floor of the given size with default settings, driven by a
/// manual clock. The returned clock shares time with the stage's.
pub fn open_stage(width: u32, height: u32) -> (Stage, ManualClock) {
    stage_with(KitchenMap::new(width, height), LevelSettings::default())
}

pub fn stage_with(map: KitchenMap, settings: LevelSettings) -> (Stage, ManualClock) {
    let clock = ManualClock::new();
    let stage = Stage::new(map, settings, Box::new(clock.clone()));
    (stage, clock)
}
