//! Read-only snapshots of stage state.
//!
//! Presentation code reads these instead of borrowing into the stage. All
//! types are owned copies.

use crate::busy::ActionKind;
use crate::grid::{Direction, Position};
use crate::id::{ChefId, StationId};
use crate::item::Item;
use crate::station::StationType;

// ---------------------------------------------------------------------------
// Chef snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ChefSnapshot {
    pub id: ChefId,
    pub name: String,
    pub position: Position,
    pub facing: Direction,
    pub held: Option<Item>,
    /// The timed action in progress, if any.
    pub action: Option<ActionKind>,
    /// Progress of `action` as a 0..1 fraction. 0 when idle.
    pub progress: f64,
    /// Whether this is the chef the player currently controls.
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Station snapshot
// ---------------------------------------------------------------------------

/// A read-only view of one station.
///
/// `contents` lists every item the station holds, in the order a player
/// would see them: the plate first, then the items stacked beside it, then
/// whatever is being worked on. Plate storage lists its stack top first.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSnapshot {
    pub id: StationId,
    pub position: Position,
    pub station_type: StationType,
    pub contents: Vec<Item>,
    /// Job progress as a 0..1 fraction (cutting, cooking, washing).
    pub progress: f64,
    /// The chef a job is bound to, if any.
    pub worker: Option<ChefId>,
}
