//! The chef actor: a position, a facing, one hand and a busy state.

use crate::busy::{ActionKind, BusyAction, BusyError, BusyState, Completion};
use crate::grid::{Direction, Position};
use crate::id::Millis;
use crate::item::Item;

#[derive(Debug, Clone)]
pub struct Chef {
    name: String,
    position: Position,
    facing: Direction,
    held: Option<Item>,
    busy: BusyState,
}

impl Chef {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            position,
            facing: Direction::default(),
            held: None,
            busy: BusyState::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    /// The cell the chef is facing.
    pub fn front(&self) -> Position {
        self.position.step(self.facing)
    }

    // -- Movement --

    /// Step one cell and face that way. Collision is the stage's job.
    pub(crate) fn move_to(&mut self, direction: Direction) {
        self.position = self.position.step(direction);
        self.facing = direction;
    }

    // -- Inventory --

    pub fn held(&self) -> Option<&Item> {
        self.held.as_ref()
    }

    pub fn has_item(&self) -> bool {
        self.held.is_some()
    }

    /// Put an item in the chef's hand. A full hand gives the item back.
    pub fn pick_up(&mut self, item: Item) -> Result<(), Item> {
        if self.held.is_some() {
            return Err(item);
        }
        self.held = Some(item);
        Ok(())
    }

    /// Empty the chef's hand.
    pub fn take_item(&mut self) -> Option<Item> {
        self.held.take()
    }

    pub(crate) fn set_held(&mut self, item: Option<Item>) {
        self.held = item;
    }

    // -- Busy actions --

    pub fn busy(&self) -> &BusyState {
        &self.busy
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn current_action(&self) -> Option<ActionKind> {
        self.busy.current_action()
    }

    pub fn start_busy(
        &mut self,
        kind: ActionKind,
        duration_secs: u32,
        now: Millis,
        completion: Completion,
    ) -> Result<(), BusyError> {
        self.busy.start(kind, duration_secs, now, completion)
    }

    pub fn interrupt_busy(&mut self) -> Option<BusyAction> {
        self.busy.interrupt()
    }

    pub(crate) fn poll_busy(&mut self, now: Millis) -> Option<Completion> {
        self.busy.poll(now)
    }
}
