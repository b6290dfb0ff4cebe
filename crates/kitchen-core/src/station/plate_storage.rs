//! Plate storage: a last-in-first-out stack of plates.
//!
//! Nothing can be put down here by hand. Used plates come back through
//! [`PlateStorage::push_dirty_plate`], called by the serving flow, and land
//! on top of whatever is already stacked.

use super::{Interaction, InteractionKind};
use crate::item::{Item, Plate};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PlateStorage {
    /// Bottom first; the top of the stack is the last element.
    stack: Vec<Plate>,
}

impl PlateStorage {
    /// Storage stocked with `clean_plates` clean plates.
    pub fn new(clean_plates: u32) -> Self {
        let mut storage = Self::default();
        storage.restock(clean_plates);
        storage
    }

    /// Replace the contents with `clean_plates` clean plates.
    pub fn restock(&mut self, clean_plates: u32) {
        self.stack = (0..clean_plates).map(|_| Plate::new()).collect();
    }

    /// An empty hand takes the top plate, clean or dirty. Anything else is
    /// ignored.
    pub fn interact(&mut self, held: Option<Item>) -> (Interaction, Option<Item>) {
        match held {
            None if !self.stack.is_empty() => {
                let plate = self.stack.pop();
                debug!(remaining = self.stack.len(), "plate taken from storage");
                (
                    Interaction::Applied(InteractionKind::TookStoredPlate),
                    plate.map(Item::Plate),
                )
            }
            other => (Interaction::Ignored, other),
        }
    }

    /// Return a used plate. It is marked dirty and loses any dish, whatever
    /// state it arrives in.
    pub fn push_dirty_plate(&mut self, mut plate: Plate) {
        plate.mark_dirty();
        self.stack.push(plate);
        debug!(total = self.stack.len(), "dirty plate returned to storage");
    }

    pub fn top(&self) -> Option<&Plate> {
        self.stack.last()
    }

    /// Every plate, top of the stack first.
    pub fn plates(&self) -> impl Iterator<Item = &Plate> + '_ {
        self.stack.iter().rev()
    }

    pub fn has_dirty_plate_on_top(&self) -> bool {
        self.top().is_some_and(|p| !p.is_clean())
    }

    /// Clean plates anywhere in the stack.
    pub fn clean_count(&self) -> usize {
        self.stack.iter().filter(|p| p.is_clean()).count()
    }

    /// Dirty plates anywhere in the stack.
    pub fn dirty_count(&self) -> usize {
        self.stack.len() - self.clean_count()
    }

    /// Dirty plates sitting above the topmost clean one: how many pops it
    /// takes to reach a clean plate.
    pub fn dirty_on_top(&self) -> usize {
        self.stack.iter().rev().take_while(|p| !p.is_clean()).count()
    }

    pub fn total(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn has_clean_plates(&self) -> bool {
        self.clean_count() > 0
    }
}
