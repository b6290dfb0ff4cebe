//! Kitchen events, buffered for the presentation layer.
//!
//! The stage records an event for every observable change (and for every
//! ignored interaction, as a diagnostic). Events sit in a fixed-capacity
//! ring buffer until drained; when it is full, the oldest are dropped.
//! Kinds can be suppressed, in which case they are never recorded.

use crate::busy::ActionKind;
use crate::grid::{Direction, Position};
use crate::id::{ChefId, Millis, StationId};
use crate::station::InteractionKind;
use std::collections::HashSet;

/// Ring buffer capacity used by [`EventLog::default`].
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Something that happened on the stage. All events carry the tick at which
/// they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KitchenEvent {
    // -- Lifecycle --
    StageStarted {
        tick: u64,
    },
    StagePaused {
        tick: u64,
    },
    StageResumed {
        tick: u64,
    },
    StageFinished {
        tick: u64,
    },
    ActiveChefChanged {
        chef: ChefId,
        tick: u64,
    },

    // -- Movement --
    ChefMoved {
        chef: ChefId,
        from: Position,
        to: Position,
        tick: u64,
    },
    MoveBlocked {
        chef: ChefId,
        direction: Direction,
        tick: u64,
    },

    // -- Interaction --
    Interacted {
        chef: ChefId,
        station: StationId,
        kind: InteractionKind,
        tick: u64,
    },
    InteractionIgnored {
        chef: ChefId,
        station: StationId,
        tick: u64,
    },
    DishServed {
        chef: ChefId,
        station: StationId,
        components: usize,
        tick: u64,
    },
    PlateReturned {
        storage: StationId,
        tick: u64,
    },
    /// A served plate had nowhere to go: the stage has no plate storage.
    PlateDiscarded {
        tick: u64,
    },

    // -- Timed work --
    BusyCompleted {
        chef: ChefId,
        station: StationId,
        action: ActionKind,
        tick: u64,
    },
    BusyInterrupted {
        chef: ChefId,
        action: ActionKind,
        tick: u64,
    },
    CutPaused {
        station: StationId,
        saved_ms: Millis,
        tick: u64,
    },
    CookingFinished {
        station: StationId,
        tick: u64,
    },
}

/// Discriminant tag for event types, used for suppression and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    StageStarted,
    StagePaused,
    StageResumed,
    StageFinished,
    ActiveChefChanged,
    ChefMoved,
    MoveBlocked,
    Interacted,
    InteractionIgnored,
    DishServed,
    PlateReturned,
    PlateDiscarded,
    BusyCompleted,
    BusyInterrupted,
    CutPaused,
    CookingFinished,
}

impl KitchenEvent {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            KitchenEvent::StageStarted { .. } => EventKind::StageStarted,
            KitchenEvent::StagePaused { .. } => EventKind::StagePaused,
            KitchenEvent::StageResumed { .. } => EventKind::StageResumed,
            KitchenEvent::StageFinished { .. } => EventKind::StageFinished,
            KitchenEvent::ActiveChefChanged { .. } => EventKind::ActiveChefChanged,
            KitchenEvent::ChefMoved { .. } => EventKind::ChefMoved,
            KitchenEvent::MoveBlocked { .. } => EventKind::MoveBlocked,
            KitchenEvent::Interacted { .. } => EventKind::Interacted,
            KitchenEvent::InteractionIgnored { .. } => EventKind::InteractionIgnored,
            KitchenEvent::DishServed { .. } => EventKind::DishServed,
            KitchenEvent::PlateReturned { .. } => EventKind::PlateReturned,
            KitchenEvent::PlateDiscarded { .. } => EventKind::PlateDiscarded,
            KitchenEvent::BusyCompleted { .. } => EventKind::BusyCompleted,
            KitchenEvent::BusyInterrupted { .. } => EventKind::BusyInterrupted,
            KitchenEvent::CutPaused { .. } => EventKind::CutPaused,
            KitchenEvent::CookingFinished { .. } => EventKind::CookingFinished,
        }
    }
}

// ---------------------------------------------------------------------------
// EventLog -- ring buffer
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct EventLog {
    /// Pre-allocated storage.
    events: Vec<Option<KitchenEvent>>,
    /// Write position (wraps around).
    head: usize,
    /// Number of events currently stored.
    len: usize,
    /// Total events ever written (including dropped).
    total_written: u64,
    suppressed: HashSet<EventKind>,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
            suppressed: HashSet::new(),
        }
    }

    /// Record an event. Suppressed kinds are skipped; if full, the oldest
    /// event is dropped.
    pub fn push(&mut self, event: KitchenEvent) {
        if self.suppressed.contains(&event.kind()) {
            return;
        }
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed.insert(kind);
    }

    pub fn unsuppress(&mut self, kind: EventKind) {
        self.suppressed.remove(&kind);
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Number of events that were dropped because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.capacity() as u64)
    }

    fn oldest_index(&self) -> usize {
        if self.len < self.capacity() {
            0
        } else {
            // head is the next write position, which is the oldest entry
            self.head
        }
    }

    /// Events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &KitchenEvent> + '_ {
        let start = self.oldest_index();
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.events[(start + i) % capacity].as_ref())
    }

    /// Take every buffered event, oldest first, leaving the log empty.
    pub fn drain(&mut self) -> Vec<KitchenEvent> {
        let start = self.oldest_index();
        let capacity = self.capacity();
        let drained = (0..self.len)
            .filter_map(|i| self.events[(start + i) % capacity].take())
            .collect();
        self.head = 0;
        self.len = 0;
        drained
    }
}
