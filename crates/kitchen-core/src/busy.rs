//! The chef's busy-action scheduler.
//!
//! A chef runs at most one timed action. Instead of a callback, the action
//! carries a [`Completion`] value naming what should happen when it ends;
//! [`BusyState::poll`] hands that value out exactly once, when the deadline
//! has passed, and the stage routes it to the right station. Polling early
//! or polling again is harmless.

use crate::id::{Millis, StationId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// What a busy chef is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Cutting,
    Washing,
}

/// The deferred effect of a busy action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The ingredient on this cutting station is chopped.
    FinishCut { station: StationId },
    /// The plate in this sink is clean.
    FinishWash { station: StationId },
}

impl Completion {
    /// The station the effect lands on.
    pub fn station(&self) -> StationId {
        match *self {
            Completion::FinishCut { station } | Completion::FinishWash { station } => station,
        }
    }
}

/// One in-flight timed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyAction {
    pub kind: ActionKind,
    pub duration_secs: u32,
    pub started_at: Millis,
    pub completion: Completion,
}

impl BusyAction {
    pub fn duration_ms(&self) -> Millis {
        Millis::from(self.duration_secs) * 1000
    }

    pub fn deadline(&self) -> Millis {
        self.started_at + self.duration_ms()
    }

    /// Time spent on the action so far, clamped to its duration.
    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        now.saturating_sub(self.started_at).min(self.duration_ms())
    }

    pub fn remaining_ms(&self, now: Millis) -> Millis {
        self.duration_ms() - self.elapsed_ms(now)
    }

    pub fn is_due(&self, now: Millis) -> bool {
        now >= self.deadline()
    }
}

/// Starting an action while another one runs is a caller bug, not a game
/// no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusyError {
    #[error("chef is already busy ({current:?})")]
    AlreadyBusy { current: ActionKind },
}

// ---------------------------------------------------------------------------
// BusyState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct BusyState {
    current: Option<BusyAction>,
}

impl BusyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timed action. Fails if one is already active.
    pub fn start(
        &mut self,
        kind: ActionKind,
        duration_secs: u32,
        now: Millis,
        completion: Completion,
    ) -> Result<(), BusyError> {
        if let Some(current) = &self.current {
            return Err(BusyError::AlreadyBusy {
                current: current.kind,
            });
        }
        self.current = Some(BusyAction {
            kind,
            duration_secs,
            started_at: now,
            completion,
        });
        Ok(())
    }

    /// True until the action is polled to completion or interrupted.
    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_action(&self) -> Option<ActionKind> {
        self.current.as_ref().map(|a| a.kind)
    }

    pub fn action(&self) -> Option<&BusyAction> {
        self.current.as_ref()
    }

    /// Whether the active action of `kind` targets `station`.
    pub fn is_working_at(&self, kind: ActionKind, station: StationId) -> bool {
        self.current
            .as_ref()
            .is_some_and(|a| a.kind == kind && a.completion.station() == station)
    }

    /// Cancel the action without running its completion. Progress is not
    /// kept here; reconcile it before calling this.
    pub fn interrupt(&mut self) -> Option<BusyAction> {
        self.current.take()
    }

    /// Hand out the completion once the deadline has passed.
    pub fn poll(&mut self, now: Millis) -> Option<Completion> {
        if !self.current.as_ref().is_some_and(|a| a.is_due(now)) {
            return None;
        }
        self.current.take().map(|a| a.completion)
    }

    /// 0..=1 fraction of the active action, 0 when idle.
    pub fn progress(&self, now: Millis) -> f64 {
        match &self.current {
            Some(a) if a.duration_ms() == 0 => 1.0,
            Some(a) => a.elapsed_ms(now) as f64 / a.duration_ms() as f64,
            None => 0.0,
        }
    }
}
