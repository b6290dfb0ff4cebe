//! Kitchen Core -- the interaction and timing engine of a cooperative
//! kitchen game.
//!
//! Chefs walk a grid, carry one item at a time and work at fixed stations
//! that transform items over time. This crate holds the rules; level files,
//! input mapping and rendering live outside it.
//!
//! # Update Loop
//!
//! Each call to [`stage::Stage::update`] runs, in order:
//!
//! 1. **Completions** -- busy actions whose time is up fire their
//!    [`busy::Completion`], routed to the station they name.
//! 2. **Reconciliation** -- cutting boards save the progress of the chef
//!    working them and pause jobs whose chef walked away; stoves advance.
//! 3. **Time limit** -- the stage finishes once its limit has passed.
//!
//! Timers are timestamps read from a [`clock::Clock`], so results do not
//! depend on how often `update` runs.
//!
//! # Key Types
//!
//! - [`stage::Stage`] -- owns the map, chefs and stations; all input enters
//!   here.
//! - [`station::Station`] -- enum over every station variant, each with an
//!   ordered list of interaction cases.
//! - [`chef::Chef`] -- position, facing, one hand and a [`busy::BusyState`].
//! - [`item::Item`] -- an ingredient or a plate.
//! - [`event::EventLog`] -- ring buffer of [`event::KitchenEvent`]s for the
//!   presentation layer.
//! - [`command::Command`] -- decoded player input.

pub mod busy;
pub mod chef;
pub mod clock;
pub mod command;
pub mod config;
pub mod event;
pub mod grid;
pub mod id;
pub mod item;
pub mod map;
pub mod query;
pub mod stage;
pub mod station;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
