//! Full services played on level files, driven only through commands.

use kitchen_core::clock::ManualClock;
use kitchen_core::command::{Command, CommandOutcome};
use kitchen_core::event::KitchenEvent;
use kitchen_core::grid::{Direction, Position};
use kitchen_core::item::{IngredientState, Item};
use kitchen_core::stage::{Stage, StageStatus};
use kitchen_core::station::StationType;
use kitchen_core::test_utils::init_tracing;
use std::path::PathBuf;

// ===========================================================================
// Harness
// ===========================================================================

// Bistro columns. Stations along the top are reached facing up, those along
// the bottom facing down.
const TOMATO: i32 = 1;
const BOARD: i32 = 3;
const STORAGE: i32 = 5;
const SERVING: i32 = 7;
const ONION: i32 = 1;
const STOVE: i32 = 3;
const ASSEMBLY: i32 = 5;
const SINK: i32 = 7;

/// The row chefs travel along between stations.
const WORK_ROW: i32 = 3;

fn level_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("levels")
        .join(name)
}

struct Game {
    stage: Stage,
    clock: ManualClock,
}

fn open(name: &str) -> Game {
    init_tracing();
    let clock = ManualClock::new();
    let mut stage = kitchen_data::load_stage(&level_path(name), Box::new(clock.clone())).unwrap();
    stage.start().unwrap();
    Game { stage, clock }
}

impl Game {
    fn send(&mut self, command: Command) -> CommandOutcome {
        self.stage.handle_command(command)
    }

    fn step(&mut self, direction: Direction) {
        assert_eq!(
            self.send(Command::Move(direction)),
            CommandOutcome::Applied,
            "move {direction:?} from {} refused",
            self.position()
        );
    }

    fn interact(&mut self) -> CommandOutcome {
        self.send(Command::Interact)
    }

    fn switch(&mut self) {
        assert_eq!(self.send(Command::SwitchChef), CommandOutcome::Applied);
    }

    fn position(&self) -> Position {
        let id = self.stage.active_chef().unwrap();
        self.stage.chef(id).unwrap().position()
    }

    fn held(&self) -> Option<Item> {
        let id = self.stage.active_chef().unwrap();
        self.stage.chef(id).unwrap().held().cloned()
    }

    /// Walk the active chef back to the work row, along it to column `x`,
    /// then one step `toward` the station, ending up facing it.
    fn face(&mut self, x: i32, toward: Direction) {
        let y = self.position().y;
        if y < WORK_ROW {
            self.step(Direction::Down);
        } else if y > WORK_ROW {
            self.step(Direction::Up);
        }
        while self.position().x != x {
            let dir = if self.position().x < x {
                Direction::Right
            } else {
                Direction::Left
            };
            self.step(dir);
        }
        self.step(toward);
    }

    fn tick_secs(&mut self, secs: u64) {
        self.clock.advance_secs(secs);
        self.stage.update();
    }
}

// ===========================================================================
// Services
// ===========================================================================

#[test]
fn salad_is_served_and_plate_washed() {
    let mut g = open("bistro.ron");

    // Park Colette by the sink, out of the work row.
    g.switch();
    g.step(Direction::Down);
    g.switch();

    g.face(TOMATO, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(
        g.held().unwrap().as_ingredient().unwrap().state(),
        IngredientState::Raw
    );

    g.face(BOARD, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(g.send(Command::Move(Direction::Down)), CommandOutcome::Blocked);
    g.tick_secs(3);

    g.face(STORAGE, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.face(BOARD, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    let plate = g.held().unwrap().as_plate().cloned().unwrap();
    assert_eq!(plate.dish().unwrap().component_names(), vec!["tomato"]);

    g.face(SERVING, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert!(g.held().is_none());
    assert_eq!(g.stage.served().len(), 1);
    let events = g.stage.drain_events();
    assert!(events.iter().any(|e| matches!(e, KitchenEvent::DishServed { .. })));
    assert!(events.iter().any(|e| matches!(e, KitchenEvent::PlateReturned { .. })));

    // The dirty plate is the next one out of storage.
    g.face(STORAGE, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert!(!g.held().unwrap().as_plate().unwrap().is_clean());

    // Colette makes room at the sink.
    g.switch();
    g.step(Direction::Left);
    g.switch();

    g.face(SINK, Direction::Down);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert!(g.held().is_none());
    g.tick_secs(3);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert!(g.held().unwrap().as_plate().unwrap().is_clean());
}

#[test]
fn two_chefs_cook_onion_soup() {
    let mut g = open("bistro.ron");

    // Remy starts chopping an onion.
    g.face(ONION, Direction::Down);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.face(BOARD, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);

    // Colette sets a plate on the assembly counter meanwhile.
    g.switch();
    g.face(STORAGE, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.face(ASSEMBLY, Direction::Down);
    assert_eq!(g.interact(), CommandOutcome::Applied);

    g.tick_secs(3);

    // Remy takes the chopped onion to the stove.
    g.switch();
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(
        g.held().unwrap().as_ingredient().unwrap().state(),
        IngredientState::Chopped
    );
    g.face(STOVE, Direction::Down);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(g.interact(), CommandOutcome::Ignored);

    g.tick_secs(5);
    assert!(
        g.stage
            .drain_events()
            .iter()
            .any(|e| matches!(e, KitchenEvent::CookingFinished { .. }))
    );
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(
        g.held().unwrap().as_ingredient().unwrap().state(),
        IngredientState::Cooked
    );

    // Colette steps aside; Remy plates and serves.
    g.switch();
    g.step(Direction::Right);
    g.switch();
    g.face(ASSEMBLY, Direction::Down);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.face(SERVING, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);

    let served = g.stage.served();
    assert_eq!(served.len(), 1);
    assert_eq!(served[0].component_names(), vec!["onion"]);
    assert_eq!(served[0].components()[0].state(), IngredientState::Cooked);
}

#[test]
fn level_snapshots() {
    let g = open("bistro.ron");

    let chefs = g.stage.snapshot_all_chefs();
    let names: Vec<_> = chefs.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Remy", "Colette"]);
    assert!(chefs[0].active);
    assert!(!chefs[1].active);
    assert_eq!(chefs[1].position, Position::new(7, 3));

    let stations = g.stage.snapshot_all_stations();
    assert_eq!(stations.len(), 8);
    let storage = stations
        .iter()
        .find(|s| s.station_type == StationType::PlateStorage)
        .unwrap();
    assert_eq!(storage.position, Position::new(STORAGE, 1));
    assert_eq!(storage.contents.len(), 4);
    assert!(
        storage
            .contents
            .iter()
            .all(|item| item.as_plate().is_some_and(|p| p.is_clean()))
    );
}

// ===========================================================================
// Time limit
// ===========================================================================

#[test]
fn rush_ends_on_time_limit_excluding_pauses() {
    let mut g = open("rush.toml");
    assert_eq!(g.stage.settings().time_limit_secs, Some(10));
    assert_eq!(g.stage.settings().cut_duration_secs, 2);

    g.tick_secs(4);
    assert_eq!(g.send(Command::TogglePause), CommandOutcome::Applied);
    assert_eq!(g.stage.status(), StageStatus::Paused);
    g.tick_secs(30);
    assert_eq!(g.stage.status(), StageStatus::Paused);
    assert_eq!(g.stage.now(), 4000);
    assert_eq!(g.send(Command::Move(Direction::Up)), CommandOutcome::Ignored);

    assert_eq!(g.send(Command::TogglePause), CommandOutcome::Applied);
    g.tick_secs(5);
    assert!(g.stage.is_running());
    g.tick_secs(1);
    assert_eq!(g.stage.status(), StageStatus::Finished);
    assert_eq!(g.send(Command::Move(Direction::Up)), CommandOutcome::Ignored);
    assert_eq!(g.send(Command::TogglePause), CommandOutcome::Ignored);
    assert!(
        g.stage
            .drain_events()
            .iter()
            .any(|e| matches!(e, KitchenEvent::StageFinished { .. }))
    );
}

#[test]
fn rush_lettuce_cut_uses_level_duration() {
    let mut g = open("rush.toml");
    g.face(1, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.face(3, Direction::Up);
    assert_eq!(g.interact(), CommandOutcome::Applied);
    g.tick_secs(2);

    let board = g
        .stage
        .stations()
        .find_map(|(_, s)| s.as_cutting())
        .unwrap();
    assert_eq!(board.finished().len(), 1);
    assert_eq!(board.finished()[0].name(), "lettuce");
}
