//! Property-based tests for the kitchen core.
//!
//! Random input sequences are driven through the stage, then timing,
//! occupancy and storage invariants are checked.

use kitchen_core::config::LevelSettings;
use kitchen_core::grid::{Direction, Position};
use kitchen_core::item::{Item, Plate};
use kitchen_core::map::{KitchenMap, Tile};
use kitchen_core::station::{CutState, CuttingStation, PlateStorage, StationKind};
use kitchen_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

/// Things that can happen to a cut in progress.
#[derive(Debug, Clone)]
enum CutOp {
    Advance(u64),
    Tick,
    Interrupt,
    Interact,
}

fn arb_cut_ops(max_ops: usize) -> impl Strategy<Value = Vec<CutOp>> {
    proptest::collection::vec(
        prop_oneof![
            (0..2500u64).prop_map(CutOp::Advance),
            Just(CutOp::Tick),
            Just(CutOp::Interrupt),
            Just(CutOp::Interact),
        ],
        1..=max_ops,
    )
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Saved cutting progress never goes down and never passes the cut
    /// duration, whatever the mix of ticks, interrupts and resumes.
    #[test]
    fn saved_progress_is_monotonic_and_bounded(ops in arb_cut_ops(40)) {
        let (mut stage, clock) = open_stage(3, 3);
        let board = stage
            .add_station(Position::new(1, 0), StationKind::Cutting(CuttingStation::new()))
            .unwrap();
        let chef = stage.add_chef("Remy", Position::new(1, 2)).unwrap();
        stage.start().unwrap();
        stage.attempt_move(chef, Direction::Up).unwrap();
        stage.chef_mut(chef).unwrap().pick_up(Item::from(raw("tomato"))).unwrap();
        stage.handle_interact(chef).unwrap();

        let total = stage.settings().cut_duration_ms();
        let mut last = 0;
        for op in ops {
            match op {
                CutOp::Advance(ms) => clock.advance_ms(ms),
                CutOp::Tick => stage.update(),
                CutOp::Interrupt => {
                    stage.interrupt_chef(chef).unwrap();
                }
                CutOp::Interact => {
                    stage.handle_interact(chef).unwrap();
                }
            }
            let cutting = stage.station(board).unwrap().as_cutting().unwrap();
            if *cutting.state() == CutState::Idle {
                // Finished (or taken off the board): nothing left to track.
                break;
            }
            let saved = cutting.saved_progress_ms();
            prop_assert!(saved >= last, "progress went from {last} to {saved}");
            prop_assert!(saved <= total);
            last = saved;
        }
    }

    /// Two chefs wandering an open floor with a wall in the middle never
    /// share a cell or stand on the wall.
    #[test]
    fn chefs_never_overlap(moves in proptest::collection::vec((0..2usize, arb_direction()), 1..80)) {
        let mut map = KitchenMap::new(4, 4);
        map.set_tile(Position::new(1, 1), Tile::Wall);
        map.set_tile(Position::new(2, 2), Tile::Wall);
        let (mut stage, _clock) = stage_with(map, LevelSettings::default());
        let chefs = [
            stage.add_chef("a", Position::new(0, 0)).unwrap(),
            stage.add_chef("b", Position::new(3, 3)).unwrap(),
        ];
        stage.start().unwrap();

        for (who, direction) in moves {
            let before = stage.chef(chefs[who]).unwrap().position();
            let moved = stage.attempt_move(chefs[who], direction).unwrap();
            let after = stage.chef(chefs[who]).unwrap().position();
            prop_assert_eq!(moved, before != after);

            let a = stage.chef(chefs[0]).unwrap().position();
            let b = stage.chef(chefs[1]).unwrap().position();
            prop_assert_ne!(a, b);
            prop_assert!(stage.map().is_walkable(a));
            prop_assert!(stage.map().is_walkable(b));
        }
    }

    /// N clean plates plus K dirty returns: K dirty, N clean, and the
    /// dirty ones come off first.
    #[test]
    fn storage_counts_after_dirty_returns(clean in 0..8u32, dirty in 0..8usize) {
        let mut storage = PlateStorage::new(clean);
        for _ in 0..dirty {
            storage.push_dirty_plate(Plate::new());
        }
        prop_assert_eq!(storage.clean_count(), clean as usize);
        prop_assert_eq!(storage.dirty_count(), dirty);
        prop_assert_eq!(storage.dirty_on_top(), dirty);

        for i in 0..(clean as usize + dirty) {
            let (_, plate) = storage.interact(None);
            let plate = plate.and_then(|item| item.as_plate().cloned()).unwrap();
            prop_assert_eq!(plate.is_clean(), i >= dirty);
        }
        prop_assert!(storage.is_empty());
    }

    /// Holding anything at plate storage changes neither the hand nor the
    /// stack.
    #[test]
    fn non_matching_interaction_changes_nothing(clean in 0..5u32, dirty in 0..5usize, plate in any::<bool>()) {
        let mut storage = PlateStorage::new(clean);
        for _ in 0..dirty {
            storage.push_dirty_plate(Plate::new());
        }
        let held = if plate { Item::from(Plate::new()) } else { Item::from(chopped("leek")) };
        let before: Vec<Plate> = storage.plates().cloned().collect();

        let (outcome, back) = storage.interact(Some(held.clone()));
        prop_assert!(outcome.is_ignored());
        prop_assert_eq!(back, Some(held));
        let after: Vec<Plate> = storage.plates().cloned().collect();
        prop_assert_eq!(before, after);
    }
}
