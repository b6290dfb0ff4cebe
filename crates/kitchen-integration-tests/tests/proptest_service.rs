//! Property-based tests over whole levels.
//!
//! Random command streams, interleaved with clock advances, are played on
//! the bistro level; structural invariants must hold after every step.

use kitchen_core::clock::ManualClock;
use kitchen_core::command::Command;
use kitchen_core::grid::Direction;
use kitchen_core::item::{IngredientState, Item};
use kitchen_core::stage::Stage;
use proptest::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;

// ===========================================================================
// Generators
// ===========================================================================

#[derive(Debug, Clone)]
enum Op {
    Send(Command),
    Advance(u64),
}

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Up),
        Just(Direction::Down),
        Just(Direction::Left),
        Just(Direction::Right),
    ]
}

fn arb_ops(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(
        prop_oneof![
            4 => arb_direction().prop_map(|d| Op::Send(Command::Move(d))),
            3 => Just(Op::Send(Command::Interact)),
            1 => Just(Op::Send(Command::SwitchChef)),
            1 => Just(Op::Send(Command::CancelAction)),
            2 => (100..4000u64).prop_map(Op::Advance),
        ],
        1..=max_ops,
    )
}

fn bistro() -> (Stage, ManualClock) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("levels/bistro.ron");
    let clock = ManualClock::new();
    let mut stage = kitchen_data::load_stage(&path, Box::new(clock.clone())).unwrap();
    stage.start().unwrap();
    (stage, clock)
}

fn count_plates(stage: &Stage) -> usize {
    let held = stage
        .snapshot_all_chefs()
        .into_iter()
        .filter(|c| matches!(c.held, Some(Item::Plate(_))))
        .count();
    let placed: usize = stage
        .snapshot_all_stations()
        .iter()
        .map(|s| {
            s.contents
                .iter()
                .filter(|item| matches!(item, Item::Plate(_)))
                .count()
        })
        .sum();
    held + placed
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Chefs stay on distinct walkable cells, and plates are neither made
    /// nor lost.
    #[test]
    fn random_service_keeps_kitchen_consistent(ops in arb_ops(150)) {
        let (mut stage, clock) = bistro();
        let plates = count_plates(&stage);
        prop_assert_eq!(plates, 4);

        for op in ops {
            match op {
                Op::Send(command) => {
                    let _ = stage.handle_command(command);
                }
                Op::Advance(ms) => clock.advance_ms(ms),
            }
            stage.update();

            let mut cells = HashSet::new();
            for id in stage.chef_ids().iter().copied() {
                let pos = stage.chef(id).unwrap().position();
                prop_assert!(stage.map().is_walkable(pos), "chef on {}", pos);
                prop_assert!(stage.station_at(pos).is_none(), "chef on a station at {}", pos);
                prop_assert!(cells.insert(pos), "two chefs on {}", pos);
            }
            prop_assert_eq!(count_plates(&stage), plates);
        }
    }

    /// Nothing raw ever reaches the pass.
    #[test]
    fn served_dishes_hold_only_prepared_food(ops in arb_ops(200)) {
        let (mut stage, clock) = bistro();
        for op in ops {
            match op {
                Op::Send(command) => {
                    let _ = stage.handle_command(command);
                }
                Op::Advance(ms) => clock.advance_ms(ms),
            }
            stage.update();
        }
        for dish in stage.served() {
            prop_assert!(!dish.is_empty());
            for component in dish.components() {
                prop_assert_ne!(component.state(), IngredientState::Raw);
            }
        }
    }
}
