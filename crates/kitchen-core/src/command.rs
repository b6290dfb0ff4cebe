//! Player commands, already decoded from raw input.
//!
//! The input layer maps keys to [`Command`]s; [`Stage::handle_command`]
//! applies them to the active chef. Commands arriving while the stage is
//! not running are ignored, except for toggling the pause.

use crate::grid::Direction;
use crate::stage::{Stage, StageStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Step the active chef one cell.
    Move(Direction),
    /// Interact with the station in front of the active chef.
    Interact,
    /// Hand control to the next chef.
    SwitchChef,
    TogglePause,
    /// Make the active chef stop what it is doing.
    CancelAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandOutcome {
    /// The command changed the stage.
    Applied,
    /// The command was refused: a busy chef, a wall or another chef.
    Blocked,
    /// Nothing to do (stage not running, nothing in front, no matching case).
    Ignored,
}

impl Stage {
    pub fn handle_command(&mut self, command: Command) -> CommandOutcome {
        match (command, self.status()) {
            (Command::TogglePause, StageStatus::Running | StageStatus::Paused) => {
                match self.toggle_pause() {
                    Ok(_) => CommandOutcome::Applied,
                    Err(err) => {
                        warn!(%err, "pause toggle failed");
                        CommandOutcome::Ignored
                    }
                }
            }
            (_, StageStatus::Running) => self.dispatch(command),
            _ => CommandOutcome::Ignored,
        }
    }

    fn dispatch(&mut self, command: Command) -> CommandOutcome {
        if command == Command::SwitchChef {
            return match self.chef_ids().len() {
                0 | 1 => CommandOutcome::Ignored,
                _ => {
                    self.switch_active_chef();
                    CommandOutcome::Applied
                }
            };
        }

        let Some(chef_id) = self.active_chef() else {
            return CommandOutcome::Ignored;
        };
        self.poll_due_actions();
        let busy = self.chef(chef_id).is_some_and(|c| c.is_busy());

        let result = match command {
            Command::Move(_) | Command::Interact if busy => return CommandOutcome::Blocked,
            Command::Move(direction) => self.attempt_move(chef_id, direction).map(|moved| {
                if moved {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Blocked
                }
            }),
            Command::Interact => self.handle_interact(chef_id).map(|kind| match kind {
                Some(_) => CommandOutcome::Applied,
                None => CommandOutcome::Ignored,
            }),
            Command::CancelAction => self.interrupt_chef(chef_id).map(|interrupted| {
                if interrupted {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }),
            Command::SwitchChef | Command::TogglePause => Ok(CommandOutcome::Ignored),
        };
        result.unwrap_or_else(|err| {
            warn!(?command, %err, "command failed");
            CommandOutcome::Ignored
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Position;
    use crate::station::{CuttingStation, StationKind};
    use crate::test_utils::{open_stage, raw};

    #[test]
    fn commands_ignored_before_start() {
        let (mut stage, _clock) = open_stage(3, 3);
        stage.add_chef("a", Position::new(1, 1)).unwrap();
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Up)),
            CommandOutcome::Ignored
        );
        assert_eq!(stage.handle_command(Command::TogglePause), CommandOutcome::Ignored);
        assert_eq!(stage.status(), StageStatus::Setup);
    }

    #[test]
    fn pause_blocks_everything_but_unpause() {
        let (mut stage, _clock) = open_stage(3, 3);
        let chef = stage.add_chef("a", Position::new(1, 1)).unwrap();
        stage.start().unwrap();
        assert_eq!(stage.handle_command(Command::TogglePause), CommandOutcome::Applied);
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Up)),
            CommandOutcome::Ignored
        );
        assert_eq!(stage.chef(chef).unwrap().position(), Position::new(1, 1));
        assert_eq!(stage.handle_command(Command::TogglePause), CommandOutcome::Applied);
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Up)),
            CommandOutcome::Applied
        );
    }

    #[test]
    fn move_into_wall_is_blocked() {
        let (mut stage, _clock) = open_stage(3, 3);
        stage.add_chef("a", Position::new(1, 0)).unwrap();
        stage.start().unwrap();
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Up)),
            CommandOutcome::Blocked
        );
    }

    #[test]
    fn busy_chef_is_blocked_but_can_switch_and_cancel() {
        let (mut stage, clock) = open_stage(3, 4);
        let board = stage
            .add_station(Position::new(1, 0), StationKind::Cutting(CuttingStation::new()))
            .unwrap();
        let a = stage.add_chef("a", Position::new(1, 2)).unwrap();
        let b = stage.add_chef("b", Position::new(0, 3)).unwrap();
        stage.start().unwrap();
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Up)),
            CommandOutcome::Applied
        );
        stage.chef_mut(a).unwrap().pick_up(raw("leek").into()).unwrap();
        assert_eq!(stage.handle_command(Command::Interact), CommandOutcome::Applied);

        assert_eq!(
            stage.handle_command(Command::Move(Direction::Down)),
            CommandOutcome::Blocked
        );
        assert_eq!(stage.handle_command(Command::Interact), CommandOutcome::Blocked);

        assert_eq!(stage.handle_command(Command::SwitchChef), CommandOutcome::Applied);
        assert_eq!(stage.active_chef(), Some(b));
        assert!(stage.chef(a).unwrap().is_busy());
        assert_eq!(stage.handle_command(Command::SwitchChef), CommandOutcome::Applied);

        clock.advance_secs(1);
        stage.update();
        assert_eq!(stage.handle_command(Command::CancelAction), CommandOutcome::Applied);
        assert!(!stage.chef(a).unwrap().is_busy());
        let cutting = stage.station(board).unwrap().as_cutting().unwrap();
        assert_eq!(cutting.saved_progress_ms(), 1000);
        assert_eq!(cutting.bound_chef(), None);
        assert_eq!(stage.handle_command(Command::CancelAction), CommandOutcome::Ignored);
    }

    #[test]
    fn command_at_deadline_sees_finished_cut() {
        let (mut stage, clock) = open_stage(3, 4);
        let board = stage
            .add_station(Position::new(1, 0), StationKind::Cutting(CuttingStation::new()))
            .unwrap();
        let chef = stage.add_chef("a", Position::new(1, 2)).unwrap();
        stage.start().unwrap();
        stage.handle_command(Command::Move(Direction::Up));
        stage.chef_mut(chef).unwrap().pick_up(raw("leek").into()).unwrap();
        assert_eq!(stage.handle_command(Command::Interact), CommandOutcome::Applied);

        // Exactly at the deadline, before any tick.
        clock.advance_secs(3);
        assert_eq!(
            stage.handle_command(Command::Move(Direction::Down)),
            CommandOutcome::Applied
        );
        assert!(!stage.chef(chef).unwrap().is_busy());
        let cutting = stage.station(board).unwrap().as_cutting().unwrap();
        assert_eq!(cutting.finished().len(), 1);
    }

    #[test]
    fn switch_with_one_chef_is_ignored() {
        let (mut stage, _clock) = open_stage(3, 3);
        stage.add_chef("a", Position::new(1, 1)).unwrap();
        stage.start().unwrap();
        assert_eq!(stage.handle_command(Command::SwitchChef), CommandOutcome::Ignored);
    }
}
