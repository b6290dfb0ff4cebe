//! The stage: owns the map, the chefs and the stations, and keeps them
//! consistent over time.
//!
//! # Entry points
//!
//! Input arrives through [`Stage::attempt_move`], [`Stage::handle_interact`]
//! and friends (or [`Stage::handle_command`], which gates them on the stage
//! status). The periodic [`Stage::update`] runs independently of input:
//!
//! 1. **Completions** -- due busy actions hand back their completion, which
//!    is routed to the station it names.
//! 2. **Reconciliation** -- every cutting board with a bound job saves the
//!    cutter's progress (pausing the job if the cutter stopped); stoves
//!    advance their own timers.
//! 3. **Time limit** -- a stage past its limit is finished.
//!
//! # Time
//!
//! The stage clock starts at zero when the stage starts and does not
//! advance while paused or after the stage has finished. Every timer below
//! the stage is measured in stage time.

use crate::busy::{ActionKind, Completion};
use crate::chef::Chef;
use crate::clock::Clock;
use crate::config::LevelSettings;
use crate::event::{EventLog, KitchenEvent};
use crate::grid::{Direction, Position};
use crate::id::{ChefId, Millis, StationId};
use crate::item::{Dish, Item, Plate};
use crate::map::{KitchenMap, MapError, Tile};
use crate::query::{ChefSnapshot, StationSnapshot};
use crate::station::{
    InteractCtx, Interaction, InteractionKind, ProgressUpdate, Station, StationKind,
};
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Status and errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StageStatus {
    /// Being built; settings, chefs and stations may still change.
    #[default]
    Setup,
    Running,
    Paused,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("unknown chef {0:?}")]
    UnknownChef(ChefId),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error("position {0} is not walkable")]
    NotWalkable(Position),
    #[error("position {0} is occupied by a chef")]
    CellOccupied(Position),
    #[error("the stage has already started")]
    AlreadyStarted,
    #[error("the stage has no chefs")]
    NoChefs,
    #[error("the stage is {0:?}")]
    NotRunning(StageStatus),
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Stage {
    settings: LevelSettings,
    map: KitchenMap,

    chefs: SlotMap<ChefId, Chef>,
    /// Spawn order; the active chef cycles through it.
    chef_order: Vec<ChefId>,
    active: usize,

    stations: SlotMap<StationId, Station>,

    clock: Box<dyn Clock>,
    status: StageStatus,
    /// Raw clock reading when the stage started.
    started_at: Option<Millis>,
    /// Raw clock reading when the current pause began.
    paused_since: Option<Millis>,
    /// Raw clock reading when the stage finished.
    finished_at: Option<Millis>,
    /// Total time spent in completed pauses.
    paused_total: Millis,
    tick: u64,

    served: Vec<Dish>,
    events: EventLog,
}

impl Stage {
    pub fn new(map: KitchenMap, settings: LevelSettings, clock: Box<dyn Clock>) -> Self {
        Self {
            settings,
            map,
            chefs: SlotMap::with_key(),
            chef_order: Vec::new(),
            active: 0,
            stations: SlotMap::with_key(),
            clock,
            status: StageStatus::Setup,
            started_at: None,
            paused_since: None,
            finished_at: None,
            paused_total: 0,
            tick: 0,
            served: Vec::new(),
            events: EventLog::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn settings(&self) -> &LevelSettings {
        &self.settings
    }

    pub fn map(&self) -> &KitchenMap {
        &self.map
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == StageStatus::Running
    }

    /// Number of completed `update` calls while running.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Stage time in milliseconds. Zero before the start; frozen while
    /// paused and once finished.
    pub fn now(&self) -> Millis {
        let Some(origin) = self.started_at else {
            return 0;
        };
        let end = self
            .paused_since
            .or(self.finished_at)
            .unwrap_or_else(|| self.clock.now_ms());
        end.saturating_sub(origin).saturating_sub(self.paused_total)
    }

    pub fn chef(&self, id: ChefId) -> Option<&Chef> {
        self.chefs.get(id)
    }

    /// Hand access for inventory changes outside the station protocol.
    /// Position and facing stay under the stage's control.
    pub fn chef_mut(&mut self, id: ChefId) -> Option<&mut Chef> {
        self.chefs.get_mut(id)
    }

    /// Chef ids in spawn order.
    pub fn chef_ids(&self) -> &[ChefId] {
        &self.chef_order
    }

    pub fn chef_at(&self, pos: Position) -> Option<ChefId> {
        self.chef_order
            .iter()
            .copied()
            .find(|&id| self.chefs.get(id).is_some_and(|c| c.position() == pos))
    }

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn station_at(&self, pos: Position) -> Option<StationId> {
        self.map.station_at(pos)
    }

    pub fn stations(&self) -> impl Iterator<Item = (StationId, &Station)> + '_ {
        self.stations.iter()
    }

    /// Dishes served so far, in serving order.
    pub fn served(&self) -> &[Dish] {
        &self.served
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// Take every buffered event, oldest first.
    pub fn drain_events(&mut self) -> Vec<KitchenEvent> {
        self.events.drain()
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    fn ensure_setup(&self) -> Result<(), StageError> {
        match self.status {
            StageStatus::Setup => Ok(()),
            _ => Err(StageError::AlreadyStarted),
        }
    }

    fn ensure_running(&self) -> Result<(), StageError> {
        match self.status {
            StageStatus::Running => Ok(()),
            other => Err(StageError::NotRunning(other)),
        }
    }

    /// Replace the level settings. Plate storages are restocked to the new
    /// initial plate count. Only allowed before the stage starts.
    pub fn apply_settings(&mut self, settings: LevelSettings) -> Result<(), StageError> {
        self.ensure_setup()?;
        for station in self.stations.values_mut() {
            if let Some(storage) = station.as_plate_storage_mut() {
                storage.restock(settings.initial_plates);
            }
        }
        debug!(?settings, "level settings applied");
        self.settings = settings;
        Ok(())
    }

    /// Spawn a chef on a free, walkable cell.
    pub fn add_chef(&mut self, name: &str, pos: Position) -> Result<ChefId, StageError> {
        self.ensure_setup()?;
        if !self.map.in_bounds(pos) {
            return Err(MapError::OutOfBounds(pos).into());
        }
        if !self.map.is_walkable(pos) {
            return Err(StageError::NotWalkable(pos));
        }
        if self.chef_at(pos).is_some() {
            return Err(StageError::CellOccupied(pos));
        }
        let id = self.chefs.insert(Chef::new(name, pos));
        self.chef_order.push(id);
        debug!(chef = name, %pos, "chef spawned");
        Ok(id)
    }

    /// Place a station on a floor cell with no station and no chef.
    pub fn add_station(
        &mut self,
        pos: Position,
        kind: StationKind,
    ) -> Result<StationId, StageError> {
        self.ensure_setup()?;
        match self.map.tile(pos) {
            None => return Err(MapError::OutOfBounds(pos).into()),
            Some(Tile::Wall) => return Err(MapError::Blocked(pos).into()),
            Some(Tile::Floor) => {}
        }
        if self.map.station_at(pos).is_some() {
            return Err(MapError::Occupied(pos).into());
        }
        if self.chef_at(pos).is_some() {
            return Err(StageError::CellOccupied(pos));
        }
        let station = Station::new(pos, kind);
        let station_type = station.station_type();
        let id = self.stations.insert(station);
        self.map.place_station(pos, id)?;
        debug!(?station_type, %pos, "station placed");
        Ok(id)
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn start(&mut self) -> Result<(), StageError> {
        self.ensure_setup()?;
        if self.chef_order.is_empty() {
            return Err(StageError::NoChefs);
        }
        self.started_at = Some(self.clock.now_ms());
        self.status = StageStatus::Running;
        self.events.push(KitchenEvent::StageStarted { tick: self.tick });
        info!(
            chefs = self.chef_order.len(),
            stations = self.stations.len(),
            "stage started"
        );
        Ok(())
    }

    /// Switch between running and paused. Returns the new status.
    pub fn toggle_pause(&mut self) -> Result<StageStatus, StageError> {
        let raw = self.clock.now_ms();
        match self.status {
            StageStatus::Running => {
                self.paused_since = Some(raw);
                self.status = StageStatus::Paused;
                self.events.push(KitchenEvent::StagePaused { tick: self.tick });
                info!(now = self.now(), "stage paused");
            }
            StageStatus::Paused => {
                if let Some(since) = self.paused_since.take() {
                    self.paused_total += raw.saturating_sub(since);
                }
                self.status = StageStatus::Running;
                self.events.push(KitchenEvent::StageResumed { tick: self.tick });
                info!(now = self.now(), "stage resumed");
            }
            other => return Err(StageError::NotRunning(other)),
        }
        Ok(self.status)
    }

    fn finish(&mut self) {
        self.finished_at = Some(self.clock.now_ms());
        self.status = StageStatus::Finished;
        self.events.push(KitchenEvent::StageFinished { tick: self.tick });
        info!(served = self.served.len(), "stage finished");
    }

    // -----------------------------------------------------------------------
    // Active chef
    // -----------------------------------------------------------------------

    /// The chef the player currently controls.
    pub fn active_chef(&self) -> Option<ChefId> {
        self.chef_order.get(self.active).copied()
    }

    /// Hand control to the next chef in spawn order. A busy chef keeps
    /// working after losing control.
    pub fn switch_active_chef(&mut self) -> Option<ChefId> {
        if self.chef_order.is_empty() {
            return None;
        }
        self.active = (self.active + 1) % self.chef_order.len();
        let chef = self.chef_order[self.active];
        self.events.push(KitchenEvent::ActiveChefChanged {
            chef,
            tick: self.tick,
        });
        debug!(?chef, "active chef switched");
        Some(chef)
    }

    // -----------------------------------------------------------------------
    // Movement
    // -----------------------------------------------------------------------

    /// Step `chef_id` one cell. Returns whether the chef moved.
    ///
    /// The target must be walkable and free of other chefs. A blocked move
    /// changes nothing, not even the facing. Busy chefs do not move.
    pub fn attempt_move(
        &mut self,
        chef_id: ChefId,
        direction: Direction,
    ) -> Result<bool, StageError> {
        self.ensure_running()?;
        self.poll_due_actions();
        let chef = self
            .chefs
            .get(chef_id)
            .ok_or(StageError::UnknownChef(chef_id))?;
        if chef.is_busy() {
            debug!(chef = chef.name(), "busy chef cannot move");
            return Ok(false);
        }
        let from = chef.position();
        let to = from.step(direction);
        let occupied = self
            .chefs
            .iter()
            .any(|(id, other)| id != chef_id && other.position() == to);

        if !self.map.is_walkable(to) || occupied {
            debug!(chef = chef.name(), %to, occupied, "move blocked");
            self.events.push(KitchenEvent::MoveBlocked {
                chef: chef_id,
                direction,
                tick: self.tick,
            });
            return Ok(false);
        }

        if let Some(chef) = self.chefs.get_mut(chef_id) {
            chef.move_to(direction);
        }
        self.events.push(KitchenEvent::ChefMoved {
            chef: chef_id,
            from,
            to,
            tick: self.tick,
        });
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Interaction
    // -----------------------------------------------------------------------

    /// Let `chef_id` interact with the station it is facing.
    ///
    /// Returns which case ran, or `None` if nothing happened (no station in
    /// front, the chef is busy, or no case matched).
    pub fn handle_interact(
        &mut self,
        chef_id: ChefId,
    ) -> Result<Option<InteractionKind>, StageError> {
        self.ensure_running()?;
        let now = self.now();
        self.fire_completions(now);

        let chef = self
            .chefs
            .get(chef_id)
            .ok_or(StageError::UnknownChef(chef_id))?;
        if chef.is_busy() {
            debug!(chef = chef.name(), "busy chef cannot interact");
            return Ok(None);
        }
        let front = chef.front();
        let Some(station_id) = self.map.station_at(front) else {
            debug!(chef = chef.name(), %front, "nothing to interact with");
            return Ok(None);
        };
        // A cutter who stopped since the last tick has released the board.
        self.reconcile_board(station_id, now);

        let Some(station) = self.stations.get_mut(station_id) else {
            warn!(?station_id, %front, "map references a missing station");
            return Ok(None);
        };
        let held = self.chefs.get_mut(chef_id).and_then(Chef::take_item);
        let mut ctx = InteractCtx {
            station: station_id,
            actor: chef_id,
            chefs: &mut self.chefs,
            settings: &self.settings,
            now,
        };
        let (interaction, back) = station.interact(held, &mut ctx);
        if let Some(chef) = self.chefs.get_mut(chef_id) {
            chef.set_held(back);
        }

        let kind = interaction.kind();
        match interaction {
            Interaction::Ignored => {
                debug!(?chef_id, station_type = ?station.station_type(), "interaction ignored");
                self.events.push(KitchenEvent::InteractionIgnored {
                    chef: chef_id,
                    station: station_id,
                    tick: self.tick,
                });
            }
            Interaction::Applied(kind) => {
                debug!(?chef_id, ?kind, "interaction applied");
                self.events.push(KitchenEvent::Interacted {
                    chef: chef_id,
                    station: station_id,
                    kind,
                    tick: self.tick,
                });
            }
            Interaction::Served { dish, plate } => {
                self.events.push(KitchenEvent::DishServed {
                    chef: chef_id,
                    station: station_id,
                    components: dish.len(),
                    tick: self.tick,
                });
                self.served.push(dish);
                debug!(served = self.served.len(), "dish recorded");
                self.return_plate(plate);
            }
        }
        Ok(kind)
    }

    /// Send a served plate back to the first plate storage.
    fn return_plate(&mut self, plate: Plate) {
        let storage = self
            .stations
            .iter_mut()
            .find_map(|(id, s)| s.as_plate_storage_mut().map(|storage| (id, storage)));
        match storage {
            Some((id, storage)) => {
                storage.push_dirty_plate(plate);
                self.events.push(KitchenEvent::PlateReturned {
                    storage: id,
                    tick: self.tick,
                });
            }
            None => {
                warn!("no plate storage on the stage; served plate discarded");
                self.events
                    .push(KitchenEvent::PlateDiscarded { tick: self.tick });
            }
        }
    }

    /// Stop whatever `chef_id` is doing. Cutting progress up to now is kept
    /// and the job is paused for anyone to resume. Returns whether an action
    /// was interrupted.
    pub fn interrupt_chef(&mut self, chef_id: ChefId) -> Result<bool, StageError> {
        self.ensure_running()?;
        let now = self.now();
        self.fire_completions(now);

        let chef = self
            .chefs
            .get(chef_id)
            .ok_or(StageError::UnknownChef(chef_id))?;
        let Some(action) = chef.busy().action().cloned() else {
            return Ok(false);
        };
        let station_id = action.completion.station();

        // Bank the elapsed time while the chef still counts as working.
        if let Some(board) = self
            .stations
            .get_mut(station_id)
            .and_then(Station::as_cutting_mut)
        {
            board.save_progress(
                station_id,
                chef_id,
                self.chefs.get(chef_id),
                now,
                &self.settings,
            );
        }
        if let Some(chef) = self.chefs.get_mut(chef_id) {
            chef.interrupt_busy();
            info!(chef = chef.name(), action = ?action.kind, "action interrupted");
        }
        self.events.push(KitchenEvent::BusyInterrupted {
            chef: chef_id,
            action: action.kind,
            tick: self.tick,
        });

        self.reconcile_board(station_id, now);
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Advance the stage by one tick. Does nothing unless running.
    pub fn update(&mut self) {
        if self.status != StageStatus::Running {
            return;
        }
        self.tick += 1;
        let now = self.now();
        self.fire_completions(now);
        self.reconcile_stations(now);

        if self.settings.time_limit_ms().is_some_and(|limit| now >= limit) {
            self.finish();
        }
    }

    /// Finish every busy action whose time is up, so that no chef counts
    /// as busy past its deadline between ticks.
    pub(crate) fn poll_due_actions(&mut self) {
        if self.status == StageStatus::Running {
            let now = self.now();
            self.fire_completions(now);
        }
    }

    /// Poll every chef's busy action and route due completions to their
    /// stations.
    fn fire_completions(&mut self, now: Millis) {
        for &chef_id in &self.chef_order {
            let Some(chef) = self.chefs.get_mut(chef_id) else {
                continue;
            };
            let Some(completion) = chef.poll_busy(now) else {
                continue;
            };
            let station_id = completion.station();
            let target = self.stations.get_mut(station_id).map(Station::kind_mut);
            let (action, finished) = match (completion, target) {
                (Completion::FinishCut { .. }, Some(StationKind::Cutting(board))) => {
                    (ActionKind::Cutting, board.finish_cut(chef_id))
                }
                (Completion::FinishWash { .. }, Some(StationKind::Washing(sink))) => {
                    (ActionKind::Washing, sink.finish_wash(chef_id))
                }
                (Completion::FinishCut { .. }, _) => (ActionKind::Cutting, false),
                (Completion::FinishWash { .. }, _) => (ActionKind::Washing, false),
            };
            if !finished {
                warn!(?chef_id, ?station_id, ?action, "completion had no job to finish");
                continue;
            }
            self.events.push(KitchenEvent::BusyCompleted {
                chef: chef_id,
                station: station_id,
                action,
                tick: self.tick,
            });
        }
    }

    fn reconcile_stations(&mut self, now: Millis) {
        let ids: Vec<StationId> = self.stations.keys().collect();
        for station_id in ids {
            self.reconcile_board(station_id, now);
            let Some(stove) = self
                .stations
                .get_mut(station_id)
                .and_then(Station::as_cooking_mut)
            else {
                continue;
            };
            if stove.update(now, &self.settings) {
                self.events.push(KitchenEvent::CookingFinished {
                    station: station_id,
                    tick: self.tick,
                });
            }
        }
    }

    /// Save the bound cutter's progress on a cutting board, pausing the job
    /// if the cutter has stopped. Not a cutting board, or nothing bound: no-op.
    fn reconcile_board(&mut self, station_id: StationId, now: Millis) {
        let Some(board) = self
            .stations
            .get_mut(station_id)
            .and_then(Station::as_cutting_mut)
        else {
            return;
        };
        let Some(cutter) = board.bound_chef() else {
            return;
        };
        let update = board.save_progress(
            station_id,
            cutter,
            self.chefs.get(cutter),
            now,
            &self.settings,
        );
        if let ProgressUpdate::Released { saved_ms } = update {
            self.events.push(KitchenEvent::CutPaused {
                station: station_id,
                saved_ms,
                tick: self.tick,
            });
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn snapshot_chef(&self, id: ChefId) -> Option<ChefSnapshot> {
        let chef = self.chefs.get(id)?;
        let now = self.now();
        Some(ChefSnapshot {
            id,
            name: chef.name().to_owned(),
            position: chef.position(),
            facing: chef.facing(),
            held: chef.held().cloned(),
            action: chef.current_action(),
            progress: chef.busy().progress(now),
            active: self.active_chef() == Some(id),
        })
    }

    /// Snapshots of every chef, in spawn order.
    pub fn snapshot_all_chefs(&self) -> Vec<ChefSnapshot> {
        self.chef_order
            .iter()
            .filter_map(|&id| self.snapshot_chef(id))
            .collect()
    }

    pub fn snapshot_station(&self, id: StationId) -> Option<StationSnapshot> {
        let station = self.stations.get(id)?;
        let now = self.now();
        let mut contents = Vec::new();
        let mut progress = 0.0;
        let mut worker = None;

        match station.kind() {
            StationKind::Cutting(board) => {
                contents.extend(board.plate().cloned().map(Item::Plate));
                contents.extend(board.finished().iter().cloned().map(Item::Ingredient));
                contents.extend(board.ingredient_being_cut().cloned().map(Item::Ingredient));
                progress = board.progress_fraction(&self.settings);
                worker = board.bound_chef();
            }
            StationKind::PlateStorage(storage) => {
                contents.extend(storage.plates().cloned().map(Item::Plate));
            }
            StationKind::Assembly(counter) => {
                contents.extend(counter.area().plate().cloned().map(Item::Plate));
                contents.extend(counter.area().pending().iter().cloned().map(Item::Ingredient));
            }
            StationKind::Cooking(stove) => {
                contents.extend(stove.contents().cloned().map(Item::Ingredient));
                progress = stove.progress(now, &self.settings);
            }
            StationKind::Washing(sink) => {
                contents.extend(sink.plate_in_sink().cloned().map(Item::Plate));
                contents.extend(sink.rack().iter().cloned().map(Item::Plate));
                worker = sink.washer();
                progress = worker
                    .and_then(|w| self.chefs.get(w))
                    .filter(|c| c.busy().is_working_at(ActionKind::Washing, id))
                    .map_or(0.0, |c| c.busy().progress(now));
            }
            StationKind::Serving(_) | StationKind::IngredientCrate(_) | StationKind::Trash(_) => {}
        }

        Some(StationSnapshot {
            id,
            position: station.position(),
            station_type: station.station_type(),
            contents,
            progress,
            worker,
        })
    }

    pub fn snapshot_all_stations(&self) -> Vec<StationSnapshot> {
        self.stations
            .keys()
            .filter_map(|id| self.snapshot_station(id))
            .collect()
    }
}
