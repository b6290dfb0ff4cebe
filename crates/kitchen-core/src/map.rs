//! The kitchen grid: terrain tiles plus an index of which cell holds which
//! station.
//!
//! A cell is floor, wall, or a station. Only floor cells without a station
//! are walkable. Chef occupancy is not tracked here; the stage checks it.

use crate::grid::Position;
use crate::id::StationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Terrain of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Floor,
    Wall,
}

/// Errors from map placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("position {0} is outside the map")]
    OutOfBounds(Position),
    #[error("position {0} is a wall")]
    Blocked(Position),
    #[error("position {0} already holds a station")]
    Occupied(Position),
}

#[derive(Debug, Clone)]
pub struct KitchenMap {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
    stations: BTreeMap<Position, StationId>,
}

impl KitchenMap {
    /// An all-floor map.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Floor; (width as usize) * (height as usize)],
            stations: BTreeMap::new(),
        }
    }

    /// An all-floor map with a wall ring around the edge.
    pub fn walled(width: u32, height: u32) -> Self {
        let mut map = Self::new(width, height);
        for x in 0..width as i32 {
            map.set_tile(Position::new(x, 0), Tile::Wall);
            map.set_tile(Position::new(x, height as i32 - 1), Tile::Wall);
        }
        for y in 0..height as i32 {
            map.set_tile(Position::new(0, y), Tile::Wall);
            map.set_tile(Position::new(width as i32 - 1, y), Tile::Wall);
        }
        map
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as u32) < self.width && (pos.y as u32) < self.height
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| pos.y as usize * self.width as usize + pos.x as usize)
    }

    /// Terrain at `pos`, `None` outside the map.
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        self.index(pos).map(|i| self.tiles[i])
    }

    /// Set terrain. Out-of-bounds writes are ignored.
    pub fn set_tile(&mut self, pos: Position, tile: Tile) {
        if let Some(i) = self.index(pos) {
            self.tiles[i] = tile;
        }
    }

    /// Floor with no station on it.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.tile(pos) == Some(Tile::Floor) && !self.stations.contains_key(&pos)
    }

    pub fn station_at(&self, pos: Position) -> Option<StationId> {
        self.stations.get(&pos).copied()
    }

    /// Register a station on a floor cell.
    pub(crate) fn place_station(&mut self, pos: Position, id: StationId) -> Result<(), MapError> {
        match self.tile(pos) {
            None => return Err(MapError::OutOfBounds(pos)),
            Some(Tile::Wall) => return Err(MapError::Blocked(pos)),
            Some(Tile::Floor) => {}
        }
        if self.stations.contains_key(&pos) {
            return Err(MapError::Occupied(pos));
        }
        self.stations.insert(pos, id);
        Ok(())
    }

    /// All station cells, in position order.
    pub fn station_positions(&self) -> impl Iterator<Item = (Position, StationId)> + '_ {
        self.stations.iter().map(|(&p, &id)| (p, id))
    }
}
