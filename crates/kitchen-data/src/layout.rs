//! Turning a level's glyph grid into a stage.

use crate::loader::DataLoadError;
use crate::schema::{CrateData, LevelData};
use kitchen_core::clock::Clock;
use kitchen_core::grid::Position;
use kitchen_core::map::{KitchenMap, Tile};
use kitchen_core::stage::Stage;
use kitchen_core::station::{
    AssemblyStation, CookingStation, CuttingStation, IngredientCrate, PlateStorage,
    ServingCounter, StationKind, Trash, WashingStation,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// What one layout cell holds.
#[derive(Debug)]
enum Cell {
    Floor,
    Wall,
    Spawn(char),
    Station(StationKind),
}

/// Build a stage in its setup state from a level. The level's settings are
/// applied; chefs spawn in digit order.
pub fn build_stage(level: &LevelData, clock: Box<dyn Clock>) -> Result<Stage, DataLoadError> {
    let legend = parse_legend(&level.crates)?;
    let rows: Vec<Vec<char>> = level.layout.iter().map(|r| r.chars().collect()).collect();

    let width = rows.first().map_or(0, Vec::len);
    if rows.is_empty() || width == 0 {
        return Err(DataLoadError::EmptyLayout {
            level: level.id.clone(),
        });
    }
    if let Some((row, found)) = rows
        .iter()
        .map(Vec::len)
        .enumerate()
        .find(|&(_, len)| len != width)
    {
        return Err(DataLoadError::RaggedLayout {
            row,
            expected: width,
            found,
        });
    }

    let mut map = KitchenMap::new(width as u32, rows.len() as u32);
    let mut spawns: BTreeMap<char, Position> = BTreeMap::new();
    let mut stations = Vec::new();

    for (row, glyphs) in rows.iter().enumerate() {
        for (col, &glyph) in glyphs.iter().enumerate() {
            let pos = Position::new(col as i32, row as i32);
            match parse_cell(glyph, row, col, &legend, level.settings.initial_plates)? {
                Cell::Floor => {}
                Cell::Wall => map.set_tile(pos, Tile::Wall),
                Cell::Spawn(digit) => {
                    if spawns.insert(digit, pos).is_some() {
                        return Err(DataLoadError::DuplicateSpawn { digit });
                    }
                }
                Cell::Station(kind) => stations.push((pos, kind)),
            }
        }
    }

    let mut stage = Stage::new(map, level.settings.clone(), clock);
    for (pos, kind) in stations {
        stage.add_station(pos, kind)?;
    }
    for (i, (digit, pos)) in spawns.into_iter().enumerate() {
        let name = level
            .chefs
            .get(i)
            .cloned()
            .unwrap_or_else(|| format!("Chef {digit}"));
        stage.add_chef(&name, pos)?;
        debug!(chef = %name, %pos, "spawn placed");
    }

    info!(
        id = %level.id,
        width,
        height = rows.len(),
        chefs = stage.chef_ids().len(),
        "stage built"
    );
    Ok(stage)
}

fn parse_legend(
    crates: &BTreeMap<String, CrateData>,
) -> Result<BTreeMap<char, &CrateData>, DataLoadError> {
    crates
        .iter()
        .map(|(key, data)| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(glyph), None) if glyph.is_ascii_lowercase() => Ok((glyph, data)),
                _ => Err(DataLoadError::InvalidCrateKey { key: key.clone() }),
            }
        })
        .collect()
}

fn parse_cell(
    glyph: char,
    row: usize,
    col: usize,
    legend: &BTreeMap<char, &CrateData>,
    initial_plates: u32,
) -> Result<Cell, DataLoadError> {
    let station = |kind| -> Result<Cell, DataLoadError> { Ok(Cell::Station(kind)) };
    match glyph {
        '.' => Ok(Cell::Floor),
        '#' => Ok(Cell::Wall),
        '1'..='9' => Ok(Cell::Spawn(glyph)),
        'C' => station(StationKind::Cutting(CuttingStation::new())),
        'P' => station(StationKind::PlateStorage(PlateStorage::new(initial_plates))),
        'A' => station(StationKind::Assembly(AssemblyStation::new())),
        'K' => station(StationKind::Cooking(CookingStation::new())),
        'S' => station(StationKind::Serving(ServingCounter::new())),
        'W' => station(StationKind::Washing(WashingStation::new())),
        'T' => station(StationKind::Trash(Trash)),
        c if c.is_ascii_lowercase() => match legend.get(&c) {
            Some(data) => station(StationKind::IngredientCrate(IngredientCrate::new(
                data.ingredient.clone(),
                data.choppable,
            ))),
            None => Err(DataLoadError::UnknownCrate { glyph, row, col }),
        },
        _ => Err(DataLoadError::UnknownGlyph { glyph, row, col }),
    }
}
