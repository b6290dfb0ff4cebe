//! Level file loading: format detection (RON/JSON/TOML), deserialization,
//! and the errors both can raise.

use crate::layout::build_stage;
use crate::schema::LevelData;
use kitchen_core::clock::Clock;
use kitchen_core::stage::{Stage, StageError};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading a level.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The extension is not one of ron, toml or json.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// The file is not a valid level in its format.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    #[error("level '{level}' has an empty layout")]
    EmptyLayout { level: String },

    /// Layout rows must all be the same width.
    #[error("layout row {row} is {found} wide, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph '{glyph}' at row {row}, column {col}")]
    UnknownGlyph { glyph: char, row: usize, col: usize },

    /// A lowercase glyph with no entry in the crate legend.
    #[error("no crate defined for '{glyph}' at row {row}, column {col}")]
    UnknownCrate { glyph: char, row: usize, col: usize },

    /// Crate legend keys must be a single lowercase letter.
    #[error("invalid crate key '{key}'")]
    InvalidCrateKey { key: String },

    #[error("chef spawn {digit} appears more than once")]
    DuplicateSpawn { digit: char },

    /// The stage refused a chef or station placement.
    #[error(transparent)]
    Stage(#[from] StageError),

    /// The level file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported level file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Pick the format from the file extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

/// Read `path` and deserialize it in the format its extension names.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Parse a level held in memory.
pub fn parse_level_str(content: &str, format: Format) -> Result<LevelData, DataLoadError> {
    deserialize_str(content, format, Path::new("<inline>"))
}

/// Read a level file.
pub fn load_level(path: &Path) -> Result<LevelData, DataLoadError> {
    let level: LevelData = deserialize_file(path)?;
    info!(id = %level.id, file = %path.display(), "level loaded");
    Ok(level)
}

/// Read a level file and build its stage, ready to start.
pub fn load_stage(path: &Path, clock: Box<dyn Clock>) -> Result<Stage, DataLoadError> {
    let level = load_level(path)?;
    build_stage(&level, clock)
}

// ===========================================================================
// Tests
// ===========================================================================
