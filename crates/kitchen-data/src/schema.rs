//! Serde structs for level files.
//!
//! A level is a grid of glyphs plus the settings it runs with. The same
//! structs load from RON, JSON or TOML.

use kitchen_core::config::LevelSettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One level as written on disk.
///
/// ```text
/// #######
/// #t.C.P#
/// #1...2#
/// #A.S.W#
/// #######
/// ```
///
/// `#` wall, `.` floor, `1`-`9` chef spawns (on floor), `C` cutting board,
/// `P` plate storage, `A` assembly counter, `K` stove, `S` serving counter,
/// `W` sink, `T` trash. Lowercase letters are ingredient crates, resolved
/// through `crates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelData {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub settings: LevelSettings,
    pub layout: Vec<String>,
    /// Crate legend: a one-letter lowercase key to what the crate hands out.
    #[serde(default)]
    pub crates: BTreeMap<String, CrateData>,
    /// Chef names by spawn digit order. Unnamed chefs are called "Chef N".
    #[serde(default)]
    pub chefs: Vec<String>,
}

/// An ingredient crate's product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrateData {
    pub ingredient: String,
    #[serde(default = "default_true")]
    pub choppable: bool,
}

fn default_true() -> bool {
    true
}
