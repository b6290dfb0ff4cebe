//! Level settings, applied to a stage once before it starts.

use serde::{Deserialize, Serialize};

/// Cut duration used when a level does not override it.
pub const DEFAULT_CUT_DURATION_SECS: u32 = 3;
pub const DEFAULT_COOK_DURATION_SECS: u32 = 5;
pub const DEFAULT_WASH_DURATION_SECS: u32 = 3;
pub const DEFAULT_INITIAL_PLATES: u32 = 4;

/// Tunables for one level. Every field has a default, so a level file only
/// lists what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    /// Seconds of chef work to chop one ingredient.
    pub cut_duration_secs: u32,
    /// Seconds a stove needs to cook one ingredient. No chef is tied up.
    pub cook_duration_secs: u32,
    /// Seconds of chef work to wash one plate.
    pub wash_duration_secs: u32,
    /// Clean plates each plate storage is stocked with.
    pub initial_plates: u32,
    /// The stage finishes once this much (unpaused) time has passed.
    pub time_limit_secs: Option<u64>,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            cut_duration_secs: DEFAULT_CUT_DURATION_SECS,
            cook_duration_secs: DEFAULT_COOK_DURATION_SECS,
            wash_duration_secs: DEFAULT_WASH_DURATION_SECS,
            initial_plates: DEFAULT_INITIAL_PLATES,
            time_limit_secs: None,
        }
    }
}

impl LevelSettings {
    pub fn cut_duration_ms(&self) -> u64 {
        u64::from(self.cut_duration_secs) * 1000
    }

    pub fn cook_duration_ms(&self) -> u64 {
        u64::from(self.cook_duration_secs) * 1000
    }

    pub fn time_limit_ms(&self) -> Option<u64> {
        self.time_limit_secs.map(|secs| secs.saturating_mul(1000))
    }
}
