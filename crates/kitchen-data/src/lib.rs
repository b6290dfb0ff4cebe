//! Level files for the kitchen: on-disk schema, format-aware loading, and
//! construction of a ready-to-start [`kitchen_core::stage::Stage`].

pub mod layout;
pub mod loader;
pub mod schema;

pub use layout::build_stage;
pub use loader::{DataLoadError, Format, load_level, load_stage, parse_level_str};
pub use schema::{CrateData, LevelData};
