//! lg-core: seeded platformer room and level generation
//!
//! This crate contains the whole generation pipeline with no I/O dependencies.
//! A room goes through partitioning, room placement, triangulation, spanning
//! tree selection, corridor carving, the connectivity walk, platform injection
//! and spawn extraction. Rooms are then chained into a level by the assembler.
//!
//! Everything is driven by a seed: identical parameters and seed give an
//! identical [`RoomData`] or [`LevelData`].

pub mod events;
pub mod generation;
pub mod grid;
pub mod level;
pub mod params;
pub mod render;

mod consts;
mod rng;

pub use consts::*;
pub use events::{publish_anchors, AnchorListener, AnchorsUpdated, WorldPoint};
pub use generation::{
    generate, generate_room, EnemyAssignment, GenerationReport, GenerationWarning, RoomData,
    SpawnCandidate, SpawnError, SpawnKind,
};
pub use grid::{GridParseError, GridPos, GridRect, Tile, TileGrid};
pub use level::{
    generate_level, LayoutError, LevelData, LevelLayout, LevelWarning, PlacedRoom, RoomType,
};
pub use params::{effective_jump_height, GenerationParameters, LevelParameters};
pub use render::{commit_grid, render_level, render_room, AsciiCanvas, Theme, TileSink};
pub use rng::{seed_from_str, GenRng};
