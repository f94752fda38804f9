//! Multi-room levels
//!
//! Rooms generated by the single-room pipeline are placed left to right,
//! joined by corridors and checked for overlaps. A [`LevelLayout`] stores
//! just enough to replay the whole level.

mod assembler;
mod corridor;
mod layout;
mod overlap;
mod types;

pub use assembler::generate_level;
pub use corridor::build_corridor;
pub use layout::{CorridorLayout, LayoutError, LevelLayout, RoomLayout};
pub use overlap::{find_overlaps, LevelElement, Overlap};
pub use types::{CorridorSegment, LevelData, LevelWarning, PlacedRoom, RoomType};
