//! Grid model
//!
//! Tile kinds, positions, rectangles, the tile grid and connectivity queries.

mod flood;
mod rect;
mod tile;
mod tile_grid;

pub use flood::{flood_fill, is_connected, reachable_count};
pub use rect::{GridPos, GridRect};
pub use tile::Tile;
pub use tile_grid::{GridParseError, TileGrid};
