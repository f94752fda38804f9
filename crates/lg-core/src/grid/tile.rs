//! Tile kinds

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::consts::{S_FLOOR, S_PLATFORM, S_WALL};

/// Tile kind stored in every grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Tile {
    /// Solid rock; also what every out-of-bounds query returns
    #[default]
    Wall = 0,
    /// Open space
    Floor = 1,
    /// One-way platform: passable from below and the sides, standable from above
    Platform = 2,
}

impl Tile {
    /// Check if this blocks movement
    pub const fn is_solid(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Check if a player or flood fill can pass through
    pub const fn is_passable(&self) -> bool {
        !self.is_solid()
    }

    /// Check if something can stand on top of this tile
    pub const fn supports_standing(&self) -> bool {
        matches!(self, Tile::Wall | Tile::Platform)
    }

    /// Get the display character for this tile
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Wall => S_WALL,
            Tile::Floor => S_FLOOR,
            Tile::Platform => S_PLATFORM,
        }
    }

    /// Parse a display character
    pub const fn from_symbol(c: char) -> Option<Tile> {
        match c {
            S_WALL => Some(Tile::Wall),
            S_FLOOR => Some(Tile::Floor),
            S_PLATFORM => Some(Tile::Platform),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_symbols_round_trip() {
        for tile in Tile::iter() {
            assert_eq!(Tile::from_symbol(tile.symbol()), Some(tile));
        }
        assert_eq!(Tile::from_symbol('?'), None);
    }

    #[test]
    fn test_platform_is_passable_and_supporting() {
        assert!(Tile::Platform.is_passable());
        assert!(Tile::Platform.supports_standing());
        assert!(Tile::Wall.supports_standing());
        assert!(!Tile::Floor.supports_standing());
        assert!(!Tile::Floor.is_solid());
    }

    #[test]
    fn test_default_is_wall() {
        assert_eq!(Tile::default(), Tile::Wall);
        assert_eq!(Tile::Platform.to_string(), "Platform");
    }
}
