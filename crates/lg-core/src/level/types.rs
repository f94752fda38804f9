//! Level data types

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::overlap::{find_overlaps, Overlap};
use crate::generation::{GenerationWarning, RoomData};
use crate::grid::{GridPos, GridRect, Tile, TileGrid};
use crate::params::LevelParameters;

/// Role of a room in a level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum RoomType {
    /// First room; the player starts here
    Entrance = 0,
    #[default]
    Combat = 1,
    /// Last room
    Boss = 2,
}

impl RoomType {
    pub const fn is_combat(&self) -> bool {
        matches!(self, RoomType::Combat)
    }
}

/// A generated room at its position in the level
///
/// Dimensions and anchors are cached so a layout can be written without
/// the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRoom {
    pub id: u32,
    pub room_type: RoomType,
    pub seed: u64,
    /// World position of the room's cell (0, 0)
    pub offset: GridPos,
    pub data: RoomData,
    pub width: i32,
    pub height: i32,
    /// Room-local entrance
    pub entrance: GridPos,
    /// Room-local exit
    pub exit: GridPos,
}

impl PlacedRoom {
    pub fn new(id: u32, room_type: RoomType, offset: GridPos, data: RoomData) -> Self {
        Self {
            id,
            room_type,
            seed: data.seed,
            offset,
            width: data.width(),
            height: data.height(),
            entrance: data.entrance,
            exit: data.exit,
            data,
        }
    }

    /// Room rectangle in world cells
    pub fn world_bounds(&self) -> GridRect {
        GridRect::new(self.offset.x, self.offset.y, self.width, self.height)
    }

    pub fn world_entrance(&self) -> GridPos {
        self.entrance.offset(self.offset.x, self.offset.y)
    }

    pub fn world_exit(&self) -> GridPos {
        self.exit.offset(self.offset.x, self.offset.y)
    }
}

/// Passage from one room's exit to the next room's entrance (world cells)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorSegment {
    pub from_room: u32,
    pub to_room: u32,
    pub start: GridPos,
    pub end: GridPos,
    /// Both ends of the vertical leg; empty when the corridor is straight
    pub corners: Vec<GridPos>,
    pub thickness: i32,
    /// Carved rectangles, one per leg
    pub legs: Vec<GridRect>,
    pub bounds: GridRect,
    /// Platform cells on the vertical leg
    pub platforms: Vec<GridPos>,
}

impl CorridorSegment {
    pub fn is_straight(&self) -> bool {
        self.corners.is_empty()
    }

    /// Length of the vertical leg
    pub fn rise(&self) -> i32 {
        (self.end.y - self.start.y).abs()
    }
}

/// A degraded (but non-fatal) assembly outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LevelWarning {
    /// |entrance y - previous exit y| is below the required minimum
    HeightDifferenceUnsatisfied {
        room: u32,
        difference: i32,
        required: i32,
    },
    Overlap(Overlap),
    /// Jump gaps left in the composed level grid
    JumpGapsRemain { count: usize },
}

impl std::fmt::Display for LevelWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelWarning::HeightDifferenceUnsatisfied {
                room,
                difference,
                required,
            } => write!(
                f,
                "room {} entrance is {} cell(s) from the previous exit, {} required",
                room, difference, required
            ),
            LevelWarning::Overlap(overlap) => write!(f, "{} overlaps {}", overlap.first, overlap.second),
            LevelWarning::JumpGapsRemain { count } => {
                write!(f, "{} jump gap(s) remain in the level", count)
            }
        }
    }
}

/// An assembled level: rooms left to right and the corridors between them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    pub seed: u64,
    /// The validated parameters the level was assembled with
    pub params: LevelParameters,
    pub rooms: Vec<PlacedRoom>,
    pub corridors: Vec<CorridorSegment>,
    /// Platforms added on the composed grid where corridors meet rooms (world cells)
    pub platforms: Vec<GridPos>,
    pub warnings: Vec<LevelWarning>,
}

impl LevelData {
    /// Union of every room and corridor rectangle
    pub fn bounds(&self) -> GridRect {
        let rooms = self.rooms.iter().map(PlacedRoom::world_bounds);
        let corridors = self.corridors.iter().map(|c| c.bounds);
        rooms
            .chain(corridors)
            .fold(GridRect::new(0, 0, 0, 0), |acc, r| acc.union(&r))
    }

    /// Conflicting pairs of rooms, or of a corridor and a room it doesn't join
    pub fn overlaps(&self) -> Vec<Overlap> {
        find_overlaps(&self.rooms, &self.corridors)
    }

    pub fn room(&self, id: u32) -> Option<&PlacedRoom> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Warnings of the individual rooms, tagged with the room id
    pub fn room_warnings(&self) -> impl Iterator<Item = (u32, &GenerationWarning)> + '_ {
        self.rooms
            .iter()
            .flat_map(|r| r.data.report.warnings.iter().map(move |w| (r.id, w)))
    }

    /// Entrance of the first room in world cells
    pub fn start(&self) -> Option<GridPos> {
        self.rooms.first().map(PlacedRoom::world_entrance)
    }

    /// Exit of the last room in world cells
    pub fn goal(&self) -> Option<GridPos> {
        self.rooms.last().map(PlacedRoom::world_exit)
    }

    /// Compose every room, corridor and platform into one grid
    ///
    /// The grid gets a one-cell wall margin around [`LevelData::bounds`].
    /// Returns the grid and the world position of its cell (0, 0).
    pub fn to_world_grid(&self) -> (TileGrid, GridPos) {
        let area = self.bounds().inset(-1);
        let origin = GridPos::new(area.x, area.y);
        let mut grid = TileGrid::new(area.width, area.height);

        for room in &self.rooms {
            grid.stamp(&room.data.grid, room.offset.offset(-origin.x, -origin.y));
        }
        for corridor in &self.corridors {
            for leg in &corridor.legs {
                grid.carve_rect(&leg.translate(-origin.x, -origin.y));
            }
        }
        let platforms = self.corridors.iter().flat_map(|c| &c.platforms);
        for p in platforms.chain(&self.platforms) {
            let local = p.offset(-origin.x, -origin.y);
            if grid.get(local) == Tile::Floor {
                grid.set(local, Tile::Platform);
            }
        }

        (grid, origin)
    }
}
