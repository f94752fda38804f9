//! Renderer seam
//!
//! The generator doesn't draw anything. A host supplies a [`Theme`] mapping
//! tile kinds to its own asset type and a [`TileSink`] that receives one
//! call per committed cell. Tiles whose kind has no asset are skipped.
//!
//! [`AsciiCanvas`] is a built-in sink used for terminal output.

use crate::consts::*;
use crate::generation::{RoomData, SpawnKind};
use crate::grid::{GridPos, Tile, TileGrid};
use crate::level::LevelData;

/// Asset for each tile kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme<A> {
    pub wall: Option<A>,
    pub floor: Option<A>,
    pub platform: Option<A>,
}

impl<A> Default for Theme<A> {
    fn default() -> Self {
        Self {
            wall: None,
            floor: None,
            platform: None,
        }
    }
}

impl<A> Theme<A> {
    pub fn asset_for(&self, tile: Tile) -> Option<&A> {
        match tile {
            Tile::Wall => self.wall.as_ref(),
            Tile::Floor => self.floor.as_ref(),
            Tile::Platform => self.platform.as_ref(),
        }
    }
}

impl Theme<char> {
    /// The map symbols `#`, `.` and `=`
    pub fn ascii() -> Self {
        Self {
            wall: Some(S_WALL),
            floor: Some(S_FLOOR),
            platform: Some(S_PLATFORM),
        }
    }
}

/// Receiver of committed tiles
pub trait TileSink<A> {
    fn set_tile(&mut self, pos: GridPos, asset: &A);
}

/// Send every tile of `grid` that has an asset to `sink`, offset by `origin`
///
/// Returns the number of tiles committed.
pub fn commit_grid<A, S>(grid: &TileGrid, theme: &Theme<A>, sink: &mut S, origin: GridPos) -> usize
where
    S: TileSink<A> + ?Sized,
{
    let mut committed = 0;
    for p in grid.bounds().cells() {
        if let Some(asset) = theme.asset_for(grid.get(p)) {
            sink.set_tile(p.offset(origin.x, origin.y), asset);
            committed += 1;
        }
    }
    committed
}

/// Character buffer, `y`-up like the grids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiCanvas {
    width: i32,
    height: i32,
    cells: Vec<char>,
}

impl AsciiCanvas {
    /// Blank canvas
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![S_VOID; (width * height) as usize],
        }
    }

    pub fn get(&self, pos: GridPos) -> Option<char> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Write one character; ignored outside the canvas
    pub fn put(&mut self, pos: GridPos, c: char) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = c;
        }
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        (pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }
}

impl TileSink<char> for AsciiCanvas {
    fn set_tile(&mut self, pos: GridPos, asset: &char) {
        self.put(pos, *asset);
    }
}

impl std::fmt::Display for AsciiCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in (0..self.height).rev() {
            let start = (y * self.width) as usize;
            let row: String = self.cells[start..start + self.width as usize].iter().collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// A room map with entrance, exit and spawn markers
pub fn render_room(room: &RoomData) -> String {
    let mut canvas = AsciiCanvas::new(room.width(), room.height());
    commit_grid(&room.grid, &Theme::ascii(), &mut canvas, GridPos::default());
    for spawn in &room.spawns {
        let symbol = match spawn.kind {
            SpawnKind::Ground => S_GROUND_SPAWN,
            SpawnKind::Air => S_AIR_SPAWN,
        };
        canvas.put(spawn.pos, symbol);
    }
    canvas.put(room.entrance, S_ENTRANCE);
    canvas.put(room.exit, S_EXIT);
    canvas.to_string()
}

/// The composed level map with the level start and goal marked
pub fn render_level(level: &LevelData) -> String {
    let (grid, origin) = level.to_world_grid();
    let mut canvas = AsciiCanvas::new(grid.width(), grid.height());
    commit_grid(&grid, &Theme::ascii(), &mut canvas, GridPos::default());

    let local = |p: GridPos| p.offset(-origin.x, -origin.y);
    for room in &level.rooms {
        for spawn in &room.data.spawns {
            let symbol = match spawn.kind {
                SpawnKind::Ground => S_GROUND_SPAWN,
                SpawnKind::Air => S_AIR_SPAWN,
            };
            canvas.put(local(spawn.pos.offset(room.offset.x, room.offset.y)), symbol);
        }
    }
    if let Some(start) = level.start() {
        canvas.put(local(start), S_ENTRANCE);
    }
    if let Some(goal) = level.goal() {
        canvas.put(local(goal), S_EXIT);
    }
    canvas.to_string()
}
