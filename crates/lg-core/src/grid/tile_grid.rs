//! The mutable tile grid every pipeline stage works on

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{GridPos, GridRect, Tile};

/// Errors from parsing an ASCII grid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridParseError {
    #[error("grid has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown tile symbol '{symbol}' at row {row}, column {column}")]
    UnknownSymbol {
        symbol: char,
        row: usize,
        column: usize,
    },
}

/// A `width × height` grid of tiles, `y`-up
///
/// Out-of-bounds reads return [`Tile::Wall`]; out-of-bounds writes are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    /// Row-major from the bottom row
    cells: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with walls
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            cells: vec![Tile::Wall; (width * height) as usize],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// The full grid as a rectangle
    pub fn bounds(&self) -> GridRect {
        GridRect::new(0, 0, self.width, self.height)
    }

    /// Everything but the one-cell solid border
    pub fn interior(&self) -> GridRect {
        self.bounds().inset(1)
    }

    pub fn in_bounds(&self, p: GridPos) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    fn index(&self, p: GridPos) -> Option<usize> {
        self.in_bounds(p)
            .then(|| (p.y * self.width + p.x) as usize)
    }

    /// Tile at `p`, or `Wall` outside the grid
    pub fn get(&self, p: GridPos) -> Tile {
        self.index(p).map_or(Tile::Wall, |i| self.cells[i])
    }

    /// Set a tile. Returns false if `p` is out of bounds.
    pub fn set(&mut self, p: GridPos, tile: Tile) -> bool {
        match self.index(p) {
            Some(i) => {
                self.cells[i] = tile;
                true
            }
            None => false,
        }
    }

    /// Turn a wall into floor. Floors and platforms are left alone.
    ///
    /// Returns true if the cell changed.
    pub fn carve(&mut self, p: GridPos) -> bool {
        match self.index(p) {
            Some(i) if self.cells[i] == Tile::Wall => {
                self.cells[i] = Tile::Floor;
                true
            }
            _ => false,
        }
    }

    /// Carve every cell of `rect` that lies inside the interior
    ///
    /// Returns the number of cells that changed.
    pub fn carve_rect(&mut self, rect: &GridRect) -> usize {
        let Some(area) = rect.intersection(&self.interior()) else {
            return 0;
        };
        area.cells().filter(|&p| self.carve(p)).count()
    }

    /// Check if `p` is passable and has support directly below
    pub fn is_standable(&self, p: GridPos) -> bool {
        self.get(p) == Tile::Floor && self.get(p.below()).supports_standing()
    }

    /// Count cells of a given kind
    pub fn count(&self, tile: Tile) -> usize {
        self.cells.iter().filter(|&&t| t == tile).count()
    }

    /// Raw cells, row-major from the bottom row
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Copy another grid in at `offset`, skipping its walls
    pub fn stamp(&mut self, other: &TileGrid, offset: GridPos) {
        for p in other.bounds().cells() {
            let tile = other.get(p);
            if tile != Tile::Wall {
                self.set(p.offset(offset.x, offset.y), tile);
            }
        }
    }

    /// Render as text, top row first
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.get(GridPos::new(x, y)).symbol());
            }
            out.push('\n');
        }
        out
    }

    /// Parse text produced by [`TileGrid::to_ascii`] (top row first)
    ///
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, GridParseError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if rows.is_empty() {
            return Err(GridParseError::Empty);
        }

        let width = rows[0].chars().count();
        let height = rows.len();
        let mut grid = TileGrid::new(width as i32, height as i32);

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i32;
            for (column, symbol) in line.chars().enumerate() {
                let tile = Tile::from_symbol(symbol).ok_or(GridParseError::UnknownSymbol {
                    symbol,
                    row,
                    column,
                })?;
                grid.set(GridPos::new(column as i32, y), tile);
            }
        }

        Ok(grid)
    }
}

impl std::fmt::Display for TileGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_ascii())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_wall() {
        let grid = TileGrid::new(8, 5);
        assert_eq!(grid.count(Tile::Wall), 40);
        assert_eq!(grid.count(Tile::Floor), 0);
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let mut grid = TileGrid::new(4, 4);
        for p in grid.bounds().cells().collect::<Vec<_>>() {
            grid.set(p, Tile::Floor);
        }
        assert_eq!(grid.get(GridPos::new(-1, 0)), Tile::Wall);
        assert_eq!(grid.get(GridPos::new(0, 4)), Tile::Wall);
        assert_eq!(grid.get(GridPos::new(4, 0)), Tile::Wall);
        assert!(!grid.set(GridPos::new(9, 9), Tile::Floor));
    }

    #[test]
    fn test_carve_never_overwrites_platform() {
        let mut grid = TileGrid::new(5, 5);
        let p = GridPos::new(2, 2);
        grid.set(p, Tile::Platform);
        assert!(!grid.carve(p));
        assert_eq!(grid.get(p), Tile::Platform);

        let q = GridPos::new(1, 1);
        assert!(grid.carve(q));
        assert!(!grid.carve(q));
    }

    #[test]
    fn test_carve_rect_keeps_border() {
        let mut grid = TileGrid::new(10, 6);
        let carved = grid.carve_rect(&GridRect::new(-5, -5, 30, 30));
        assert_eq!(carved, 8 * 4);
        for x in 0..10 {
            assert_eq!(grid.get(GridPos::new(x, 0)), Tile::Wall);
            assert_eq!(grid.get(GridPos::new(x, 5)), Tile::Wall);
        }
    }

    #[test]
    fn test_standable() {
        let grid = TileGrid::from_ascii(
            "
            #####
            #...#
            #.=.#
            #...#
            #####
            ",
        )
        .unwrap();
        assert!(grid.is_standable(GridPos::new(1, 1)));
        assert!(!grid.is_standable(GridPos::new(1, 2)));
        // Resting on the platform
        assert!(grid.is_standable(GridPos::new(2, 3)));
        // The platform itself is not a floor
        assert!(!grid.is_standable(GridPos::new(2, 2)));
    }

    #[test]
    fn test_ascii_round_trip_orientation() {
        let text = "###\n#.#\n#=#\n###\n";
        let grid = TileGrid::from_ascii(text).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 4);
        // Top row in text is the highest y
        assert_eq!(grid.get(GridPos::new(1, 2)), Tile::Floor);
        assert_eq!(grid.get(GridPos::new(1, 1)), Tile::Platform);
        assert_eq!(grid.to_ascii(), text);
    }

    #[test]
    fn test_ascii_errors() {
        assert_eq!(TileGrid::from_ascii("  \n"), Err(GridParseError::Empty));
        assert!(matches!(
            TileGrid::from_ascii("###\n##\n"),
            Err(GridParseError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            TileGrid::from_ascii("#?#\n"),
            Err(GridParseError::UnknownSymbol { symbol: '?', .. })
        ));
    }

    #[test]
    fn test_stamp_skips_walls() {
        let mut world = TileGrid::new(10, 10);
        let room = TileGrid::from_ascii("###\n#.#\n###\n").unwrap();
        world.stamp(&room, GridPos::new(4, 4));
        assert_eq!(world.count(Tile::Floor), 1);
        assert_eq!(world.get(GridPos::new(5, 5)), Tile::Floor);
    }
}
