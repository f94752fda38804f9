//! Vertical reachability repair
//!
//! Scans every column for standing surfaces and inserts one-way platforms
//! wherever two consecutive surfaces are further apart than the effective
//! jump height.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::grid::{GridPos, Tile, TileGrid};

/// Two consecutive standing heights in one column that are out of jump range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpGap {
    pub column: i32,
    /// Lower standing height
    pub from: i32,
    /// Upper standing height
    pub to: i32,
}

impl JumpGap {
    pub fn height(&self) -> i32 {
        self.to - self.from
    }
}

/// Standing heights to insert between `from` and `to`
///
/// `⌈gap / jump⌉ − 1` heights at rounded even spacing; empty when the gap
/// is already within `jump`.
pub fn platform_heights(from: i32, to: i32, jump: i32) -> Vec<i32> {
    let gap = to - from;
    let jump = jump.max(1);
    if gap <= jump {
        return Vec::new();
    }
    let hops = (gap + jump - 1) / jump;
    (1..hops).map(|k| from + (gap * k + hops / 2) / hops).collect()
}

/// Every jump gap in the grid, column by column from the left
///
/// `anchors` are heights that must be reachable even without ground under
/// them (the exit).
pub fn find_jump_gaps(grid: &TileGrid, jump: i32, anchors: &[GridPos]) -> Vec<JumpGap> {
    let mut gaps = Vec::new();
    for x in 0..grid.width() {
        for surfaces in column_surfaces(grid, x, anchors) {
            for pair in surfaces.windows(2) {
                if pair[1] - pair[0] > jump {
                    gaps.push(JumpGap {
                        column: x,
                        from: pair[0],
                        to: pair[1],
                    });
                }
            }
        }
    }
    gaps
}

/// Insert platforms until no jump gap remains
///
/// Returns the platform cells placed, in placement order. Platforms only
/// replace floor cells.
pub fn inject_platforms(grid: &mut TileGrid, jump: i32, anchors: &[GridPos]) -> Vec<GridPos> {
    let mut placed = Vec::new();
    let max_passes = grid.width() + 2;

    for pass in 0..max_passes {
        let gaps = find_jump_gaps(grid, jump, anchors);
        if gaps.is_empty() {
            debug!("platforms: {} placed in {} passes", placed.len(), pass);
            return placed;
        }

        let before = placed.len();
        for gap in &gaps {
            trace!("gap of {} in column {} at {}", gap.height(), gap.column, gap.from);
            for h in platform_heights(gap.from, gap.to, jump) {
                let cell = GridPos::new(gap.column, h - 1);
                if grid.get(cell) == Tile::Floor {
                    grid.set(cell, Tile::Platform);
                    placed.push(cell);
                }
            }
        }
        if placed.len() == before {
            break;
        }
    }

    let left = find_jump_gaps(grid, jump, anchors).len();
    if left > 0 {
        warn!("{} jump gaps remain after platform injection", left);
    }
    placed
}

/// Sorted standing heights of each maximal open run in column `x`
fn column_surfaces(grid: &TileGrid, x: i32, anchors: &[GridPos]) -> Vec<Vec<i32>> {
    let mut runs = Vec::new();
    let mut y = 0;
    while y < grid.height() {
        if grid.get(GridPos::new(x, y)) == Tile::Wall {
            y += 1;
            continue;
        }
        let start = y;
        while y < grid.height() && grid.get(GridPos::new(x, y)) != Tile::Wall {
            y += 1;
        }
        let end = y;

        let mut surfaces: Vec<i32> = (start..end)
            .filter(|&h| is_surface(grid, GridPos::new(x, h)))
            .collect();
        surfaces.extend(
            anchors
                .iter()
                .filter(|a| a.x == x && a.y >= start && a.y < end)
                .map(|a| a.y),
        );
        surfaces.sort_unstable();
        surfaces.dedup();
        runs.push(surfaces);
    }
    runs
}

/// Floor with support below, or floor beside a cell that has it
fn is_surface(grid: &TileGrid, p: GridPos) -> bool {
    if grid.get(p) != Tile::Floor {
        return false;
    }
    grid.is_standable(p) || grid.is_standable(p.offset(-1, 0)) || grid.is_standable(p.offset(1, 0))
}
