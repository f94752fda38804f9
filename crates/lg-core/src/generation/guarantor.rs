//! Connectivity backstop: biased random walks between entrance and exit
//!
//! Whatever the earlier stages produced, two walks (entrance to exit, then
//! exit to entrance) carve a brush-wide path so the anchors end up in one
//! passable component. Walks only turn walls into floor.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::WALK_BUDGET_PER_PERIMETER;
use crate::grid::{is_connected, GridPos, GridRect, TileGrid};
use crate::rng::GenRng;

/// Walk tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkParams {
    /// Radius of the square brush (0 carves single cells)
    pub brush_radius: i32,
    /// Probability of preferring a horizontal step toward the target
    pub horizontal_bias: f32,
    /// Probability of a random step instead of a step toward the target
    pub wander_chance: f32,
}

/// What the two walks achieved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuarantorOutcome {
    pub forward_arrived: bool,
    pub backward_arrived: bool,
    /// Entrance and exit share a passable component after both walks
    pub connected: bool,
    pub carved_cells: usize,
}

/// Walk entrance → exit and back, then verify with a flood fill
///
/// The backward walk prefers vertical moves (bias `1 - horizontal_bias`).
/// A failed verification is logged, never fatal.
pub fn guarantee_path(
    grid: &mut TileGrid,
    entrance: GridPos,
    exit: GridPos,
    params: &WalkParams,
    rng: &mut GenRng,
) -> GuarantorOutcome {
    let budget = WALK_BUDGET_PER_PERIMETER * 2 * (grid.width() + grid.height());

    let (forward_arrived, forward_cells) = walk(
        grid,
        entrance,
        exit,
        params.brush_radius,
        params.horizontal_bias,
        params.wander_chance,
        budget,
        rng,
    );
    let (backward_arrived, backward_cells) = walk(
        grid,
        exit,
        entrance,
        params.brush_radius,
        1.0 - params.horizontal_bias,
        params.wander_chance,
        budget,
        rng,
    );

    let connected = is_connected(grid, entrance, exit);
    if !connected {
        warn!(
            "entrance {:?} and exit {:?} still disconnected after walks",
            entrance, exit
        );
    }

    let outcome = GuarantorOutcome {
        forward_arrived,
        backward_arrived,
        connected,
        carved_cells: forward_cells + backward_cells,
    };
    debug!("guarantor: {:?}", outcome);
    outcome
}

/// One biased walk. Returns (arrived, cells carved).
#[allow(clippy::too_many_arguments)]
fn walk(
    grid: &mut TileGrid,
    from: GridPos,
    to: GridPos,
    radius: i32,
    bias: f32,
    wander: f32,
    budget: i32,
    rng: &mut GenRng,
) -> (bool, usize) {
    let interior = grid.interior();
    if !interior.is_valid() {
        return (false, 0);
    }

    let target = interior.clamp_point(to);
    let mut pos = interior.clamp_point(from);
    let mut carved = carve_brush(grid, pos, radius);

    for _ in 0..budget {
        if pos.chebyshev(target) <= radius {
            // The brush at `pos` already covers the target
            carved += carve_brush(grid, target, radius);
            return (true, carved);
        }

        let (dx, dy) = if rng.chance(wander as f64) {
            match rng.rn2(4) {
                0 => (-1, 0),
                1 => (1, 0),
                2 => (0, -1),
                _ => (0, 1),
            }
        } else {
            let dx = target.x - pos.x;
            let dy = target.y - pos.y;
            if dx != 0 && (dy == 0 || rng.chance(bias as f64)) {
                (dx.signum(), 0)
            } else {
                (0, dy.signum())
            }
        };

        pos = interior.clamp_point(pos.offset(dx, dy));
        carved += carve_brush(grid, pos, radius);
    }

    warn!("walk {:?} -> {:?} ran out of steps at {:?}", from, to, pos);
    (false, carved)
}

fn carve_brush(grid: &mut TileGrid, center: GridPos, radius: i32) -> usize {
    let size = 2 * radius + 1;
    grid.carve_rect(&GridRect::new(center.x - radius, center.y - radius, size, size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    fn params() -> WalkParams {
        WalkParams {
            brush_radius: 1,
            horizontal_bias: 0.7,
            wander_chance: 0.15,
        }
    }

    #[test]
    fn test_connects_solid_grid() {
        for seed in 0..20 {
            let mut rng = GenRng::new(seed);
            let mut grid = TileGrid::new(60, 30);
            let entrance = GridPos::new(3, 5);
            let exit = GridPos::new(56, 24);
            let outcome = guarantee_path(&mut grid, entrance, exit, &params(), &mut rng);
            assert!(outcome.forward_arrived && outcome.backward_arrived);
            assert!(outcome.connected);
            assert!(is_connected(&grid, entrance, exit));
        }
    }

    #[test]
    fn test_zero_radius_brush() {
        let mut rng = GenRng::new(42);
        let mut grid = TileGrid::new(30, 20);
        let p = WalkParams {
            brush_radius: 0,
            ..params()
        };
        let outcome = guarantee_path(&mut grid, GridPos::new(2, 2), GridPos::new(27, 17), &p, &mut rng);
        assert!(outcome.connected);
    }

    #[test]
    fn test_never_touches_border_or_platforms() {
        let mut rng = GenRng::new(42);
        let mut grid = TileGrid::new(30, 12);
        for x in 1..29 {
            grid.set(GridPos::new(x, 6), Tile::Platform);
        }
        let outcome = guarantee_path(&mut grid, GridPos::new(1, 1), GridPos::new(28, 10), &params(), &mut rng);
        assert!(outcome.connected);
        for x in 1..29 {
            assert_eq!(grid.get(GridPos::new(x, 6)), Tile::Platform);
        }
        for x in 0..30 {
            assert_eq!(grid.get(GridPos::new(x, 0)), Tile::Wall);
            assert_eq!(grid.get(GridPos::new(x, 11)), Tile::Wall);
        }
    }

    #[test]
    fn test_already_connected_carves_little() {
        let mut rng = GenRng::new(42);
        let mut grid = TileGrid::new(20, 10);
        grid.carve_rect(&grid.interior());
        let outcome = guarantee_path(&mut grid, GridPos::new(2, 2), GridPos::new(17, 7), &params(), &mut rng);
        assert_eq!(outcome.carved_cells, 0);
        assert!(outcome.connected);
    }
}
