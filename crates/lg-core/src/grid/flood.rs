//! Flood fill over passable cells (4-directional)

use super::{GridPos, TileGrid};

/// Mark every cell reachable from `start` through non-wall cells
///
/// The returned mask is row-major from the bottom row, like the grid.
/// An impassable or out-of-bounds start reaches nothing.
pub fn flood_fill(grid: &TileGrid, start: GridPos) -> Vec<bool> {
    let width = grid.width();
    let mut visited = vec![false; (grid.width() * grid.height()) as usize];
    if !grid.in_bounds(start) || !grid.get(start).is_passable() {
        return visited;
    }

    let mut stack = vec![start];
    visited[(start.y * width + start.x) as usize] = true;

    while let Some(p) = stack.pop() {
        for n in p.neighbors4() {
            if !grid.in_bounds(n) || !grid.get(n).is_passable() {
                continue;
            }
            let i = (n.y * width + n.x) as usize;
            if !visited[i] {
                visited[i] = true;
                stack.push(n);
            }
        }
    }

    visited
}

/// Check if `a` and `b` lie in the same passable component
pub fn is_connected(grid: &TileGrid, a: GridPos, b: GridPos) -> bool {
    if !grid.in_bounds(b) {
        return false;
    }
    let reached = flood_fill(grid, a);
    reached[(b.y * grid.width() + b.x) as usize]
}

/// Number of cells reachable from `start`
pub fn reachable_count(grid: &TileGrid, start: GridPos) -> usize {
    flood_fill(grid, start).into_iter().filter(|&v| v).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connected_through_platform() {
        let grid = TileGrid::from_ascii(
            "
            #######
            #..=..#
            #######
            ",
        )
        .unwrap();
        assert!(is_connected(&grid, GridPos::new(1, 1), GridPos::new(5, 1)));
        assert_eq!(reachable_count(&grid, GridPos::new(1, 1)), 5);
    }

    #[test]
    fn test_disconnected_by_wall() {
        let grid = TileGrid::from_ascii(
            "
            #######
            #..#..#
            #######
            ",
        )
        .unwrap();
        assert!(!is_connected(&grid, GridPos::new(1, 1), GridPos::new(5, 1)));
    }

    #[test]
    fn test_no_diagonal_moves() {
        let grid = TileGrid::from_ascii(
            "
            ####
            #.##
            ##.#
            ####
            ",
        )
        .unwrap();
        assert!(!is_connected(&grid, GridPos::new(1, 2), GridPos::new(2, 1)));
    }

    #[test]
    fn test_wall_start_reaches_nothing() {
        let grid = TileGrid::new(4, 4);
        assert_eq!(reachable_count(&grid, GridPos::new(1, 1)), 0);
        assert!(!is_connected(&grid, GridPos::new(1, 1), GridPos::new(-1, 1)));
    }
}
