//! Corridor carving along graph edges
//!
//! Each edge gets a straight or L-shaped passage between the facing
//! boundary points of its two rooms. Both legs of an L are widened by the
//! corridor width in the positive direction, so the corner square is fully
//! open.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::graph::RoomGraph;
use super::room::{RoomId, RoomRegion};
use crate::grid::{GridPos, GridRect, TileGrid};
use crate::rng::GenRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorridorShape {
    Straight,
    LShaped { corner: GridPos },
}

/// A passage carved between two rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarvedCorridor {
    pub from: RoomId,
    pub to: RoomId,
    pub start: GridPos,
    pub end: GridPos,
    pub shape: CorridorShape,
    /// Cells turned from wall to floor (overlap with rooms is not counted)
    pub carved: usize,
}

/// Carve a passage for every edge of the final graph
pub fn carve_corridors(
    grid: &mut TileGrid,
    graph: &RoomGraph,
    width: i32,
    rng: &mut GenRng,
) -> Vec<CarvedCorridor> {
    let width = width.max(1);
    let mut corridors = Vec::with_capacity(graph.edges.len());

    for edge in &graph.edges {
        let (Some(a), Some(b)) = (graph.room(edge.a), graph.room(edge.b)) else {
            continue;
        };
        let corridor = carve_between(grid, a, b, width, rng);
        trace!(
            "corridor {} -> {}: {:?}, {} cells",
            corridor.from,
            corridor.to,
            corridor.shape,
            corridor.carved
        );
        corridors.push(corridor);
    }

    debug!("carved {} corridors", corridors.len());
    corridors
}

/// Point of `room` closest to `toward`
///
/// When `toward` lies inside the room, that point itself is returned.
pub fn facing_point(room: &RoomRegion, toward: GridPos) -> GridPos {
    room.bounds.clamp_point(toward)
}

fn carve_between(
    grid: &mut TileGrid,
    a: &RoomRegion,
    b: &RoomRegion,
    width: i32,
    rng: &mut GenRng,
) -> CarvedCorridor {
    let start = facing_point(a, b.center);
    let end = facing_point(b, a.center);

    let dx = (end.x - start.x).abs();
    let dy = (end.y - start.y).abs();

    let (shape, carved) = if dx <= width || dy <= width {
        (CorridorShape::Straight, grid.carve_rect(&leg(start, end, width)))
    } else {
        let corner = if rng.one_in(2) {
            GridPos::new(start.x, end.y)
        } else {
            GridPos::new(end.x, start.y)
        };
        let carved = grid.carve_rect(&leg(start, corner, width)) + grid.carve_rect(&leg(corner, end, width));
        (CorridorShape::LShaped { corner }, carved)
    };

    CarvedCorridor {
        from: a.id,
        to: b.id,
        start,
        end,
        shape,
        carved,
    }
}

/// Rectangle covering the segment `from`–`to`, widened by `width - 1`
/// cells to the right and upward
pub fn leg(from: GridPos, to: GridPos, width: i32) -> GridRect {
    let r = GridRect::from_corners(from, to);
    GridRect::new(r.x, r.y, r.width + width - 1, r.height + width - 1)
}
