//! Corridors between consecutive rooms of a level

use tracing::trace;

use super::types::{CorridorSegment, PlacedRoom};
use crate::generation::corridor::leg;
use crate::grid::{GridPos, GridRect};

/// Join `prev`'s exit to `next`'s entrance
///
/// Straight when both anchors are at the same height. Otherwise the
/// corridor runs right from the exit, climbs or drops along a vertical leg
/// centered in the gap between the rooms, and runs right again into the
/// entrance. A vertical leg taller than `jump` gets a row of platforms every
/// `min(platform_spacing, jump)` cells.
pub fn build_corridor(
    prev: &PlacedRoom,
    next: &PlacedRoom,
    spacing: i32,
    width: i32,
    platform_spacing: i32,
    jump: i32,
) -> CorridorSegment {
    let width = width.max(1);
    let start = prev.world_exit();
    let end = next.world_entrance();

    let (corners, legs) = if start.y == end.y {
        (Vec::new(), vec![leg(start, end, width)])
    } else {
        let gap_start = prev.offset.x + prev.width;
        let x = gap_start + (spacing - width).max(0) / 2;
        let low = GridPos::new(x, start.y);
        let high = GridPos::new(x, end.y);
        (
            vec![low, high],
            vec![leg(start, low, width), leg(low, high, width), leg(high, end, width)],
        )
    };

    let platforms = match corners.first() {
        Some(corner) if (end.y - start.y).abs() > jump => {
            let step = platform_spacing.min(jump).max(1);
            let bottom = start.y.min(end.y);
            let top = start.y.max(end.y);
            (1..)
                .map(|k| bottom + step * k)
                .take_while(|&h| h < top)
                .flat_map(|h| (0..width).map(move |dx| GridPos::new(corner.x + dx, h - 1)))
                .collect()
        }
        _ => Vec::new(),
    };

    let bounds = legs
        .iter()
        .fold(GridRect::new(0, 0, 0, 0), |acc, r| acc.union(r));

    trace!(
        "corridor {} -> {}: {:?} to {:?}, {} platform cells",
        prev.id,
        next.id,
        start,
        end,
        platforms.len()
    );

    CorridorSegment {
        from_room: prev.id,
        to_room: next.id,
        start,
        end,
        corners,
        thickness: width,
        legs,
        bounds,
        platforms,
    }
}
