//! Room placement inside BSP leaves

use tracing::{debug, trace};

use super::bsp::BspTree;
use super::room::{RoomFlags, RoomId, RoomRegion};
use crate::grid::{GridPos, GridRect, TileGrid};
use crate::rng::GenRng;

/// Carve one room per usable leaf and flag the entrance and exit rooms
///
/// Leaves are visited depth-first, low child first, so room ids follow the
/// partition order. A leaf whose inset area is smaller than `min_room_size`
/// on either side gets no room.
pub fn place_rooms(
    grid: &mut TileGrid,
    tree: &BspTree,
    margin: i32,
    min_room_size: i32,
    entrance: GridPos,
    exit: GridPos,
    rng: &mut GenRng,
) -> Vec<RoomRegion> {
    let mut rooms = Vec::new();

    for leaf in tree.leaves() {
        let avail = leaf.bounds.inset(margin);
        if avail.width < min_room_size || avail.height < min_room_size {
            trace!("leaf {:?} too small for a room", leaf.bounds);
            continue;
        }

        let width = random_side(avail.width, min_room_size, rng);
        let height = random_side(avail.height, min_room_size, rng);
        let x = rng.range(avail.x, avail.right() - width);
        let y = rng.range(avail.y, avail.top() - height);
        let bounds = GridRect::new(x, y, width, height);

        grid.carve_rect(&bounds);
        let id = RoomId(rooms.len() as u32);
        trace!("placed {} at {:?}", id, bounds);
        rooms.push(RoomRegion::new(id, bounds));
    }

    if let Some(i) = nearest_room(&rooms, entrance) {
        rooms[i].flags |= RoomFlags::ENTRANCE;
    }
    if let Some(i) = nearest_room(&rooms, exit) {
        rooms[i].flags |= RoomFlags::EXIT;
    }

    debug!("placed {} rooms in {} leaves", rooms.len(), tree.leaf_count());
    rooms
}

/// Side length between 60% of the available space and all of it
fn random_side(avail: i32, min_room_size: i32, rng: &mut GenRng) -> i32 {
    let lo = min_room_size.max(avail * 6 / 10).min(avail);
    rng.range(lo, avail)
}

/// Index of the room whose center is closest to `target` (first wins ties)
fn nearest_room(rooms: &[RoomRegion], target: GridPos) -> Option<usize> {
    rooms
        .iter()
        .enumerate()
        .min_by_key(|(_, room)| room.center.distance_sq(target))
        .map(|(i, _)| i)
}
