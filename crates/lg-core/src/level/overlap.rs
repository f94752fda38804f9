//! Overlap detection between level elements
//!
//! A pure query: conflicts are reported, never resolved.

use serde::{Deserialize, Serialize};

use super::types::{CorridorSegment, PlacedRoom};

/// A room (by id) or a corridor (by index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LevelElement {
    Room(u32),
    Corridor(u32),
}

impl std::fmt::Display for LevelElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelElement::Room(id) => write!(f, "room {}", id),
            LevelElement::Corridor(i) => write!(f, "corridor {}", i),
        }
    }
}

/// Two elements whose rectangles intersect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overlap {
    pub first: LevelElement,
    pub second: LevelElement,
}

/// Every room/room pair and corridor/room pair that intersects
///
/// A corridor is only checked against rooms it does not connect; it always
/// cuts into its own two rooms.
pub fn find_overlaps(rooms: &[PlacedRoom], corridors: &[CorridorSegment]) -> Vec<Overlap> {
    let mut out = Vec::new();

    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            if a.world_bounds().intersects(&b.world_bounds()) {
                out.push(Overlap {
                    first: LevelElement::Room(a.id),
                    second: LevelElement::Room(b.id),
                });
            }
        }
    }

    for (index, corridor) in corridors.iter().enumerate() {
        for room in rooms {
            if room.id == corridor.from_room || room.id == corridor.to_room {
                continue;
            }
            let bounds = room.world_bounds();
            if corridor.legs.iter().any(|leg| leg.intersects(&bounds)) {
                out.push(Overlap {
                    first: LevelElement::Corridor(index as u32),
                    second: LevelElement::Room(room.id),
                });
            }
        }
    }

    out
}
