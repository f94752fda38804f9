//! Serializable level layout
//!
//! Enough to rebuild a level without storing any grid: each room's type,
//! seed, offset and cached anchors, plus corridor endpoints. Replaying
//! checks the regenerated rooms against the cached values.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::assembler::{finish_level, mark_boss};
use super::types::{LevelData, PlacedRoom, RoomType};
use crate::generation::generate_room;
use crate::grid::GridPos;
use crate::params::LevelParameters;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout has no rooms")]
    Empty,

    #[error("room {room}: cached {field} is {expected}, regenerated {found}")]
    RoomMismatch {
        room: u32,
        field: &'static str,
        expected: String,
        found: String,
    },

    #[error("corridor {index}: endpoints {expected} do not match regenerated {found}")]
    CorridorMismatch {
        index: usize,
        expected: String,
        found: String,
    },
}

/// Per-room layout record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    pub id: u32,
    pub room_type: RoomType,
    pub seed: u64,
    pub offset: GridPos,
    pub width: i32,
    pub height: i32,
    pub entrance: GridPos,
    pub exit: GridPos,
}

impl From<&PlacedRoom> for RoomLayout {
    fn from(room: &PlacedRoom) -> Self {
        Self {
            id: room.id,
            room_type: room.room_type,
            seed: room.seed,
            offset: room.offset,
            width: room.width,
            height: room.height,
            entrance: room.entrance,
            exit: room.exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorLayout {
    pub from_room: u32,
    pub to_room: u32,
    pub start: GridPos,
    pub end: GridPos,
}

/// A level without its grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    pub seed: u64,
    pub params: LevelParameters,
    pub rooms: Vec<RoomLayout>,
    pub corridors: Vec<CorridorLayout>,
}

impl LevelData {
    pub fn layout(&self) -> LevelLayout {
        LevelLayout {
            seed: self.seed,
            params: self.params.clone(),
            rooms: self.rooms.iter().map(RoomLayout::from).collect(),
            corridors: self
                .corridors
                .iter()
                .map(|c| CorridorLayout {
                    from_room: c.from_room,
                    to_room: c.to_room,
                    start: c.start,
                    end: c.end,
                })
                .collect(),
        }
    }
}

impl LevelLayout {
    /// Rebuild the full level by replaying every room's seed at its stored offset
    pub fn regenerate(&self) -> Result<LevelData, LayoutError> {
        if self.rooms.is_empty() {
            return Err(LayoutError::Empty);
        }
        let params = self.params.clone().validated();

        let mut rooms = Vec::with_capacity(self.rooms.len());
        for record in &self.rooms {
            let data = generate_room(&params.params_for(record.room_type), record.seed);
            let mut room = PlacedRoom::new(record.id, record.room_type, record.offset, data);
            check_room(record, &room)?;
            if room.room_type == RoomType::Boss {
                mark_boss(&mut room);
            }
            rooms.push(room);
        }

        let level = finish_level(params, self.seed, rooms);

        for (index, (stored, rebuilt)) in self.corridors.iter().zip(&level.corridors).enumerate() {
            if (stored.start, stored.end) != (rebuilt.start, rebuilt.end) {
                return Err(LayoutError::CorridorMismatch {
                    index,
                    expected: format!("{:?}-{:?}", stored.start, stored.end),
                    found: format!("{:?}-{:?}", rebuilt.start, rebuilt.end),
                });
            }
        }

        debug!("replayed layout with {} rooms", level.rooms.len());
        Ok(level)
    }
}

fn check_room(record: &RoomLayout, room: &PlacedRoom) -> Result<(), LayoutError> {
    let mismatch = |field: &'static str, expected: String, found: String| LayoutError::RoomMismatch {
        room: record.id,
        field,
        expected,
        found,
    };

    if (record.width, record.height) != (room.width, room.height) {
        return Err(mismatch(
            "size",
            format!("{}x{}", record.width, record.height),
            format!("{}x{}", room.width, room.height),
        ));
    }
    if record.entrance != room.entrance {
        return Err(mismatch(
            "entrance",
            format!("{:?}", record.entrance),
            format!("{:?}", room.entrance),
        ));
    }
    if record.exit != room.exit {
        return Err(mismatch(
            "exit",
            format!("{:?}", record.exit),
            format!("{:?}", room.exit),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::generate_level;

    fn level() -> LevelData {
        let params = LevelParameters {
            combat_rooms: 2,
            ..Default::default()
        };
        generate_level(&params, 42)
    }

    #[test]
    fn test_layout_replays_to_same_level() {
        let original = level();
        let layout = original.layout();
        assert_eq!(layout.rooms.len(), original.rooms.len());
        assert_eq!(layout.corridors.len(), original.corridors.len());

        let replayed = layout.regenerate().unwrap();
        assert_eq!(replayed, original);
    }

    #[test]
    fn test_layout_json_round_trip() {
        let layout = level().layout();
        let json = serde_json::to_string(&layout).unwrap();
        let back: LevelLayout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }

    #[test]
    fn test_tampered_anchor_is_detected() {
        let mut layout = level().layout();
        layout.rooms[1].exit.y += 1;
        match layout.regenerate() {
            Err(LayoutError::RoomMismatch { room, field, .. }) => {
                assert_eq!(room, 1);
                assert_eq!(field, "exit");
            }
            other => panic!("expected a room mismatch, got {:?}", other.map(|l| l.seed)),
        }
    }

    #[test]
    fn test_empty_layout() {
        let mut layout = level().layout();
        layout.rooms.clear();
        assert_eq!(layout.regenerate(), Err(LayoutError::Empty));
    }
}
