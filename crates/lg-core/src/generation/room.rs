//! Room regions produced by the placer

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::grid::{GridPos, GridRect};

/// Room identifier, equal to the room's index in placement order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

bitflags! {
    /// Role flags of a room region
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RoomFlags: u8 {
        /// Nearest region to the global entrance
        const ENTRANCE = 0x01;
        /// Nearest region to the global exit
        const EXIT = 0x02;
    }
}

// Manual serde impl for RoomFlags
impl Serialize for RoomFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoomFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(RoomFlags::from_bits_truncate(bits))
    }
}

/// A carved rectangular room inside a BSP leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRegion {
    pub id: RoomId,
    pub bounds: GridRect,
    pub center: GridPos,
    pub flags: RoomFlags,
}

impl RoomRegion {
    pub fn new(id: RoomId, bounds: GridRect) -> Self {
        Self {
            id,
            bounds,
            center: bounds.center(),
            flags: RoomFlags::empty(),
        }
    }

    pub fn is_entrance(&self) -> bool {
        self.flags.contains(RoomFlags::ENTRANCE)
    }

    pub fn is_exit(&self) -> bool {
        self.flags.contains(RoomFlags::EXIT)
    }

    /// Check if the carved rectangle overlaps another room's, with `margin` cells of slack
    pub fn overlaps(&self, other: &RoomRegion, margin: i32) -> bool {
        self.bounds
            .inset(-margin)
            .intersects(&other.bounds)
    }
}
