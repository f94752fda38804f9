//! Advisory "anchors updated" event
//!
//! After a room is baked into world space the host may want to move its
//! player spawn, camera or level trigger. The generator has no bus of its
//! own; it hands the event to whatever listeners the caller passes in.

use serde::{Deserialize, Serialize};

use crate::grid::GridPos;

/// A point in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of grid cell `cell` for cells of side `cell_size` with cell (0, 0) at `origin`
    pub fn from_cell(cell: GridPos, cell_size: f32, origin: WorldPoint) -> Self {
        Self {
            x: origin.x + (cell.x as f32 + 0.5) * cell_size,
            y: origin.y + (cell.y as f32 + 0.5) * cell_size,
        }
    }
}

/// Entrance and exit of a baked room, in grid and world coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorsUpdated {
    pub seed: u64,
    pub entrance: GridPos,
    pub exit: GridPos,
    pub entrance_world: WorldPoint,
    pub exit_world: WorldPoint,
}

/// Receiver of [`AnchorsUpdated`] events
pub trait AnchorListener {
    fn anchors_updated(&mut self, event: &AnchorsUpdated);
}

impl<F> AnchorListener for F
where
    F: FnMut(&AnchorsUpdated),
{
    fn anchors_updated(&mut self, event: &AnchorsUpdated) {
        (self)(event)
    }
}

/// Deliver `event` to every listener, in order
pub fn publish_anchors(event: &AnchorsUpdated, listeners: &mut [&mut dyn AnchorListener]) {
    for listener in listeners.iter_mut() {
        listener.anchors_updated(event);
    }
}
