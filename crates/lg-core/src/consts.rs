//! Generation constants
//!
//! Defaults and hard limits shared by the parameter types and the pipeline.

/// Default room dimensions (grid cells)
pub const DEFAULT_ROOM_WIDTH: i32 = 60;
pub const DEFAULT_ROOM_HEIGHT: i32 = 30;

/// Room dimension limits enforced by validation
pub const MIN_ROOM_WIDTH: i32 = 16;
pub const MIN_ROOM_HEIGHT: i32 = 12;
pub const MAX_ROOM_DIMENSION: i32 = 512;

/// Smallest carved room (either side) the placer will produce
pub const MIN_ROOM_SIZE: i32 = 3;

/// Jump envelope limits
pub const MIN_JUMP_HEIGHT: i32 = 3;
pub const MAX_JUMP_HEIGHT: i32 = 64;

/// Aspect ratio above which the BSP always cuts the longer side
pub const BSP_ASPECT_SPLIT: f32 = 1.25;

/// Walk step budget per pass, as a multiple of the grid perimeter
pub const WALK_BUDGET_PER_PERIMETER: i32 = 4;

/// Vertical clearance (cells above the standing cell) required for ground spawns
pub const GROUND_HEAD_CLEARANCE: i32 = 2;

/// Map symbols
pub const S_WALL: char = '#';
pub const S_FLOOR: char = '.';
pub const S_PLATFORM: char = '=';
pub const S_ENTRANCE: char = 'E';
pub const S_EXIT: char = 'X';
pub const S_GROUND_SPAWN: char = 'g';
pub const S_AIR_SPAWN: char = 'a';
pub const S_VOID: char = ' ';
