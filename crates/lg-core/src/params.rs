//! Generation parameters
//!
//! Plain configuration values. Nothing here is ever fatal: [`GenerationParameters::validated`]
//! and [`LevelParameters::validated`] clamp every field into its legal range and
//! log what they changed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::*;
use crate::level::RoomType;
use crate::rng::seed_from_str;

fn clamp_i32(name: &str, value: &mut i32, lo: i32, hi: i32) {
    let hi = hi.max(lo);
    let clamped = (*value).clamp(lo, hi);
    if clamped != *value {
        debug!("clamped {} from {} to {}", name, *value, clamped);
        *value = clamped;
    }
}

fn clamp_f32(name: &str, value: &mut f32, lo: f32, hi: f32, fallback: f32) {
    let clamped = if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    };
    if clamped != *value {
        debug!("clamped {} from {} to {}", name, *value, clamped);
        *value = clamped;
    }
}

/// Configuration for generating a single room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Grid width in cells
    pub room_width: i32,
    /// Grid height in cells
    pub room_height: i32,
    /// Seed used when `use_random_seed` is false
    pub seed: u64,
    /// Draw a fresh seed from system entropy on every call
    pub use_random_seed: bool,
    /// Inset of the entrance and exit from the left/right boundary
    pub edge_padding: i32,

    /// Smallest BSP leaf side
    pub min_leaf_size: i32,
    /// Maximum BSP depth (root is depth 0)
    pub max_depth: u32,
    /// Split position jitter as a fraction of the node size
    pub split_jitter: f32,
    /// Inset of each carved room from its leaf
    pub room_margin: i32,
    /// Smallest carved room side
    pub min_room_size: i32,

    /// Carved passage thickness
    pub corridor_width: i32,
    /// Fraction of non-tree candidate edges re-added as loops
    pub extra_edge_ratio: f32,

    /// Single jump rise in cells
    pub max_jump_height: i32,
    pub has_double_jump: bool,
    /// Height lost between the two jumps of a double jump
    pub double_jump_overlap: i32,

    /// Radius of the square brush the connectivity walk carves with
    pub brush_radius: i32,
    /// Probability of a horizontal step on the forward walk
    pub horizontal_bias: f32,
    /// Probability of a random step instead of a step toward the target
    pub wander_chance: f32,

    pub min_ground_span: i32,
    pub min_air_height: i32,
    /// Acceptance probability for each valid air cell
    pub air_spawn_chance: f32,
    pub min_spawn_distance: f32,
    pub min_enemies: usize,
    pub max_enemies: usize,
    /// Manhattan radius around entrance and exit with no spawns
    pub safe_zone_radius: i32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            room_width: DEFAULT_ROOM_WIDTH,
            room_height: DEFAULT_ROOM_HEIGHT,
            seed: 0,
            use_random_seed: false,
            edge_padding: 3,
            min_leaf_size: 10,
            max_depth: 4,
            split_jitter: 0.2,
            room_margin: 1,
            min_room_size: 4,
            corridor_width: 2,
            extra_edge_ratio: 0.15,
            max_jump_height: 3,
            has_double_jump: true,
            double_jump_overlap: 1,
            brush_radius: 1,
            horizontal_bias: 0.7,
            wander_chance: 0.15,
            min_ground_span: 3,
            min_air_height: 3,
            air_spawn_chance: 0.05,
            min_spawn_distance: 6.0,
            min_enemies: 2,
            max_enemies: 8,
            safe_zone_radius: 6,
        }
    }
}

impl GenerationParameters {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.use_random_seed = false;
        self
    }

    /// Use a textual seed (hashed with [`seed_from_str`])
    pub fn with_seed_str(self, seed: &str) -> Self {
        self.with_seed(seed_from_str(seed))
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.room_width = width;
        self.room_height = height;
        self
    }

    /// The seed a generation call will use
    pub fn resolve_seed(&self) -> u64 {
        if self.use_random_seed {
            rand::random()
        } else {
            self.seed
        }
    }

    /// Highest rise reachable in one jump sequence
    pub fn effective_jump_height(&self) -> i32 {
        effective_jump_height(
            self.max_jump_height,
            self.has_double_jump,
            self.double_jump_overlap,
        )
    }

    /// Return a copy with every field clamped into its legal range
    pub fn validated(mut self) -> Self {
        clamp_i32("room_width", &mut self.room_width, MIN_ROOM_WIDTH, MAX_ROOM_DIMENSION);
        clamp_i32("room_height", &mut self.room_height, MIN_ROOM_HEIGHT, MAX_ROOM_DIMENSION);

        // Entrance and exit must sit inside the border and stay on opposite halves
        let short_side = self.room_width.min(self.room_height);
        clamp_i32("edge_padding", &mut self.edge_padding, 1, (short_side - 1) / 2 - 1);

        clamp_i32("room_margin", &mut self.room_margin, 1, 4);
        clamp_i32("min_room_size", &mut self.min_room_size, MIN_ROOM_SIZE, 16);
        clamp_i32(
            "min_leaf_size",
            &mut self.min_leaf_size,
            self.min_room_size + 2 * self.room_margin,
            MAX_ROOM_DIMENSION,
        );
        if self.max_depth > 12 {
            debug!("clamped max_depth from {} to 12", self.max_depth);
            self.max_depth = 12;
        }
        clamp_f32("split_jitter", &mut self.split_jitter, 0.0, 0.45, 0.2);

        clamp_i32("corridor_width", &mut self.corridor_width, 1, 6);
        clamp_f32("extra_edge_ratio", &mut self.extra_edge_ratio, 0.0, 1.0, 0.15);

        clamp_i32("max_jump_height", &mut self.max_jump_height, MIN_JUMP_HEIGHT, MAX_JUMP_HEIGHT);
        clamp_i32(
            "double_jump_overlap",
            &mut self.double_jump_overlap,
            0,
            self.max_jump_height - 1,
        );

        clamp_i32("brush_radius", &mut self.brush_radius, 0, 4);
        clamp_f32("horizontal_bias", &mut self.horizontal_bias, 0.0, 1.0, 0.7);
        clamp_f32("wander_chance", &mut self.wander_chance, 0.0, 0.5, 0.15);

        clamp_i32("min_ground_span", &mut self.min_ground_span, 1, self.room_width);
        clamp_i32("min_air_height", &mut self.min_air_height, 1, self.room_height);
        clamp_f32("air_spawn_chance", &mut self.air_spawn_chance, 0.0, 1.0, 0.05);
        clamp_f32(
            "min_spawn_distance",
            &mut self.min_spawn_distance,
            0.0,
            (self.room_width + self.room_height) as f32,
            6.0,
        );
        if self.min_enemies > self.max_enemies {
            debug!(
                "swapped inverted enemy range {}..{}",
                self.min_enemies, self.max_enemies
            );
            std::mem::swap(&mut self.min_enemies, &mut self.max_enemies);
        }
        clamp_i32(
            "safe_zone_radius",
            &mut self.safe_zone_radius,
            0,
            self.room_width + self.room_height,
        );

        self
    }
}

/// Highest rise reachable with the given jump envelope
///
/// A double jump reaches twice the single height minus the overlap between
/// the two arcs.
pub fn effective_jump_height(max_jump_height: i32, has_double_jump: bool, overlap: i32) -> i32 {
    if has_double_jump {
        2 * max_jump_height - overlap
    } else {
        max_jump_height
    }
}

/// Configuration for assembling a multi-room level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelParameters {
    /// Template for combat rooms. Its seed is the level seed.
    pub room: GenerationParameters,
    pub combat_rooms: usize,
    /// Seeds pre-drawn for combat rooms; rooms draw from it without replacement
    pub seed_pool_size: usize,
    /// Horizontal gap between consecutive rooms
    pub room_spacing: i32,
    /// Inclusive range of vertical world offsets for rooms after the first
    pub y_offset_range: (i32, i32),
    /// Thickness of inter-room corridors
    pub corridor_width: i32,
    /// Minimum |next entrance y - previous exit y|; defaults to `corridor_width`
    pub min_height_difference: Option<i32>,
    /// Distance between platforms on a vertical corridor leg
    pub platform_spacing: i32,
    pub entrance_room_size: (i32, i32),
    pub boss_room_size: (i32, i32),
}

impl Default for LevelParameters {
    fn default() -> Self {
        Self {
            room: GenerationParameters::default(),
            combat_rooms: 3,
            seed_pool_size: 16,
            room_spacing: 8,
            y_offset_range: (-15, 15),
            corridor_width: 3,
            min_height_difference: None,
            platform_spacing: 4,
            entrance_room_size: (40, 24),
            boss_room_size: (80, 36),
        }
    }
}

impl LevelParameters {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.room = self.room.with_seed(seed);
        self
    }

    pub fn with_seed_str(mut self, seed: &str) -> Self {
        self.room = self.room.with_seed_str(seed);
        self
    }

    pub fn min_height_difference(&self) -> i32 {
        self.min_height_difference
            .unwrap_or(self.corridor_width)
            .max(0)
    }

    pub fn effective_jump_height(&self) -> i32 {
        self.room.effective_jump_height()
    }

    /// Room parameters for one room type, derived from the combat template
    pub fn params_for(&self, room_type: RoomType) -> GenerationParameters {
        let mut params = self.room.clone();
        match room_type {
            RoomType::Entrance => {
                params.room_width = self.entrance_room_size.0;
                params.room_height = self.entrance_room_size.1;
                params.min_enemies = 0;
                params.max_enemies = 0;
            }
            RoomType::Combat => {}
            RoomType::Boss => {
                params.room_width = self.boss_room_size.0;
                params.room_height = self.boss_room_size.1;
                params.extra_edge_ratio = 0.0;
                params.min_enemies = 1;
                params.max_enemies = 1;
            }
        }
        params.validated()
    }

    /// Return a copy with every field clamped into its legal range
    pub fn validated(mut self) -> Self {
        self.room = self.room.validated();

        if self.combat_rooms > 64 {
            debug!("clamped combat_rooms from {} to 64", self.combat_rooms);
            self.combat_rooms = 64;
        }
        if self.seed_pool_size < self.combat_rooms {
            debug!(
                "raised seed_pool_size from {} to {}",
                self.seed_pool_size, self.combat_rooms
            );
            self.seed_pool_size = self.combat_rooms;
        }

        clamp_i32("corridor_width", &mut self.corridor_width, 1, 8);
        // The vertical leg must fit between two rooms with a wall on each side
        clamp_i32("room_spacing", &mut self.room_spacing, self.corridor_width + 2, 256);

        let (lo, hi) = self.y_offset_range;
        if lo > hi {
            debug!("swapped inverted y_offset_range ({}, {})", lo, hi);
            self.y_offset_range = (hi, lo);
        }
        clamp_i32("y_offset_range.0", &mut self.y_offset_range.0, -1024, 1024);
        clamp_i32("y_offset_range.1", &mut self.y_offset_range.1, -1024, 1024);

        if let Some(diff) = self.min_height_difference.as_mut() {
            clamp_i32("min_height_difference", diff, 0, MAX_ROOM_DIMENSION);
        }
        clamp_i32("platform_spacing", &mut self.platform_spacing, 2, MAX_JUMP_HEIGHT);

        for (name, size) in [
            ("entrance_room_size", &mut self.entrance_room_size),
            ("boss_room_size", &mut self.boss_room_size),
        ] {
            clamp_i32(name, &mut size.0, MIN_ROOM_WIDTH, MAX_ROOM_DIMENSION);
            clamp_i32(name, &mut size.1, MIN_ROOM_HEIGHT, MAX_ROOM_DIMENSION);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_already_valid() {
        let params = GenerationParameters::default();
        assert_eq!(params.clone().validated(), params);

        let level = LevelParameters::default();
        assert_eq!(level.clone().validated(), level);
    }

    #[test]
    fn test_effective_jump_height() {
        assert_eq!(effective_jump_height(3, false, 1), 3);
        assert_eq!(effective_jump_height(3, true, 1), 5);
        assert_eq!(effective_jump_height(4, true, 0), 8);

        let params = GenerationParameters::default();
        assert_eq!(params.effective_jump_height(), 5);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let params = GenerationParameters {
            room_width: 2,
            room_height: 100_000,
            edge_padding: -4,
            corridor_width: 0,
            extra_edge_ratio: 3.0,
            max_jump_height: 1,
            double_jump_overlap: 10,
            horizontal_bias: f32::NAN,
            ..Default::default()
        }
        .validated();

        assert_eq!(params.room_width, MIN_ROOM_WIDTH);
        assert_eq!(params.room_height, MAX_ROOM_DIMENSION);
        assert_eq!(params.edge_padding, 1);
        assert_eq!(params.corridor_width, 1);
        assert_eq!(params.extra_edge_ratio, 1.0);
        assert_eq!(params.max_jump_height, MIN_JUMP_HEIGHT);
        assert_eq!(params.double_jump_overlap, MIN_JUMP_HEIGHT - 1);
        assert_eq!(params.horizontal_bias, 0.7);
    }

    #[test]
    fn test_inverted_ranges_are_swapped() {
        let params = GenerationParameters {
            min_enemies: 9,
            max_enemies: 2,
            ..Default::default()
        }
        .validated();
        assert_eq!((params.min_enemies, params.max_enemies), (2, 9));

        let level = LevelParameters {
            y_offset_range: (10, -4),
            ..Default::default()
        }
        .validated();
        assert_eq!(level.y_offset_range, (-4, 10));
    }

    #[test]
    fn test_edge_padding_keeps_anchors_apart() {
        let params = GenerationParameters {
            edge_padding: 50,
            ..Default::default()
        }
        .validated();
        // 60x30: short side 30 -> at most 13
        assert_eq!(params.edge_padding, 13);
        assert!(params.edge_padding < params.room_width - 1 - params.edge_padding);
    }

    #[test]
    fn test_level_pool_covers_combat_rooms() {
        let level = LevelParameters {
            combat_rooms: 10,
            seed_pool_size: 2,
            ..Default::default()
        }
        .validated();
        assert_eq!(level.seed_pool_size, 10);
        assert_eq!(level.min_height_difference(), level.corridor_width);
    }

    #[test]
    fn test_params_for_room_types() {
        let level = LevelParameters::default();
        let entrance = level.params_for(RoomType::Entrance);
        assert_eq!((entrance.room_width, entrance.room_height), (40, 24));
        assert_eq!(entrance.max_enemies, 0);

        let boss = level.params_for(RoomType::Boss);
        assert_eq!(boss.extra_edge_ratio, 0.0);
        assert_eq!(boss.max_enemies, 1);

        assert_eq!(level.params_for(RoomType::Combat), level.room);
    }

    #[test]
    fn test_string_seed() {
        let a = GenerationParameters::default().with_seed_str("abc");
        let b = GenerationParameters::default().with_seed_str("abc");
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.resolve_seed(), a.seed);
    }
}
