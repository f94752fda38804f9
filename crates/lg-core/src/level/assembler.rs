//! Multi-room level assembly
//!
//! An entrance room, `combat_rooms` combat rooms and a boss room are
//! generated independently and laid out left to right. Consecutive rooms
//! are joined exit to entrance by a corridor whose vertical leg sits in
//! the middle of the gap between them. The composed grid then gets
//! platforms wherever a corridor leaves a ledge out of jump range.

use tracing::{debug, info_span, warn};

use super::corridor::build_corridor;
use super::overlap::find_overlaps;
use super::types::{CorridorSegment, LevelData, LevelWarning, PlacedRoom, RoomType};
use crate::generation::{find_jump_gaps, generate_room, inject_platforms, EnemyAssignment};
use crate::grid::GridPos;
use crate::params::LevelParameters;
use crate::rng::GenRng;

/// Generate and assemble a level from `seed`
///
/// `params` are validated first; `params.room.seed` is ignored in favour of
/// `seed`.
pub fn generate_level(params: &LevelParameters, seed: u64) -> LevelData {
    let params = params.clone().validated();
    let _span = info_span!("generate_level", seed).entered();
    let mut rng = GenRng::new(seed);

    let plan = room_plan(&params, &mut rng);
    let min_diff = params.min_height_difference();

    let mut rooms: Vec<PlacedRoom> = Vec::with_capacity(plan.len());
    for (i, &(room_type, room_seed)) in plan.iter().enumerate() {
        let data = generate_room(&params.params_for(room_type), room_seed);

        let offset = match rooms.last() {
            None => GridPos::new(0, 0),
            Some(prev) => {
                let x = prev.offset.x + prev.width + params.room_spacing;
                let y = choose_y_offset(
                    prev.world_exit().y,
                    data.entrance.y,
                    params.y_offset_range,
                    min_diff,
                    &mut rng,
                );
                GridPos::new(x, y)
            }
        };

        let mut room = PlacedRoom::new(i as u32, room_type, offset, data);
        if room_type == RoomType::Boss {
            mark_boss(&mut room);
        }
        debug!(
            "room {} ({}) seed {:#x} at {:?}",
            room.id, room.room_type, room.seed, room.offset
        );
        rooms.push(room);
    }

    finish_level(params, seed, rooms)
}

/// Build corridors and collect level warnings for rooms already in place
pub(crate) fn finish_level(params: LevelParameters, seed: u64, rooms: Vec<PlacedRoom>) -> LevelData {
    let jump = params.effective_jump_height();
    let min_diff = params.min_height_difference();

    let corridors: Vec<CorridorSegment> = rooms
        .windows(2)
        .map(|pair| {
            build_corridor(
                &pair[0],
                &pair[1],
                params.room_spacing,
                params.corridor_width,
                params.platform_spacing,
                jump,
            )
        })
        .collect();

    let mut warnings = Vec::new();
    for pair in rooms.windows(2) {
        let difference = (pair[1].world_entrance().y - pair[0].world_exit().y).abs();
        if difference < min_diff {
            warn!(
                "room {} entrance is {} from the previous exit, {} required",
                pair[1].id, difference, min_diff
            );
            warnings.push(LevelWarning::HeightDifferenceUnsatisfied {
                room: pair[1].id,
                difference,
                required: min_diff,
            });
        }
    }

    for overlap in find_overlaps(&rooms, &corridors) {
        warn!("{} overlaps {}", overlap.first, overlap.second);
        warnings.push(LevelWarning::Overlap(overlap));
    }

    let mut level = LevelData {
        seed,
        params,
        rooms,
        corridors,
        platforms: Vec::new(),
        warnings,
    };
    level.platforms = level_platforms(&level, jump);

    let (grid, origin) = level.to_world_grid();
    let remaining = find_jump_gaps(&grid, jump, &world_exits(&level, origin)).len();
    if remaining > 0 {
        warn!("{} jump gaps remain in the level", remaining);
        level
            .warnings
            .push(LevelWarning::JumpGapsRemain { count: remaining });
    }

    debug!(
        "level done: {} rooms, {} corridors, {} level platforms, {} warnings",
        level.rooms.len(),
        level.corridors.len(),
        level.platforms.len(),
        level.warnings.len()
    );
    level
}

/// Platforms the composed grid needs where corridors cut into rooms
///
/// Returned in world cells.
fn level_platforms(level: &LevelData, jump: i32) -> Vec<GridPos> {
    let (mut grid, origin) = level.to_world_grid();
    let anchors = world_exits(level, origin);
    inject_platforms(&mut grid, jump, &anchors)
        .into_iter()
        .map(|p| p.offset(origin.x, origin.y))
        .collect()
}

/// Room exits in the coordinates of a world grid whose cell (0, 0) is `origin`
fn world_exits(level: &LevelData, origin: GridPos) -> Vec<GridPos> {
    level
        .rooms
        .iter()
        .map(|r| r.world_exit().offset(-origin.x, -origin.y))
        .collect()
}

/// Room types and seeds in level order
///
/// Draw order: entrance seed, the combat seed pool, one pool index per
/// combat room (without replacement), boss seed.
fn room_plan(params: &LevelParameters, rng: &mut GenRng) -> Vec<(RoomType, u64)> {
    let mut plan = Vec::with_capacity(params.combat_rooms + 2);
    plan.push((RoomType::Entrance, rng.next_seed()));

    let mut pool: Vec<u64> = (0..params.seed_pool_size).map(|_| rng.next_seed()).collect();
    for _ in 0..params.combat_rooms {
        let index = rng.rn2(pool.len() as u32) as usize;
        plan.push((RoomType::Combat, pool.swap_remove(index)));
    }

    plan.push((RoomType::Boss, rng.next_seed()));
    plan
}

/// Vertical offset for the next room
///
/// Candidates from `range` are tried in shuffled order; the first that puts
/// the entrance at least `min_diff` away from the previous exit wins. If
/// none does, the candidate with the largest difference is used.
fn choose_y_offset(
    prev_exit_y: i32,
    entrance_y: i32,
    range: (i32, i32),
    min_diff: i32,
    rng: &mut GenRng,
) -> i32 {
    let mut candidates: Vec<i32> = (range.0..=range.1).collect();
    rng.shuffle(&mut candidates);

    let difference = |y: i32| (y + entrance_y - prev_exit_y).abs();
    if let Some(&y) = candidates.iter().find(|&&y| difference(y) >= min_diff) {
        return y;
    }

    // First of the best in shuffled order
    let mut best = range.0;
    let mut best_diff = -1;
    for &y in &candidates {
        if difference(y) > best_diff {
            best = y;
            best_diff = difference(y);
        }
    }
    best
}

/// Give the boss room's first spawn point to the boss
pub(crate) fn mark_boss(room: &mut PlacedRoom) {
    if room.data.spawns.is_empty() {
        warn!("boss room {} has no spawn point", room.id);
        return;
    }
    if let Err(e) = room.data.assign_spawn(0, EnemyAssignment::Boss) {
        warn!("boss room {}: {}", room.id, e);
    }
}
