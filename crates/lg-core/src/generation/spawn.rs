//! Enemy spawn point extraction

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use tracing::{debug, trace};

use crate::consts::GROUND_HEAD_CLEARANCE;
use crate::grid::{GridPos, Tile, TileGrid};
use crate::params::GenerationParameters;
use crate::rng::GenRng;

/// Where an enemy stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SpawnKind {
    /// On a floor run
    Ground,
    /// Hovering in open space
    Air,
}

/// Enemy chosen for a spawn point
///
/// Keeps "no enemy yet" and "the boss" apart: the boss is never encoded as
/// a missing or default enemy id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyAssignment {
    #[default]
    Unassigned,
    /// Index into the host's enemy registry
    Regular(u16),
    Boss,
}

impl EnemyAssignment {
    pub fn is_assigned(&self) -> bool {
        !matches!(self, EnemyAssignment::Unassigned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCandidate {
    pub pos: GridPos,
    pub kind: SpawnKind,
    /// Ground: length of the floor run. Air: height above the support below.
    pub metric: u32,
    pub assignment: EnemyAssignment,
}

impl SpawnCandidate {
    fn new(pos: GridPos, kind: SpawnKind, metric: u32) -> Self {
        Self {
            pos,
            kind,
            metric,
            assignment: EnemyAssignment::Unassigned,
        }
    }
}

/// Choose spawn points for a finished grid
///
/// Candidates inside the safe zone around either anchor are dropped, the
/// rest are shuffled and accepted greedily while they keep
/// `min_spawn_distance` from every accepted point, up to `max_enemies`.
pub fn extract_spawns(
    grid: &TileGrid,
    entrance: GridPos,
    exit: GridPos,
    params: &GenerationParameters,
    rng: &mut GenRng,
) -> Vec<SpawnCandidate> {
    let mut candidates = ground_candidates(grid, params.min_ground_span);
    let ground = candidates.len();
    candidates.extend(air_candidates(
        grid,
        params.min_air_height,
        params.air_spawn_chance,
        rng,
    ));
    let air = candidates.len() - ground;

    candidates.retain(|c| {
        c.pos.manhattan(entrance) >= params.safe_zone_radius
            && c.pos.manhattan(exit) >= params.safe_zone_radius
    });
    let safe = candidates.len();

    rng.shuffle(&mut candidates);

    let min_dist_sq = (params.min_spawn_distance as f64).powi(2);
    let mut accepted: Vec<SpawnCandidate> = Vec::new();
    for candidate in candidates {
        if accepted.len() >= params.max_enemies {
            break;
        }
        let spaced = accepted
            .iter()
            .all(|a| a.pos.distance_sq(candidate.pos) as f64 >= min_dist_sq);
        if spaced {
            trace!("spawn {:?} at {:?}", candidate.kind, candidate.pos);
            accepted.push(candidate);
        }
    }

    debug!(
        "spawns: {} ground, {} air, {} outside safe zone, {} accepted",
        ground,
        air,
        safe,
        accepted.len()
    );
    accepted
}

/// Midpoints of standing runs with head clearance
fn ground_candidates(grid: &TileGrid, min_span: i32) -> Vec<SpawnCandidate> {
    let mut out = Vec::new();
    for y in 0..grid.height() {
        let mut x = 0;
        while x < grid.width() {
            if !is_ground_cell(grid, GridPos::new(x, y)) {
                x += 1;
                continue;
            }
            let start = x;
            while x < grid.width() && is_ground_cell(grid, GridPos::new(x, y)) {
                x += 1;
            }
            let span = x - start;
            if span >= min_span {
                out.push(SpawnCandidate::new(
                    GridPos::new(start + span / 2, y),
                    SpawnKind::Ground,
                    span as u32,
                ));
            }
        }
    }
    out
}

fn is_ground_cell(grid: &TileGrid, p: GridPos) -> bool {
    grid.is_standable(p) && (1..=GROUND_HEAD_CLEARANCE).all(|dy| grid.get(p.offset(0, dy)) == Tile::Floor)
}

/// Open cells high enough above ground, each accepted with `chance`
fn air_candidates(grid: &TileGrid, min_height: i32, chance: f32, rng: &mut GenRng) -> Vec<SpawnCandidate> {
    let mut out = Vec::new();
    for p in grid.interior().cells() {
        if grid.get(p) != Tile::Floor || !p.neighbors4().iter().all(|&n| grid.get(n) == Tile::Floor) {
            continue;
        }
        let height = height_above_support(grid, p);
        if height >= min_height && rng.chance(chance as f64) {
            out.push(SpawnCandidate::new(p, SpawnKind::Air, height as u32));
        }
    }
    out
}

/// Cells between `p` and the nearest standing cell below it
fn height_above_support(grid: &TileGrid, p: GridPos) -> i32 {
    let mut y = p.y - 1;
    while y >= 0 && grid.get(GridPos::new(p.x, y)) == Tile::Floor {
        y -= 1;
    }
    // y is the support; y + 1 is where an enemy would stand
    p.y - (y + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_room(width: i32, height: i32) -> TileGrid {
        let mut grid = TileGrid::new(width, height);
        grid.carve_rect(&grid.interior());
        grid
    }

    fn params() -> GenerationParameters {
        GenerationParameters {
            safe_zone_radius: 0,
            min_spawn_distance: 0.0,
            air_spawn_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_ground_run_midpoint() {
        let grid = open_room(12, 6);
        let spawns = ground_candidates(&grid, 3);
        // One run along the floor: x 1..=10
        assert_eq!(spawns.len(), 1);
        assert_eq!(spawns[0].pos, GridPos::new(6, 1));
        assert_eq!(spawns[0].metric, 10);
        assert_eq!(spawns[0].kind, SpawnKind::Ground);
    }

    #[test]
    fn test_ground_needs_head_clearance() {
        // Interior only two rows tall: no room above the standing cell
        let grid = open_room(12, 4);
        assert!(ground_candidates(&grid, 1).is_empty());
    }

    #[test]
    fn test_short_run_rejected() {
        let grid = open_room(5, 8);
        assert!(ground_candidates(&grid, 4).is_empty());
        assert_eq!(ground_candidates(&grid, 3).len(), 1);
    }

    #[test]
    fn test_height_above_support() {
        let grid = open_room(8, 12);
        assert_eq!(height_above_support(&grid, GridPos::new(3, 1)), 0);
        assert_eq!(height_above_support(&grid, GridPos::new(3, 6)), 5);
    }

    #[test]
    fn test_air_candidates_respect_height() {
        let grid = open_room(10, 12);
        let mut rng = GenRng::new(42);
        let air = air_candidates(&grid, 4, 1.0, &mut rng);
        assert!(!air.is_empty());
        for c in &air {
            assert!(c.metric >= 4);
            assert!(c.pos.x > 1 && c.pos.x < 8);
        }
    }

    #[test]
    fn test_safe_zone() {
        let grid = open_room(30, 8);
        let mut rng = GenRng::new(42);
        let entrance = GridPos::new(3, 1);
        let exit = GridPos::new(26, 1);
        let p = GenerationParameters {
            safe_zone_radius: 40,
            ..params()
        };
        assert!(extract_spawns(&grid, entrance, exit, &p, &mut rng).is_empty());

        let p = GenerationParameters {
            safe_zone_radius: 6,
            ..params()
        };
        let spawns = extract_spawns(&grid, entrance, exit, &p, &mut rng);
        for s in &spawns {
            assert!(s.pos.manhattan(entrance) >= 6);
            assert!(s.pos.manhattan(exit) >= 6);
        }
    }

    #[test]
    fn test_spacing_and_cap() {
        // Stacked ledges give many ground runs
        let mut grid = open_room(40, 40);
        for y in (6..36).step_by(6) {
            for x in 2..38 {
                grid.set(GridPos::new(x, y), Tile::Platform);
            }
        }
        let mut rng = GenRng::new(42);
        let p = GenerationParameters {
            min_spawn_distance: 5.0,
            max_enemies: 4,
            ..params()
        };
        let spawns = extract_spawns(&grid, GridPos::new(1, 1), GridPos::new(38, 38), &p, &mut rng);
        assert_eq!(spawns.len(), 4);
        for (i, a) in spawns.iter().enumerate() {
            assert_eq!(a.assignment, EnemyAssignment::Unassigned);
            for b in &spawns[i + 1..] {
                assert!(a.pos.distance(b.pos) >= 5.0);
            }
        }
    }

    #[test]
    fn test_assignment_helpers() {
        assert!(!EnemyAssignment::default().is_assigned());
        assert!(EnemyAssignment::Boss.is_assigned());
        assert!(EnemyAssignment::Regular(0).is_assigned());
        assert_eq!(SpawnKind::Air.to_string(), "air");
    }
}
