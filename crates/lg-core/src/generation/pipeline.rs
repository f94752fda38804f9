//! Single-room generation pipeline
//!
//! [`generate_room`] runs every stage in a fixed order against one
//! [`GenRng`], so the same parameters and seed always give the same room:
//!
//! 1. anchors (entrance and exit)
//! 2. BSP partition
//! 3. room placement
//! 4. triangulation, spanning tree and loop edges
//! 5. corridors
//! 6. connectivity walks
//! 7. platform injection
//! 8. spawn extraction
//!
//! Nothing here fails. Degraded stages leave a [`GenerationWarning`] in the
//! report and the room is returned anyway.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info_span, warn};

use super::bsp::{BspParams, BspTree};
use super::corridor::{carve_corridors, CarvedCorridor};
use super::graph::RoomGraph;
use super::guarantor::{guarantee_path, GuarantorOutcome, WalkParams};
use super::platforms::{find_jump_gaps, inject_platforms, JumpGap};
use super::placer::place_rooms;
use super::spawn::{extract_spawns, EnemyAssignment, SpawnCandidate, SpawnKind};
use crate::events::{AnchorsUpdated, WorldPoint};
use crate::grid::{is_connected, GridPos, TileGrid};
use crate::params::GenerationParameters;
use crate::rng::GenRng;

/// A degraded (but non-fatal) generation outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationWarning {
    /// Fewer than two rooms were placed; graph and corridor stages were skipped
    TooFewRooms { count: usize },
    /// The selected edges do not join every room
    GraphDisconnected,
    /// The connectivity walks did not join entrance and exit
    EntranceExitDisconnected,
    /// Columns still have standing surfaces out of jump range
    JumpGapsRemain { count: usize },
    NotEnoughSpawns { found: usize, required: usize },
}

impl std::fmt::Display for GenerationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationWarning::TooFewRooms { count } => {
                write!(f, "only {} room(s) placed, graph stages skipped", count)
            }
            GenerationWarning::GraphDisconnected => write!(f, "room graph is disconnected"),
            GenerationWarning::EntranceExitDisconnected => {
                write!(f, "entrance and exit are not connected")
            }
            GenerationWarning::JumpGapsRemain { count } => {
                write!(f, "{} jump gap(s) remain", count)
            }
            GenerationWarning::NotEnoughSpawns { found, required } => {
                write!(f, "{} spawn point(s) found, {} required", found, required)
            }
        }
    }
}

/// Diagnostics collected while generating a room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub warnings: Vec<GenerationWarning>,
    pub guarantor: GuarantorOutcome,
    pub platforms_placed: usize,
}

impl GenerationReport {
    /// Check if every stage completed without degradation
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Errors from spawn assignment bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("spawn index {index} out of range ({len} spawns)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("spawn {index} is already assigned ({current:?})")]
    AlreadyAssigned {
        index: usize,
        current: EnemyAssignment,
    },
}

/// Spawn counts by kind and assignment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnStats {
    pub ground: usize,
    pub air: usize,
    /// Spawns with a regular enemy
    pub assigned: usize,
    pub boss: usize,
}

/// A generated room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    pub seed: u64,
    /// The validated parameters the room was generated with
    pub params: GenerationParameters,
    pub grid: TileGrid,
    pub entrance: GridPos,
    pub exit: GridPos,
    pub bsp: BspTree,
    pub graph: RoomGraph,
    pub corridors: Vec<CarvedCorridor>,
    /// Platform cells added by reachability repair
    pub platforms: Vec<GridPos>,
    pub spawns: Vec<SpawnCandidate>,
    pub report: GenerationReport,
}

impl RoomData {
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    /// Re-run the flood fill between entrance and exit
    pub fn is_traversable(&self) -> bool {
        is_connected(&self.grid, self.entrance, self.exit)
    }

    /// Remaining jump gaps for the room's own jump envelope
    pub fn jump_gaps(&self) -> Vec<JumpGap> {
        find_jump_gaps(&self.grid, self.params.effective_jump_height(), &[self.exit])
    }

    /// Record which enemy a spawn point receives
    ///
    /// A spawn can be assigned once.
    pub fn assign_spawn(&mut self, index: usize, assignment: EnemyAssignment) -> Result<(), SpawnError> {
        let len = self.spawns.len();
        let spawn = self
            .spawns
            .get_mut(index)
            .ok_or(SpawnError::IndexOutOfRange { index, len })?;
        if spawn.assignment.is_assigned() {
            return Err(SpawnError::AlreadyAssigned {
                index,
                current: spawn.assignment,
            });
        }
        spawn.assignment = assignment;
        Ok(())
    }

    /// Indices of spawns with no enemy yet
    pub fn unassigned_spawns(&self) -> impl Iterator<Item = usize> + '_ {
        self.spawns
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.assignment.is_assigned())
            .map(|(i, _)| i)
    }

    pub fn spawn_stats(&self) -> SpawnStats {
        let mut stats = SpawnStats::default();
        for spawn in &self.spawns {
            match spawn.kind {
                SpawnKind::Ground => stats.ground += 1,
                SpawnKind::Air => stats.air += 1,
            }
            match spawn.assignment {
                EnemyAssignment::Unassigned => {}
                EnemyAssignment::Regular(_) => stats.assigned += 1,
                EnemyAssignment::Boss => stats.boss += 1,
            }
        }
        stats
    }

    /// Anchors in world space, for cells of `cell_size` with cell (0, 0) at `origin`
    pub fn bake_anchors(&self, cell_size: f32, origin: WorldPoint) -> AnchorsUpdated {
        AnchorsUpdated {
            seed: self.seed,
            entrance: self.entrance,
            exit: self.exit,
            entrance_world: WorldPoint::from_cell(self.entrance, cell_size, origin),
            exit_world: WorldPoint::from_cell(self.exit, cell_size, origin),
        }
    }
}

/// Generate a room with the seed the parameters resolve to
pub fn generate(params: &GenerationParameters) -> RoomData {
    generate_room(params, params.resolve_seed())
}

/// Generate one room from `seed`
///
/// `params` are validated first; `params.seed` is ignored in favour of `seed`.
pub fn generate_room(params: &GenerationParameters, seed: u64) -> RoomData {
    let params = params.clone().validated();
    let _span = info_span!("generate_room", seed).entered();

    let mut rng = GenRng::new(seed);
    let mut grid = TileGrid::new(params.room_width, params.room_height);
    let mut report = GenerationReport::default();

    let (entrance, exit) = pick_anchors(&params, &mut rng);
    debug!("anchors: entrance {:?}, exit {:?}", entrance, exit);

    let bsp = BspTree::build(
        grid.interior(),
        &BspParams {
            min_leaf_size: params.min_leaf_size,
            max_depth: params.max_depth,
            split_jitter: params.split_jitter,
        },
        &mut rng,
    );

    let rooms = place_rooms(
        &mut grid,
        &bsp,
        params.room_margin,
        params.min_room_size,
        entrance,
        exit,
        &mut rng,
    );

    let (graph, corridors) = if rooms.len() < 2 {
        warn!("only {} room(s) placed, skipping graph stages", rooms.len());
        report
            .warnings
            .push(GenerationWarning::TooFewRooms { count: rooms.len() });
        let graph = RoomGraph {
            rooms,
            ..Default::default()
        };
        (graph, Vec::new())
    } else {
        let graph = RoomGraph::build(rooms, params.extra_edge_ratio, &mut rng);
        if !graph.check_connected() {
            report.warnings.push(GenerationWarning::GraphDisconnected);
        }
        let corridors = carve_corridors(&mut grid, &graph, params.corridor_width, &mut rng);
        (graph, corridors)
    };

    report.guarantor = guarantee_path(
        &mut grid,
        entrance,
        exit,
        &WalkParams {
            brush_radius: params.brush_radius,
            horizontal_bias: params.horizontal_bias,
            wander_chance: params.wander_chance,
        },
        &mut rng,
    );
    if !report.guarantor.connected {
        report
            .warnings
            .push(GenerationWarning::EntranceExitDisconnected);
    }

    let jump = params.effective_jump_height();
    let platforms = inject_platforms(&mut grid, jump, &[exit]);
    report.platforms_placed = platforms.len();
    let remaining = find_jump_gaps(&grid, jump, &[exit]).len();
    if remaining > 0 {
        report
            .warnings
            .push(GenerationWarning::JumpGapsRemain { count: remaining });
    }

    let spawns = extract_spawns(&grid, entrance, exit, &params, &mut rng);
    if spawns.len() < params.min_enemies {
        warn!(
            "{} spawn point(s) found, {} required",
            spawns.len(),
            params.min_enemies
        );
        report.warnings.push(GenerationWarning::NotEnoughSpawns {
            found: spawns.len(),
            required: params.min_enemies,
        });
    }

    debug!(
        "room done: {} rooms, {} edges, {} platforms, {} spawns, {} warnings",
        graph.rooms.len(),
        graph.edges.len(),
        platforms.len(),
        spawns.len(),
        report.warnings.len()
    );

    RoomData {
        seed,
        params,
        grid,
        entrance,
        exit,
        bsp,
        graph,
        corridors,
        platforms,
        spawns,
        report,
    }
}

/// Entrance inset from the left edge, exit from the right, at random heights
fn pick_anchors(params: &GenerationParameters, rng: &mut GenRng) -> (GridPos, GridPos) {
    let pad = params.edge_padding;
    let top = params.room_height - 1 - pad;
    let entrance = GridPos::new(pad, rng.range(pad, top));
    let exit = GridPos::new(params.room_width - 1 - pad, rng.range(pad, top));
    (entrance, exit)
}
