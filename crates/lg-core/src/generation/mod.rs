//! Room generation stages and the pipeline that runs them

pub mod bsp;
pub mod corridor;
pub mod graph;
pub mod guarantor;
pub mod platforms;
pub mod placer;
pub mod room;
pub mod spawn;
pub mod triangulate;

mod pipeline;

pub use bsp::{BspNode, BspParams, BspSplit, BspTree, NodeId, SplitAxis};
pub use corridor::{carve_corridors, CarvedCorridor, CorridorShape};
pub use graph::{ConnectivityTracker, EdgeFlags, RoomEdge, RoomGraph};
pub use guarantor::{guarantee_path, GuarantorOutcome, WalkParams};
pub use pipeline::{
    generate, generate_room, GenerationReport, GenerationWarning, RoomData, SpawnError, SpawnStats,
};
pub use platforms::{find_jump_gaps, inject_platforms, platform_heights, JumpGap};
pub use placer::place_rooms;
pub use room::{RoomFlags, RoomId, RoomRegion};
pub use spawn::{extract_spawns, EnemyAssignment, SpawnCandidate, SpawnKind};
pub use triangulate::delaunay_edges;
