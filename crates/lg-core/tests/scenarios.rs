//! End-to-end generation scenarios
//!
//! Fixed inputs with known expected outcomes for the room pipeline and the
//! level assembler.

use lg_core::generation::{find_jump_gaps, inject_platforms, EdgeFlags};
use lg_core::*;

// ============================================================================
// Single rooms
// ============================================================================

#[test]
fn test_string_seed_room_anchors() {
    let params = GenerationParameters {
        room_width: 60,
        room_height: 30,
        edge_padding: 3,
        ..Default::default()
    }
    .with_seed_str("abc");

    let first = generate(&params);
    assert_eq!(first.seed, seed_from_str("abc"));
    assert_eq!(first.entrance.x, 3);
    assert_eq!(first.exit.x, 56);

    let second = generate(&params);
    assert_eq!(first, second);
    assert_eq!(first.grid.to_ascii(), second.grid.to_ascii());
}

#[test]
fn test_two_room_graph() {
    // One split of a 58x28 interior: exactly two leaves, two rooms
    let params = GenerationParameters {
        max_depth: 1,
        ..Default::default()
    };

    for seed in 0..10 {
        let room = generate_room(&params, seed);
        let graph = &room.graph;
        assert_eq!(graph.rooms.len(), 2, "seed {}", seed);
        assert_eq!(graph.candidates.len(), 1);
        assert_eq!(graph.tree.len(), 1);
        assert_eq!(graph.edges.len(), 1);
        assert!(graph.extra.is_empty());

        let edge = graph.edges[0];
        assert!(edge.flags.contains(EdgeFlags::SPANNING_TREE));
        assert_eq!((edge.a, edge.b), (graph.candidates[0].a, graph.candidates[0].b));
        assert!(room.is_traversable());
    }
}

#[test]
fn test_double_jump_gap_of_twelve() {
    let params = GenerationParameters {
        max_jump_height: 3,
        has_double_jump: true,
        double_jump_overlap: 1,
        ..Default::default()
    };
    let jump = params.effective_jump_height();
    assert_eq!(jump, 5);

    // A one-wide shaft: floor at y = 1, exit ledge 12 above it
    let mut grid = TileGrid::new(5, 20);
    for y in 1..19 {
        grid.set(GridPos::new(2, y), Tile::Floor);
    }
    let exit = GridPos::new(2, 13);

    let placed = inject_platforms(&mut grid, jump, &[exit]);
    assert_eq!(placed.len(), 2);

    let mut heights = vec![1, exit.y];
    heights.extend(placed.iter().map(|p| p.y + 1));
    heights.sort_unstable();
    assert_eq!(heights, vec![1, 5, 9, 13]);
    for hop in heights.windows(2) {
        assert!(hop[1] - hop[0] <= jump);
    }
    assert!(find_jump_gaps(&grid, jump, &[exit]).is_empty());
}

#[test]
fn test_generated_room_fixture_parses_back() {
    let room = generate_room(&GenerationParameters::default(), 2024);
    let text = room.grid.to_ascii();
    let parsed = TileGrid::from_ascii(&text).unwrap();
    assert_eq!(parsed, room.grid);
}

// ============================================================================
// Levels
// ============================================================================

#[test]
fn test_level_height_differences() {
    let params = LevelParameters {
        y_offset_range: (-15, 15),
        min_height_difference: Some(3),
        combat_rooms: 4,
        ..Default::default()
    };

    for seed in 0..5 {
        let level = generate_level(&params, seed);
        assert_eq!(level.rooms.len(), 6);
        for pair in level.rooms.windows(2) {
            let diff = (pair[1].world_entrance().y - pair[0].world_exit().y).abs();
            assert!(
                diff >= 3,
                "seed {}: rooms {} and {} differ by {}",
                seed,
                pair[0].id,
                pair[1].id,
                diff
            );
        }
        assert!(
            !level
                .warnings
                .iter()
                .any(|w| matches!(w, LevelWarning::HeightDifferenceUnsatisfied { .. }))
        );
    }
}

#[test]
fn test_unsatisfiable_height_difference_warns() {
    let params = LevelParameters {
        y_offset_range: (0, 0),
        min_height_difference: Some(200),
        combat_rooms: 1,
        ..Default::default()
    };
    let level = generate_level(&params, 1);
    let count = level
        .warnings
        .iter()
        .filter(|w| matches!(w, LevelWarning::HeightDifferenceUnsatisfied { .. }))
        .count();
    assert_eq!(count, level.rooms.len() - 1);
}

#[test]
fn test_default_level_has_no_overlaps() {
    for seed in 0..5 {
        let level = generate_level(&LevelParameters::default(), seed);
        assert!(level.overlaps().is_empty(), "seed {}", seed);
    }
}

#[test]
fn test_world_grid_contains_every_room() {
    let level = generate_level(&LevelParameters::default(), 3);
    let (grid, origin) = level.to_world_grid();
    assert!(grid.width() >= level.bounds().width + 2);

    for room in &level.rooms {
        for p in room.data.grid.bounds().cells() {
            let tile = room.data.grid.get(p);
            if tile == Tile::Wall {
                continue;
            }
            let world = p.offset(room.offset.x - origin.x, room.offset.y - origin.y);
            assert_ne!(grid.get(world), Tile::Wall);
        }
    }
}

#[test]
fn test_world_grid_joins_start_to_goal() {
    for seed in 0..5 {
        let level = generate_level(&LevelParameters::default(), seed);
        let (grid, origin) = level.to_world_grid();
        let local = |p: GridPos| p.offset(-origin.x, -origin.y);
        let start = local(level.start().unwrap());
        let goal = local(level.goal().unwrap());
        assert!(grid::is_connected(&grid, start, goal), "seed {}", seed);
    }
}

#[test]
fn test_world_grid_has_no_jump_gaps() {
    let mut with_platforms = 0;
    for seed in 0..40 {
        let level = generate_level(&LevelParameters::default(), seed);
        let jump = level.params.effective_jump_height();
        let (grid, origin) = level.to_world_grid();
        let exits: Vec<GridPos> = level
            .rooms
            .iter()
            .map(|r| r.world_exit().offset(-origin.x, -origin.y))
            .collect();

        let gaps = find_jump_gaps(&grid, jump, &exits);
        assert!(gaps.is_empty(), "seed {}: {:?}", seed, gaps);
        assert!(
            !level
                .warnings
                .iter()
                .any(|w| matches!(w, LevelWarning::JumpGapsRemain { .. }))
        );

        for p in &level.platforms {
            assert_eq!(grid.get(p.offset(-origin.x, -origin.y)), Tile::Platform);
        }
        if !level.platforms.is_empty() {
            with_platforms += 1;
        }
    }
    // Corridors entering high above a room floor need level platforms
    assert!(with_platforms > 0);
}

#[test]
fn test_corridor_platforms_on_tall_legs() {
    let params = LevelParameters {
        y_offset_range: (-30, 30),
        min_height_difference: Some(20),
        ..Default::default()
    };
    let level = generate_level(&params, 9);
    let jump = level.params.effective_jump_height();
    for corridor in &level.corridors {
        if corridor.rise() > jump {
            assert!(!corridor.platforms.is_empty());
        } else {
            assert!(corridor.platforms.is_empty());
        }
    }
}
