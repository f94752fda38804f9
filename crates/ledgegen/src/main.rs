//! ledgegen: seeded platformer level generator
//!
//! Generates single rooms or whole levels and prints them as ASCII maps.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lg_core::{
    generate, generate_level, render_level, render_room, seed_from_str, GenerationParameters,
    LevelData, LevelParameters, RoomData, SpawnKind,
};
use lg_save::{default_save_path, list_saves, load_level, save_level};

/// Seeded platformer room and level generator
#[derive(Parser, Debug)]
#[command(name = "ledgegen")]
#[command(author, version, about = "Generate platformer rooms and levels", long_about = None)]
struct Args {
    /// Log generation stages (debug level)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a single room
    Room {
        #[arg(long, default_value_t = lg_core::DEFAULT_ROOM_WIDTH)]
        width: i32,

        #[arg(long, default_value_t = lg_core::DEFAULT_ROOM_HEIGHT)]
        height: i32,

        /// Numeric or text seed; random when omitted
        #[arg(short = 's', long)]
        seed: Option<String>,

        /// Single jump height in cells
        #[arg(long, default_value_t = 3)]
        jump: i32,

        #[arg(long = "no-double-jump")]
        no_double_jump: bool,

        /// Print the room as JSON instead of a map
        #[arg(long)]
        json: bool,
    },

    /// Generate a multi-room level
    Level {
        #[arg(short = 'c', long = "combat-rooms", default_value_t = 3)]
        combat_rooms: usize,

        /// Numeric or text seed; random when omitted
        #[arg(short = 's', long)]
        seed: Option<String>,

        /// Write the level layout to this file
        #[arg(long, conflicts_with = "name")]
        save: Option<PathBuf>,

        /// Write the level layout to the default save directory under this name
        #[arg(long)]
        name: Option<String>,

        /// Print the level as JSON instead of a map
        #[arg(long)]
        json: bool,
    },

    /// Rebuild a saved level from its layout
    Replay { path: PathBuf },

    /// List levels in the default save directory
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Room {
            width,
            height,
            seed,
            jump,
            no_double_jump,
            json,
        } => {
            let mut params = GenerationParameters::default().with_size(width, height);
            params.max_jump_height = jump;
            params.has_double_jump = !no_double_jump;
            params = match seed {
                Some(s) => params.with_seed(parse_seed(&s)),
                None => GenerationParameters {
                    use_random_seed: true,
                    ..params
                },
            };

            let room = generate(&params);
            if json {
                println!("{}", serde_json::to_string_pretty(&room)?);
            } else {
                print!("{}", render_room(&room));
                print_room_summary(&room);
            }
        }

        Command::Level {
            combat_rooms,
            seed,
            save,
            name,
            json,
        } => {
            let params = LevelParameters {
                combat_rooms,
                ..Default::default()
            };
            let seed = seed.map_or_else(rand_seed, |s| parse_seed(&s));
            let level = generate_level(&params, seed);

            if json {
                println!("{}", serde_json::to_string_pretty(&level)?);
            } else {
                print!("{}", render_level(&level));
                print_level_summary(&level);
            }

            let path = save.or_else(|| name.as_deref().map(default_save_path));
            if let Some(path) = path {
                save_level(&level, &path)?;
                info!("saved layout to {}", path.display());
                println!("Saved to {}", path.display());
            }
        }

        Command::Replay { path } => {
            let level = load_level(&path)?;
            print!("{}", render_level(&level));
            print_level_summary(&level);
        }

        Command::List => {
            let saves = list_saves()?;
            if saves.is_empty() {
                println!("No saved levels");
            }
            for (path, header) in saves {
                println!(
                    "{}  seed {:#018x}  {} rooms",
                    path.display(),
                    header.seed,
                    header.room_count
                );
            }
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise warnings only, or debug with `--verbose`
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Decimal numbers are used as-is, anything else is hashed
fn parse_seed(s: &str) -> u64 {
    s.parse().unwrap_or_else(|_| seed_from_str(s))
}

fn rand_seed() -> u64 {
    GenerationParameters {
        use_random_seed: true,
        ..Default::default()
    }
    .resolve_seed()
}

fn print_room_summary(room: &RoomData) {
    println!();
    println!("Seed:      {:#018x}", room.seed);
    println!("Size:      {}x{}", room.width(), room.height());
    println!("Rooms:     {}", room.graph.rooms.len());
    println!(
        "Edges:     {} ({} tree, {} extra)",
        room.graph.edges.len(),
        room.graph.tree.len(),
        room.graph.extra.len()
    );
    let anchor = |r: Option<&lg_core::generation::RoomRegion>| {
        r.map_or_else(|| "none".to_string(), |r| r.id.to_string())
    };
    println!(
        "Anchors:   entrance in {}, exit in {}",
        anchor(room.graph.entrance_room()),
        anchor(room.graph.exit_room())
    );
    println!("Platforms: {}", room.platforms.len());
    for kind in SpawnKind::iter() {
        let count = room.spawns.iter().filter(|s| s.kind == kind).count();
        println!("Spawns ({}): {}", kind, count);
    }
    for warning in &room.report.warnings {
        println!("Warning:   {}", warning);
    }
}

fn print_level_summary(level: &LevelData) {
    println!();
    println!("Seed:      {:#018x}", level.seed);
    let bounds = level.bounds();
    println!("Size:      {}x{}", bounds.width, bounds.height);
    for room in &level.rooms {
        println!(
            "Room {:>2}:   {:<8} seed {:#018x} at ({}, {}), {} spawns",
            room.id,
            room.room_type,
            room.seed,
            room.offset.x,
            room.offset.y,
            room.data.spawns.len()
        );
    }
    let platforms: usize = level.corridors.iter().map(|c| c.platforms.len()).sum();
    println!(
        "Corridors: {} ({} platform cells)",
        level.corridors.len(),
        platforms
    );
    println!("Platforms: {} added at corridor ends", level.platforms.len());
    for (id, warning) in level.room_warnings() {
        println!("Warning:   room {}: {}", id, warning);
    }
    for warning in &level.warnings {
        println!("Warning:   {}", warning);
    }
}
