//! lg-save: level layout persistence
//!
//! A saved level is its [`LevelLayout`] behind a small versioned header.
//! Grids are never written; loading replays the stored seeds.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use lg_core::{LayoutError, LevelData, LevelLayout};

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file not found")]
    NotFound,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Header says {expected} rooms, layout has {found}")]
    RoomCountMismatch { expected: usize, found: usize },

    #[error("Replay failed: {0}")]
    Replay(#[from] LayoutError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHeader {
    /// Magic identifier
    pub magic: String,
    /// Save format version
    pub version: u32,
    /// Level seed
    pub seed: u64,
    pub room_count: usize,
    /// Seconds since the Unix epoch
    pub timestamp: u64,
}

impl SaveHeader {
    const MAGIC: &'static str = "LGLV";

    pub fn new(layout: &LevelLayout) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            seed: layout.seed,
            room_count: layout.rooms.len(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::InvalidHeader);
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete save file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub header: SaveHeader,
    pub layout: LevelLayout,
}

impl SaveFile {
    pub fn new(layout: LevelLayout) -> Self {
        Self {
            header: SaveHeader::new(&layout),
            layout,
        }
    }

    fn validate(&self) -> Result<(), SaveError> {
        self.header.validate()?;
        if self.header.room_count != self.layout.rooms.len() {
            return Err(SaveError::RoomCountMismatch {
                expected: self.header.room_count,
                found: self.layout.rooms.len(),
            });
        }
        Ok(())
    }
}

/// Write a layout as pretty-printed JSON
pub fn save_layout(layout: &LevelLayout, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &SaveFile::new(layout.clone()))?;
    debug!("saved layout {:#x} to {}", layout.seed, path.as_ref().display());
    Ok(())
}

/// Write a layout without pretty printing
pub fn save_layout_compact(layout: &LevelLayout, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer(writer, &SaveFile::new(layout.clone()))?;
    Ok(())
}

/// Save the layout of a generated level
pub fn save_level(level: &LevelData, path: impl AsRef<Path>) -> Result<(), SaveError> {
    save_layout(&level.layout(), path)
}

fn read_save_file(path: &Path) -> Result<SaveFile, SaveError> {
    let file = File::open(path).map_err(|_| SaveError::NotFound)?;
    let reader = BufReader::new(file);
    let save_file: SaveFile = serde_json::from_reader(reader)?;
    save_file.validate()?;
    Ok(save_file)
}

pub fn load_layout(path: impl AsRef<Path>) -> Result<LevelLayout, SaveError> {
    Ok(read_save_file(path.as_ref())?.layout)
}

/// Load only the header (for listing saves)
pub fn load_header(path: impl AsRef<Path>) -> Result<SaveHeader, SaveError> {
    Ok(read_save_file(path.as_ref())?.header)
}

/// Load a layout and replay it into a full level
pub fn load_level(path: impl AsRef<Path>) -> Result<LevelData, SaveError> {
    let layout = load_layout(path)?;
    Ok(layout.regenerate()?)
}

pub fn save_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

pub fn delete_save(path: impl AsRef<Path>) -> Result<(), SaveError> {
    std::fs::remove_file(path)?;
    Ok(())
}

fn save_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("ledgegen");
    path.push("levels");
    path
}

/// Default path for a named level, creating the directory if needed
pub fn default_save_path(name: &str) -> PathBuf {
    let mut path = save_dir();
    std::fs::create_dir_all(&path).ok();
    path.push(format!("{}.json", name));
    path
}

/// All valid saves in the default directory, newest first
pub fn list_saves() -> Result<Vec<(PathBuf, SaveHeader)>, SaveError> {
    let dir = save_dir();
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut saves = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            if let Ok(header) = load_header(&path) {
                saves.push((path, header));
            }
        }
    }

    saves.sort_by(|a, b| b.1.timestamp.cmp(&a.1.timestamp));
    Ok(saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lg_core::{generate_level, LevelParameters};

    fn level() -> LevelData {
        let params = LevelParameters {
            combat_rooms: 1,
            ..Default::default()
        };
        generate_level(&params, 42)
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join("lg_save_test_round_trip.json");
        let original = level();

        save_level(&original, &path).unwrap();
        assert!(save_exists(&path));

        let layout = load_layout(&path).unwrap();
        assert_eq!(layout, original.layout());

        let replayed = load_level(&path).unwrap();
        assert_eq!(replayed, original);

        delete_save(&path).unwrap();
        assert!(!save_exists(&path));
    }

    #[test]
    fn test_compact_save_loads() {
        let path = std::env::temp_dir().join("lg_save_test_compact.json");
        let layout = level().layout();

        save_layout_compact(&layout, &path).unwrap();
        let header = load_header(&path).unwrap();
        assert_eq!(header.seed, 42);
        assert_eq!(header.room_count, 3);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_header_validation() {
        let header = SaveHeader::new(&level().layout());
        assert!(header.validate().is_ok());

        let mut bad_header = header.clone();
        bad_header.magic = "XXXX".to_string();
        assert!(matches!(bad_header.validate(), Err(SaveError::InvalidHeader)));

        let mut old_header = header;
        old_header.version = 999;
        assert!(matches!(
            old_header.validate(),
            Err(SaveError::IncompatibleVersion { .. })
        ));
    }

    #[test]
    fn test_room_count_mismatch() {
        let mut save_file = SaveFile::new(level().layout());
        save_file.layout.rooms.pop();
        assert!(matches!(
            save_file.validate(),
            Err(SaveError::RoomCountMismatch {
                expected: 3,
                found: 2
            })
        ));
    }

    #[test]
    fn test_tampered_layout_fails_replay() {
        let path = std::env::temp_dir().join("lg_save_test_tampered.json");
        let mut save_file = SaveFile::new(level().layout());
        save_file.layout.rooms[0].entrance.x += 1;
        let json = serde_json::to_string(&save_file).unwrap();
        std::fs::write(&path, json).unwrap();

        assert!(matches!(load_level(&path), Err(SaveError::Replay(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_nonexistent() {
        let result = load_layout("/nonexistent/path/level.json");
        assert!(matches!(result, Err(SaveError::NotFound)));
    }
}
