//! Level loading
//!
//! A level is a text grid, one character per 64x64 tile:
//!
//! ```text
//! 'x' wall   'v' vortex   's' star   'f' finish   ' ' empty
//! ```
//!
//! The last line of the text is the bottom row of the scene (row 0), so the
//! file reads top-to-bottom the way it appears on screen. Level data is a
//! packaged asset: any unknown character fails the whole load.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tile_center;

/// What a single tile holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Vortex,
    Star,
    Finish,
    Empty,
}

impl TileKind {
    pub fn from_char(tile: char) -> Option<Self> {
        match tile {
            'x' => Some(TileKind::Wall),
            'v' => Some(TileKind::Vortex),
            's' => Some(TileKind::Star),
            'f' => Some(TileKind::Finish),
            ' ' => Some(TileKind::Empty),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            TileKind::Wall => 'x',
            TileKind::Vortex => 'v',
            TileKind::Star => 's',
            TileKind::Finish => 'f',
            TileKind::Empty => ' ',
        }
    }
}

/// A tile to place in the scene, positioned at its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: TileKind,
    pub pos: Vec2,
}

/// Why a level's text was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    /// Character outside the tile alphabet (line and column are 1-based, as
    /// seen in the text file)
    UnknownTile { tile: char, line: usize, column: usize },
    /// Resource exists but could not be read as text
    Unreadable(String),
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::UnknownTile { tile, line, column } => {
                write!(f, "unknown level letter {:?} at line {}, column {}", tile, line, column)
            }
            MalformedReason::Unreadable(msg) => write!(f, "unreadable level text: {}", msg),
        }
    }
}

/// Fatal level loading errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Named level resource is missing
    ResourceNotFound { resource: String },
    /// Resource text is not a valid level
    MalformedLevel { resource: String, reason: MalformedReason },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::ResourceNotFound { resource } => {
                write!(f, "cannot find {} in the level bundle", resource)
            }
            LevelError::MalformedLevel { resource, reason } => {
                write!(f, "malformed level {}: {}", resource, reason)
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Resource name for a level number
pub fn resource_name(level: u32) -> String {
    format!("level{}", level)
}

/// Parsed level, rows stored bottom-to-top
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LevelGrid {
    rows: Vec<Vec<TileKind>>,
}

impl LevelGrid {
    /// Parse level text. Rows are split on '\n' only; a trailing newline
    /// produces an empty bottom row.
    pub fn parse(text: &str) -> Result<Self, MalformedReason> {
        let lines: Vec<&str> = text.split('\n').collect();
        let line_count = lines.len();

        let mut rows = Vec::with_capacity(line_count);
        for (row, line) in lines.iter().rev().enumerate() {
            let mut tiles = Vec::with_capacity(line.len());
            for (column, tile) in line.chars().enumerate() {
                let kind = TileKind::from_char(tile).ok_or(MalformedReason::UnknownTile {
                    tile,
                    line: line_count - row,
                    column: column + 1,
                })?;
                tiles.push(kind);
            }
            rows.push(tiles);
        }

        Ok(Self { rows })
    }

    /// Number of rows (including empty ones)
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row; rows may be ragged
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Tile at (column, row), row 0 at the bottom
    pub fn tile(&self, column: usize, row: usize) -> Option<TileKind> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    /// Row `row` counted from the bottom
    pub fn row(&self, row: usize) -> Option<&[TileKind]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    /// Non-empty tiles, bottom row first, left to right
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, tiles)| {
            tiles
                .iter()
                .enumerate()
                .filter(|(_, kind)| **kind != TileKind::Empty)
                .map(move |(column, kind)| Placement {
                    kind: *kind,
                    pos: tile_center(column, row),
                })
        })
    }
}

/// Where level text comes from
pub trait LevelSource {
    /// Read the text of a named level resource
    fn read(&self, resource: &str) -> Result<String, LevelError>;
}

/// Levels stored as `<dir>/<resource>.txt`
#[derive(Debug, Clone)]
pub struct DirLevelSource {
    dir: PathBuf,
}

impl DirLevelSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, resource: &str) -> PathBuf {
        self.dir.join(format!("{}.txt", resource))
    }
}

impl LevelSource for DirLevelSource {
    fn read(&self, resource: &str) -> Result<String, LevelError> {
        let path = self.path_for(resource);
        std::fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LevelError::ResourceNotFound {
                resource: resource.to_string(),
            },
            _ => LevelError::MalformedLevel {
                resource: resource.to_string(),
                reason: MalformedReason::Unreadable(format!("{}: {}", path.display(), e)),
            },
        })
    }
}

/// In-memory level bundle
#[derive(Debug, Clone, Default)]
pub struct MemoryLevelSource {
    levels: HashMap<String, String>,
}

impl MemoryLevelSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the text for level `level`
    pub fn with_level(mut self, level: u32, text: impl Into<String>) -> Self {
        self.insert(level, text);
        self
    }

    pub fn insert(&mut self, level: u32, text: impl Into<String>) {
        self.levels.insert(resource_name(level), text.into());
    }
}

impl LevelSource for MemoryLevelSource {
    fn read(&self, resource: &str) -> Result<String, LevelError> {
        self.levels
            .get(resource)
            .cloned()
            .ok_or_else(|| LevelError::ResourceNotFound {
                resource: resource.to_string(),
            })
    }
}

/// Load and parse level `level` from `source`
pub fn load_level(source: &dyn LevelSource, level: u32) -> Result<LevelGrid, LevelError> {
    let resource = resource_name(level);
    let text = source.read(&resource)?;
    let grid = LevelGrid::parse(&text)
        .map_err(|reason| LevelError::MalformedLevel { resource: resource.clone(), reason })?;
    log::info!(
        "Loaded {}: {}x{} tiles, {} objects",
        resource,
        grid.width(),
        grid.height(),
        grid.placements().count()
    );
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn placements(text: &str) -> Vec<Placement> {
        LevelGrid::parse(text).unwrap().placements().collect()
    }

    #[test]
    fn test_parse_example_bottom_up() {
        let got = placements("x x\n v \nx x");
        let expected = vec![
            Placement { kind: TileKind::Wall, pos: Vec2::new(32.0, 32.0) },
            Placement { kind: TileKind::Wall, pos: Vec2::new(160.0, 32.0) },
            Placement { kind: TileKind::Vortex, pos: Vec2::new(96.0, 96.0) },
            Placement { kind: TileKind::Wall, pos: Vec2::new(32.0, 160.0) },
            Placement { kind: TileKind::Wall, pos: Vec2::new(160.0, 160.0) },
        ];
        assert_eq!(got, expected);
    }

    #[test]
    fn test_last_line_is_row_zero() {
        let grid = LevelGrid::parse("s  \n  f").unwrap();
        assert_eq!(grid.tile(2, 0), Some(TileKind::Finish));
        assert_eq!(grid.tile(0, 1), Some(TileKind::Star));
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_trailing_newline_adds_empty_bottom_row() {
        let grid = LevelGrid::parse("xx\n").unwrap();
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.row(0), Some(&[][..]));
        let got: Vec<_> = grid.placements().collect();
        assert_eq!(got[0].pos, Vec2::new(32.0, 96.0));
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let grid = LevelGrid::parse("xxxx\nx").unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.row(0).map(<[_]>::len), Some(1));
        assert_eq!(grid.placements().count(), 5);
    }

    #[test]
    fn test_unknown_tile_reports_text_position() {
        let err = LevelGrid::parse("xxx\nx?x\nxxx").unwrap_err();
        assert_eq!(err, MalformedReason::UnknownTile { tile: '?', line: 2, column: 2 });
    }

    #[test]
    fn test_carriage_return_is_rejected() {
        let err = LevelGrid::parse("x\r\nx").unwrap_err();
        assert!(matches!(err, MalformedReason::UnknownTile { tile: '\r', line: 1, column: 2 }));
    }

    #[test]
    fn test_load_level_from_memory() {
        let source = MemoryLevelSource::new().with_level(3, "sf");
        let grid = load_level(&source, 3).unwrap();
        assert_eq!(grid.placements().count(), 2);

        let err = load_level(&source, 4).unwrap_err();
        assert_eq!(err, LevelError::ResourceNotFound { resource: "level4".to_string() });
    }

    #[test]
    fn test_load_level_malformed_names_resource() {
        let source = MemoryLevelSource::new().with_level(1, "x\nQ");
        let err = load_level(&source, 1).unwrap_err();
        match &err {
            LevelError::MalformedLevel { resource, reason } => {
                assert_eq!(resource, "level1");
                assert!(matches!(reason, MalformedReason::UnknownTile { tile: 'Q', .. }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().contains("level1"));
    }

    #[test]
    fn test_dir_source_reads_and_reports_missing() {
        let dir = std::env::temp_dir().join(format!("tilt_maze_levels_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("level1.txt"), "x s\nv f").unwrap();

        let source = DirLevelSource::new(&dir);
        let grid = load_level(&source, 1).unwrap();
        assert_eq!(grid.placements().count(), 4);
        assert!(matches!(
            load_level(&source, 2),
            Err(LevelError::ResourceNotFound { .. })
        ));

        std::fs::write(dir.join("level3.txt"), [0x78, 0xff, 0xfe]).unwrap();
        assert!(matches!(
            load_level(&source, 3),
            Err(LevelError::MalformedLevel { reason: MalformedReason::Unreadable(_), .. })
        ));

        let _ = std::fs::remove_dir_all(&dir);
    }

    fn level_text() -> impl Strategy<Value = String> {
        prop::collection::vec("[xvsf ]{0,12}", 1..10).prop_map(|rows| rows.join("\n"))
    }

    proptest! {
        #[test]
        fn prop_placement_count_matches_tiles(text in level_text()) {
            let expected = text.chars().filter(|c| *c != ' ' && *c != '\n').count();
            prop_assert_eq!(placements(&text).len(), expected);
        }

        #[test]
        fn prop_positions_follow_tile_grid(text in level_text()) {
            let lines: Vec<&str> = text.split('\n').collect();
            let grid = LevelGrid::parse(&text).unwrap();
            for (row, line) in lines.iter().rev().enumerate() {
                for (column, tile) in line.chars().enumerate() {
                    prop_assert_eq!(grid.tile(column, row), TileKind::from_char(tile));
                }
            }
            for p in grid.placements() {
                let column = ((p.pos.x - 32.0) / 64.0) as usize;
                let row = ((p.pos.y - 32.0) / 64.0) as usize;
                prop_assert_eq!(p.pos, Vec2::new(64.0 * column as f32 + 32.0, 64.0 * row as f32 + 32.0));
                prop_assert_eq!(grid.tile(column, row), Some(p.kind));
            }
        }

        #[test]
        fn prop_unknown_character_rejects_level(
            text in level_text(),
            bad in "[^xvsf \n]",
            at in any::<prop::sample::Index>(),
        ) {
            let mut chars: Vec<char> = text.chars().collect();
            let idx = at.index(chars.len() + 1);
            chars.insert(idx, bad.chars().next().unwrap());
            let text: String = chars.into_iter().collect();
            let source = MemoryLevelSource::new().with_level(1, text);
            let is_malformed = matches!(
                load_level(&source, 1),
                Err(LevelError::MalformedLevel { .. })
            );
            prop_assert!(is_malformed);
        }
    }
}
