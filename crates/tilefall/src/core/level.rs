//! Level files and where they come from.
//!
//! A level is `{ tilemap: { "x;y": tile }, tile_size, offgrid: [tile] }` in
//! JSON. Parsing produces a complete `Tilemap` or an error; callers never
//! see a half-built level.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io;
use std::path::PathBuf;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::tilemap::{OffgridTile, Tile, TileKind, Tilemap};

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("map not found: {0}")]
    MapNotFound(MapId),
    #[error("map {map} is corrupt: {reason}")]
    MapCorrupt { map: MapId, reason: String },
    #[error("map i/o: {0}")]
    Io(#[from] io::Error),
    #[error("map encoding: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Identifies a map: numbered maps form the campaign, named maps stand alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapId {
    Index(u32),
    Name(String),
}

impl MapId {
    /// Numeric strings become indices, anything else a name.
    pub fn parse(s: &str) -> Self {
        match s.parse::<u32>() {
            Ok(index) => MapId::Index(index),
            Err(_) => MapId::Name(s.to_string()),
        }
    }

    /// The map to play after this one is cleared.
    ///
    /// Numbered maps advance and stay on the last one; a named map repeats.
    /// `count == 0` means the number of maps is unknown.
    pub fn next(&self, count: u32) -> MapId {
        match self {
            MapId::Index(i) if count == 0 => MapId::Index(i.saturating_add(1)),
            MapId::Index(i) => MapId::Index(i.saturating_add(1).min(count - 1)),
            MapId::Name(_) => self.clone(),
        }
    }
}

impl Default for MapId {
    fn default() -> Self {
        MapId::Index(0)
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapId::Index(i) => write!(f, "{i}"),
            MapId::Name(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: u32,
    pub pos: [i32; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffgridRecord {
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub variant: u32,
    pub pos: [f32; 2],
}

/// On-disk level layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub tilemap: BTreeMap<String, TileRecord>,
    pub tile_size: u32,
    #[serde(default)]
    pub offgrid: Vec<OffgridRecord>,
}

impl LevelFile {
    pub fn from_json(map: &MapId, json: &str) -> Result<Self, LevelError> {
        serde_json::from_str(json).map_err(|e| LevelError::MapCorrupt {
            map: map.clone(),
            reason: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Snapshot a tilemap. Grid keys are written as `"x;y"`.
    pub fn from_tilemap(tilemap: &Tilemap) -> Self {
        let tiles = tilemap
            .tiles()
            .map(|t| {
                (
                    format!("{};{}", t.pos.x, t.pos.y),
                    TileRecord {
                        kind: t.kind,
                        variant: t.variant,
                        pos: [t.pos.x, t.pos.y],
                    },
                )
            })
            .collect();
        let offgrid = tilemap
            .offgrid()
            .iter()
            .map(|t| OffgridRecord {
                kind: t.kind,
                variant: t.variant,
                pos: [t.pos.x, t.pos.y],
            })
            .collect();
        Self {
            tilemap: tiles,
            tile_size: tilemap.tile_size(),
            offgrid,
        }
    }

    /// Build the tilemap, checking that every key matches its tile's cell.
    pub fn into_tilemap(self, map: &MapId) -> Result<Tilemap, LevelError> {
        let corrupt = |reason: String| LevelError::MapCorrupt {
            map: map.clone(),
            reason,
        };
        if self.tile_size == 0 {
            return Err(corrupt("tile_size must be positive".into()));
        }

        let mut tilemap = Tilemap::new(self.tile_size);
        for (key, record) in self.tilemap {
            let cell = parse_key(&key).ok_or_else(|| corrupt(format!("bad tile key {key:?}")))?;
            let pos = IVec2::from_array(record.pos);
            if cell != pos {
                return Err(corrupt(format!("tile key {key:?} holds a tile at {pos}")));
            }
            tilemap.insert(Tile::new(record.kind, record.variant, pos));
        }
        for record in self.offgrid {
            tilemap.add_offgrid(OffgridTile::new(
                record.kind,
                record.variant,
                Vec2::from_array(record.pos),
            ));
        }
        Ok(tilemap)
    }
}

fn parse_key(key: &str) -> Option<IVec2> {
    let (x, y) = key.split_once(';')?;
    Some(IVec2::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Supplies level JSON by map id. File access lives behind this trait.
pub trait MapSource {
    fn read(&self, map: &MapId) -> Result<String, LevelError>;

    /// Number of consecutively numbered maps starting at 0.
    fn count(&self) -> u32;

    /// Read and parse a map in one go.
    fn load(&self, map: &MapId) -> Result<Tilemap, LevelError> {
        let json = self.read(map)?;
        LevelFile::from_json(map, &json)?.into_tilemap(map)
    }
}

/// Maps stored as `<dir>/<id>.json`.
#[derive(Debug, Clone)]
pub struct DirMapSource {
    dir: PathBuf,
}

impl DirMapSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, map: &MapId) -> PathBuf {
        self.dir.join(format!("{map}.json"))
    }
}

impl MapSource for DirMapSource {
    fn read(&self, map: &MapId) -> Result<String, LevelError> {
        std::fs::read_to_string(self.path(map)).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LevelError::MapNotFound(map.clone()),
            _ => LevelError::Io(e),
        })
    }

    fn count(&self) -> u32 {
        (0..)
            .take_while(|i| self.path(&MapId::Index(*i)).is_file())
            .count() as u32
    }
}

/// Maps held in memory, e.g. uploaded by a browser host.
#[derive(Debug, Clone, Default)]
pub struct MemoryMapSource {
    maps: HashMap<MapId, String>,
}

impl MemoryMapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, map: MapId, json: impl Into<String>) {
        self.maps.insert(map, json.into());
    }

    pub fn with_map(mut self, map: MapId, json: impl Into<String>) -> Self {
        self.insert(map, json);
        self
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

impl MapSource for MemoryMapSource {
    fn read(&self, map: &MapId) -> Result<String, LevelError> {
        self.maps
            .get(map)
            .cloned()
            .ok_or_else(|| LevelError::MapNotFound(map.clone()))
    }

    fn count(&self) -> u32 {
        (0..)
            .take_while(|i| self.maps.contains_key(&MapId::Index(*i)))
            .count() as u32
    }
}
