//! Sparse tile grid for level geometry and decoration.
//!
//! On-grid tiles live in a hash map keyed by their integer cell, so levels
//! can grow in any direction without reallocating. Off-grid tiles are a
//! plain ordered list of pixel-space placements drawn behind the grid.
//! Rendering is culled to the cells under the viewport.

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::assets::registry::Assets;
use crate::core::physics::Rect;
use crate::renderer::frame::{Frame, Layer};

/// The closed set of tile kinds a level may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Decor,
    Grass,
    LargeDecor,
    Stone,
    /// Entity spawn markers. Never drawn during play.
    Spawners,
}

impl TileKind {
    pub const ALL: [TileKind; 5] = [
        Self::Decor,
        Self::Grass,
        Self::LargeDecor,
        Self::Stone,
        Self::Spawners,
    ];

    /// Name used in level files and asset directories.
    pub fn name(self) -> &'static str {
        match self {
            Self::Decor => "decor",
            Self::Grass => "grass",
            Self::LargeDecor => "large_decor",
            Self::Stone => "stone",
            Self::Spawners => "spawners",
        }
    }

    /// Whether tiles of this kind block movement.
    pub fn is_solid(self) -> bool {
        matches!(self, Self::Grass | Self::Stone)
    }

    /// Whether `Tilemap::autotile` picks variants for this kind.
    pub fn autotiles(self) -> bool {
        matches!(self, Self::Grass | Self::Stone)
    }
}

/// A grid-aligned tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u32,
    /// Grid cell.
    pub pos: IVec2,
}

impl Tile {
    pub fn new(kind: TileKind, variant: u32, pos: IVec2) -> Self {
        Self { kind, variant, pos }
    }
}

/// A free-floating tile placed in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u32,
    /// Top-left corner in pixels.
    pub pos: Vec2,
}

impl OffgridTile {
    pub fn new(kind: TileKind, variant: u32, pos: Vec2) -> Self {
        Self { kind, variant, pos }
    }
}

/// The 3×3 block around (and including) a cell.
const NEIGHBOR_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, -1),
    IVec2::new(-1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, -1),
    IVec2::new(0, 0),
    IVec2::new(0, 1),
    IVec2::new(1, -1),
    IVec2::new(1, 0),
    IVec2::new(1, 1),
];

const NORTH: u8 = 1;
const SOUTH: u8 = 2;
const EAST: u8 = 4;
const WEST: u8 = 8;

/// Same-kind neighbour mask → visual variant. Masks not listed keep their variant.
const AUTOTILE_MAP: [(u8, u32); 9] = [
    (EAST | SOUTH, 0),
    (EAST | SOUTH | WEST, 1),
    (WEST | SOUTH, 2),
    (WEST | NORTH | SOUTH, 3),
    (WEST | NORTH, 4),
    (WEST | NORTH | EAST, 5),
    (EAST | NORTH, 6),
    (EAST | NORTH | SOUTH, 7),
    (EAST | WEST | NORTH | SOUTH, 8),
];

const AUTOTILE_SHIFTS: [(IVec2, u8); 4] = [
    (IVec2::new(0, -1), NORTH),
    (IVec2::new(0, 1), SOUTH),
    (IVec2::new(1, 0), EAST),
    (IVec2::new(-1, 0), WEST),
];

/// Sparse tilemap: at most one tile per cell, plus off-grid decoration.
#[derive(Debug, Clone)]
pub struct Tilemap {
    tile_size: u32,
    tiles: HashMap<IVec2, Tile>,
    offgrid: Vec<OffgridTile>,
}

impl Tilemap {
    /// Create an empty tilemap.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size: tile_size.max(1),
            tiles: HashMap::new(),
            offgrid: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Place a tile, replacing whatever occupied its cell.
    pub fn insert(&mut self, tile: Tile) -> Option<Tile> {
        self.tiles.insert(tile.pos, tile)
    }

    /// Remove the tile at a grid cell.
    pub fn remove(&mut self, cell: IVec2) -> Option<Tile> {
        self.tiles.remove(&cell)
    }

    pub fn add_offgrid(&mut self, tile: OffgridTile) {
        self.offgrid.push(tile);
    }

    /// Tile at a grid cell.
    pub fn tile_at(&self, cell: IVec2) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn offgrid(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    /// Count of on-grid tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.offgrid.is_empty()
    }

    /// Grid cell containing a pixel position.
    pub fn cell_of(&self, pixel: Vec2) -> IVec2 {
        (pixel / self.tile_size as f32).floor().as_ivec2()
    }

    /// Solid tile covering a pixel position.
    pub fn solid_at(&self, pixel: Vec2) -> Option<&Tile> {
        self.tiles
            .get(&self.cell_of(pixel))
            .filter(|tile| tile.kind.is_solid())
    }

    pub fn is_solid(&self, pixel: Vec2) -> bool {
        self.solid_at(pixel).is_some()
    }

    /// Tiles in the 3×3 block of cells around a pixel position.
    pub fn neighbors(&self, pixel: Vec2) -> impl Iterator<Item = &Tile> + '_ {
        let cell = self.cell_of(pixel);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(move |offset| self.tiles.get(&(cell + *offset)))
    }

    /// One tile-sized rectangle per solid neighbour of a pixel position.
    pub fn solid_rects_near(&self, pixel: Vec2) -> Vec<Rect> {
        let size = self.tile_size as f32;
        self.neighbors(pixel)
            .filter(|tile| tile.kind.is_solid())
            .map(|tile| Rect::new(tile.pos.as_vec2() * size, Vec2::splat(size)))
            .collect()
    }

    /// Pull out every tile matching one of the `(kind, variant)` pairs.
    ///
    /// Off-grid matches come first, in list order, followed by on-grid matches
    /// in row-major order with their position converted to pixels. Matches are
    /// removed from the map unless `keep` is set.
    pub fn extract(&mut self, matches: &[(TileKind, u32)], keep: bool) -> Vec<OffgridTile> {
        let wanted = |kind: TileKind, variant: u32| matches.contains(&(kind, variant));
        let mut found = Vec::new();

        for tile in &self.offgrid {
            if wanted(tile.kind, tile.variant) {
                found.push(*tile);
            }
        }
        if !keep {
            self.offgrid.retain(|tile| !wanted(tile.kind, tile.variant));
        }

        let mut cells: Vec<IVec2> = self
            .tiles
            .values()
            .filter(|tile| wanted(tile.kind, tile.variant))
            .map(|tile| tile.pos)
            .collect();
        cells.sort_by_key(|cell| (cell.y, cell.x));

        let size = self.tile_size as f32;
        for cell in cells {
            let tile = if keep {
                self.tiles.get(&cell).copied()
            } else {
                self.tiles.remove(&cell)
            };
            if let Some(tile) = tile {
                found.push(OffgridTile::new(tile.kind, tile.variant, tile.pos.as_vec2() * size));
            }
        }

        found
    }

    /// Pick visual variants for autotiled kinds from their same-kind neighbours.
    ///
    /// Pure function of adjacency; run again after edits that add or remove tiles.
    pub fn autotile(&mut self) {
        let updates: Vec<(IVec2, u32)> = self
            .tiles
            .values()
            .filter(|tile| tile.kind.autotiles())
            .filter_map(|tile| {
                let mask = self.neighbor_mask(tile);
                AUTOTILE_MAP
                    .iter()
                    .find(|(m, _)| *m == mask)
                    .map(|(_, variant)| (tile.pos, *variant))
            })
            .collect();

        for (cell, variant) in updates {
            if let Some(tile) = self.tiles.get_mut(&cell) {
                tile.variant = variant;
            }
        }
    }

    fn neighbor_mask(&self, tile: &Tile) -> u8 {
        AUTOTILE_SHIFTS
            .iter()
            .filter(|(shift, _)| {
                self.tiles
                    .get(&(tile.pos + *shift))
                    .is_some_and(|n| n.kind == tile.kind)
            })
            .fold(0, |mask, (_, bit)| mask | bit)
    }

    /// Grid cells whose footprint intersects a viewport at `offset` of `size` pixels.
    pub fn visible_cells(&self, offset: IVec2, size: IVec2) -> impl Iterator<Item = IVec2> {
        let ts = self.tile_size as i32;
        let min = IVec2::new(offset.x.div_euclid(ts), offset.y.div_euclid(ts));
        let max = IVec2::new(
            (offset.x + size.x).div_euclid(ts),
            (offset.y + size.y).div_euclid(ts),
        );
        (min.x..=max.x).flat_map(move |x| (min.y..=max.y).map(move |y| IVec2::new(x, y)))
    }

    /// Draw off-grid tiles, then the on-grid tiles under the viewport.
    pub fn render(&self, frame: &mut Frame, assets: &Assets, offset: IVec2) {
        let off = offset.as_vec2();
        for tile in &self.offgrid {
            if let Some(image) = assets.tile_image(tile.kind, tile.variant) {
                frame.blit(Layer::Display, image.id, tile.pos - off, false);
            }
        }

        let size = frame.size().as_ivec2();
        let ts = self.tile_size as f32;
        for cell in self.visible_cells(offset, size) {
            let Some(tile) = self.tiles.get(&cell) else {
                continue;
            };
            if let Some(image) = assets.tile_image(tile.kind, tile.variant) {
                frame.blit(Layer::Display, image.id, tile.pos.as_vec2() * ts - off, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(map: &mut Tilemap, kind: TileKind, min: IVec2, max: IVec2) {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                map.insert(Tile::new(kind, 0, IVec2::new(x, y)));
            }
        }
    }

    #[test]
    fn solidity_depends_on_kind() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(1, 1)));
        map.insert(Tile::new(TileKind::Decor, 0, IVec2::new(2, 1)));

        assert!(map.is_solid(Vec2::new(20.0, 20.0)));
        assert!(!map.is_solid(Vec2::new(36.0, 20.0)));
        assert!(!map.is_solid(Vec2::new(60.0, 20.0)));
    }

    #[test]
    fn negative_pixels_floor_into_negative_cells() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(-1, -1)));
        assert_eq!(map.cell_of(Vec2::new(-0.5, -15.0)), IVec2::new(-1, -1));
        assert!(map.is_solid(Vec2::new(-0.5, -15.0)));
    }

    #[test]
    fn solid_rects_cover_only_solid_neighbors() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(0, 1)));
        map.insert(Tile::new(TileKind::Decor, 0, IVec2::new(1, 1)));
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(5, 5)));

        let rects = map.solid_rects_near(Vec2::new(4.0, 4.0));
        assert_eq!(rects, vec![Rect::new(Vec2::new(0.0, 16.0), Vec2::splat(16.0))]);
        assert_eq!(map.neighbors(Vec2::new(4.0, 4.0)).count(), 2);
    }

    #[test]
    fn autotile_center_of_block_is_fully_connected() {
        let mut map = Tilemap::new(16);
        block(&mut map, TileKind::Grass, IVec2::new(0, 0), IVec2::new(2, 2));
        map.autotile();

        assert_eq!(map.tile_at(IVec2::new(1, 1)).unwrap().variant, 8);
        assert_eq!(map.tile_at(IVec2::new(0, 0)).unwrap().variant, 0);
        assert_eq!(map.tile_at(IVec2::new(1, 0)).unwrap().variant, 1);
        assert_eq!(map.tile_at(IVec2::new(2, 0)).unwrap().variant, 2);
        assert_eq!(map.tile_at(IVec2::new(2, 1)).unwrap().variant, 3);
        assert_eq!(map.tile_at(IVec2::new(2, 2)).unwrap().variant, 4);
        assert_eq!(map.tile_at(IVec2::new(1, 2)).unwrap().variant, 5);
        assert_eq!(map.tile_at(IVec2::new(0, 2)).unwrap().variant, 6);
        assert_eq!(map.tile_at(IVec2::new(0, 1)).unwrap().variant, 7);
    }

    #[test]
    fn autotile_leaves_isolated_and_ineligible_tiles_alone() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Stone, 3, IVec2::new(0, 0)));
        block(&mut map, TileKind::Decor, IVec2::new(5, 5), IVec2::new(7, 7));
        map.autotile();

        assert_eq!(map.tile_at(IVec2::new(0, 0)).unwrap().variant, 3);
        assert_eq!(map.tile_at(IVec2::new(6, 6)).unwrap().variant, 0);
    }

    #[test]
    fn autotile_ignores_other_kinds_as_neighbors() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Grass, 4, IVec2::new(0, 0)));
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(1, 0)));
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(0, 1)));
        map.autotile();
        assert_eq!(map.tile_at(IVec2::new(0, 0)).unwrap().variant, 4);
    }

    #[test]
    fn extract_removes_matches_and_converts_grid_positions() {
        let mut map = Tilemap::new(16);
        map.add_offgrid(OffgridTile::new(TileKind::Spawners, 0, Vec2::new(5.5, 7.25)));
        map.add_offgrid(OffgridTile::new(TileKind::Decor, 1, Vec2::new(1.0, 1.0)));
        map.insert(Tile::new(TileKind::Spawners, 1, IVec2::new(3, 2)));
        map.insert(Tile::new(TileKind::Spawners, 1, IVec2::new(1, 2)));
        map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(0, 3)));

        let found = map.extract(&[(TileKind::Spawners, 0), (TileKind::Spawners, 1)], false);

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].pos, Vec2::new(5.5, 7.25));
        assert_eq!(found[1].pos, Vec2::new(16.0, 32.0));
        assert_eq!(found[2].pos, Vec2::new(48.0, 32.0));
        assert_eq!(map.offgrid().len(), 1);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn extract_with_keep_leaves_map_untouched() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::LargeDecor, 2, IVec2::new(4, 4)));
        let found = map.extract(&[(TileKind::LargeDecor, 2)], true);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pos, Vec2::new(64.0, 64.0));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn visible_cells_cover_viewport_only() {
        let map = Tilemap::new(16);
        let cells: Vec<IVec2> = map
            .visible_cells(IVec2::new(-8, 0), IVec2::new(32, 16))
            .collect();
        // x: -1..=1, y: 0..=1
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&IVec2::new(-1, 0)));
        assert!(cells.contains(&IVec2::new(1, 1)));
        assert!(!cells.contains(&IVec2::new(2, 0)));
    }
}
