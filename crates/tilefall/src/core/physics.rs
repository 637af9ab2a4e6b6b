//! Tile-grid collision resolution.
//!
//! Movement is resolved one axis at a time against the solid tiles around
//! the mover: X first, then Y from the already-corrected position. Each axis
//! clamps the leading edge to the tile it ran into and records which side
//! was hit. Resolution is purely positional; nothing bounces.

use glam::Vec2;

use crate::components::tilemap::Tilemap;

/// Downward acceleration per tick.
pub const GRAVITY: f32 = 0.1;
/// Maximum downward speed.
pub const TERMINAL_VELOCITY: f32 = 5.0;

/// Axis-aligned rectangle in pixel space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// Interiors intersect. Touching edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point lies inside, right and bottom edges excluded.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }
}

/// Which sides of a mover touched solid tiles during the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Collisions {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.up || self.down
    }
}

/// Move a box by `frame_movement`, stopping it against solid tiles.
///
/// `pos` is the box's top-left corner and is written back corrected.
pub fn resolve_motion(
    tilemap: &Tilemap,
    pos: &mut Vec2,
    size: Vec2,
    frame_movement: Vec2,
) -> Collisions {
    let mut collisions = Collisions::default();

    pos.x += frame_movement.x;
    let mut rect = Rect::new(*pos, size);
    for tile in tilemap.solid_rects_near(*pos) {
        if rect.overlaps(&tile) {
            if frame_movement.x > 0.0 {
                rect.pos.x = tile.left() - size.x;
                collisions.right = true;
            }
            if frame_movement.x < 0.0 {
                rect.pos.x = tile.right();
                collisions.left = true;
            }
            pos.x = rect.pos.x;
        }
    }

    pos.y += frame_movement.y;
    let mut rect = Rect::new(*pos, size);
    for tile in tilemap.solid_rects_near(*pos) {
        if rect.overlaps(&tile) {
            if frame_movement.y > 0.0 {
                rect.pos.y = tile.top() - size.y;
                collisions.down = true;
            }
            if frame_movement.y < 0.0 {
                rect.pos.y = tile.bottom();
                collisions.up = true;
            }
            pos.y = rect.pos.y;
        }
    }

    collisions
}

/// Accelerate downward up to terminal velocity; vertical contact cancels it.
pub fn apply_gravity(velocity: &mut Vec2, collisions: Collisions) {
    velocity.y = (velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
    if collisions.vertical() {
        velocity.y = 0.0;
    }
}
