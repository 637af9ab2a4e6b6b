use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::api::types::SoundCommand;
use crate::renderer::frame::{Color, DrawCommand, Layer};

/// Draw record kinds, as read by the host.
pub const KIND_BLIT: f32 = 0.0;
pub const KIND_POLYGON: f32 = 1.0;
pub const KIND_SILHOUETTE: f32 = 2.0;
pub const KIND_WIPE: f32 = 3.0;
pub const KIND_PRESENT: f32 = 4.0;

/// One draw command flattened for the host renderer.
/// 16 floats = 64 bytes stride.
///
/// Unused fields are zero. Point fields by kind:
/// - blit: `x0, y0` top-left
/// - polygon: four corners
/// - silhouette, present: `x0, y0` offset
/// - wipe: `x0, y0` centre, `x1` radius
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DrawRecord {
    pub kind: f32,
    pub layer: f32,
    pub image: f32,
    pub flip_x: f32,
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub x3: f32,
    pub y3: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl DrawRecord {
    pub const FLOATS: usize = 16;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    fn at(kind: f32, layer: Layer, pos: Vec2) -> Self {
        Self {
            kind,
            layer: layer as u8 as f32,
            x0: pos.x,
            y0: pos.y,
            ..Self::default()
        }
    }

    fn tinted(mut self, color: Color) -> Self {
        self.r = color.r;
        self.g = color.g;
        self.b = color.b;
        self.a = color.a;
        self
    }
}

impl From<&DrawCommand> for DrawRecord {
    fn from(command: &DrawCommand) -> Self {
        match *command {
            DrawCommand::Blit {
                layer,
                image,
                pos,
                flip_x,
            } => Self {
                image: image.0 as f32,
                flip_x: if flip_x { 1.0 } else { 0.0 },
                ..Self::at(KIND_BLIT, layer, pos)
            },
            DrawCommand::Polygon {
                layer,
                points,
                color,
            } => Self {
                x1: points[1].x,
                y1: points[1].y,
                x2: points[2].x,
                y2: points[2].y,
                x3: points[3].x,
                y3: points[3].y,
                ..Self::at(KIND_POLYGON, layer, points[0])
            }
            .tinted(color),
            DrawCommand::Silhouette { offset, color } => {
                Self::at(KIND_SILHOUETTE, Layer::Backdrop, offset.as_vec2()).tinted(color)
            }
            DrawCommand::TransitionWipe { center, radius } => Self {
                x1: radius,
                ..Self::at(KIND_WIPE, Layer::Display, center)
            },
            DrawCommand::Present { offset } => Self::at(KIND_PRESENT, Layer::Display, offset),
        }
    }
}

/// One sound request: id, volume, looping flag.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SoundRecord {
    pub id: f32,
    pub volume: f32,
    pub looping: f32,
}

impl SoundRecord {
    pub const FLOATS: usize = 3;
}

impl From<&SoundCommand> for SoundRecord {
    fn from(command: &SoundCommand) -> Self {
        Self {
            id: command.sound.id() as f32,
            volume: command.sound.volume(),
            looping: if command.looping { 1.0 } else { 0.0 },
        }
    }
}
