use glam::{IVec2, Vec2};

use crate::assets::registry::ImageId;

/// Offscreen surfaces the host composites each frame.
///
/// `Display` holds gameplay content; `Backdrop` sits underneath it and
/// receives the background, clouds and the outline silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Layer {
    Backdrop = 0,
    Display = 1,
}

/// Straight-alpha RGBA in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    /// Outline colour drawn behind every opaque display pixel.
    pub const OUTLINE: Color = Color::rgba(0.0, 0.0, 0.0, 180.0 / 255.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// One call against the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Draw an image with its top-left corner at `pos`.
    Blit {
        layer: Layer,
        image: ImageId,
        pos: Vec2,
        flip_x: bool,
    },
    /// Fill a convex quad.
    Polygon {
        layer: Layer,
        points: [Vec2; 4],
        color: Color,
    },
    /// Stamp the display layer's opaque mask onto the backdrop at `offset`.
    Silhouette { offset: IVec2, color: Color },
    /// Black out the display except for a circle of `radius` around `center`.
    TransitionWipe { center: Vec2, radius: f32 },
    /// Composite display over backdrop and scale-blit the result to the
    /// screen, shifted by `offset`.
    Present { offset: Vec2 },
}

/// Ordered draw list for one rendered frame.
#[derive(Debug, Clone)]
pub struct Frame {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl Frame {
    /// Create an empty frame for a surface of `size` pixels.
    pub fn new(size: Vec2) -> Self {
        Self::with_capacity(size, 512)
    }

    pub fn with_capacity(size: Vec2, capacity: usize) -> Self {
        Self {
            size,
            commands: Vec::with_capacity(capacity),
        }
    }

    /// Surface size in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn blit(&mut self, layer: Layer, image: ImageId, pos: Vec2, flip_x: bool) {
        self.commands.push(DrawCommand::Blit {
            layer,
            image,
            pos,
            flip_x,
        });
    }

    pub fn fill_polygon(&mut self, layer: Layer, points: [Vec2; 4], color: Color) {
        self.commands.push(DrawCommand::Polygon {
            layer,
            points,
            color,
        });
    }

    pub fn silhouette(&mut self, offset: IVec2, color: Color) {
        self.commands.push(DrawCommand::Silhouette { offset, color });
    }

    pub fn transition_wipe(&mut self, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::TransitionWipe { center, radius });
    }

    pub fn present(&mut self, offset: Vec2) {
        self.commands.push(DrawCommand::Present { offset });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_keep_submission_order() {
        let mut frame = Frame::new(Vec2::new(320.0, 240.0));
        frame.blit(Layer::Backdrop, ImageId(3), Vec2::ZERO, false);
        frame.silhouette(IVec2::new(-1, 0), Color::OUTLINE);
        frame.present(Vec2::new(2.0, -1.0));

        assert_eq!(frame.len(), 3);
        assert!(matches!(frame.commands()[0], DrawCommand::Blit { layer: Layer::Backdrop, .. }));
        assert!(matches!(frame.commands()[2], DrawCommand::Present { .. }));
    }

    #[test]
    fn clear_keeps_size() {
        let mut frame = Frame::new(Vec2::new(320.0, 240.0));
        frame.transition_wipe(Vec2::new(160.0, 120.0), 40.0);
        frame.clear();
        assert!(frame.is_empty());
        assert_eq!(frame.size(), Vec2::new(320.0, 240.0));
    }

    #[test]
    fn outline_alpha_is_180_of_255() {
        assert!((Color::OUTLINE.a * 255.0 - 180.0).abs() < 1e-3);
    }
}
