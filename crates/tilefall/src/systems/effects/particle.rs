//! Animated particles: falling leaves and dash/death dust.

use glam::Vec2;

use crate::assets::registry::ParticleAnimations;
use crate::components::animation::Animation;
use crate::renderer::frame::{Frame, Layer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Leaf,
    Dust,
}

/// A sprite that drifts along a fixed velocity until its animation ends.
#[derive(Debug, Clone)]
pub struct Particle {
    pub kind: ParticleKind,
    pub pos: Vec2,
    pub velocity: Vec2,
    animation: Animation,
}

impl Particle {
    /// Leaf sway: horizontal offset per tick is `sin(frame * RATE) * AMPLITUDE`.
    pub const LEAF_SWAY_RATE: f32 = 0.035;
    pub const LEAF_SWAY_AMPLITUDE: f32 = 0.3;

    pub fn new(
        kind: ParticleKind,
        pos: Vec2,
        velocity: Vec2,
        frame: u32,
        animations: &ParticleAnimations,
    ) -> Self {
        let def = match kind {
            ParticleKind::Leaf => &animations.leaf,
            ParticleKind::Dust => &animations.particle,
        };
        Self {
            kind,
            pos,
            velocity,
            animation: def.instance().with_frame(frame),
        }
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Advance one tick. Returns false once the animation has finished.
    ///
    /// The finished check happens before moving, so a particle is still drawn
    /// on the tick its last frame is reached.
    pub fn tick(&mut self) -> bool {
        if self.animation.done {
            return false;
        }
        self.pos += self.velocity;
        self.animation.update();
        if self.kind == ParticleKind::Leaf {
            self.pos.x +=
                (self.animation.frame as f32 * Self::LEAF_SWAY_RATE).sin() * Self::LEAF_SWAY_AMPLITUDE;
        }
        true
    }

    /// Draw centred on `pos`.
    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        if let Some(image) = self.animation.image() {
            let half = Vec2::new((image.width / 2) as f32, (image.height / 2) as f32);
            frame.blit(Layer::Display, image.id, self.pos - offset - half, false);
        }
    }
}
