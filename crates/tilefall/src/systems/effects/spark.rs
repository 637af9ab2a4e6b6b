use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::renderer::frame::{Color, Frame, Layer};

/// A streak flying along `angle` and slowing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spark {
    pub pos: Vec2,
    /// Direction of travel in radians.
    pub angle: f32,
    pub speed: f32,
}

impl Spark {
    /// Speed lost per tick.
    pub const DECAY: f32 = 0.1;

    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self { pos, angle, speed }
    }

    /// Advance one tick. Returns false once the spark has stopped.
    pub fn tick(&mut self) -> bool {
        self.pos += Vec2::from_angle(self.angle) * self.speed;
        self.speed -= Self::DECAY;
        self.speed > 0.0
    }

    /// Diamond outline: long along the direction of travel, narrow across it.
    pub fn points(&self, offset: Vec2) -> [Vec2; 4] {
        let center = self.pos - offset;
        let at = |angle: f32, reach: f32| center + Vec2::from_angle(angle) * reach;
        [
            at(self.angle, self.speed * 3.0),
            at(self.angle + FRAC_PI_2, self.speed * 0.5),
            at(self.angle + PI, self.speed * 3.0),
            at(self.angle + PI + FRAC_PI_2, self.speed * 0.5),
        ]
    }

    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        frame.fill_polygon(Layer::Display, self.points(offset), Color::WHITE);
    }
}
