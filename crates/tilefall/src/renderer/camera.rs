use glam::{IVec2, Vec2};
use rand::Rng;

/// Scrolling camera that eases toward a target.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    /// Top-left corner of the view in world pixels.
    pub scroll: Vec2,
}

impl Camera {
    /// Fraction of the remaining distance covered each tick.
    pub const FOLLOW_RATE: f32 = 1.0 / 30.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Jump straight to a scroll position.
    pub fn snap_to(&mut self, scroll: Vec2) {
        self.scroll = scroll;
    }

    /// Move toward centring `target` in a view of `view_size` pixels.
    pub fn follow(&mut self, target: Vec2, view_size: Vec2) {
        let desired = target - view_size * 0.5;
        self.scroll += (desired - self.scroll) * Self::FOLLOW_RATE;
    }

    /// Whole-pixel offset used for drawing (truncated toward zero).
    pub fn render_offset(&self) -> IVec2 {
        self.scroll.as_ivec2()
    }
}

/// Decaying screenshake.
#[derive(Debug, Clone, Copy, Default)]
pub struct Screenshake {
    intensity: f32,
}

impl Screenshake {
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Raise intensity to at least `floor`. Never lowers it.
    pub fn raise(&mut self, floor: f32) {
        self.intensity = self.intensity.max(floor);
    }

    /// Lose one unit of intensity.
    pub fn decay(&mut self) {
        self.intensity = (self.intensity - 1.0).max(0.0);
    }

    /// Random present offset within ±intensity/2 on each axis.
    pub fn sample(&self, rng: &mut impl Rng) -> Vec2 {
        let s = self.intensity;
        Vec2::new(
            rng.gen::<f32>() * s - s / 2.0,
            rng.gen::<f32>() * s - s / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn follow_covers_a_thirtieth_of_the_gap() {
        let mut cam = Camera::new();
        cam.follow(Vec2::new(460.0, 120.0), Vec2::new(320.0, 240.0));
        assert!((cam.scroll.x - 10.0).abs() < 1e-4);
        assert!(cam.scroll.y.abs() < 1e-4);
    }

    #[test]
    fn follow_converges() {
        let mut cam = Camera::new();
        for _ in 0..2000 {
            cam.follow(Vec2::new(500.0, 300.0), Vec2::new(320.0, 240.0));
        }
        assert!((cam.scroll - Vec2::new(340.0, 180.0)).length() < 0.01);
    }

    #[test]
    fn render_offset_truncates() {
        let mut cam = Camera::new();
        cam.snap_to(Vec2::new(12.9, -3.7));
        assert_eq!(cam.render_offset(), IVec2::new(12, -3));
    }

    #[test]
    fn shake_raise_is_a_floor() {
        let mut shake = Screenshake::default();
        shake.raise(16.0);
        shake.decay();
        shake.raise(10.0);
        assert_eq!(shake.intensity(), 15.0);
    }

    #[test]
    fn shake_decays_to_zero_and_stays() {
        let mut shake = Screenshake::default();
        shake.raise(2.0);
        for _ in 0..5 {
            shake.decay();
        }
        assert_eq!(shake.intensity(), 0.0);
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(shake.sample(&mut rng), Vec2::ZERO);
    }

    #[test]
    fn shake_sample_stays_in_range() {
        let mut shake = Screenshake::default();
        shake.raise(16.0);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..100 {
            let o = shake.sample(&mut rng);
            assert!(o.x >= -8.0 && o.x <= 8.0);
            assert!(o.y >= -8.0 && o.y <= 8.0);
        }
    }
}
