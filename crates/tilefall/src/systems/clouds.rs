use glam::Vec2;
use rand::Rng;

use crate::assets::registry::Image;
use crate::renderer::frame::{Frame, Layer};

/// A parallax cloud. `depth` scales how much it follows the camera.
#[derive(Debug, Clone, Copy)]
pub struct Cloud {
    pub pos: Vec2,
    pub image: Image,
    pub speed: f32,
    pub depth: f32,
}

impl Cloud {
    pub fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Screen position, wrapped so the cloud keeps reappearing.
    pub fn screen_pos(&self, offset: Vec2, view: Vec2) -> Vec2 {
        let size = Vec2::new(self.image.width as f32, self.image.height as f32);
        let scrolled = self.pos - offset * self.depth;
        Vec2::new(
            scrolled.x.rem_euclid(view.x + size.x) - size.x,
            scrolled.y.rem_euclid(view.y + size.y) - size.y,
        )
    }

    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        let pos = self.screen_pos(offset, frame.size());
        frame.blit(Layer::Backdrop, self.image.id, pos, false);
    }
}

/// Background cloud layer, drawn far to near.
#[derive(Debug, Clone, Default)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    pub const DEFAULT_COUNT: usize = 16;

    pub fn new(images: &[Image], count: usize, rng: &mut impl Rng) -> Self {
        if images.is_empty() {
            return Self::default();
        }
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.gen::<f32>() * 99999.0, rng.gen::<f32>() * 99999.0),
                image: images[rng.gen_range(0..images.len())],
                speed: rng.gen::<f32>() * 0.05 + 0.05,
                depth: rng.gen::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        for cloud in &self.clouds {
            cloud.render(frame, offset);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::registry::ImageId;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn images() -> Vec<Image> {
        vec![Image::new(ImageId(1), 40, 20), Image::new(ImageId(2), 30, 10)]
    }

    #[test]
    fn clouds_are_sorted_by_depth() {
        let mut rng = SmallRng::seed_from_u64(9);
        let clouds = Clouds::new(&images(), Clouds::DEFAULT_COUNT, &mut rng);
        assert_eq!(clouds.len(), 16);
        let depths: Vec<f32> = clouds.iter().map(|c| c.depth).collect();
        assert!(depths.windows(2).all(|w| w[0] <= w[1]));
        assert!(clouds.iter().all(|c| (0.2..0.8).contains(&c.depth)));
        assert!(clouds.iter().all(|c| (0.05..0.1).contains(&c.speed)));
    }

    #[test]
    fn no_images_means_no_clouds() {
        let mut rng = SmallRng::seed_from_u64(9);
        assert!(Clouds::new(&[], 16, &mut rng).is_empty());
    }

    #[test]
    fn screen_position_wraps_into_view() {
        let cloud = Cloud {
            pos: Vec2::new(1000.0, 35.0),
            image: Image::new(ImageId(1), 40, 20),
            speed: 0.1,
            depth: 0.5,
        };
        let view = Vec2::new(320.0, 240.0);
        // 1000 - 100 * 0.5 = 950; 950 mod 360 = 230
        let pos = cloud.screen_pos(Vec2::new(100.0, 0.0), view);
        assert_eq!(pos, Vec2::new(190.0, 15.0));

        let behind = cloud.screen_pos(Vec2::new(3000.0, 0.0), view);
        assert!(behind.x >= -40.0 && behind.x < 320.0);
    }

    #[test]
    fn update_drifts_right() {
        let mut c = Cloud {
            pos: Vec2::ZERO,
            image: Image::new(ImageId(1), 40, 20),
            speed: 0.08,
            depth: 0.3,
        };
        c.update();
        assert!((c.pos.x - 0.08).abs() < 1e-6);
    }
}
