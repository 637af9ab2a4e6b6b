//! Shared physics entity record.
//!
//! Player and enemy both wrap an `Entity` and differ only in their action
//! set and the behaviour they run around the shared physics step.

use std::fmt::Debug;

use glam::Vec2;

use crate::assets::registry::Assets;
use crate::components::animation::{Animation, AnimationDef};
use crate::components::tilemap::Tilemap;
use crate::core::physics::{self, Collisions, Rect};
use crate::renderer::frame::{Frame, Layer};

/// A closed set of actions, each bound to one animation.
pub trait ActionSet: Copy + Eq + Debug {
    fn animation(self, assets: &Assets) -> &AnimationDef;
}

/// Common state of every physics-driven actor.
#[derive(Debug, Clone)]
pub struct Entity<A: ActionSet> {
    /// Top-left corner of the collision box.
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    /// Sides that touched solid tiles during the last physics step.
    pub collisions: Collisions,
    /// Facing left.
    pub flip: bool,
    /// Movement requested on the last physics step.
    pub last_movement: Vec2,
    action: A,
    animation: Animation,
}

impl<A: ActionSet> Entity<A> {
    /// Sprites are drawn this far from the collision box.
    pub const ANIMATION_OFFSET: Vec2 = Vec2::new(-3.0, -3.0);

    pub fn new(pos: Vec2, size: Vec2, action: A, assets: &Assets) -> Self {
        Self {
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
            flip: false,
            last_movement: Vec2::ZERO,
            action,
            animation: action.animation(assets).instance(),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn action(&self) -> A {
        self.action
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Switch action. The animation restarts only when the action changes.
    pub fn set_action(&mut self, action: A, assets: &Assets) {
        if action != self.action {
            self.action = action;
            self.animation = action.animation(assets).instance();
        }
    }

    /// One physics step: resolve movement plus velocity against the tiles,
    /// face the requested direction, apply gravity and advance the animation.
    pub fn update_physics(&mut self, tilemap: &Tilemap, movement: Vec2) {
        let frame_movement = movement + self.velocity;
        self.collisions = physics::resolve_motion(tilemap, &mut self.pos, self.size, frame_movement);

        if movement.x > 0.0 {
            self.flip = false;
        }
        if movement.x < 0.0 {
            self.flip = true;
        }

        physics::apply_gravity(&mut self.velocity, self.collisions);
        self.last_movement = movement;
        self.animation.update();
    }

    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        if let Some(image) = self.animation.image() {
            frame.blit(
                Layer::Display,
                image.id,
                self.pos - offset + Self::ANIMATION_OFFSET,
                self.flip,
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::assets::registry::{AssetError, Assets, Image, ImageId, ImageSource};

    /// Image source where every directory holds four 16x16 frames.
    pub struct FlatImages {
        next: u32,
    }

    impl ImageSource for FlatImages {
        fn load_image(&mut self, _path: &str) -> Result<Image, AssetError> {
            self.next += 1;
            Ok(Image::new(ImageId(self.next), 6, 4))
        }

        fn load_images(&mut self, _dir: &str) -> Result<Vec<Image>, AssetError> {
            Ok((0..4)
                .map(|_| {
                    self.next += 1;
                    Image::new(ImageId(self.next), 16, 16)
                })
                .collect())
        }
    }

    pub fn assets() -> Assets {
        Assets::load(&mut FlatImages { next: 0 }).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::assets;
    use super::*;
    use crate::components::tilemap::{Tile, TileKind};
    use glam::IVec2;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Probe {
        Still,
        Moving,
    }

    impl ActionSet for Probe {
        fn animation(self, assets: &Assets) -> &AnimationDef {
            match self {
                Probe::Still => &assets.enemy.idle,
                Probe::Moving => &assets.enemy.run,
            }
        }
    }

    fn ground() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in 0..4 {
            map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(x, 4)));
        }
        map
    }

    #[test]
    fn falls_and_settles_on_ground() {
        let assets = assets();
        let map = ground();
        let mut e = Entity::new(Vec2::new(20.0, 40.0), Vec2::new(8.0, 15.0), Probe::Still, &assets);

        let mut ticks = 0;
        while !e.collisions.down {
            e.update_physics(&map, Vec2::ZERO);
            ticks += 1;
            assert!(ticks < 100, "never landed");
        }
        assert_eq!(e.velocity.y, 0.0);
        assert_eq!(e.pos.y, 64.0 - 15.0);

        for _ in 0..30 {
            e.update_physics(&map, Vec2::ZERO);
            assert_eq!(e.pos.y, 49.0);
        }
    }

    #[test]
    fn facing_follows_requested_movement_only() {
        let assets = assets();
        let map = Tilemap::new(16);
        let mut e = Entity::new(Vec2::ZERO, Vec2::new(8.0, 15.0), Probe::Still, &assets);

        e.update_physics(&map, Vec2::new(-1.0, 0.0));
        assert!(e.flip);

        e.velocity.x = 3.0;
        e.update_physics(&map, Vec2::ZERO);
        assert!(e.flip);
        assert_eq!(e.last_movement, Vec2::ZERO);
    }

    #[test]
    fn set_action_restarts_only_on_change() {
        let assets = assets();
        let map = Tilemap::new(16);
        let mut e = Entity::new(Vec2::ZERO, Vec2::new(8.0, 15.0), Probe::Still, &assets);
        e.update_physics(&map, Vec2::ZERO);
        e.update_physics(&map, Vec2::ZERO);

        e.set_action(Probe::Still, &assets);
        assert_eq!(e.animation().frame, 2);

        e.set_action(Probe::Moving, &assets);
        assert_eq!(e.action(), Probe::Moving);
        assert_eq!(e.animation().frame, 0);
    }

    #[test]
    fn render_applies_sprite_offset() {
        let assets = assets();
        let e = Entity::new(Vec2::new(10.0, 10.0), Vec2::new(8.0, 15.0), Probe::Still, &assets);
        let mut frame = Frame::new(Vec2::new(320.0, 240.0));
        e.render(&mut frame, Vec2::new(2.0, 1.0));
        match frame.commands()[0] {
            crate::renderer::frame::DrawCommand::Blit { pos, flip_x, .. } => {
                assert_eq!(pos, Vec2::new(5.0, 6.0));
                assert!(!flip_x);
            }
            ref other => panic!("unexpected {other:?}"),
        }
    }
}
