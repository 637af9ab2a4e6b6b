use std::f32::consts::PI;

use glam::Vec2;

use crate::api::types::{PlayerView, SoundEvent, TickContext};
use crate::assets::registry::Image;
use crate::core::physics::Rect;
use crate::renderer::frame::{Frame, Layer};
use crate::systems::effects;
use crate::systems::player::DASH_THRESHOLD;

/// An enemy bullet. Flies horizontally until it hits something or expires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub pos: Vec2,
    /// Horizontal pixels per tick; the sign is the direction.
    pub direction: f32,
    pub age: u32,
}

/// What happened to a projectile this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    None,
    Wall,
    Expired,
    Player,
}

impl Projectile {
    pub const SPEED: f32 = 1.5;
    /// Removed once older than this many ticks.
    pub const MAX_AGE: u32 = 360;

    pub fn new(pos: Vec2, direction: f32) -> Self {
        Self {
            pos,
            direction,
            age: 0,
        }
    }

    /// Move one tick and test what the projectile ran into.
    ///
    /// A player mid-dash is never hit. `player_alive` is false while a death
    /// countdown runs, so a dead player can't be killed twice.
    pub fn step(&mut self, ctx: &TickContext<'_>, player: &PlayerView, player_alive: bool) -> Impact {
        self.pos.x += self.direction;
        self.age += 1;

        if ctx.tilemap.is_solid(self.pos) {
            return Impact::Wall;
        }
        if self.age > Self::MAX_AGE {
            return Impact::Expired;
        }
        if player_alive
            && player.dashing.abs() < DASH_THRESHOLD
            && Rect::new(player.pos, player.size).contains(self.pos)
        {
            return Impact::Player;
        }
        Impact::None
    }

    /// Drawn centred on its position.
    pub fn render(&self, frame: &mut Frame, image: Image, offset: Vec2) {
        let half = Vec2::new(image.width as f32, image.height as f32) * 0.5;
        frame.blit(Layer::Display, image.id, self.pos - half - offset, false);
    }
}

pub const HIT_SHAKE: f32 = 16.0;

/// Advance every projectile and drop the ones that hit or expired.
/// Returns true if one of them killed the player.
pub fn update_projectiles(
    projectiles: &mut Vec<Projectile>,
    ctx: &mut TickContext<'_>,
    player: &PlayerView,
    player_alive: bool,
) -> bool {
    let mut killed = false;
    projectiles.retain_mut(|projectile| {
        match projectile.step(ctx, player, player_alive && !killed) {
            Impact::None => true,
            Impact::Expired => false,
            Impact::Wall => {
                let back = if projectile.direction > 0.0 { PI } else { 0.0 };
                effects::spark_fan(ctx.spawns, projectile.pos, back, ctx.rng);
                false
            }
            Impact::Player => {
                killed = true;
                let center = Rect::new(player.pos, player.size).center();
                log::debug!("player hit at {center}");
                ctx.spawns.shake(HIT_SHAKE);
                ctx.spawns.sound(SoundEvent::Hit);
                effects::death_burst(ctx.spawns, center, ctx.rng, &ctx.assets.particles);
                false
            }
        }
    });
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Spawns;
    use crate::assets::registry::Assets;
    use crate::components::entity::test_support::assets;
    use crate::components::tilemap::{Tile, TileKind, Tilemap};
    use crate::systems::player::BODY_SIZE;
    use glam::IVec2;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    struct Rig {
        assets: Assets,
        map: Tilemap,
        rng: SmallRng,
        spawns: Spawns,
    }

    impl Rig {
        fn new(map: Tilemap) -> Self {
            Self {
                assets: assets(),
                map,
                rng: SmallRng::seed_from_u64(31),
                spawns: Spawns::new(),
            }
        }

        fn run(&mut self, shots: &mut Vec<Projectile>, player: &PlayerView, alive: bool) -> bool {
            let mut ctx = TickContext {
                tilemap: &self.map,
                assets: &self.assets,
                rng: &mut self.rng,
                spawns: &mut self.spawns,
            };
            update_projectiles(shots, &mut ctx, player, alive)
        }
    }

    fn nobody() -> PlayerView {
        PlayerView {
            pos: Vec2::new(-1000.0, -1000.0),
            size: BODY_SIZE,
            dashing: 0,
        }
    }

    #[test]
    fn ages_one_per_tick_and_expires_after_max_age() {
        let mut rig = Rig::new(Tilemap::new(16));
        let mut shots = vec![Projectile::new(Vec2::new(0.0, 0.0), 1.5)];
        for tick in 1..=Projectile::MAX_AGE {
            rig.run(&mut shots, &nobody(), true);
            assert_eq!(shots.len(), 1);
            assert_eq!(shots[0].age, tick);
        }
        rig.run(&mut shots, &nobody(), true);
        assert!(shots.is_empty());
        assert!(rig.spawns.sparks.is_empty());
    }

    #[test]
    fn wall_hit_removes_and_sparks_back_at_shooter() {
        let mut map = Tilemap::new(16);
        map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(1, 0)));
        let mut rig = Rig::new(map);
        let mut shots = vec![Projectile::new(Vec2::new(15.0, 8.0), 1.5)];
        rig.run(&mut shots, &nobody(), true);

        assert!(shots.is_empty());
        assert_eq!(rig.spawns.sparks.len(), 4);
        assert!(rig.spawns.sparks.iter().all(|s| (s.angle - PI).abs() <= 0.5));
    }

    #[test]
    fn hits_a_standing_player_once() {
        let mut rig = Rig::new(Tilemap::new(16));
        let player = PlayerView {
            pos: Vec2::new(10.0, 0.0),
            size: BODY_SIZE,
            dashing: 0,
        };
        let mut shots = vec![
            Projectile::new(Vec2::new(9.0, 5.0), 1.5),
            Projectile::new(Vec2::new(9.5, 6.0), 1.5),
        ];
        assert!(rig.run(&mut shots, &player, true));
        // the second shot passes through once the player is down
        assert_eq!(shots.len(), 1);
        assert_eq!(rig.spawns.shake, HIT_SHAKE);
        assert_eq!(rig.spawns.sounds, vec![SoundEvent::Hit]);

        assert!(!rig.run(&mut shots, &player, false));
        assert_eq!(shots.len(), 1);
    }

    #[test]
    fn dashing_player_is_invulnerable() {
        let mut rig = Rig::new(Tilemap::new(16));
        let player = PlayerView {
            pos: Vec2::new(10.0, 0.0),
            size: BODY_SIZE,
            dashing: DASH_THRESHOLD,
        };
        let mut shots = vec![Projectile::new(Vec2::new(9.0, 5.0), 1.5)];
        assert!(!rig.run(&mut shots, &player, true));
        assert_eq!(shots.len(), 1);

        let player = PlayerView {
            dashing: DASH_THRESHOLD - 1,
            ..player
        };
        assert!(rig.run(&mut shots, &player, true));
        assert!(shots.is_empty());
    }
}
