//! Player movement: jumping, wall sliding and dashing.

use glam::Vec2;

use crate::api::types::{PlayerView, TickContext};
use crate::assets::registry::Assets;
use crate::components::animation::AnimationDef;
use crate::components::entity::{ActionSet, Entity};
use crate::renderer::frame::Frame;
use crate::systems::effects;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Idle,
    Run,
    Jump,
    WallSlide,
}

impl ActionSet for PlayerAction {
    fn animation(self, assets: &Assets) -> &AnimationDef {
        let anims = &assets.player;
        match self {
            Self::Idle => &anims.idle,
            Self::Run => &anims.run,
            Self::Jump => &anims.jump,
            Self::WallSlide => &anims.wall_slide,
        }
    }
}

/// Collision box of the player and enemies.
pub const BODY_SIZE: Vec2 = Vec2::new(8.0, 15.0);
/// Where the player starts when a level has no player spawner.
pub const DEFAULT_SPAWN: Vec2 = Vec2::new(50.0, 50.0);

/// Ticks off the ground before the player counts as airborne.
const AIR_GRACE: u32 = 4;
/// Ticks in the air after which the player is considered lost.
const FALL_DEATH: u32 = 120;
const JUMP_SPEED: f32 = 3.1;
const WALL_JUMP: Vec2 = Vec2::new(3.5, -2.5);
const WALL_SLIDE_SPEED: f32 = 0.5;
const AIR_RESISTANCE: f32 = 0.1;

/// Total dash length in ticks.
pub const DASH_DURATION: i32 = 60;
/// While `|dashing|` is at or above this the player is invulnerable and
/// lethal to enemies; strictly above it the dash velocity is forced.
pub const DASH_THRESHOLD: i32 = 50;
const DASH_SPEED: f32 = 8.0;
/// Velocity kept on the last forced tick.
const DASH_BRAKE: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Entity<PlayerAction>,
    /// Ticks since last standing on ground.
    pub air_time: u32,
    pub jumps: u32,
    pub wall_slide: bool,
    /// Signed dash countdown; the sign is the dash direction.
    pub dashing: i32,
}

impl Player {
    pub fn new(pos: Vec2, assets: &Assets) -> Self {
        Self {
            body: Entity::new(pos, BODY_SIZE, PlayerAction::Idle, assets),
            air_time: 0,
            jumps: 1,
            wall_slide: false,
            dashing: 0,
        }
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            pos: self.body.pos,
            size: self.body.size,
            dashing: self.dashing,
        }
    }

    /// In the forced part of a dash: immune to projectiles, kills enemies.
    pub fn is_dash_attacking(&self) -> bool {
        self.dashing.abs() >= DASH_THRESHOLD
    }

    /// Run one tick. Returns true when the player has been airborne too long.
    pub fn update(&mut self, ctx: &mut TickContext<'_>, movement_x: f32) -> bool {
        let movement = Vec2::new(movement_x, 0.0);
        self.body.update_physics(ctx.tilemap, movement);

        self.air_time += 1;
        let lost = self.air_time > FALL_DEATH;

        if self.body.collisions.down {
            self.air_time = 0;
            self.jumps = 1;
        }

        self.wall_slide = false;
        if self.body.collisions.horizontal() && self.air_time > AIR_GRACE {
            self.wall_slide = true;
            self.body.velocity.y = self.body.velocity.y.min(WALL_SLIDE_SPEED);
            self.body.flip = self.body.collisions.left;
            self.body.set_action(PlayerAction::WallSlide, ctx.assets);
        }

        if !self.wall_slide {
            let action = if self.air_time > AIR_GRACE {
                PlayerAction::Jump
            } else if movement_x != 0.0 {
                PlayerAction::Run
            } else {
                PlayerAction::Idle
            };
            self.body.set_action(action, ctx.assets);
        }

        self.update_dash(ctx);

        let vx = &mut self.body.velocity.x;
        if *vx > 0.0 {
            *vx = (*vx - AIR_RESISTANCE).max(0.0);
        } else if *vx < 0.0 {
            *vx = (*vx + AIR_RESISTANCE).min(0.0);
        }

        lost
    }

    fn update_dash(&mut self, ctx: &mut TickContext<'_>) {
        let magnitude = self.dashing.abs();
        let center = self.body.center();

        if magnitude == DASH_DURATION || magnitude == DASH_THRESHOLD {
            effects::dash_burst(ctx.spawns, center, ctx.rng, &ctx.assets.particles);
        }

        if magnitude > DASH_THRESHOLD {
            let direction = self.dashing.signum() as f32;
            self.body.velocity.x = direction * DASH_SPEED;
            if magnitude == DASH_THRESHOLD + 1 {
                self.body.velocity.x *= DASH_BRAKE;
            }
            effects::dash_trail(ctx.spawns, center, direction, ctx.rng, &ctx.assets.particles);
        }

        self.dashing -= self.dashing.signum();
    }

    /// Try to jump. Returns whether a jump happened.
    ///
    /// While wall sliding only a jump pushing away from the wall the player
    /// is pressing into is allowed.
    pub fn jump(&mut self) -> bool {
        if self.wall_slide {
            let pressing = self.body.last_movement.x;
            let push = if self.body.flip && pressing < 0.0 {
                WALL_JUMP
            } else if !self.body.flip && pressing > 0.0 {
                Vec2::new(-WALL_JUMP.x, WALL_JUMP.y)
            } else {
                return false;
            };
            self.body.velocity = push;
            self.air_time = AIR_GRACE + 1;
            self.jumps = self.jumps.saturating_sub(1);
            return true;
        }

        if self.jumps > 0 {
            self.body.velocity.y = -JUMP_SPEED;
            self.air_time = AIR_GRACE + 1;
            self.jumps -= 1;
            return true;
        }
        false
    }

    /// Start a dash in the facing direction. Returns false if already dashing.
    pub fn dash(&mut self) -> bool {
        if self.dashing != 0 {
            return false;
        }
        self.dashing = if self.body.flip {
            -DASH_DURATION
        } else {
            DASH_DURATION
        };
        log::debug!("dash {}", self.dashing);
        true
    }

    /// Hidden during the forced part of a dash.
    pub fn render(&self, frame: &mut Frame, offset: Vec2) {
        if self.dashing.abs() <= DASH_THRESHOLD {
            self.body.render(frame, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Spawns;
    use crate::components::entity::test_support::assets;
    use crate::components::tilemap::{Tile, TileKind, Tilemap};
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
                rng: SmallRng::seed_from_u64(11),
                spawns: Spawns::new(),
            }
        }

        fn tick(&mut self, player: &mut Player, movement_x: f32) -> bool {
            let mut ctx = TickContext {
                tilemap: &self.map,
                assets: &self.assets,
                rng: &mut self.rng,
                spawns: &mut self.spawns,
            };
            player.update(&mut ctx, movement_x)
        }
    }

    fn floor() -> Tilemap {
        let mut map = Tilemap::new(16);
        for x in -5..10 {
            map.insert(Tile::new(TileKind::Grass, 0, IVec2::new(x, 5)));
        }
        map
    }

    /// Floor at row 5 and a wall column at x = 4.
    fn floor_and_wall() -> Tilemap {
        let mut map = floor();
        for y in 0..5 {
            map.insert(Tile::new(TileKind::Stone, 0, IVec2::new(4, y)));
        }
        map
    }

    fn grounded(rig: &mut Rig, x: f32) -> Player {
        let mut p = Player::new(Vec2::new(x, 80.0 - 15.0), &rig.assets);
        rig.tick(&mut p, 0.0);
        p
    }

    #[test]
    fn landing_refills_jumps() {
        let mut rig = Rig::new(floor());
        let mut p = grounded(&mut rig, 20.0);
        assert!(p.jump());
        assert_eq!(p.jumps, 0);
        assert_eq!(p.body.velocity.y, -JUMP_SPEED);
        assert!(!p.jump());

        for _ in 0..200 {
            rig.tick(&mut p, 0.0);
            if p.body.collisions.down {
                break;
            }
        }
        assert_eq!(p.jumps, 1);
        assert_eq!(p.air_time, 0);
    }

    #[test]
    fn action_priority() {
        let mut rig = Rig::new(floor());
        let mut p = grounded(&mut rig, 20.0);
        assert_eq!(p.body.action(), PlayerAction::Idle);

        rig.tick(&mut p, 1.0);
        assert_eq!(p.body.action(), PlayerAction::Run);

        p.jump();
        rig.tick(&mut p, 1.0);
        assert_eq!(p.body.action(), PlayerAction::Jump);
    }

    #[test]
    fn wall_slide_caps_fall_and_faces_wall_side() {
        let mut rig = Rig::new(floor_and_wall());
        // Falling next to the wall while pressing into it.
        let mut p = Player::new(Vec2::new(80.5, 10.0), &rig.assets);
        p.air_time = 10;
        p.body.velocity.y = 2.0;
        rig.tick(&mut p, -1.0);

        assert!(p.body.collisions.left);
        assert!(p.wall_slide);
        assert!(p.body.flip);
        assert_eq!(p.body.velocity.y, WALL_SLIDE_SPEED);
        assert_eq!(p.body.action(), PlayerAction::WallSlide);
    }

    #[test]
    fn wall_jump_needs_pressing_into_the_wall() {
        let mut rig = Rig::new(floor_and_wall());
        let mut p = Player::new(Vec2::new(80.5, 10.0), &rig.assets);
        p.air_time = 10;
        rig.tick(&mut p, -1.0);
        assert!(p.wall_slide);

        p.body.last_movement = Vec2::ZERO;
        assert!(!p.jump());

        p.body.last_movement = Vec2::new(-1.0, 0.0);
        assert!(p.jump());
        assert_eq!(p.body.velocity, WALL_JUMP);
        assert_eq!(p.air_time, 5);
    }

    #[test]
    fn fall_too_long_reports_lost() {
        let mut rig = Rig::new(Tilemap::new(16));
        let mut p = Player::new(Vec2::ZERO, &rig.assets);
        let mut lost_at = None;
        for tick in 1..=200 {
            if rig.tick(&mut p, 0.0) {
                lost_at = Some(tick);
                break;
            }
        }
        assert_eq!(lost_at, Some(121));
    }

    #[test]
    fn dash_forces_velocity_then_brakes() {
        let mut rig = Rig::new(floor());
        let mut p = grounded(&mut rig, 0.0);
        assert!(p.dash());
        assert!(!p.dash());
        assert_eq!(p.dashing, DASH_DURATION);

        rig.tick(&mut p, 0.0);
        // forced to 8, then air resistance
        assert!((p.body.velocity.x - (DASH_SPEED - AIR_RESISTANCE)).abs() < 1e-5);
        // 20 burst + 1 trail
        assert_eq!(rig.spawns.particles.len(), 21);

        while p.dashing.abs() > DASH_THRESHOLD + 1 {
            rig.tick(&mut p, 0.0);
        }
        rig.tick(&mut p, 0.0);
        assert!((p.body.velocity.x - (DASH_SPEED * DASH_BRAKE - AIR_RESISTANCE)).abs() < 1e-5);
        assert_eq!(p.dashing, DASH_THRESHOLD);

        rig.spawns.particles.clear();
        rig.tick(&mut p, 0.0);
        // closing burst, no trail
        assert_eq!(rig.spawns.particles.len(), 20);
    }

    #[test]
    fn dash_follows_facing_and_hides_player() {
        let mut rig = Rig::new(floor());
        let mut p = grounded(&mut rig, 20.0);
        rig.tick(&mut p, -1.0);
        assert!(p.dash());
        assert_eq!(p.dashing, -DASH_DURATION);
        assert!(p.is_dash_attacking());

        let mut frame = Frame::new(Vec2::new(320.0, 240.0));
        p.render(&mut frame, Vec2::ZERO);
        assert!(frame.is_empty());

        p.dashing = -DASH_THRESHOLD;
        p.render(&mut frame, Vec2::ZERO);
        assert_eq!(frame.len(), 1);
    }

    #[test]
    fn dash_countdown_returns_to_zero() {
        let mut rig = Rig::new(floor());
        let mut p = grounded(&mut rig, 0.0);
        p.dash();
        for _ in 0..DASH_DURATION {
            rig.tick(&mut p, 0.0);
        }
        assert_eq!(p.dashing, 0);
        assert!(p.dash());
    }
}
