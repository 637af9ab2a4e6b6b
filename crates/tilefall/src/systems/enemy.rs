//! Patrolling gunners.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use crate::api::types::{PlayerView, SoundEvent, TickContext};
use crate::assets::registry::Assets;
use crate::components::animation::AnimationDef;
use crate::components::entity::{ActionSet, Entity};
use crate::core::physics::Rect;
use crate::renderer::frame::{Frame, Layer};
use crate::systems::effects;
use crate::systems::player::{BODY_SIZE, DASH_THRESHOLD};
use crate::systems::projectile::Projectile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    Idle,
    Run,
}

impl ActionSet for EnemyAction {
    fn animation(self, assets: &Assets) -> &AnimationDef {
        match self {
            Self::Idle => &assets.enemy.idle,
            Self::Run => &assets.enemy.run,
        }
    }
}

/// Chance per idle tick of starting to walk.
const WALK_CHANCE: f64 = 0.01;
const WALK_MIN: u32 = 30;
const WALK_MAX: u32 = 120;
const WALK_SPEED: f32 = 0.5;
/// Ground probe: horizontal reach from the centre and depth below the top.
const PROBE_REACH: f32 = 7.0;
const PROBE_DEPTH: f32 = 23.0;
/// Vertical distance within which the player counts as level.
const AIM_TOLERANCE: f32 = 16.0;
const MUZZLE_REACH: f32 = 7.0;
const GUN_GAP: f32 = 4.0;

pub const KILL_SHAKE: f32 = 16.0;

#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Entity<EnemyAction>,
    /// Remaining walk ticks. Zero while idle.
    pub walking: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, assets: &Assets) -> Self {
        Self {
            body: Entity::new(pos, BODY_SIZE, EnemyAction::Idle, assets),
            walking: 0,
        }
    }

    /// Run one tick. Returns true when a dashing player has killed it.
    pub fn update(&mut self, ctx: &mut TickContext<'_>, player: &PlayerView) -> bool {
        let mut movement = Vec2::ZERO;

        if self.walking > 0 {
            // Collision flags here are from the previous physics step.
            let side = if self.body.flip { -PROBE_REACH } else { PROBE_REACH };
            let probe = Vec2::new(self.body.center().x + side, self.body.pos.y + PROBE_DEPTH);
            if ctx.tilemap.is_solid(probe) {
                if self.body.collisions.horizontal() {
                    self.body.flip = !self.body.flip;
                } else {
                    movement.x += if self.body.flip { -WALK_SPEED } else { WALK_SPEED };
                }
            } else {
                self.body.flip = !self.body.flip;
            }

            self.walking -= 1;
            if self.walking == 0 {
                self.try_shoot(ctx, player);
            }
        } else if ctx.rng.gen_bool(WALK_CHANCE) {
            self.walking = ctx.rng.gen_range(WALK_MIN..=WALK_MAX);
        }

        self.body.update_physics(ctx.tilemap, movement);

        let action = if movement.x != 0.0 {
            EnemyAction::Run
        } else {
            EnemyAction::Idle
        };
        self.body.set_action(action, ctx.assets);

        let player_rect = Rect::new(player.pos, player.size);
        if player.dashing.abs() >= DASH_THRESHOLD && self.body.rect().overlaps(&player_rect) {
            self.die(ctx);
            return true;
        }
        false
    }

    fn try_shoot(&mut self, ctx: &mut TickContext<'_>, player: &PlayerView) {
        let dis = player.pos - self.body.pos;
        if dis.y.abs() >= AIM_TOLERANCE {
            return;
        }
        let center = self.body.center();
        let (direction, spark_angle) = match (self.body.flip, dis.x) {
            (true, dx) if dx < 0.0 => (-1.0, PI),
            (false, dx) if dx > 0.0 => (1.0, 0.0),
            _ => return,
        };
        let muzzle = Vec2::new(center.x + direction * MUZZLE_REACH, center.y);
        ctx.spawns
            .projectiles
            .push(Projectile::new(muzzle, direction * Projectile::SPEED));
        effects::spark_fan(ctx.spawns, muzzle, spark_angle, ctx.rng);
        ctx.spawns.sound(SoundEvent::Shoot);
    }

    fn die(&self, ctx: &mut TickContext<'_>) {
        let center = self.body.center();
        log::debug!("enemy killed at {center}");
        ctx.spawns.shake(KILL_SHAKE);
        ctx.spawns.sound(SoundEvent::Hit);
        effects::death_burst(ctx.spawns, center, ctx.rng, &ctx.assets.particles);
        for angle in [0.0, PI] {
            let speed = 5.0 + ctx.rng.gen::<f32>();
            ctx.spawns.sparks.push(effects::Spark::new(center, angle, speed));
        }
    }

    /// Draw the body and the gun on the facing side.
    pub fn render(&self, frame: &mut Frame, assets: &Assets, offset: Vec2) {
        self.body.render(frame, offset);

        let center = self.body.center();
        let gun = assets.gun;
        let x = if self.body.flip {
            center.x - GUN_GAP - gun.width as f32
        } else {
            center.x + GUN_GAP
        };
        frame.blit(
            Layer::Display,
            gun.id,
            Vec2::new(x, center.y) - offset,
            self.body.flip,
        );
    }
}
