//! Short-lived visual effects: particles, sparks and the bursts that spawn them.
//!
//! Bursts push into a `Spawns` list; the game loop moves them into the world.

pub mod particle;
pub mod spark;

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

use crate::api::types::Spawns;
use crate::assets::registry::ParticleAnimations;

pub use particle::{Particle, ParticleKind};
pub use spark::Spark;

/// Highest starting frame for dust particles.
const DUST_MAX_FRAME: u32 = 7;

fn dust(
    pos: Vec2,
    velocity: Vec2,
    rng: &mut impl Rng,
    animations: &ParticleAnimations,
) -> Particle {
    Particle::new(
        ParticleKind::Dust,
        pos,
        velocity,
        rng.gen_range(0..=DUST_MAX_FRAME),
        animations,
    )
}

/// Ring of slow dust at the start and end of a dash.
pub fn dash_burst(
    spawns: &mut Spawns,
    center: Vec2,
    rng: &mut impl Rng,
    animations: &ParticleAnimations,
) {
    for _ in 0..20 {
        let angle = rng.gen::<f32>() * TAU;
        let speed = rng.gen::<f32>() * 0.5 + 0.5;
        let p = dust(center, Vec2::from_angle(angle) * speed, rng, animations);
        spawns.particles.push(p);
    }
}

/// One trail puff behind a dashing player. `direction` is ±1.
pub fn dash_trail(
    spawns: &mut Spawns,
    center: Vec2,
    direction: f32,
    rng: &mut impl Rng,
    animations: &ParticleAnimations,
) {
    let velocity = Vec2::new(direction * rng.gen::<f32>() * 3.0, 0.0);
    let p = dust(center, velocity, rng, animations);
    spawns.particles.push(p);
}

/// Thirty sparks flying out and thirty dust particles drifting the other way.
pub fn death_burst(
    spawns: &mut Spawns,
    center: Vec2,
    rng: &mut impl Rng,
    animations: &ParticleAnimations,
) {
    for _ in 0..30 {
        let angle = rng.gen::<f32>() * TAU;
        let speed = rng.gen::<f32>() * 5.0;
        spawns
            .sparks
            .push(Spark::new(center, angle, 2.0 + rng.gen::<f32>()));
        let velocity = Vec2::from_angle(angle + PI) * speed * 0.5;
        let p = dust(center, velocity, rng, animations);
        spawns.particles.push(p);
    }
}

/// Four sparks fanned ±0.5 rad around `base_angle`.
pub fn spark_fan(spawns: &mut Spawns, pos: Vec2, base_angle: f32, rng: &mut impl Rng) {
    for _ in 0..4 {
        let angle = rng.gen::<f32>() - 0.5 + base_angle;
        spawns
            .sparks
            .push(Spark::new(pos, angle, 2.0 + rng.gen::<f32>()));
    }
}
