use glam::Vec2;
use rand::Rng;

use crate::assets::registry::Assets;
use crate::components::tilemap::{TileKind, Tilemap};
use crate::core::level::MapId;
use crate::core::physics::Rect;
use crate::renderer::camera::Camera;
use crate::systems::effects::{Particle, ParticleKind, Spark};
use crate::systems::enemy::Enemy;
use crate::systems::player::{Player, DEFAULT_SPAWN};
use crate::systems::projectile::Projectile;

/// Trees that shed leaves.
const LEAF_SOURCE: (TileKind, u32) = (TileKind::LargeDecor, 2);
const LEAF_AREA_OFFSET: Vec2 = Vec2::new(4.0, 4.0);
const LEAF_AREA_SIZE: Vec2 = Vec2::new(23.0, 13.0);
/// A canopy emits a leaf when `random * LEAF_RATE < area`.
const LEAF_RATE: f32 = 49999.0;
const LEAF_VELOCITY: Vec2 = Vec2::new(-0.1, 0.3);
const LEAF_MAX_FRAME: u32 = 20;

const PLAYER_SPAWN: (TileKind, u32) = (TileKind::Spawners, 0);
const ENEMY_SPAWN: (TileKind, u32) = (TileKind::Spawners, 1);

/// Ticks of the level-start wipe; also the count the level-end wipe runs to.
pub const TRANSITION_TICKS: i32 = 30;

/// Everything that belongs to the level being played.
///
/// Built fresh on every load and reload, so nothing leaks between attempts.
#[derive(Debug, Clone)]
pub struct Scene {
    pub map: MapId,
    pub tilemap: Tilemap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub leaf_spawners: Vec<Rect>,
    pub camera: Camera,
    /// Death countdown. Zero while the player is alive.
    pub dead: u32,
    /// Signed wipe countdown: negative while opening, positive while closing.
    pub transition: i32,
}

impl Scene {
    /// Populate a level from its tilemap, consuming spawner markers.
    pub fn new(map: MapId, mut tilemap: Tilemap, assets: &Assets) -> Self {
        let leaf_spawners = tilemap
            .extract(&[LEAF_SOURCE], true)
            .into_iter()
            .map(|tree| Rect::new(tree.pos + LEAF_AREA_OFFSET, LEAF_AREA_SIZE))
            .collect();

        let mut player = Player::new(DEFAULT_SPAWN, assets);
        let mut enemies = Vec::new();
        for spawner in tilemap.extract(&[PLAYER_SPAWN, ENEMY_SPAWN], false) {
            if (spawner.kind, spawner.variant) == PLAYER_SPAWN {
                player.body.pos = spawner.pos;
                player.air_time = 0;
            } else {
                enemies.push(Enemy::new(spawner.pos, assets));
            }
        }

        Self {
            map,
            tilemap,
            player,
            enemies,
            projectiles: Vec::new(),
            particles: Vec::new(),
            sparks: Vec::new(),
            leaf_spawners,
            camera: Camera::new(),
            dead: 0,
            transition: -TRANSITION_TICKS,
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn player_alive(&self) -> bool {
        self.dead == 0
    }

    /// Let every canopy roll for a falling leaf.
    pub fn emit_leaves(&mut self, rng: &mut impl Rng, assets: &Assets) {
        for area in &self.leaf_spawners {
            if rng.gen::<f32>() * LEAF_RATE < area.area() {
                let pos = area.pos + Vec2::new(rng.gen::<f32>(), rng.gen::<f32>()) * area.size;
                let frame = rng.gen_range(0..=LEAF_MAX_FRAME);
                self.particles.push(Particle::new(
                    ParticleKind::Leaf,
                    pos,
                    LEAF_VELOCITY,
                    frame,
                    &assets.particles,
                ));
            }
        }
    }
}
