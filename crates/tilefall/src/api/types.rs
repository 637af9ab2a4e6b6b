use glam::Vec2;
use rand::rngs::SmallRng;

use crate::assets::registry::Assets;
use crate::components::tilemap::Tilemap;
use crate::systems::effects::particle::Particle;
use crate::systems::effects::spark::Spark;
use crate::systems::projectile::Projectile;

/// A sound the game asks the host to play.
/// The numeric value is the id the host's sound table is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SoundEvent {
    Jump = 0,
    Dash = 1,
    Hit = 2,
    Shoot = 3,
    Ambience = 4,
    Music = 5,
}

impl SoundEvent {
    pub fn id(self) -> u32 {
        self as u32
    }

    /// Name used as the key in the asset manifest's sound table.
    pub fn name(self) -> &'static str {
        match self {
            Self::Jump => "jump",
            Self::Dash => "dash",
            Self::Hit => "hit",
            Self::Shoot => "shoot",
            Self::Ambience => "ambience",
            Self::Music => "music",
        }
    }

    /// Fixed playback volume.
    pub fn volume(self) -> f32 {
        match self {
            Self::Jump => 0.7,
            Self::Dash => 0.3,
            Self::Hit => 0.8,
            Self::Shoot => 0.4,
            Self::Ambience => 0.2,
            Self::Music => 0.5,
        }
    }
}

/// A play request handed to the audio collaborator. Fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCommand {
    pub sound: SoundEvent,
    pub looping: bool,
}

impl SoundCommand {
    pub fn play(sound: SoundEvent) -> Self {
        Self {
            sound,
            looping: false,
        }
    }

    pub fn play_loop(sound: SoundEvent) -> Self {
        Self {
            sound,
            looping: true,
        }
    }
}

/// Everything an update wants added to the world.
///
/// Entities never touch the world's collections directly; the game loop
/// applies these after each update stage.
#[derive(Debug, Default)]
pub struct Spawns {
    pub particles: Vec<Particle>,
    pub sparks: Vec<Spark>,
    pub projectiles: Vec<Projectile>,
    pub sounds: Vec<SoundEvent>,
    /// Screenshake floor requested this stage.
    pub shake: f32,
}

impl Spawns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sound(&mut self, sound: SoundEvent) {
        self.sounds.push(sound);
    }

    pub fn shake(&mut self, floor: f32) {
        self.shake = self.shake.max(floor);
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.sparks.is_empty()
            && self.projectiles.is_empty()
            && self.sounds.is_empty()
            && self.shake == 0.0
    }
}

/// Read-only world state plus the outputs an update may write.
pub struct TickContext<'a> {
    pub tilemap: &'a Tilemap,
    pub assets: &'a Assets,
    pub rng: &'a mut SmallRng,
    pub spawns: &'a mut Spawns,
}

/// Snapshot of the player as other actors see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub dashing: i32,
}
