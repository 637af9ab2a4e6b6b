use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::api::types::{SoundCommand, SoundEvent, Spawns, TickContext};
use crate::assets::registry::Assets;
use crate::components::tilemap::Tilemap;
use crate::core::level::{LevelError, LevelFile, MapId, MapSource};
use crate::core::scene::{Scene, TRANSITION_TICKS};
use crate::input::queue::{InputQueue, InputState};
use crate::renderer::camera::Screenshake;
use crate::renderer::frame::Frame;
use crate::systems::clouds::Clouds;
use crate::systems::projectile::{self, HIT_SHAKE};
use crate::systems::render::build_frame;

/// Death ticks before the closing wipe starts.
const DEATH_WIPE_DELAY: u32 = 10;
/// Death ticks before the level reloads.
const DEATH_RELOAD: u32 = 40;
/// Seed used when the config leaves it to the game.
const DEFAULT_SEED: u64 = 42;

/// Configuration for the game, provided by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Most ticks run for one host frame.
    pub max_steps_per_frame: u32,
    /// Internal display width in pixels.
    pub display_width: f32,
    /// Internal display height in pixels.
    pub display_height: f32,
    /// Tile size for maps created from scratch.
    pub tile_size: u32,
    /// Seed for every random decision. `None` lets the host pick one.
    pub seed: Option<u64>,
    /// Map played first.
    pub start_map: String,
    /// Number of campaign maps. `None` asks the map source.
    pub map_count: Option<u32>,
    /// Draw records the host buffer can hold per frame.
    pub max_records: usize,
    /// Sound commands the host buffer can hold per frame.
    pub max_sounds: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            max_steps_per_frame: 10,
            display_width: 320.0,
            display_height: 240.0,
            tile_size: 16,
            seed: None,
            start_map: "0".to_string(),
            map_count: None,
            max_records: 2048,
            max_sounds: 32,
        }
    }
}

impl GameConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn display_size(&self) -> Vec2 {
        Vec2::new(self.display_width, self.display_height)
    }
}

/// The simulation: owns the level, the random source and all world state.
pub struct Game<M: MapSource> {
    config: GameConfig,
    assets: Assets,
    maps: M,
    rng: SmallRng,
    /// Last successfully loaded tilemap, kept untouched for reloads and saves.
    level: Tilemap,
    scene: Scene,
    clouds: Clouds,
    shake: Screenshake,
    shake_offset: Vec2,
    input: InputState,
    sounds: Vec<SoundCommand>,
    ticks: u64,
}

impl<M: MapSource> Game<M> {
    /// Create a game showing an empty map. Call `load_level` to start playing.
    pub fn new(config: GameConfig, assets: Assets, maps: M) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        let mut rng = SmallRng::seed_from_u64(seed);
        let clouds = Clouds::new(&assets.clouds, Clouds::DEFAULT_COUNT, &mut rng);
        let level = Tilemap::new(config.tile_size);
        let scene = Scene::new(MapId::parse(&config.start_map), level.clone(), &assets);
        let sounds = vec![
            SoundCommand::play_loop(SoundEvent::Music),
            SoundCommand::play_loop(SoundEvent::Ambience),
        ];
        log::info!("game created (seed {seed})");
        Self {
            config,
            assets,
            maps,
            rng,
            level,
            scene,
            clouds,
            shake: Screenshake::default(),
            shake_offset: Vec2::ZERO,
            input: InputState::default(),
            sounds,
            ticks: 0,
        }
    }

    /// Load a map and reset the world to it.
    ///
    /// On error the current level keeps running untouched.
    pub fn load_level(&mut self, map: MapId) -> Result<(), LevelError> {
        let tilemap = self.maps.load(&map).inspect_err(|e| {
            log::warn!("failed to load map {map}: {e}");
        })?;
        log::info!("loaded map {map}: {} tiles", tilemap.len());
        self.level = tilemap;
        self.scene = Scene::new(map, self.level.clone(), &self.assets);
        Ok(())
    }

    /// Load the configured start map.
    pub fn start(&mut self) -> Result<(), LevelError> {
        self.load_level(MapId::parse(&self.config.start_map))
    }

    /// Rebuild the current level from its pristine copy.
    pub fn restart(&mut self) {
        log::debug!("restarting map {}", self.scene.map);
        let map = self.scene.map.clone();
        self.scene = Scene::new(map, self.level.clone(), &self.assets);
    }

    fn map_count(&self) -> u32 {
        self.config.map_count.unwrap_or_else(|| self.maps.count())
    }

    fn advance(&mut self) {
        let next = self.scene.map.next(self.map_count());
        if self.load_level(next).is_err() {
            self.restart();
        }
    }

    /// Run one simulation tick.
    pub fn tick(&mut self, queue: &InputQueue) {
        self.ticks += 1;
        self.input.apply(queue);
        self.shake.decay();

        if self.scene.is_cleared() {
            self.scene.transition += 1;
            if self.scene.transition > TRANSITION_TICKS {
                self.advance();
            }
        }
        if self.scene.transition < 0 {
            self.scene.transition += 1;
        }

        if self.scene.dead > 0 {
            self.scene.dead += 1;
            if self.scene.dead >= DEATH_WIPE_DELAY {
                self.scene.transition = (self.scene.transition + 1).min(TRANSITION_TICKS);
            }
            if self.scene.dead > DEATH_RELOAD {
                self.restart();
            }
        }

        let view = self.config.display_size();
        let target = self.scene.player.body.center();
        self.scene.camera.follow(target, view);

        self.scene.emit_leaves(&mut self.rng, &self.assets);
        self.clouds.update();

        let mut spawns = Spawns::new();
        self.update_player(&mut spawns);
        self.apply(&mut spawns);
        self.update_enemies(&mut spawns);
        self.apply(&mut spawns);
        self.update_projectiles(&mut spawns);
        self.apply(&mut spawns);

        self.scene.sparks.retain_mut(|spark| spark.tick());
        self.scene.particles.retain_mut(|particle| particle.tick());

        self.shake_offset = self.shake.sample(&mut self.rng);
    }

    fn update_player(&mut self, spawns: &mut Spawns) {
        if !self.scene.player_alive() {
            self.input.discard_triggers();
            return;
        }

        let player = &mut self.scene.player;
        if self.input.take_jump() && player.jump() {
            spawns.sound(SoundEvent::Jump);
        }
        if self.input.take_dash() && player.dash() {
            spawns.sound(SoundEvent::Dash);
        }

        let mut ctx = TickContext {
            tilemap: &self.scene.tilemap,
            assets: &self.assets,
            rng: &mut self.rng,
            spawns,
        };
        if player.update(&mut ctx, self.input.movement_x()) {
            log::debug!("player fell out of the map");
            ctx.spawns.shake(HIT_SHAKE);
            self.scene.dead += 1;
        }
    }

    fn update_enemies(&mut self, spawns: &mut Spawns) {
        let player = self.scene.player.view();
        let mut ctx = TickContext {
            tilemap: &self.scene.tilemap,
            assets: &self.assets,
            rng: &mut self.rng,
            spawns,
        };
        self.scene
            .enemies
            .retain_mut(|enemy| !enemy.update(&mut ctx, &player));
    }

    fn update_projectiles(&mut self, spawns: &mut Spawns) {
        let player = self.scene.player.view();
        let alive = self.scene.player_alive();
        let mut ctx = TickContext {
            tilemap: &self.scene.tilemap,
            assets: &self.assets,
            rng: &mut self.rng,
            spawns,
        };
        if projectile::update_projectiles(&mut self.scene.projectiles, &mut ctx, &player, alive) {
            self.scene.dead += 1;
        }
    }

    /// Move what the last stage spawned into the world.
    fn apply(&mut self, spawns: &mut Spawns) {
        self.scene.particles.append(&mut spawns.particles);
        self.scene.sparks.append(&mut spawns.sparks);
        self.scene.projectiles.append(&mut spawns.projectiles);
        self.sounds
            .extend(spawns.sounds.drain(..).map(SoundCommand::play));
        self.shake.raise(spawns.shake);
        spawns.shake = 0.0;
    }

    /// Build this frame's draw list.
    pub fn render(&self, frame: &mut Frame) {
        build_frame(&self.scene, &self.clouds, &self.assets, self.shake_offset, frame);
    }

    /// Sounds requested since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundCommand> {
        std::mem::take(&mut self.sounds)
    }

    pub fn quit_requested(&self) -> bool {
        self.input.quit_requested()
    }

    /// Current map in the level file format, spawners included.
    pub fn save_level(&self) -> Result<String, LevelError> {
        LevelFile::from_tilemap(&self.level).to_json()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn maps_mut(&mut self) -> &mut M {
        &mut self.maps
    }

    pub fn shake(&self) -> f32 {
        self.shake.intensity()
    }

    /// Ticks run since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
