use tilefall::{
    AssetError, AssetManifest, Assets, FixedTimestep, Frame, Game, GameConfig, InputQueue,
    LevelError, ManifestImages, MapId, MemoryMapSource, ProtocolLayout,
};

/// Drives the game from the browser's frame callback.
///
/// The host uploads maps, then calls `tick` once per animation frame and
/// reads the flat frame buffer through `buffer_ptr`.
pub struct GameRunner {
    game: Game<MemoryMapSource>,
    input: InputQueue,
    timestep: FixedTimestep,
    frame: Frame,
    layout: ProtocolLayout,
    /// Header + draw records + sounds, rewritten every frame.
    buffer: Vec<f32>,
    frame_counter: u64,
    started: bool,
}

impl GameRunner {
    pub fn new(config: GameConfig, manifest: &AssetManifest) -> Result<Self, AssetError> {
        let assets = Assets::load(&mut ManifestImages::from_manifest(manifest))?;
        let timestep =
            FixedTimestep::new(config.fixed_dt).with_max_steps(config.max_steps_per_frame);
        let layout = ProtocolLayout::from_config(&config);
        let frame = Frame::with_capacity(config.display_size(), config.max_records);
        let buffer = vec![0.0; layout.buffer_total_floats];

        Ok(Self {
            game: Game::new(config, assets, MemoryMapSource::new()),
            input: InputQueue::new(),
            timestep,
            frame,
            layout,
            buffer,
            frame_counter: 0,
            started: false,
        })
    }

    /// Make a map available under `name` ("0", "1", ... for the campaign).
    pub fn add_map(&mut self, name: &str, json: &str) {
        self.game.maps_mut().insert(MapId::parse(name), json);
    }

    /// Load the first map to play.
    pub fn start(&mut self, map: &str) -> Result<(), LevelError> {
        self.game.load_level(MapId::parse(map))?;
        self.timestep.reset();
        self.started = true;
        Ok(())
    }

    pub fn push_key(&mut self, code: u32, down: bool) {
        self.input.push_code(code, down);
    }

    /// Run the fixed-step ticks owed for `dt` seconds, then rebuild the buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.started {
            return;
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.tick(&self.input);
            // Input is consumed by the first tick; later ticks see held keys only.
            self.input.clear();
        }

        self.game.render(&mut self.frame);
        let sounds = self.game.take_sounds();
        self.frame_counter += 1;
        self.layout
            .encode(&self.frame, &sounds, self.frame_counter, &mut self.buffer);
    }

    pub fn quit_requested(&self) -> bool {
        self.game.quit_requested()
    }

    pub fn save_map(&self) -> Result<String, LevelError> {
        self.game.save_level()
    }

    // ---- Pointer accessors for host buffer reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn buffer_len(&self) -> u32 {
        self.buffer.len() as u32
    }

    pub fn display_width(&self) -> f32 {
        self.game.config().display_width
    }

    pub fn display_height(&self) -> f32 {
        self.game.config().display_height
    }

    // ---- Capacity accessors ----

    pub fn max_records(&self) -> u32 {
        self.layout.max_records as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn record_data_offset(&self) -> u32 {
        self.layout.record_data_offset as u32
    }

    pub fn sound_data_offset(&self) -> u32 {
        self.layout.sound_data_offset as u32
    }
}
