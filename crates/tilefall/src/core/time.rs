/// Fixed timestep accumulator.
///
/// The simulation is tick-based (every speed is in pixels per tick), so the
/// host's variable frame time is converted into a whole number of ticks.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps: u32,
}

impl FixedTimestep {
    /// Default limit on ticks run for a single host frame.
    pub const MAX_STEPS: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            max_steps: Self::MAX_STEPS,
        }
    }

    /// Override the per-frame tick cap (at least one).
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Add frame time. Returns how many ticks to run now.
    ///
    /// Time beyond `max_steps` ticks is dropped so a long stall (tab in the
    /// background, debugger) doesn't replay as a burst of catch-up ticks.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.max(0.0);
        self.accumulator = self.accumulator.min(self.dt * self.max_steps as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Drop any partial tick, e.g. after a level reload.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Fraction of the next tick already accumulated (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
