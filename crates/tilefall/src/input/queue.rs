/// Logical keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Jump,
    Dash,
    Quit,
}

impl Key {
    /// Map a browser `keyCode` to a game key.
    ///
    /// Arrows or A/D move, Up/W/Space jump, X dashes, Escape quits.
    pub fn from_code(code: u32) -> Option<Key> {
        match code {
            37 | 65 => Some(Key::Left),
            39 | 68 => Some(Key::Right),
            38 | 87 | 32 => Some(Key::Jump),
            88 => Some(Key::Dash),
            27 => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Discrete key transitions delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
}

/// A queue of input events.
/// The host pushes events as they arrive; the game reads them once per tick.
#[derive(Debug, Clone)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Push a raw key code. Unmapped codes are ignored.
    pub fn push_code(&mut self, code: u32, down: bool) {
        if let Some(key) = Key::from_code(code) {
            self.push(if down {
                InputEvent::KeyDown(key)
            } else {
                InputEvent::KeyUp(key)
            });
        }
    }

    /// Drain all pending events.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Held movement keys plus one-shot action triggers.
///
/// A jump or dash press is latched until taken, so each press acts at most
/// once no matter how many ticks it stays held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    jump: bool,
    dash: bool,
    quit: bool,
}

impl InputState {
    /// Fold a batch of events into the state.
    pub fn apply(&mut self, queue: &InputQueue) {
        for event in queue.iter() {
            match *event {
                InputEvent::KeyDown(Key::Left) => self.left = true,
                InputEvent::KeyDown(Key::Right) => self.right = true,
                InputEvent::KeyDown(Key::Jump) => self.jump = true,
                InputEvent::KeyDown(Key::Dash) => self.dash = true,
                InputEvent::KeyDown(Key::Quit) => self.quit = true,
                InputEvent::KeyUp(Key::Left) => self.left = false,
                InputEvent::KeyUp(Key::Right) => self.right = false,
                InputEvent::KeyUp(_) => {}
            }
        }
    }

    /// Requested horizontal movement: -1, 0 or 1.
    pub fn movement_x(&self) -> f32 {
        (self.right as i32 - self.left as i32) as f32
    }

    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn take_dash(&mut self) -> bool {
        std::mem::take(&mut self.dash)
    }

    /// Drop pending triggers (used while the player can't act).
    pub fn discard_triggers(&mut self) {
        self.jump = false;
        self.dash = false;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }
}
