//! Frame-counted sprite animation.
//!
//! An `AnimationDef` holds the shared image sequence plus its timing rules.
//! Every entity or particle plays it through its own `Animation`, which only
//! carries the per-owner frame counter, so the images are never duplicated.

use std::rc::Rc;

use crate::assets::registry::Image;

/// Definition of a single animation sequence.
#[derive(Debug, Clone)]
pub struct AnimationDef {
    /// Frames in playback order. Shared by every instance.
    pub images: Rc<[Image]>,
    /// Ticks each image stays on screen.
    pub frame_duration: u32,
    /// Whether to wrap around when reaching the end.
    pub looping: bool,
}

impl AnimationDef {
    /// Create a definition over an image sequence.
    pub fn new(images: impl Into<Rc<[Image]>>, frame_duration: u32, looping: bool) -> Self {
        let images = images.into();
        debug_assert!(!images.is_empty(), "animation needs at least one image");
        Self {
            images,
            frame_duration: frame_duration.max(1),
            looping,
        }
    }

    /// Number of images in the sequence.
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Length of one full playback in ticks.
    pub fn total_frames(&self) -> u32 {
        self.frame_duration * self.images.len() as u32
    }

    /// Start a fresh instance at frame 0.
    pub fn instance(&self) -> Animation {
        Animation {
            def: self.clone(),
            frame: 0,
            done: false,
        }
    }
}

/// Per-owner playback state over a shared `AnimationDef`.
#[derive(Debug, Clone)]
pub struct Animation {
    def: AnimationDef,
    /// Ticks elapsed since the start of the sequence.
    pub frame: u32,
    /// Set once a non-looping animation reaches its last frame.
    pub done: bool,
}

impl Animation {
    /// Start at an arbitrary frame (particles stagger their leaves this way).
    pub fn with_frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    pub fn def(&self) -> &AnimationDef {
        &self.def
    }

    /// Advance by exactly one tick.
    pub fn update(&mut self) {
        let total = self.def.total_frames();
        if total == 0 {
            return;
        }
        if self.def.looping {
            self.frame = (self.frame + 1) % total;
        } else {
            self.frame = (self.frame + 1).min(total - 1);
            if self.frame >= total - 1 {
                self.done = true;
            }
        }
    }

    /// Image for the current frame.
    pub fn image(&self) -> Option<Image> {
        let index = (self.frame / self.def.frame_duration) as usize;
        self.def.images.get(index).copied()
    }
}
