/// Frame buffer layout shared with the host.
/// Must stay in sync with the host's reader.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Draw records: max_records × 16 floats]
/// [Sounds: max_sounds × 3 floats]
/// ```
///
/// Capacities are written into the header every frame so the host can
/// compute offsets without knowing the config.

use crate::api::game::GameConfig;
use crate::api::types::SoundCommand;
use crate::renderer::frame::Frame;
use crate::renderer::instance::{DrawRecord, SoundRecord};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices. Index 0 is reserved for the host.
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_RECORDS: usize = 2;
pub const HEADER_RECORD_COUNT: usize = 3;
pub const HEADER_MAX_SOUNDS: usize = 4;
pub const HEADER_SOUND_COUNT: usize = 5;
pub const HEADER_DISPLAY_WIDTH: usize = 6;
pub const HEADER_DISPLAY_HEIGHT: usize = 7;
pub const HEADER_PROTOCOL_VERSION: usize = 8;
pub const HEADER_DROPPED_RECORDS: usize = 9;
pub const HEADER_DROPPED_SOUNDS: usize = 10;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum draw records per frame.
    pub max_records: usize,
    /// Maximum sound commands per frame.
    pub max_sounds: usize,

    /// Size of the draw record section in floats.
    pub record_data_floats: usize,
    /// Size of the sound section in floats.
    pub sound_data_floats: usize,

    /// Offset (in floats) where draw records begin.
    pub record_data_offset: usize,
    /// Offset (in floats) where sound data begins.
    pub sound_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_records: usize, max_sounds: usize) -> Self {
        let record_data_floats = max_records * DrawRecord::FLOATS;
        let sound_data_floats = max_sounds * SoundRecord::FLOATS;

        let record_data_offset = HEADER_FLOATS;
        let sound_data_offset = record_data_offset + record_data_floats;

        let buffer_total_floats = sound_data_offset + sound_data_floats;

        Self {
            max_records,
            max_sounds,
            record_data_floats,
            sound_data_floats,
            record_data_offset,
            sound_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a GameConfig.
    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_records, config.max_sounds)
    }

    /// Write one frame into `buffer`, resizing it to the full layout.
    ///
    /// Records and sounds beyond capacity are dropped; the header counts
    /// how many were lost.
    pub fn encode(
        &self,
        frame: &Frame,
        sounds: &[SoundCommand],
        frame_counter: u64,
        buffer: &mut Vec<f32>,
    ) {
        buffer.clear();
        buffer.resize(self.buffer_total_floats, 0.0);

        let commands = frame.commands();
        let record_count = commands.len().min(self.max_records);
        let sound_count = sounds.len().min(self.max_sounds);
        if record_count < commands.len() || sound_count < sounds.len() {
            log::warn!(
                "frame buffer full: dropped {} draws, {} sounds",
                commands.len() - record_count,
                sounds.len() - sound_count
            );
        }

        let records: Vec<DrawRecord> = commands[..record_count].iter().map(DrawRecord::from).collect();
        let record_floats: &[f32] = bytemuck::cast_slice(&records);
        let start = self.record_data_offset;
        buffer[start..start + record_floats.len()].copy_from_slice(record_floats);

        let sound_records: Vec<SoundRecord> = sounds[..sound_count].iter().map(SoundRecord::from).collect();
        let sound_floats: &[f32] = bytemuck::cast_slice(&sound_records);
        let start = self.sound_data_offset;
        buffer[start..start + sound_floats.len()].copy_from_slice(sound_floats);

        let size = frame.size();
        buffer[HEADER_FRAME_COUNTER] = frame_counter as f32;
        buffer[HEADER_MAX_RECORDS] = self.max_records as f32;
        buffer[HEADER_RECORD_COUNT] = record_count as f32;
        buffer[HEADER_MAX_SOUNDS] = self.max_sounds as f32;
        buffer[HEADER_SOUND_COUNT] = sound_count as f32;
        buffer[HEADER_DISPLAY_WIDTH] = size.x;
        buffer[HEADER_DISPLAY_HEIGHT] = size.y;
        buffer[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        buffer[HEADER_DROPPED_RECORDS] = (commands.len() - record_count) as f32;
        buffer[HEADER_DROPPED_SOUNDS] = (sounds.len() - sound_count) as f32;
    }
}
