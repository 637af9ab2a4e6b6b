pub mod camera;
pub mod frame;
pub mod instance;

pub use frame::{Color, DrawCommand, Frame, Layer};
pub use instance::{DrawRecord, SoundRecord};
