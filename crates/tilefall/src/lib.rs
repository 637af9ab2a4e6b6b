pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::types::{SoundCommand, SoundEvent, Spawns};
pub use assets::manifest::{AssetManifest, ManifestImages};
pub use assets::registry::{AssetError, Assets, Image, ImageId, ImageSource};
pub use bridge::protocol::ProtocolLayout;
pub use components::animation::{Animation, AnimationDef};
pub use components::entity::Entity;
pub use components::tilemap::{OffgridTile, Tile, TileKind, Tilemap};
pub use core::level::{DirMapSource, LevelError, LevelFile, MapId, MapSource, MemoryMapSource};
pub use core::physics::{Collisions, Rect};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use input::queue::{InputEvent, InputQueue, InputState, Key};
pub use renderer::camera::{Camera, Screenshake};
pub use renderer::frame::{Color, DrawCommand, Frame, Layer};
pub use renderer::instance::{DrawRecord, SoundRecord};
pub use systems::effects::{Particle, ParticleKind, Spark};
pub use systems::enemy::Enemy;
pub use systems::player::Player;
pub use systems::projectile::Projectile;
