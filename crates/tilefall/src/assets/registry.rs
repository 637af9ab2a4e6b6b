use std::collections::HashMap;

use thiserror::Error;

use crate::components::animation::AnimationDef;
use crate::components::tilemap::TileKind;

/// Opaque handle to an image owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ImageId(pub u32);

/// An image handle plus the pixel size the simulation needs for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
}

impl Image {
    pub fn new(id: ImageId, width: u32, height: u32) -> Self {
        Self { id, width, height }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("missing image: {0}")]
    MissingImage(String),
    #[error("no images in {0}")]
    EmptySequence(String),
}

/// The asset-loading collaborator.
///
/// Image decoding and color keying happen on the host; the core only asks for
/// handles. `load_images` returns a directory's images ordered by filename.
pub trait ImageSource {
    fn load_image(&mut self, path: &str) -> Result<Image, AssetError>;
    fn load_images(&mut self, dir: &str) -> Result<Vec<Image>, AssetError>;
}

/// Animations available to the player.
#[derive(Debug, Clone)]
pub struct PlayerAnimations {
    pub idle: AnimationDef,
    pub run: AnimationDef,
    pub jump: AnimationDef,
    pub wall_slide: AnimationDef,
}

/// Animations available to enemies.
#[derive(Debug, Clone)]
pub struct EnemyAnimations {
    pub idle: AnimationDef,
    pub run: AnimationDef,
}

#[derive(Debug, Clone)]
pub struct ParticleAnimations {
    pub leaf: AnimationDef,
    pub particle: AnimationDef,
}

/// Everything the simulation draws, resolved once at startup.
///
/// Every animation an entity can select is a named field, so an action can
/// never miss its animation at runtime.
#[derive(Debug, Clone)]
pub struct Assets {
    tiles: HashMap<TileKind, Vec<Image>>,
    pub player: PlayerAnimations,
    pub enemy: EnemyAnimations,
    pub particles: ParticleAnimations,
    pub background: Image,
    pub clouds: Vec<Image>,
    pub gun: Image,
    pub projectile: Image,
}

impl Assets {
    /// Resolve the full asset set through an image source.
    pub fn load(src: &mut impl ImageSource) -> Result<Self, AssetError> {
        let mut tiles = HashMap::with_capacity(TileKind::ALL.len());
        for kind in TileKind::ALL {
            let dir = format!("tiles/{}", kind.name());
            tiles.insert(kind, non_empty(src.load_images(&dir)?, &dir)?);
        }

        let player = PlayerAnimations {
            idle: sequence(src, "entities/player/idle", 6, true)?,
            run: sequence(src, "entities/player/run", 4, true)?,
            jump: sequence(src, "entities/player/jump", 5, true)?,
            wall_slide: sequence(src, "entities/player/wall_slide", 5, true)?,
        };
        let enemy = EnemyAnimations {
            idle: sequence(src, "entities/enemy/idle", 6, true)?,
            run: sequence(src, "entities/enemy/run", 4, true)?,
        };
        let particles = ParticleAnimations {
            leaf: sequence(src, "particles/leaf", 20, false)?,
            particle: sequence(src, "particles/particle", 6, false)?,
        };

        let clouds = non_empty(src.load_images("clouds")?, "clouds")?;

        log::info!(
            "assets loaded: {} tile kinds, {} clouds",
            tiles.len(),
            clouds.len()
        );

        Ok(Self {
            tiles,
            player,
            enemy,
            particles,
            background: src.load_image("background.png")?,
            clouds,
            gun: src.load_image("gun.png")?,
            projectile: src.load_image("projectile.png")?,
        })
    }

    /// Image for a tile variant, if the variant exists.
    pub fn tile_image(&self, kind: TileKind, variant: u32) -> Option<Image> {
        self.tiles
            .get(&kind)
            .and_then(|images| images.get(variant as usize))
            .copied()
    }

    /// Number of variants available for a tile kind.
    pub fn tile_variants(&self, kind: TileKind) -> usize {
        self.tiles.get(&kind).map_or(0, Vec::len)
    }
}

fn non_empty(images: Vec<Image>, dir: &str) -> Result<Vec<Image>, AssetError> {
    if images.is_empty() {
        return Err(AssetError::EmptySequence(dir.to_string()));
    }
    Ok(images)
}

fn sequence(
    src: &mut impl ImageSource,
    dir: &str,
    frame_duration: u32,
    looping: bool,
) -> Result<AnimationDef, AssetError> {
    let images = non_empty(src.load_images(dir)?, dir)?;
    Ok(AnimationDef::new(images, frame_duration, looping))
}
