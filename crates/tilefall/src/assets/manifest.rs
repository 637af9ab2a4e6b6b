use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets::registry::{AssetError, Image, ImageId, ImageSource};

/// Asset manifest describing every image the host has loaded.
/// Loaded from a JSON file at runtime. Sections other than `images` (the
/// host's audio table, for one) are ignored; sound volumes are fixed per
/// `SoundEvent`.
///
/// Image ids are assigned in lexicographic path order, so the host and the
/// simulation agree on them without exchanging a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    /// Image path (relative to the image root) → pixel size.
    pub images: BTreeMap<String, ImageSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register an image. Mostly useful when building manifests in code.
    pub fn with_image(mut self, path: impl Into<String>, width: u32, height: u32) -> Self {
        self.images.insert(path.into(), ImageSize { width, height });
        self
    }
}

/// `ImageSource` backed by a manifest: the host decodes the files, the core
/// refers to them by id.
pub struct ManifestImages {
    images: BTreeMap<String, Image>,
}

impl ManifestImages {
    pub fn from_manifest(manifest: &AssetManifest) -> Self {
        let images = manifest
            .images
            .iter()
            .enumerate()
            .map(|(i, (path, size))| {
                (path.clone(), Image::new(ImageId(i as u32), size.width, size.height))
            })
            .collect();
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageSource for ManifestImages {
    fn load_image(&mut self, path: &str) -> Result<Image, AssetError> {
        self.images
            .get(path)
            .copied()
            .ok_or_else(|| AssetError::MissingImage(path.to_string()))
    }

    fn load_images(&mut self, dir: &str) -> Result<Vec<Image>, AssetError> {
        let dir = dir.trim_end_matches('/');
        Ok(self
            .images
            .iter()
            .filter(|(path, _)| {
                path.rsplit_once('/')
                    .is_some_and(|(parent, _)| parent == dir)
            })
            .map(|(_, image)| *image)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_audio_table_is_ignored() {
        let json = r#"{
            "images": {
                "gun.png": { "width": 7, "height": 4 }
            },
            "sounds": {
                "jump": { "path": "sfx/jump.wav", "volume": 0.7 },
                "music": { "path": "music.wav" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.images["gun.png"], ImageSize { width: 7, height: 4 });
        assert_eq!(manifest.images.len(), 1);
    }

    #[test]
    fn ids_follow_path_order() {
        let manifest = AssetManifest::default()
            .with_image("tiles/grass/1.png", 16, 16)
            .with_image("background.png", 320, 240)
            .with_image("tiles/grass/0.png", 16, 16);
        let mut images = ManifestImages::from_manifest(&manifest);

        assert_eq!(images.load_image("background.png").unwrap().id, ImageId(0));
        let grass = images.load_images("tiles/grass").unwrap();
        assert_eq!(grass.iter().map(|i| i.id).collect::<Vec<_>>(), vec![ImageId(1), ImageId(2)]);
    }

    #[test]
    fn directory_listing_excludes_nested_dirs() {
        let manifest = AssetManifest::default()
            .with_image("entities/player.png", 8, 15)
            .with_image("entities/player/idle/00.png", 14, 18);
        let mut images = ManifestImages::from_manifest(&manifest);
        assert_eq!(images.load_images("entities").unwrap().len(), 1);
        assert_eq!(images.load_images("entities/player/idle").unwrap().len(), 1);
        assert!(images.load_images("entities/player").unwrap().is_empty());
    }

    #[test]
    fn missing_image_is_an_error() {
        let mut images = ManifestImages::from_manifest(&AssetManifest::default());
        assert_eq!(
            images.load_image("gun.png").unwrap_err(),
            AssetError::MissingImage("gun.png".into())
        );
    }
}
