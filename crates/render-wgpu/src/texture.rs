use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to read texture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode texture: {0}")]
    Decode(#[from] image::ImageError),
}

/// CPU-side RGBA8 normal map.
///
/// Decoding happens before any GPU work so the fallback path is testable
/// without a device.
#[derive(Debug, Clone)]
pub struct NormalMap {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// True when this is the neutral substitute for a failed load.
    pub is_fallback: bool,
}

impl NormalMap {
    /// Load and decode a normal map. Failure degrades shading visually but
    /// must not halt startup, so errors collapse to the flat fallback.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(map) => {
                debug!(path = %path.display(), map.width, map.height, "normal map loaded");
                map
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "normal map unavailable, shading degrades");
                Self::flat()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path)?;
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
            is_fallback: false,
        })
    }

    /// 1x1 neutral map encoding the unperturbed +Z tangent-space normal.
    pub fn flat() -> Self {
        Self {
            pixels: vec![128, 128, 255, 255],
            width: 1,
            height: 1,
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_map_is_neutral() {
        let map = NormalMap::flat();
        assert_eq!((map.width, map.height), (1, 1));
        assert_eq!(map.pixels, vec![128, 128, 255, 255]);
        assert!(map.is_fallback);
    }

    #[test]
    fn missing_file_degrades_to_fallback() {
        let map = NormalMap::load(Path::new("does/not/exist.jpg"));
        assert!(map.is_fallback);
        assert_eq!(map.pixels.len(), 4);
    }

    #[test]
    fn garbage_bytes_degrade_to_fallback() {
        let dir = std::env::temp_dir().join("vitrine_texture_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("not_an_image.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();
        let map = NormalMap::load(&path);
        assert!(map.is_fallback);
    }
}
