#![warn(missing_docs)]
//! Image assets referenced by panel content, and the loaders that decode them.

mod loader;

pub use loader::ThreadedImageLoader;

use std::sync::Arc;
use thiserror::Error;

/// Decoded RGBA8 image ready to hand to a drawing backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Source the image was loaded from.
    pub source: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 pixels, row-major.
    pub rgba: Vec<u8>,
}

impl ImageAsset {
    /// Width divided by height; `None` for degenerate images.
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

/// Shared handle to a decoded image, cached per element once loaded.
pub type ImageHandle = Arc<ImageAsset>;

/// Errors emitted while fetching or decoding an image.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    /// The source could not be read.
    #[error("failed to read image {source_path}: {error}")]
    Io {
        /// Path that failed to read.
        source_path: String,
        /// Underlying IO error.
        error: std::io::Error,
    },
    /// The bytes were read but are not a decodable image.
    #[error("failed to decode image {source_path}: {error}")]
    Decode {
        /// Path whose bytes failed to decode.
        source_path: String,
        /// Underlying decoder error.
        error: image::ImageError,
    },
    /// The image decoded to zero width or height.
    #[error("image {0} has no pixels")]
    Empty(String),
}

/// Completion record for a previously requested load.
#[derive(Debug)]
pub struct LoadedAsset {
    /// Key the load was requested under (the element name).
    pub key: String,
    /// Source that was requested.
    pub source: String,
    /// Decoded image or the reason it could not be produced.
    pub result: Result<ImageHandle, AssetLoadError>,
}

/// Fire-and-forget asset loading.
///
/// `request` must return immediately; completions surface later through `poll`,
/// which the panel calls once per tick.
pub trait AssetLoader {
    /// Start loading `source` on behalf of `key`.
    fn request(&mut self, key: &str, source: &str);

    /// Drain every load that finished since the last poll.
    fn poll(&mut self) -> Vec<LoadedAsset>;
}

/// Decode an in-memory encoded image (PNG or JPEG).
pub fn decode_image_bytes(source: &str, bytes: &[u8]) -> Result<ImageAsset, AssetLoadError> {
    let decoded = image::load_from_memory(bytes).map_err(|error| AssetLoadError::Decode {
        source_path: source.to_string(),
        error,
    })?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetLoadError::Empty(source.to_string()));
    }
    Ok(ImageAsset {
        source: source.to_string(),
        width,
        height,
        rgba: rgba.into_raw(),
    })
}
