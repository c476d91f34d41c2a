use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::{
    core::Canvas,
    error::{BlendError, BlendResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in straight RGBA8 form.
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight RGBA8.
    pub rgba8: Vec<u8>,
}

impl DecodedImage {
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.width, self.height)
    }
}

/// Decode any format the `image` crate understands into straight RGBA8.
pub fn decode_image(bytes: &[u8]) -> BlendResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(DecodedImage {
        width,
        height,
        rgba8: rgba.into_raw(),
    })
}

/// External collaborator that turns an image path into RGBA8 pixels.
pub trait ImageSource {
    /// Decode `path`. Anything that yields no pixels is [`BlendError::FileNotFound`].
    fn decode(&self, path: &Path) -> BlendResult<DecodedImage>;
}

/// Reads image files from disk and decodes them with the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsImageSource;

impl ImageSource for FsImageSource {
    fn decode(&self, path: &Path) -> BlendResult<DecodedImage> {
        let bytes = std::fs::read(path).map_err(|e| BlendError::file_not_found(path, e.to_string()))?;
        let img =
            decode_image(&bytes).map_err(|e| BlendError::file_not_found(path, format!("{e:#}")))?;
        if img.canvas().is_empty() {
            return Err(BlendError::file_not_found(path, "image has no pixels"));
        }
        Ok(img)
    }
}

/// Serves already-decoded images by path, for shells that produce pixels themselves.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageSource {
    images: HashMap<PathBuf, DecodedImage>,
}

impl MemoryImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `img` under `path`, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<PathBuf>, img: DecodedImage) {
        self.images.insert(path.into(), img);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, img: DecodedImage) -> Self {
        self.insert(path, img);
        self
    }
}

impl ImageSource for MemoryImageSource {
    fn decode(&self, path: &Path) -> BlendResult<DecodedImage> {
        let img = self
            .images
            .get(path)
            .ok_or_else(|| BlendError::file_not_found(path, "no image registered"))?;
        if img.canvas().is_empty() {
            return Err(BlendError::file_not_found(path, "image has no pixels"));
        }
        Ok(img.clone())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
