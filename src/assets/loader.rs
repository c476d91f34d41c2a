use std::path::Path;

use crate::{
    assets::decode::{FsImageSource, ImageSource},
    buffer::{pixel::PixelBuffer, placement::place},
    foundation::{
        config::BlendConfig,
        core::Canvas,
        error::{BlendError, BlendResult},
    },
};

/// Loads a foreground/background pair into screen-sized aligned buffers.
///
/// The foreground may be any size that fits on the screen at `config.front_offset`. The background
/// must already be screen-sized. Either both buffers come back or neither does: anything allocated
/// before a failure is dropped before the error is returned.
#[derive(Clone, Debug)]
pub struct ImageLoader<S = FsImageSource> {
    config: BlendConfig,
    source: S,
}

impl ImageLoader<FsImageSource> {
    /// Loader that decodes files from disk.
    pub fn new(config: BlendConfig) -> BlendResult<Self> {
        Self::with_source(config, FsImageSource)
    }
}

impl<S: ImageSource> ImageLoader<S> {
    pub fn with_source(config: BlendConfig, source: S) -> BlendResult<Self> {
        config.validate()?;
        Ok(Self { config, source })
    }

    pub fn config(&self) -> &BlendConfig {
        &self.config
    }

    /// Decode both images and return `(front, back)`, owned by the caller.
    #[tracing::instrument(skip(self))]
    pub fn load(&self, front: &Path, back: &Path) -> BlendResult<(PixelBuffer, PixelBuffer)> {
        let screen = self.config.canvas();

        let front_buf = self.load_front(front, screen)?;
        let back_buf = self.load_back(back, screen).inspect_err(|e| {
            tracing::debug!(error = %e, "background failed, releasing foreground buffer");
        })?;

        tracing::debug!(%screen, alignment = self.config.alignment, "loaded image pair");
        Ok((front_buf, back_buf))
    }

    fn load_front(&self, path: &Path, screen: Canvas) -> BlendResult<PixelBuffer> {
        let img = self.source.decode(path)?;
        tracing::debug!(size = %img.canvas(), offset = self.config.front_offset, "placing foreground");
        place(
            &img.rgba8,
            img.canvas(),
            self.config.front_offset,
            screen,
            self.config.alignment,
        )
    }

    fn load_back(&self, path: &Path, screen: Canvas) -> BlendResult<PixelBuffer> {
        let img = self.source.decode(path)?;
        if img.canvas() != screen {
            return Err(BlendError::copy(format!(
                "background '{}' is {}, expected screen size {screen}",
                path.display(),
                img.canvas()
            )));
        }

        let mut buf = PixelBuffer::new(screen, self.config.alignment)?;
        buf.copy_from_bytes(&img.rgba8)?;
        Ok(buf)
    }
}

/// Load `front` and `back` from disk with `config`.
pub fn load_images(
    config: &BlendConfig,
    front: &Path,
    back: &Path,
) -> BlendResult<(PixelBuffer, PixelBuffer)> {
    ImageLoader::new(config.clone())?.load(front, back)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
