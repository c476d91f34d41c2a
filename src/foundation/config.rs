use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::foundation::{
    core::Canvas,
    error::{BlendError, BlendResult},
};

/// Alignment the vectorized kernel loads and stores at.
pub const KERNEL_ALIGNMENT: usize = 32;

/// Engine configuration, passed explicitly to every component.
///
/// Defaults match an 800x600 screen with the foreground anchored at pixel index `175400`
/// (column 200, row 219).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlendConfig {
    /// Screen width in pixels. Every composited buffer has this width.
    pub screen_width: u32,
    /// Screen height in pixels. Every composited buffer has this height.
    pub screen_height: u32,
    /// Pixel index on the screen canvas where the foreground's first row starts.
    pub front_offset: usize,
    /// Byte alignment of every allocated pixel buffer (power of two, at least 32).
    pub alignment: usize,
    /// How many times a compositor run repeats the full composite (benchmarking only).
    pub repeat: u32,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            front_offset: 175_400,
            alignment: KERNEL_ALIGNMENT,
            repeat: 1,
        }
    }
}

impl BlendConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> BlendResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> BlendResult<()> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(BlendError::validation(format!(
                "screen size must be non-zero, got {}",
                self.canvas()
            )));
        }
        if !self.alignment.is_power_of_two() {
            return Err(BlendError::validation(format!(
                "alignment must be a power of two, got {}",
                self.alignment
            )));
        }
        if self.alignment < KERNEL_ALIGNMENT {
            return Err(BlendError::validation(format!(
                "alignment must be at least {KERNEL_ALIGNMENT}, got {}",
                self.alignment
            )));
        }
        if self.repeat == 0 {
            return Err(BlendError::validation("repeat must be >= 1"));
        }
        self.canvas().byte_len()?;
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.screen_width, self.screen_height)
    }

    pub fn pixel_count(&self) -> usize {
        self.canvas().pixel_count()
    }

    /// Byte length of one screen-sized RGBA8 buffer.
    pub fn buffer_len(&self) -> BlendResult<usize> {
        self.canvas().byte_len()
    }

    /// Linear pixel offset of screen position `(x, y)`.
    pub fn offset_at(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.screen_width as usize) + (x as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
