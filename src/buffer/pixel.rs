use crate::{
    buffer::aligned::{AlignedBuf, allocate},
    foundation::{
        core::{BYTES_PER_PIXEL, Canvas, Rgba8},
        error::{BlendError, BlendResult},
    },
};

/// Aligned, owned RGBA8 pixel buffer of `width * height` row-major pixels.
///
/// The byte length always equals `width * height * 4`.
#[derive(Debug)]
pub struct PixelBuffer {
    canvas: Canvas,
    buf: AlignedBuf,
}

impl PixelBuffer {
    /// Allocate a zeroed (fully transparent) buffer for `canvas` at `alignment`.
    pub fn new(canvas: Canvas, alignment: usize) -> BlendResult<Self> {
        let len = canvas.byte_len()?;
        let buf = allocate(len, alignment)?;
        Ok(Self { canvas, buf })
    }

    /// Wrap an existing aligned allocation whose length matches `canvas`.
    pub fn from_aligned(canvas: Canvas, buf: AlignedBuf) -> BlendResult<Self> {
        let len = canvas.byte_len()?;
        if buf.len() != len {
            return Err(BlendError::copy(format!(
                "buffer holds {} bytes, canvas {canvas} needs {len}",
                buf.len()
            )));
        }
        Ok(Self { canvas, buf })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn alignment(&self) -> usize {
        self.buf.alignment()
    }

    pub fn is_aligned_to(&self, align: usize) -> bool {
        self.buf.is_aligned_to(align)
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_slice()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut_slice()
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let idx = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * BYTES_PER_PIXEL;
        let px = &self.as_bytes()[idx..idx + BYTES_PER_PIXEL];
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.as_bytes()
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }

    /// Set every pixel to `rgba`.
    pub fn fill(&mut self, rgba: Rgba8) {
        for px in self.as_bytes_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Copy `bytes` over the whole buffer. Lengths must match exactly.
    pub fn copy_from_bytes(&mut self, bytes: &[u8]) -> BlendResult<()> {
        let dst = self.as_bytes_mut();
        if dst.len() != bytes.len() {
            return Err(BlendError::copy(format!(
                "cannot copy {} bytes into a {}-byte buffer",
                bytes.len(),
                dst.len()
            )));
        }
        dst.copy_from_slice(bytes);
        Ok(())
    }

    /// Fresh allocation with the same canvas, alignment and contents.
    pub fn try_clone(&self) -> BlendResult<Self> {
        Ok(Self {
            canvas: self.canvas,
            buf: self.buf.try_clone()?,
        })
    }

    /// Copy the pixels into an `image::RgbaImage` for encoding or display.
    pub fn to_rgba_image(&self) -> BlendResult<image::RgbaImage> {
        image::RgbaImage::from_raw(
            self.canvas.width,
            self.canvas.height,
            self.as_bytes().to_vec(),
        )
        .ok_or_else(|| BlendError::copy(format!("pixel buffer does not fit {}", self.canvas)))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/pixel.rs"]
mod tests;
