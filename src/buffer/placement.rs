use crate::{
    buffer::pixel::PixelBuffer,
    foundation::{
        core::{BYTES_PER_PIXEL, Canvas},
        error::{BlendError, BlendResult},
    },
};

/// Copy a `src`-sized RGBA8 image onto a fresh `dst`-sized canvas.
///
/// Source row `y` lands at destination pixel index `offset + y * dst.width`. Rows are copied
/// contiguously, so a source wider than the space left in a destination row continues on the next
/// one. Bytes outside the copied rows keep the allocator's zero fill, i.e. transparent black.
///
/// Fails with [`BlendError::OutOfBounds`] when the last row would end past the destination and with
/// [`BlendError::Copy`] when `source` is shorter than `src` declares.
#[tracing::instrument(skip(source), fields(source_len = source.len()))]
pub fn place(
    source: &[u8],
    src: Canvas,
    offset: usize,
    dst: Canvas,
    alignment: usize,
) -> BlendResult<PixelBuffer> {
    let src_len = src.byte_len()?;
    if source.len() < src_len {
        return Err(BlendError::copy(format!(
            "source holds {} bytes, {src} image needs {src_len}",
            source.len()
        )));
    }
    check_bounds(src, offset, dst)?;

    let mut out = PixelBuffer::new(dst, alignment)?;

    let src_row = (src.width as usize) * BYTES_PER_PIXEL;
    let dst_stride = dst.width as usize;
    let bytes = out.as_bytes_mut();
    for (y, row) in source[..src_len]
        .chunks_exact(src_row.max(1))
        .enumerate()
        .take(src.height as usize)
    {
        let at = (offset + y * dst_stride) * BYTES_PER_PIXEL;
        bytes[at..at + src_row].copy_from_slice(row);
    }

    Ok(out)
}

/// `offset + (src.height - 1) * dst.width + src.width <= dst.width * dst.height`, overflow-checked.
fn check_bounds(src: Canvas, offset: usize, dst: Canvas) -> BlendResult<()> {
    if src.is_empty() {
        return Ok(());
    }

    let end = (src.height as usize - 1)
        .checked_mul(dst.width as usize)
        .and_then(|v| v.checked_add(offset))
        .and_then(|v| v.checked_add(src.width as usize));
    let capacity = dst.pixel_count();

    match end {
        Some(end) if end <= capacity => Ok(()),
        Some(end) => Err(BlendError::out_of_bounds(format!(
            "{src} image at offset {offset} ends at pixel {end}, destination {dst} holds {capacity}"
        ))),
        None => Err(BlendError::out_of_bounds(format!(
            "{src} image at offset {offset} overflows destination {dst} indexing"
        ))),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/placement.rs"]
mod tests;
