use crate::foundation::error::{BlendError, BlendResult};

/// Owned byte buffer whose first byte sits at a multiple of a power-of-two alignment.
///
/// The backing storage is over-allocated by `alignment - 1` bytes and the usable window starts at
/// the first aligned address inside it. The heap block never moves after construction (nothing
/// grows it), so the alignment holds for the buffer's whole lifetime. Storage is released on drop.
pub struct AlignedBuf {
    storage: Vec<u8>,
    start: usize,
    len: usize,
    alignment: usize,
}

/// Allocate `size` zero-filled bytes starting at a multiple of `alignment`.
pub fn allocate(size: usize, alignment: usize) -> BlendResult<AlignedBuf> {
    if !alignment.is_power_of_two() {
        return Err(BlendError::alignment(format!(
            "alignment must be a non-zero power of two, got {alignment}"
        )));
    }

    let padded = size.checked_add(alignment - 1).ok_or_else(|| {
        BlendError::allocation(format!(
            "{size} bytes at alignment {alignment} overflows usize"
        ))
    })?;

    let mut storage = Vec::new();
    storage
        .try_reserve_exact(padded)
        .map_err(|e| BlendError::allocation(format!("reserve {padded} bytes: {e}")))?;
    storage.resize(padded, 0);

    let start = storage.as_ptr().align_offset(alignment);
    if start >= alignment {
        return Err(BlendError::alignment(format!(
            "allocator returned no address aligned to {alignment} within {padded} bytes"
        )));
    }

    let buf = AlignedBuf {
        storage,
        start,
        len: size,
        alignment,
    };
    if !buf.addr().is_multiple_of(alignment) {
        return Err(BlendError::alignment(format!(
            "buffer at {:#x} is not aligned to {alignment}",
            buf.addr()
        )));
    }

    tracing::debug!(size, alignment, start, "allocated aligned buffer");
    Ok(buf)
}

impl AlignedBuf {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Alignment requested at allocation time.
    pub fn alignment(&self) -> usize {
        self.alignment
    }

    /// Address of the first usable byte.
    pub fn addr(&self) -> usize {
        self.as_slice().as_ptr() as usize
    }

    /// Whether the first byte sits at a multiple of `align`.
    pub fn is_aligned_to(&self, align: usize) -> bool {
        align.is_power_of_two() && self.addr().is_multiple_of(align)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[self.start..self.start + self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.start..self.start + self.len]
    }

    /// Fresh allocation with the same size, alignment and contents.
    pub fn try_clone(&self) -> BlendResult<Self> {
        let mut out = allocate(self.len, self.alignment)?;
        out.as_mut_slice().copy_from_slice(self.as_slice());
        Ok(out)
    }
}

impl std::fmt::Debug for AlignedBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBuf")
            .field("addr", &format_args!("{:#x}", self.addr()))
            .field("len", &self.len)
            .field("alignment", &self.alignment)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/buffer/aligned.rs"]
mod tests;
