//! alphablend composites a foreground RGBA8 image over a background with the straight-alpha
//! "over" operator.
//!
//! # Pipeline overview
//!
//! 1. **Allocate**: [`allocate`] hands out byte buffers whose start is aligned to a power of two.
//! 2. **Place**: [`place`] copies a smaller image onto a screen-sized canvas at a pixel offset.
//! 3. **Load**: [`ImageLoader`] decodes a front/back pair into two screen-sized [`PixelBuffer`]s.
//! 4. **Composite**: [`composite`] blends front over back into an output buffer, once per frame.
//!
//! Design constraints:
//!
//! - **Explicit configuration**: screen size, placement offset and alignment travel in a
//!   [`BlendConfig`] value.
//! - **Owned, aligned buffers**: a [`PixelBuffer`] keeps its alignment for its whole lifetime and is
//!   released on drop, error paths included.
//! - **Bit-exact kernels**: the AVX2 kernel is selected at runtime when the CPU has it and matches
//!   the scalar kernel byte for byte.
//! - **Unsafe is confined** to the AVX2 loads and stores.
#![deny(unsafe_code)]

mod assets;
mod buffer;
mod composite;
mod foundation;

pub use assets::decode::{
    DecodedImage, FsImageSource, ImageSource, MemoryImageSource, decode_image,
};
pub use assets::loader::{ImageLoader, load_images};
pub use buffer::aligned::{AlignedBuf, allocate};
pub use buffer::pixel::PixelBuffer;
pub use buffer::placement::place;
pub use composite::scalar::blend_pixel;
pub use composite::{
    CompositeStats, Compositor, Kernel, composite, composite_scalar, composite_with,
};
pub use foundation::config::{BlendConfig, KERNEL_ALIGNMENT};
pub use foundation::core::{BYTES_PER_PIXEL, Canvas, Rgba8};
pub use foundation::error::{BlendError, BlendResult};
