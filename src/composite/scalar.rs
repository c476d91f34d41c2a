use crate::foundation::core::{BYTES_PER_PIXEL, Rgba8};

/// Straight-alpha "over" for one pixel.
///
/// With `a` the front alpha, each color channel is `(front * a + back * (255 - a)) >> 8`. The shift
/// truncates (divides by 256, not 255). Alpha 255 yields the front color and alpha 0 the back
/// color exactly. Output alpha is always 255.
#[inline]
pub fn blend_pixel(front: Rgba8, back: Rgba8) -> Rgba8 {
    match front[3] {
        255 => [front[0], front[1], front[2], 255],
        0 => [back[0], back[1], back[2], 255],
        a => {
            let a = u16::from(a);
            let inv = 255 - a;
            // 255 * a + 255 * (255 - a) <= 65025, fits in u16.
            let ch = |f: u8, b: u8| ((u16::from(f) * a + u16::from(b) * inv) >> 8) as u8;
            [
                ch(front[0], back[0]),
                ch(front[1], back[1]),
                ch(front[2], back[2]),
                255,
            ]
        }
    }
}

/// Reference kernel: blend every pixel in row-major order.
pub(crate) fn composite(out: &mut [u8], front: &[u8], back: &[u8]) {
    for ((o, f), b) in out
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(front.chunks_exact(BYTES_PER_PIXEL))
        .zip(back.chunks_exact(BYTES_PER_PIXEL))
    {
        let px = blend_pixel([f[0], f[1], f[2], f[3]], [b[0], b[1], b[2], b[3]]);
        o.copy_from_slice(&px);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/scalar.rs"]
mod tests;
