//! AVX2 over-blend, 8 pixels (32 bytes) per step.
//!
//! Each 32-byte block is split into two 4-pixel halves. A half is widened to sixteen 16-bit lanes,
//! each pixel's alpha is broadcast over its four lanes with a byte shuffle, and
//! `front * a + back * (255 - a)` is computed in 16 bits (at most 65025). Pixels with alpha 255 or 0
//! take `front << 8` or `back << 8` instead. The high byte of every lane is the `>> 8` result; a
//! second shuffle packs them into 16 bytes, low 128-bit lane into bytes 0..8 and high lane into
//! bytes 8..16, so OR-ing the two lanes keeps pixel order. Halves are rejoined low-first and the
//! alpha bytes are forced to 255.

use std::arch::x86_64::{
    __m128i, __m256i, _mm_or_si128, _mm256_add_epi16, _mm256_blendv_epi8,
    _mm256_castsi256_si128, _mm256_cmpeq_epi16, _mm256_cvtepu8_epi16, _mm256_extracti128_si256,
    _mm256_load_si256, _mm256_mullo_epi16, _mm256_or_si256, _mm256_set_m128i, _mm256_set1_epi16,
    _mm256_set1_epi32, _mm256_setr_epi8, _mm256_setzero_si256, _mm256_shuffle_epi8,
    _mm256_slli_epi16, _mm256_store_si256, _mm256_subs_epu16,
};

use crate::composite::scalar;

/// Bytes per vector step.
pub(super) const BLOCK: usize = 32;

/// Shuffle index with the high bit set: writes a zero byte.
const Z: i8 = -128;

#[derive(Clone, Copy)]
struct Masks {
    alpha_spread: __m256i,
    high_bytes: __m256i,
    max: __m256i,
    zero: __m256i,
}

impl Masks {
    #[target_feature(enable = "avx2")]
    fn new() -> Self {
        Self {
            // Per 128-bit lane: two pixels of four u16 channels, alpha at bytes 6 and 14.
            alpha_spread: _mm256_setr_epi8(
                6, Z, 6, Z, 6, Z, 6, Z, 14, Z, 14, Z, 14, Z, 14, Z, //
                6, Z, 6, Z, 6, Z, 6, Z, 14, Z, 14, Z, 14, Z, 14, Z,
            ),
            high_bytes: _mm256_setr_epi8(
                1, 3, 5, 7, 9, 11, 13, 15, Z, Z, Z, Z, Z, Z, Z, Z, //
                Z, Z, Z, Z, Z, Z, Z, Z, 1, 3, 5, 7, 9, 11, 13, 15,
            ),
            max: _mm256_set1_epi16(255),
            zero: _mm256_setzero_si256(),
        }
    }
}

pub(super) fn is_available() -> bool {
    std::arch::is_x86_feature_detected!("avx2")
}

/// Blend `front` over `back` into `out`.
///
/// Panics unless AVX2 is available, the three slices have equal length (a multiple of 4) and every
/// slice starts on a 32-byte boundary.
pub(super) fn composite(out: &mut [u8], front: &[u8], back: &[u8]) {
    assert!(is_available(), "avx2 kernel selected on a CPU without avx2");
    assert!(
        out.len() == front.len() && out.len() == back.len() && out.len().is_multiple_of(4),
        "avx2 kernel expects equal-length rgba8 buffers"
    );
    assert!(
        [out.as_ptr(), front.as_ptr(), back.as_ptr()]
            .iter()
            .all(|p| (*p as usize).is_multiple_of(BLOCK)),
        "avx2 kernel expects {BLOCK}-byte aligned buffers"
    );

    // SAFETY: avx2 support was checked above.
    unsafe { composite_avx2(out, front, back) }
}

#[target_feature(enable = "avx2")]
fn composite_avx2(out: &mut [u8], front: &[u8], back: &[u8]) {
    let masks = Masks::new();
    let opaque = _mm256_set1_epi32(0xFF00_0000_u32 as i32);

    let body = out.len() - out.len() % BLOCK;
    for at in (0..body).step_by(BLOCK) {
        // SAFETY: `at + BLOCK <= len` for all three slices, and each slice starts 32-byte aligned,
        // so `ptr + at` is 32-byte aligned and the 32 bytes read or written are in bounds.
        let (f, b) = unsafe {
            (
                _mm256_load_si256(front.as_ptr().add(at).cast::<__m256i>()),
                _mm256_load_si256(back.as_ptr().add(at).cast::<__m256i>()),
            )
        };

        let lo = blend_half(_mm256_castsi256_si128(f), _mm256_castsi256_si128(b), masks);
        let hi = blend_half(
            _mm256_extracti128_si256::<1>(f),
            _mm256_extracti128_si256::<1>(b),
            masks,
        );
        let px = _mm256_or_si256(_mm256_set_m128i(hi, lo), opaque);

        // SAFETY: see the loads above.
        unsafe { _mm256_store_si256(out.as_mut_ptr().add(at).cast::<__m256i>(), px) };
    }

    scalar::composite(&mut out[body..], &front[body..], &back[body..]);
}

/// Blend four pixels. Returns them in input order; alpha bytes are not yet forced.
#[target_feature(enable = "avx2")]
#[inline]
fn blend_half(front: __m128i, back: __m128i, masks: Masks) -> __m128i {
    let f = _mm256_cvtepu8_epi16(front);
    let b = _mm256_cvtepu8_epi16(back);

    let alpha = _mm256_shuffle_epi8(f, masks.alpha_spread);
    let inv = _mm256_subs_epu16(masks.max, alpha);

    let sum = _mm256_add_epi16(_mm256_mullo_epi16(f, alpha), _mm256_mullo_epi16(b, inv));
    let sum = _mm256_blendv_epi8(
        sum,
        _mm256_slli_epi16::<8>(f),
        _mm256_cmpeq_epi16(alpha, masks.max),
    );
    let sum = _mm256_blendv_epi8(
        sum,
        _mm256_slli_epi16::<8>(b),
        _mm256_cmpeq_epi16(alpha, masks.zero),
    );

    let packed = _mm256_shuffle_epi8(sum, masks.high_bytes);
    _mm_or_si128(
        _mm256_castsi256_si128(packed),
        _mm256_extracti128_si256::<1>(packed),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/composite/avx2.rs"]
mod tests;
