use super::*;

#[test]
fn opaque_front_replaces_back() {
    let front = [200, 100, 50, 255];
    for back in [[0, 0, 0, 0], [255, 255, 255, 255], [9, 8, 7, 6]] {
        assert_eq!(blend_pixel(front, back), [200, 100, 50, 255]);
    }
}

#[test]
fn transparent_front_keeps_back_and_forces_alpha() {
    let back = [12, 34, 56, 78];
    for front in [[0, 0, 0, 0], [255, 255, 255, 0]] {
        assert_eq!(blend_pixel(front, back), [12, 34, 56, 255]);
    }
}

#[test]
fn truncating_shift_not_rounding_division() {
    // (255 * 128 + 0 * 127) >> 8 = 32640 >> 8 = 127; rounding /255 would give 128.
    assert_eq!(blend_pixel([255, 255, 255, 128], [0, 0, 0, 255]), [127, 127, 127, 255]);
    // (0 * 1 + 255 * 254) >> 8 = 64770 >> 8 = 253.
    assert_eq!(blend_pixel([0, 0, 0, 1], [255, 255, 255, 255]), [253, 253, 253, 255]);
}

#[test]
fn matches_formula_exhaustively_over_alpha_and_channel_pairs() {
    for a in 1..=254u32 {
        for f in (0..=255u32).step_by(17) {
            for b in (0..=255u32).step_by(15) {
                let want = ((f * a + b * (255 - a)) >> 8) as u8;
                let got = blend_pixel([f as u8, 0, 0, a as u8], [b as u8, 0, 0, 0]);
                assert_eq!(got[0], want, "f={f} b={b} a={a}");
            }
        }
    }
}

#[test]
fn endpoints_are_exact_for_every_channel_value() {
    for c in 0..=255u8 {
        let other = 255 - c;
        assert_eq!(blend_pixel([c, c, c, 255], [other; 4]), [c, c, c, 255]);
        assert_eq!(blend_pixel([other, other, other, 0], [c; 4]), [c, c, c, 255]);
    }
}

#[test]
fn near_endpoint_alphas_follow_the_formula() {
    // a = 254: (200 * 254 + 100 * 1) >> 8 = 50900 >> 8 = 198.
    assert_eq!(blend_pixel([200, 0, 0, 254], [100, 0, 0, 0])[0], 198);
    // a = 1: (200 * 1 + 100 * 254) >> 8 = 25600 >> 8 = 100.
    assert_eq!(blend_pixel([200, 0, 0, 1], [100, 0, 0, 0])[0], 100);
}

#[test]
fn composite_walks_all_pixels() {
    let front = [255, 0, 0, 255, 0, 0, 0, 0, 10, 20, 30, 128];
    let back = [0, 0, 255, 255, 0, 0, 255, 255, 40, 50, 60, 255];
    let mut out = [0u8; 12];
    composite(&mut out, &front, &back);
    assert_eq!(
        out,
        [
            255, 0, 0, 255, //
            0, 0, 255, 255, //
            ((10 * 128 + 40 * 127) >> 8) as u8,
            ((20 * 128 + 50 * 127) >> 8) as u8,
            ((30 * 128 + 60 * 127) >> 8) as u8,
            255,
        ]
    );
}
