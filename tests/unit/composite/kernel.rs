use super::*;

const BOUNDARY_ALPHAS: [u8; 4] = [0, 1, 254, 255];

fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn screen() -> Canvas {
    BlendConfig::default().canvas()
}

fn buffer(canvas: Canvas) -> PixelBuffer {
    PixelBuffer::new(canvas, 32).unwrap()
}

fn random_buffer(canvas: Canvas, seed: u64) -> PixelBuffer {
    let mut state = seed;
    let mut pb = buffer(canvas);
    for chunk in pb.as_bytes_mut().chunks_mut(8) {
        let v = splitmix64(&mut state).to_le_bytes();
        chunk.copy_from_slice(&v[..chunk.len()]);
    }
    pb
}

fn boundary_buffer(canvas: Canvas, seed: u64) -> PixelBuffer {
    let mut pb = random_buffer(canvas, seed);
    for (i, px) in pb.as_bytes_mut().chunks_exact_mut(4).enumerate() {
        px[3] = BOUNDARY_ALPHAS[i % BOUNDARY_ALPHAS.len()];
    }
    pb
}

fn run(kernel: Kernel, front: &PixelBuffer, back: &PixelBuffer) -> PixelBuffer {
    let mut out = buffer(front.canvas());
    composite_with(kernel, &mut out, front, back);
    out
}

#[test]
fn detected_kernel_is_supported() {
    assert!(Kernel::detect().is_supported());
    assert!(Kernel::Scalar.is_supported());
}

#[test]
fn detected_kernel_matches_scalar_on_random_screen() {
    let front = random_buffer(screen(), 1);
    let back = random_buffer(screen(), 2);

    let want = run(Kernel::Scalar, &front, &back);
    let got = run(Kernel::detect(), &front, &back);
    assert!(want.as_bytes() == got.as_bytes());
}

#[test]
fn avx2_matches_scalar_on_boundary_alphas() {
    if !Kernel::Avx2.is_supported() {
        eprintln!("skipping: avx2 not available");
        return;
    }
    for seed in [3u64, 4, 5] {
        let front = boundary_buffer(screen(), seed);
        let back = random_buffer(screen(), seed + 100);

        let want = run(Kernel::Scalar, &front, &back);
        let got = run(Kernel::Avx2, &front, &back);
        assert!(want.as_bytes() == got.as_bytes(), "seed={seed}");
    }
}

#[test]
fn output_alpha_is_always_opaque() {
    let front = boundary_buffer(screen(), 9);
    let back = random_buffer(screen(), 10);
    for kernel in [Kernel::Scalar, Kernel::detect()] {
        let out = run(kernel, &front, &back);
        assert!(out.pixels().all(|px| px[3] == 255), "kernel={kernel}");
    }
}

#[test]
fn opaque_and_transparent_fronts_are_exact() {
    let canvas = Canvas::new(24, 4);
    let mut front = random_buffer(canvas, 11);
    let back = random_buffer(canvas, 12);
    for (i, px) in front.as_bytes_mut().chunks_exact_mut(4).enumerate() {
        px[3] = if i % 2 == 0 { 255 } else { 0 };
    }

    for kernel in [Kernel::Scalar, Kernel::detect()] {
        let out = run(kernel, &front, &back);
        for (i, ((o, f), b)) in out.pixels().zip(front.pixels()).zip(back.pixels()).enumerate() {
            let want = if i % 2 == 0 { f } else { b };
            assert_eq!(o[..3], want[..3], "kernel={kernel} pixel={i}");
        }
    }
}

#[test]
fn opaque_red_front_gives_solid_red() {
    let mut front = buffer(screen());
    front.fill([255, 0, 0, 255]);
    let back = random_buffer(screen(), 13);

    let mut out = buffer(screen());
    composite(&mut out, &front, &back);
    assert!(out.pixels().all(|px| px == [255, 0, 0, 255]));
}

#[test]
fn transparent_front_over_blue_gives_opaque_blue() {
    let mut front = buffer(screen());
    front.fill([0, 0, 0, 0]);
    let mut back = buffer(screen());
    back.fill([0, 0, 255, 255]);

    let mut out = buffer(screen());
    composite(&mut out, &front, &back);
    assert!(out.pixels().all(|px| px == [0, 0, 255, 255]));

    back.fill([0, 0, 255, 17]);
    composite(&mut out, &front, &back);
    assert!(out.pixels().all(|px| px == [0, 0, 255, 255]));
}

#[test]
fn repeated_composites_are_deterministic_and_leave_inputs_alone() {
    let front = random_buffer(screen(), 21);
    let back = random_buffer(screen(), 22);
    let front_before = front.as_bytes().to_vec();
    let back_before = back.as_bytes().to_vec();

    let mut out = buffer(screen());
    composite(&mut out, &front, &back);
    let first = out.as_bytes().to_vec();

    let stats = Compositor::new(Kernel::detect(), 5).run(&mut out, &front, &back);
    assert_eq!(stats.repeats, 5);
    assert_eq!(stats.pixels, screen().pixel_count());
    assert!(out.as_bytes() == first.as_slice());
    assert!(front.as_bytes() == front_before.as_slice());
    assert!(back.as_bytes() == back_before.as_slice());
}

#[test]
fn compositor_from_config_uses_repeat_and_detected_kernel() {
    let cfg = BlendConfig {
        repeat: 3,
        ..BlendConfig::default()
    };
    let c = Compositor::from_config(&cfg);
    assert_eq!(c.kernel(), Kernel::detect());
    assert_eq!(c.repeat(), 3);
    assert_eq!(Compositor::new(Kernel::Scalar, 0).repeat(), 1);
}

#[test]
fn odd_sized_canvas_matches_scalar() {
    // 13 * 3 = 39 pixels: vector blocks plus a scalar tail.
    let canvas = Canvas::new(13, 3);
    let front = boundary_buffer(canvas, 31);
    let back = random_buffer(canvas, 32);
    let want = run(Kernel::Scalar, &front, &back);
    let got = run(Kernel::detect(), &front, &back);
    assert_eq!(want.as_bytes(), got.as_bytes());
}

#[test]
#[should_panic(expected = "one canvas")]
fn mismatched_canvases_fail_fast() {
    let front = buffer(Canvas::new(8, 2));
    let back = buffer(Canvas::new(8, 3));
    let mut out = buffer(Canvas::new(8, 2));
    composite(&mut out, &front, &back);
}

#[test]
fn kernel_names_round_trip_through_serde() {
    assert_eq!(serde_json::to_string(&Kernel::Avx2).unwrap(), "\"avx2\"");
    let k: Kernel = serde_json::from_str("\"scalar\"").unwrap();
    assert_eq!(k, Kernel::Scalar);
    assert_eq!(Kernel::Avx2.to_string(), "avx2");
}
