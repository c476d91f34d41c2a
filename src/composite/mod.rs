use std::{
    sync::OnceLock,
    time::{Duration, Instant},
};

use crate::{
    buffer::pixel::PixelBuffer,
    foundation::{config::BlendConfig, core::Canvas},
};

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod avx2;
pub(crate) mod scalar;

/// Execution strategy for the over-blend. Every kernel produces byte-identical output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// One pixel at a time; the reference implementation.
    Scalar,
    /// Eight pixels per step with AVX2 (x86_64 only). Needs 32-byte aligned buffers.
    Avx2,
}

impl Kernel {
    /// Fastest kernel this CPU supports. Detected once per process.
    pub fn detect() -> Self {
        static KERNEL: OnceLock<Kernel> = OnceLock::new();
        *KERNEL.get_or_init(|| {
            let kernel = if Self::Avx2.is_supported() {
                Self::Avx2
            } else {
                Self::Scalar
            };
            tracing::debug!(kernel = kernel.name(), "selected compositing kernel");
            kernel
        })
    }

    pub fn is_supported(self) -> bool {
        match self {
            Self::Scalar => true,
            #[cfg(target_arch = "x86_64")]
            Self::Avx2 => avx2::is_available(),
            #[cfg(not(target_arch = "x86_64"))]
            Self::Avx2 => false,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Avx2 => "avx2",
        }
    }

    /// Buffer alignment this kernel requires.
    pub fn required_alignment(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Avx2 => 32,
        }
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Blend `front` over `back` into `out` with the detected kernel.
///
/// All three buffers must share one canvas. Violations panic.
pub fn composite(out: &mut PixelBuffer, front: &PixelBuffer, back: &PixelBuffer) {
    composite_with(Kernel::detect(), out, front, back);
}

/// Blend with the reference scalar kernel.
pub fn composite_scalar(out: &mut PixelBuffer, front: &PixelBuffer, back: &PixelBuffer) {
    composite_with(Kernel::Scalar, out, front, back);
}

/// Blend with an explicit kernel.
///
/// Panics when the canvases differ, when `kernel` is unsupported on this CPU, or when a buffer is
/// not aligned as `kernel` requires.
pub fn composite_with(
    kernel: Kernel,
    out: &mut PixelBuffer,
    front: &PixelBuffer,
    back: &PixelBuffer,
) {
    check_canvases(out.canvas(), front.canvas(), back.canvas());
    assert!(
        kernel.is_supported(),
        "{kernel} kernel is not supported on this CPU"
    );
    let align = kernel.required_alignment();
    assert!(
        out.is_aligned_to(align) && front.is_aligned_to(align) && back.is_aligned_to(align),
        "{kernel} kernel needs {align}-byte aligned buffers"
    );

    match kernel {
        Kernel::Scalar => scalar::composite(out.as_bytes_mut(), front.as_bytes(), back.as_bytes()),
        #[cfg(target_arch = "x86_64")]
        Kernel::Avx2 => avx2::composite(out.as_bytes_mut(), front.as_bytes(), back.as_bytes()),
        #[cfg(not(target_arch = "x86_64"))]
        Kernel::Avx2 => unreachable!("avx2 support was asserted above"),
    }
}

fn check_canvases(out: Canvas, front: Canvas, back: Canvas) {
    assert!(
        out == front && out == back,
        "composite expects one canvas, got out={out} front={front} back={back}"
    );
}

/// Timing for one [`Compositor::run`].
#[derive(Clone, Copy, Debug)]
pub struct CompositeStats {
    pub kernel: Kernel,
    /// Pixels per composite.
    pub pixels: usize,
    pub repeats: u32,
    /// Wall time for all repeats.
    pub elapsed: Duration,
}

impl CompositeStats {
    pub fn per_composite(&self) -> Duration {
        self.elapsed / self.repeats.max(1)
    }
}

/// Kernel choice plus a repeat count for benchmarking runs.
///
/// Repeats re-run the full composite over unchanged inputs; the result is the same as one run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Compositor {
    kernel: Kernel,
    repeat: u32,
}

impl Compositor {
    /// Detected kernel, repeat count from `config`.
    pub fn from_config(config: &BlendConfig) -> Self {
        Self::new(Kernel::detect(), config.repeat)
    }

    /// `repeat` of 0 is treated as 1.
    pub fn new(kernel: Kernel, repeat: u32) -> Self {
        Self {
            kernel,
            repeat: repeat.max(1),
        }
    }

    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }

    pub fn run(
        &self,
        out: &mut PixelBuffer,
        front: &PixelBuffer,
        back: &PixelBuffer,
    ) -> CompositeStats {
        let start = Instant::now();
        for _ in 0..self.repeat {
            composite_with(self.kernel, out, front, back);
        }
        let stats = CompositeStats {
            kernel: self.kernel,
            pixels: out.canvas().pixel_count(),
            repeats: self.repeat,
            elapsed: start.elapsed(),
        };
        tracing::debug!(
            kernel = self.kernel.name(),
            repeats = self.repeat,
            elapsed_ms = stats.elapsed.as_secs_f64() * 1000.0,
            "composite finished"
        );
        stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composite/kernel.rs"]
mod tests;
