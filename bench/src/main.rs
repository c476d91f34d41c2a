use std::time::Duration;

use anyhow::Context as _;
use serde_json::json;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    front_width: u32,
    front_height: u32,
    offset: Option<usize>,
    warmup: u32,
    repeats: u32,
    composites: u32,
    seed: u64,
    json: bool,
}

#[derive(Clone, Debug)]
struct KernelRun {
    kernel: alphablend::Kernel,
    per_run: Vec<Duration>,
    digest: String,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.repeats == 0 || args.composites == 0 {
        anyhow::bail!("--repeats and --composites must be > 0");
    }

    let mut config = alphablend::BlendConfig {
        screen_width: args.width,
        screen_height: args.height,
        repeat: args.composites,
        ..alphablend::BlendConfig::default()
    };
    if args.front_width > args.width || args.front_height > args.height {
        anyhow::bail!(
            "front {}x{} does not fit the {}x{} screen",
            args.front_width,
            args.front_height,
            args.width,
            args.height
        );
    }
    config.front_offset = match args.offset {
        Some(offset) => offset,
        None => config.offset_at(
            (args.width - args.front_width) / 2,
            (args.height - args.front_height) / 2,
        ),
    };
    config.validate().context("validate bench config")?;

    let (front, back) = build_inputs(&config, &args)?;

    let mut kernels = vec![alphablend::Kernel::Scalar];
    let detected = alphablend::Kernel::detect();
    if detected != alphablend::Kernel::Scalar {
        kernels.push(detected);
    }

    eprintln!(
        "bench: {repeats} run(s) x {composites} composite(s) ({profile} build), screen={w}x{h}, front={fw}x{fh} @ {offset}, kernels={kernels:?}",
        repeats = args.repeats,
        composites = args.composites,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        w = args.width,
        h = args.height,
        fw = args.front_width,
        fh = args.front_height,
        offset = config.front_offset,
    );

    let mut runs = Vec::<KernelRun>::with_capacity(kernels.len());
    for kernel in kernels {
        runs.push(run_kernel(kernel, &config, &args, &front, &back)?);
    }

    let reference = &runs[0].digest;
    for run in &runs[1..] {
        if &run.digest != reference {
            anyhow::bail!(
                "{} output digest {} differs from scalar {}",
                run.kernel,
                run.digest,
                reference
            );
        }
    }

    report(&runs, &config, &args);
    Ok(())
}

fn run_kernel(
    kernel: alphablend::Kernel,
    config: &alphablend::BlendConfig,
    args: &BenchArgs,
    front: &alphablend::PixelBuffer,
    back: &alphablend::PixelBuffer,
) -> anyhow::Result<KernelRun> {
    let compositor = alphablend::Compositor::new(kernel, config.repeat);
    let mut out = alphablend::PixelBuffer::new(config.canvas(), config.alignment)
        .with_context(|| format!("allocate {kernel} output buffer"))?;

    for _ in 0..args.warmup {
        let _ = compositor.run(&mut out, front, back);
    }

    let mut per_run = Vec::with_capacity(args.repeats as usize);
    for i in 0..args.repeats {
        let stats = compositor.run(&mut out, front, back);
        per_run.push(stats.per_composite());
        if !args.json && i == 0 {
            eprintln!(
                "{kernel}: first run {:.3}ms per composite",
                stats.per_composite().as_secs_f64() * 1000.0
            );
        }
    }

    Ok(KernelRun {
        kernel,
        per_run,
        digest: sha256_hex(out.as_bytes()),
    })
}

/// Deterministic front/back pair: the front covers a centered window with every alpha value, the
/// back fills the screen.
fn build_inputs(
    config: &alphablend::BlendConfig,
    args: &BenchArgs,
) -> anyhow::Result<(alphablend::PixelBuffer, alphablend::PixelBuffer)> {
    let mut rng = SplitMix64(args.seed);

    let front_canvas = alphablend::Canvas::new(args.front_width, args.front_height);
    let mut front_bytes = vec![0u8; front_canvas.byte_len()?];
    for (i, px) in front_bytes.chunks_exact_mut(4).enumerate() {
        let v = rng.next().to_le_bytes();
        px.copy_from_slice(&[v[0], v[1], v[2], (i % 256) as u8]);
    }
    let front = alphablend::place(
        &front_bytes,
        front_canvas,
        config.front_offset,
        config.canvas(),
        config.alignment,
    )
    .context("place bench foreground")?;

    let mut back = alphablend::PixelBuffer::new(config.canvas(), config.alignment)?;
    for px in back.as_bytes_mut().chunks_exact_mut(4) {
        let v = rng.next().to_le_bytes();
        px.copy_from_slice(&[v[0], v[1], v[2], 255]);
    }

    Ok((front, back))
}

struct SplitMix64(u64);

impl SplitMix64 {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 800,
        height: 600,
        front_width: 300,
        front_height: 200,
        offset: None,
        warmup: 1,
        repeats: 50,
        composites: 100,
        seed: 1,
        json: false,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--front-width" => out.front_width = parse_u32(args.next(), "--front-width")?,
            "--front-height" => out.front_height = parse_u32(args.next(), "--front-height")?,
            "--offset" => out.offset = Some(parse_usize(args.next(), "--offset")?),
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--composites" => out.composites = parse_u32(args.next(), "--composites")?,
            "--seed" => out.seed = parse_u64(args.next(), "--seed")?,
            "--json" => out.json = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"alphablend-bench

Composites a synthetic front/back pair with every available kernel, checks that the outputs
match, and reports p50/p90/p99 time per composite.

Usage:
  cargo run -q --release
  cargo run -q --release -- --repeats 200 --composites 10
  cargo run -q --release -- --width 1920 --height 1080 --json

Args:
  --width N         screen width (default 800)
  --height N        screen height (default 600)
  --front-width N   foreground width (default 300)
  --front-height N  foreground height (default 200)
  --offset N        foreground pixel offset (default: centered)
  --warmup N        untimed runs per kernel (default 1)
  --repeats N       timed runs per kernel (default 50)
  --composites N    composites per run (default 100)
  --seed N          input generator seed (default 1)
  --json            print the summary as JSON on stdout
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_u64(v: Option<String>, flag: &str) -> anyhow::Result<u64> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u64>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn parse_usize(v: Option<String>, flag: &str) -> anyhow::Result<usize> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<usize>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let n = sorted.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    sorted[rank - 1]
}

fn report(runs: &[KernelRun], config: &alphablend::BlendConfig, args: &BenchArgs) {
    fn ms(d: Duration) -> f64 {
        d.as_secs_f64() * 1000.0
    }

    let pixels = config.pixel_count() as f64;
    let mut rows = Vec::with_capacity(runs.len());
    for run in runs {
        let mut v = run.per_run.clone();
        v.sort_by_key(|d| d.as_nanos());
        let p50 = percentile(&v, 0.50);
        let p90 = percentile(&v, 0.90);
        let p99 = percentile(&v, 0.99);
        let mpix_per_s = if p50.is_zero() {
            0.0
        } else {
            pixels / p50.as_secs_f64() / 1.0e6
        };
        rows.push(json!({
            "kernel": run.kernel,
            "p50_ms": ms(p50),
            "p90_ms": ms(p90),
            "p99_ms": ms(p99),
            "mpix_per_s": mpix_per_s,
            "sha256": run.digest,
        }));
        if !args.json {
            eprintln!(
                "  {name:8} p50={p50:>9.3}ms  p90={p90:>9.3}ms  p99={p99:>9.3}ms  {mpix_per_s:>9.1} Mpx/s",
                name = run.kernel.name(),
                p50 = ms(p50),
                p90 = ms(p90),
                p99 = ms(p99),
            );
        }
    }

    if args.json {
        let summary = json!({
            "screen": config.canvas(),
            "front_offset": config.front_offset,
            "repeats": args.repeats,
            "composites_per_run": args.composites,
            "kernels": rows,
        });
        println!("{summary:#}");
    } else {
        eprintln!("outputs match: sha256={}", runs[0].digest);
    }
}
