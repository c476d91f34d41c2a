use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "alphablend", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a foreground over a background and write the result as a PNG.
    Frame(FrameArgs),
    /// Print the effective configuration and the kernel this CPU selects.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Foreground image, placed at the configured offset.
    #[arg(long)]
    front: PathBuf,

    /// Background image, already at screen size.
    #[arg(long)]
    back: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Engine configuration JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Compositing kernel.
    #[arg(long, value_enum, default_value_t = KernelChoice::Auto)]
    kernel: KernelChoice,

    /// Override the configured repeat count (benchmarking).
    #[arg(long)]
    repeat: Option<u32>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Engine configuration JSON. Defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KernelChoice {
    Auto,
    Scalar,
    Avx2,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<alphablend::BlendConfig> {
    let Some(path) = path else {
        return Ok(alphablend::BlendConfig::default());
    };
    alphablend::BlendConfig::from_json_file(path)
        .with_context(|| format!("load config '{}'", path.display()))
}

fn pick_kernel(choice: KernelChoice) -> anyhow::Result<alphablend::Kernel> {
    let kernel = match choice {
        KernelChoice::Auto => alphablend::Kernel::detect(),
        KernelChoice::Scalar => alphablend::Kernel::Scalar,
        KernelChoice::Avx2 => alphablend::Kernel::Avx2,
    };
    if !kernel.is_supported() {
        anyhow::bail!("kernel '{kernel}' is not supported on this CPU");
    }
    Ok(kernel)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut config = read_config(args.config.as_deref())?;
    if let Some(repeat) = args.repeat {
        config.repeat = repeat;
    }
    config.validate()?;

    let kernel = pick_kernel(args.kernel)?;
    let (front, back) = alphablend::load_images(&config, &args.front, &args.back)?;

    let mut out = alphablend::PixelBuffer::new(config.canvas(), config.alignment)?;
    let stats = alphablend::Compositor::new(kernel, config.repeat).run(&mut out, &front, &back);
    tracing::info!(
        kernel = %stats.kernel,
        repeats = stats.repeats,
        total_ms = stats.elapsed.as_secs_f64() * 1000.0,
        per_composite_ms = stats.per_composite().as_secs_f64() * 1000.0,
        "composited {} pixels",
        stats.pixels
    );

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        out.as_bytes(),
        out.width(),
        out.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let kernel = alphablend::Kernel::detect();

    let report = serde_json::json!({
        "config": config,
        "kernel": kernel,
        "buffer_bytes": config.buffer_len()?,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
