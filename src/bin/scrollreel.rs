use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollreel::{
    ContainerMetrics, CpuSurface, DirFetcher, FramePlayer, MemoryPage, PlayerConfig, PlayerState,
    ScrollDisposition, Viewport, frame_id,
};

#[derive(Parser, Debug)]
#[command(name = "scrollreel", version)]
struct Cli {
    /// Log player lifecycle events at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the frame shown at a scroll offset as a PNG.
    Frame(FrameArgs),
    /// Load every frame and print a JSON load report.
    Probe(ProbeArgs),
}

#[derive(Parser, Debug)]
struct SourceArgs {
    /// Site root the frame URLs are resolved against.
    #[arg(long)]
    frames: PathBuf,

    /// Player configuration JSON (defaults when omitted).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Document scroll offset.
    #[arg(long, allow_hyphen_values = true)]
    scroll: f64,

    /// Viewport width (logical pixels).
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height (logical pixels).
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Document offset of the scroll-tracking container.
    #[arg(long, default_value_t = 0.0)]
    container_top: f64,

    /// Height of the scroll-tracking container.
    #[arg(long, default_value_t = 3000.0)]
    container_height: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(serde::Serialize)]
struct ProbeReport {
    total: usize,
    loaded: usize,
    failed: usize,
    failed_frames: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Probe(args) => cmd_probe(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    match path {
        Some(p) => PlayerConfig::from_path(p)
            .with_context(|| format!("load player config '{}'", p.display())),
        None => Ok(PlayerConfig::default()),
    }
}

fn mount(
    config: PlayerConfig,
    viewport: Viewport,
    container: ContainerMetrics,
) -> anyhow::Result<FramePlayer<MemoryPage<CpuSurface>>> {
    let affordances = config.affordances.clone();
    let page = MemoryPage::new(viewport)
        .with_surface(config.canvas_id.clone(), CpuSurface::new())
        .with_container(config.scroll_container.clone(), container)
        .with_element(affordances.loading)
        .with_element(affordances.loading_progress)
        .with_element(affordances.scroll_hint)
        .with_element(affordances.scroll_progress);
    FramePlayer::mount(config, page)?
        .ok_or_else(|| anyhow::anyhow!("display surface missing from page"))
}

fn load_all(
    player: &mut FramePlayer<MemoryPage<CpuSurface>>,
    root: &Path,
) -> anyhow::Result<()> {
    let fetcher = Arc::new(DirFetcher::new(root));
    let root = fetcher.root().display().to_string();
    let queue = player.start_loading(fetcher);
    tracing::debug!(%root, frames = queue.remaining(), "loading frames");
    for outcome in queue {
        player.on_frame_settled(outcome);
    }
    if player.state() != PlayerState::Ready {
        anyhow::bail!("frame loading ended before every frame settled");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(args.source.config.as_deref())?;
    let viewport = Viewport::new(args.width, args.height).with_device_pixel_ratio(args.dpr);
    let container = ContainerMetrics {
        top: args.container_top,
        height: args.container_height,
    };
    let mut player = mount(config, viewport, container)?;
    load_all(&mut player, &args.source.frames)?;

    if player.on_scroll(args.scroll) == ScrollDisposition::Scheduled {
        player.on_animation_frame();
    }
    let index = player.current_frame();
    if !player.frames().is_loaded(index) {
        tracing::warn!(index, "selected frame did not load; canvas keeps the previous frame");
    }

    player.surface().save_png(&args.out)?;
    let frame_number = player.frames().range().frame_number(index).unwrap_or_default();
    println!("frame {index} ({})", frame_id(frame_number));
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let config = load_config(args.source.config.as_deref())?;
    let mut player = mount(
        config,
        Viewport::new(1.0, 1.0),
        ContainerMetrics {
            top: 0.0,
            height: 1.0,
        },
    )?;
    load_all(&mut player, &args.source.frames)?;

    let progress = player.progress();
    let report = ProbeReport {
        total: progress.total,
        loaded: progress.loaded,
        failed: progress.failed,
        failed_frames: player
            .frames()
            .failed_frames()
            .into_iter()
            .map(frame_id)
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
