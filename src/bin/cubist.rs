use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use cubist::{
    BackendKind, Canvas, CardSource, Clock, DurationMs, Engine, EngineConfig, ManualClock,
    NoopScrollLock, Rgba8, SectionId, SectionSource, TickOutcome, TimestampMs, create_backend,
};

#[derive(Parser, Debug)]
#[command(name = "cubist", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one cube transition and write every animation frame as a PNG.
    Demo(DemoArgs),
    /// Run the snapshot warm-up and dump each section's cached snapshot.
    Snapshots(SnapshotsArgs),
}

#[derive(Parser, Debug)]
struct DemoArgs {
    /// Output directory for frame PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Optional engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Section the transition starts from.
    #[arg(long, default_value = "home")]
    from: String,

    /// Section the transition navigates to.
    #[arg(long, default_value = "portfolio")]
    to: String,

    /// Frames per second of the tick loop.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(Parser, Debug)]
struct SnapshotsArgs {
    /// Output directory for snapshot PNGs.
    #[arg(long)]
    out: PathBuf,

    /// Optional engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Demo(args) => cmd_demo(args),
        Command::Snapshots(args) => cmd_snapshots(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let config: EngineConfig =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse config JSON")?;
    Ok(config)
}

/// Flat-card stand-ins for the six sections, one palette entry each.
fn demo_sources(canvas: Canvas) -> BTreeMap<SectionId, Box<dyn SectionSource>> {
    let palette: [(SectionId, Rgba8, Rgba8); 6] = [
        (
            SectionId::Home,
            Rgba8::opaque(16, 26, 58),
            Rgba8::opaque(240, 180, 60),
        ),
        (
            SectionId::Services,
            Rgba8::opaque(24, 52, 44),
            Rgba8::opaque(110, 220, 160),
        ),
        (
            SectionId::About,
            Rgba8::opaque(54, 30, 26),
            Rgba8::opaque(235, 130, 90),
        ),
        (
            SectionId::Portfolio,
            Rgba8::opaque(36, 24, 56),
            Rgba8::opaque(180, 120, 240),
        ),
        (
            SectionId::Tech,
            Rgba8::opaque(20, 40, 60),
            Rgba8::opaque(90, 180, 235),
        ),
        (
            SectionId::Contact,
            Rgba8::opaque(48, 44, 22),
            Rgba8::opaque(225, 210, 100),
        ),
    ];

    palette
        .into_iter()
        .map(|(id, base, accent)| {
            let src: Box<dyn SectionSource> = Box::new(CardSource::new(canvas, base, accent));
            (id, src)
        })
        .collect()
}

fn write_png(path: &Path, frame: &cubist::FrameRGBA) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let from = SectionId::parse(&args.from).with_context(|| "parse --from")?;
    let to = SectionId::parse(&args.to).with_context(|| "parse --to")?;
    if args.fps == 0 {
        anyhow::bail!("--fps must be > 0");
    }

    let canvas = config.canvas;
    let backend = create_backend(BackendKind::Cpu)?;
    let mut engine = Engine::new(config, backend, Box::new(NoopScrollLock))?;

    let clock = ManualClock::new(TimestampMs(0));
    let report = engine.warm_up(&demo_sources(canvas), &clock);
    eprintln!(
        "warm-up: {} captured, {} failed",
        report.captured.len(),
        report.failed.len()
    );

    engine.jump_to(from)?;
    let handle = engine
        .navigate_to_section(to, clock.now())?
        .context("navigation was dropped")?;

    let step = DurationMs(1000 / u64::from(args.fps).max(1));
    let mut frame_index = 0u32;
    loop {
        clock.advance(step);
        match engine.tick(clock.now())? {
            TickOutcome::Frame(frame) => {
                let path = args.out.join(format!("frame_{frame_index:04}.png"));
                write_png(&path, &frame)?;
                frame_index += 1;
            }
            TickOutcome::Finished { reached } => {
                eprintln!(
                    "reached {} after {} frames",
                    reached.as_str(),
                    frame_index
                );
                break;
            }
            TickOutcome::Idle => break,
        }
    }

    debug_assert!(handle.is_resolved());
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_snapshots(args: SnapshotsArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_deref())?;
    let canvas = config.canvas;
    let backend = create_backend(BackendKind::Cpu)?;
    let mut engine = Engine::new(config, backend, Box::new(NoopScrollLock))?;

    let clock = ManualClock::new(TimestampMs(0));
    let report = engine.warm_up(&demo_sources(canvas), &clock);
    eprintln!(
        "warm-up: {} captured, {} failed",
        report.captured.len(),
        report.failed.len()
    );

    for id in SectionId::ALL {
        let Some(record) = engine.session().snapshot(id) else {
            continue;
        };
        let frame = record.decode()?;
        let path = args.out.join(format!("{}.png", id.as_str()));
        write_png(&path, &frame)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
