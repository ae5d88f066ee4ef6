use std::io::BufRead as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layercam::filters::schema::FALLBACK_FILE;
use layercam::{
    Canvas, ConfigStore as _, ConfigWatcher, FfmpegCameraSink, FfmpegCameraSinkOpts,
    FfmpegCaptureOpts, FfmpegCaptureSource, FileConfigStore, FilterRegistry, FilterSpec, Fps,
    FrameSink, FrameSource, LoopControl, MainLoop, MainLoopOpts, MismatchPolicy, NullSink,
    StillImageSource, TestPatternSource, WatcherOpts,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_CANVAS: (u32, u32) = (640, 480);

#[derive(Parser, Debug)]
#[command(name = "layercam", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered filter types.
    Filters,
    /// Print a filter type's parameter schema as JSON.
    Schema {
        /// Filter type name.
        name: String,
    },
    /// Print a filter spec with every parameter defaulted.
    Defaults {
        /// Filter type name.
        name: String,
    },
    /// Run the compositor until stopped (type `p` + Enter to pause/resume, `q` + Enter to quit).
    Run(RunArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Configuration JSON; edits are picked up while running.
    #[arg(long)]
    config: PathBuf,

    /// Capture device, or `test-pattern` to run without a camera.
    #[arg(long, default_value = "test-pattern")]
    input: String,

    /// ffmpeg demuxer for the capture device (e.g. `v4l2`).
    #[arg(long)]
    input_format: Option<String>,

    /// Image used by `foreground` layers.
    #[arg(long)]
    foreground: Option<PathBuf>,

    /// Output device (e.g. a v4l2loopback node). Frames are discarded when omitted.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Target frame rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Configuration poll interval in milliseconds.
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,

    /// Exit on a frame shape mismatch instead of skipping the frame.
    #[arg(long, default_value_t = false)]
    stop_on_mismatch: bool,

    /// Run independent layers on the rayon pool.
    #[arg(long, default_value_t = false)]
    parallel_layers: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = FilterRegistry::with_builtin_filters()?;
    match cli.cmd {
        Command::Filters => {
            for name in registry.names() {
                println!("{name}");
            }
            Ok(())
        }
        Command::Schema { name } => {
            let schema = registry.schema_of(&name)?;
            println!("{}", serde_json::to_string_pretty(schema)?);
            Ok(())
        }
        Command::Defaults { name } => {
            let spec = FilterSpec::with_defaults(&registry, &name)?;
            println!("{}", serde_json::to_string(&spec)?);
            Ok(())
        }
        Command::Run(args) => cmd_run(args, registry),
    }
}

fn cmd_run(args: RunArgs, registry: FilterRegistry) -> anyhow::Result<()> {
    let fps = Fps::new(args.fps, 1)?;
    let store = FileConfigStore::new(&args.config);
    let declared = store
        .load_configuration()
        .with_context(|| format!("load config '{}'", args.config.display()))?
        .canvas()?;
    let canvas = match declared {
        Some(c) => c,
        None => Canvas::new(DEFAULT_CANVAS.0, DEFAULT_CANVAS.1)?,
    };

    let foreground = foreground_source(args.foreground.as_deref(), canvas)?;
    let watcher = ConfigWatcher::bootstrap(store, Arc::new(registry), args.parallel_layers)
        .with_context(|| format!("build pipeline from '{}'", args.config.display()))?
        .with_foreground_available(foreground.is_some());
    let handle = watcher.handle();
    if foreground.is_none() && handle.load().needs_foreground() {
        anyhow::bail!(
            "'{}' has a foreground layer; pass --foreground or provide {FALLBACK_FILE}",
            args.config.display()
        );
    }
    let control = Arc::new(LoopControl::new());

    let input: Box<dyn FrameSource> = if args.input == "test-pattern" {
        Box::new(TestPatternSource::new(canvas))
    } else {
        Box::new(FfmpegCaptureSource::spawn(FfmpegCaptureOpts {
            device: PathBuf::from(&args.input),
            input_format: args.input_format.clone(),
            canvas,
            fps,
        })?)
    };
    let sink: Box<dyn FrameSink> = match &args.output {
        Some(path) => Box::new(FfmpegCameraSink::new(FfmpegCameraSinkOpts::v4l2(path))),
        None => Box::new(NullSink),
    };

    let mut main_loop = MainLoop::new(
        input,
        sink,
        handle,
        Arc::clone(&control),
        MainLoopOpts {
            fps,
            on_shape_mismatch: if args.stop_on_mismatch {
                MismatchPolicy::Stop
            } else {
                MismatchPolicy::SkipFrame
            },
            max_frames: args.frames,
            ..MainLoopOpts::default()
        },
    );
    if let Some(fg) = foreground {
        main_loop = main_loop.with_foreground(fg);
    }

    let watcher_thread = watcher.spawn(
        WatcherOpts {
            interval: Duration::from_millis(args.poll_ms.max(1)),
        },
        Arc::clone(&control),
    );
    spawn_stdin_controls(Arc::clone(&control));

    let stats = main_loop.run();
    control.stop();
    if watcher_thread.join().is_err() {
        tracing::warn!("config watcher thread panicked");
    }
    let stats = stats?;
    eprintln!(
        "produced {} frames ({} skipped, {} over budget)",
        stats.frames_produced, stats.frames_skipped, stats.over_budget
    );
    Ok(())
}

fn foreground_source(
    explicit: Option<&Path>,
    canvas: Canvas,
) -> anyhow::Result<Option<Box<dyn FrameSource>>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let fallback = PathBuf::from(FALLBACK_FILE);
            if !fallback.is_file() {
                return Ok(None);
            }
            fallback
        }
    };
    let source = StillImageSource::open_resized(&path, canvas)
        .with_context(|| format!("load foreground '{}'", path.display()))?;
    Ok(Some(Box::new(source)))
}

fn spawn_stdin_controls(control: Arc<LoopControl>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match line.trim() {
                "p" | "pause" => {
                    let paused = control.toggle_pause();
                    tracing::info!(paused, "toggled pause");
                }
                "q" | "quit" => {
                    control.stop();
                    break;
                }
                "" => {}
                other => tracing::warn!(command = other, "unknown command (use p or q)"),
            }
        }
    });
}
