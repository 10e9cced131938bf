//! Zee1 demo
//!
//! Opens a window, draws the placeholder triangle and keeps presenting frames
//! until the window is closed, Ctrl-C is pressed or `--seconds` runs out.

mod triangle;

use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use triangle::TriangleApp;
use zee_engine::core::config::ConfigError;
use zee_engine::foundation::logging;
use zee_engine::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "zee", version, about = "Open a Zee1 window and draw a triangle")]
struct Args {
    /// Window width in pixels
    #[arg(short, long)]
    width: Option<u32>,

    /// Window height in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Window title
    #[arg(long)]
    title: Option<String>,

    /// Engine configuration file (.toml or .ron)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Present frames without waiting for the display refresh
    #[arg(long)]
    no_vsync: bool,

    /// Minimum milliseconds between frames when vsync is off; 0 disables pacing
    #[arg(long)]
    min_frame_ms: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    seconds: Option<f64>,

    /// Log filter, e.g. `debug` or `zee_engine=trace`
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    /// File settings first, then command line overrides
    fn engine_config(&self) -> Result<EngineConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load_from_file(path)?,
            None => EngineConfig::default(),
        };

        if let Some(width) = self.width {
            config.context.width = width;
        }
        if let Some(height) = self.height {
            config.context.height = height;
        }
        if let Some(title) = &self.title {
            config.context.title.clone_from(title);
        }
        if self.no_vsync {
            config.context.vsync = false;
        }
        if let Some(ms) = self.min_frame_ms {
            config.frame_loop.min_frame_interval_ms = (ms > 0).then_some(ms);
        }

        config.validate()?;
        Ok(config)
    }

    fn run_duration(&self) -> Option<Duration> {
        self.seconds
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Instant at which `--seconds` runs out; none when unset or unrepresentable
    fn deadline(&self, now: Instant) -> Option<Instant> {
        self.run_duration().and_then(|limit| now.checked_add(limit))
    }
}

#[derive(Error, Debug)]
enum LaunchError {
    #[error("rendering stopped after {frames} frames: {source}")]
    RenderFailed {
        frames: u64,
        #[source]
        source: RenderError,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    match args.log_level.as_deref() {
        Some(filter) => logging::init_with_filter(filter),
        None => logging::init(),
    }

    let config = args.engine_config()?;
    log::info!(
        "Starting Zee1: {}x{} \"{}\" (vsync {})",
        config.context.width,
        config.context.height,
        config.context.title,
        if config.context.vsync { "on" } else { "off" }
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        ctrlc::set_handler(move || {
            log::info!("Interrupt received, stopping after the current frame");
            interrupted.store(true, Ordering::Release);
        })?;
    }

    let deadline = args.deadline(Instant::now());
    let should_stop = || {
        interrupted.load(Ordering::Acquire) || deadline.is_some_and(|at| Instant::now() >= at)
    };

    let mut app = TriangleApp::new();
    let result = Engine::run(GlfwPlatform::new(), &config, &mut app, &should_stop)?;

    log::info!(
        "Rendered {} frames in {:.2}s ({:?})",
        result.frames_rendered,
        result.elapsed.as_secs_f64(),
        result.stopped_reason
    );

    match result.error {
        Some(source) => Err(LaunchError::RenderFailed {
            frames: result.frames_rendered,
            source,
        }
        .into()),
        None => Ok(()),
    }
}
