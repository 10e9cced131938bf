//! Frame loop
//!
//! Repeatedly renders and presents frames through a [`GraphicsContext`]
//! until a stop is requested or the render callback fails.
//!
//! Each iteration:
//! 1. stop checks (stop signal, frame limit, context state, window close)
//! 2. pacing sleep, when vsync is off and the loop paces itself
//! 3. render callback
//! 4. buffer swap
//!
//! Cancellation is only observed at step 1, never in the middle of a frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::context::{ContextState, GraphicsContext};
use crate::core::config::FrameLoopConfig;
use crate::foundation::time::FrameTimer;
use crate::platform::PlatformBinding;

/// Per-frame data handed to the render callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Zero-based index of the frame being rendered
    pub index: u64,
    /// Time since the previous frame started
    pub delta_time: Duration,
    /// Time since the loop started
    pub elapsed: Duration,
}

/// Errors that end a running loop
#[derive(Error, Debug)]
pub enum RenderError {
    /// The render callback reported a failure
    #[error("Render callback failed: {0}")]
    CallbackFailed(String),

    /// The context is not in a renderable state
    #[error("Graphics context is not ready (state: {0:?})")]
    ContextUnavailable(ContextState),
}

impl RenderError {
    /// Build a callback failure from any message
    pub fn callback(message: impl Into<String>) -> Self {
        Self::CallbackFailed(message.into())
    }
}

/// Draws into the current frame
pub trait RenderCallback {
    /// Render one frame; an error stops the loop
    fn render_frame(&mut self, frame: &FrameInfo) -> Result<(), RenderError>;
}

impl<F> RenderCallback for F
where
    F: FnMut(&FrameInfo) -> Result<(), RenderError>,
{
    fn render_frame(&mut self, frame: &FrameInfo) -> Result<(), RenderError> {
        self(frame)
    }
}

/// Cooperative cancellation, checked before every frame
pub trait StopSignal {
    /// True once the loop should stop
    fn should_stop(&self) -> bool;
}

impl<F> StopSignal for F
where
    F: Fn() -> bool,
{
    fn should_stop(&self) -> bool {
        self()
    }
}

impl StopSignal for AtomicBool {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl StopSignal for Arc<AtomicBool> {
    fn should_stop(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

/// Frame loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopState {
    /// Never run
    Idle,
    /// Inside [`FrameLoop::run`]
    Running,
    /// Ended on request
    Stopped,
    /// Ended by a render failure
    Faulted,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Stop signal, frame limit or window close
    Requested,
    /// The render callback failed
    RenderFailure,
}

/// Outcome of [`FrameLoop::run`]
#[derive(Debug)]
pub struct RunResult {
    /// Frames rendered and presented
    pub frames_rendered: u64,
    /// Why the loop ended
    pub stopped_reason: StopReason,
    /// The failure that ended the loop, if any
    pub error: Option<RenderError>,
    /// Platform time spent inside the loop
    pub elapsed: Duration,
}

/// Paced render/present loop
#[derive(Debug)]
pub struct FrameLoop {
    config: FrameLoopConfig,
    state: LoopState,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(FrameLoopConfig::default())
    }
}

impl FrameLoop {
    /// Create an idle loop
    pub fn new(config: FrameLoopConfig) -> Self {
        Self {
            config,
            state: LoopState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Loop configuration
    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }

    /// Run until `stop` is raised, the window closes, the frame limit is
    /// reached or `render` fails
    ///
    /// When the context has no vsync and a minimum frame interval is
    /// configured, consecutive frames start at least that interval apart.
    pub fn run<P, R, S>(&mut self, context: &mut GraphicsContext<P>, render: &mut R, stop: &S) -> RunResult
    where
        P: PlatformBinding,
        R: RenderCallback + ?Sized,
        S: StopSignal + ?Sized,
    {
        self.state = LoopState::Running;

        let start = context.elapsed();
        let mut timer = FrameTimer::new(start);
        let pacing = if context.vsync_enabled() {
            None
        } else {
            self.config.min_frame_interval()
        };
        let mut frames_rendered = 0u64;

        log::info!(
            "Starting frame loop (vsync: {}, min frame interval: {:?})",
            context.vsync_enabled(),
            pacing
        );

        let (stopped_reason, error) = loop {
            if stop.should_stop() {
                log::debug!("Stop requested after {} frames", frames_rendered);
                break (StopReason::Requested, None);
            }

            if self.config.max_frames.is_some_and(|max| frames_rendered >= max) {
                log::debug!("Frame limit of {} reached", frames_rendered);
                break (StopReason::Requested, None);
            }

            if context.state() != ContextState::ContextReady {
                let err = RenderError::ContextUnavailable(context.state());
                log::error!("{}", err);
                break (StopReason::RenderFailure, Some(err));
            }

            if context.poll_events() {
                log::info!("Window closed after {} frames", frames_rendered);
                break (StopReason::Requested, None);
            }

            if let Some(interval) = pacing {
                if let Some(wait) = timer.remaining_interval(context.elapsed(), interval) {
                    context.sleep_milliseconds(ceil_millis(wait));
                }
            }

            let now = context.elapsed();
            let delta_time = timer.begin_frame(now);
            let frame = FrameInfo {
                index: frames_rendered,
                delta_time,
                elapsed: now.saturating_sub(start),
            };

            if let Err(err) = render.render_frame(&frame) {
                log::error!("Frame {} failed: {}", frame.index, err);
                break (StopReason::RenderFailure, Some(err));
            }

            context.present();
            frames_rendered += 1;
        };

        self.state = match stopped_reason {
            StopReason::Requested => LoopState::Stopped,
            StopReason::RenderFailure => LoopState::Faulted,
        };

        let end = context.elapsed();
        log::info!(
            "Frame loop ended: {} frames, {:?}, {:.1} fps average",
            frames_rendered,
            stopped_reason,
            timer.average_fps(end)
        );

        RunResult {
            frames_rendered,
            stopped_reason,
            error,
            elapsed: end.saturating_sub(start),
        }
    }
}

fn ceil_millis(duration: Duration) -> u64 {
    let millis = duration.as_nanos().div_ceil(1_000_000);
    u64::try_from(millis).unwrap_or(u64::MAX)
}
