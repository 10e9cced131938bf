//! Core engine implementation

use crate::{
    application::{AppError, Application},
    core::config::{ConfigError, EngineConfig},
    platform::PlatformBinding,
    render::{FrameInfo, FrameLoop, GraphicsContext, InitError, RenderError, RunResult, StopSignal},
};
use thiserror::Error;

/// Main engine struct
///
/// Owns the graphics context and the frame loop. Dropping the engine
/// releases the context.
pub struct Engine<P: PlatformBinding> {
    /// Window, render context and video subsystem
    pub context: GraphicsContext<P>,

    /// Frame pacing loop
    pub frame_loop: FrameLoop,
}

impl<P: PlatformBinding> Engine<P> {
    /// Create a new engine instance
    pub fn new(platform: P, config: &EngineConfig) -> Result<Self, EngineError> {
        log::info!("Initializing engine...");
        config.validate()?;

        let context = GraphicsContext::initialize(platform, &config.context)?;
        let frame_loop = FrameLoop::new(config.frame_loop.clone());

        Ok(Self { context, frame_loop })
    }

    /// Run `app` until `stop` is raised, the window closes or rendering fails
    ///
    /// Initialization errors are returned as [`EngineError`]; the way the loop
    /// ended is reported in the [`RunResult`]. The context is shut down before
    /// this returns on every path.
    pub fn run<A, S>(platform: P, config: &EngineConfig, app: &mut A, stop: &S) -> Result<RunResult, EngineError>
    where
        A: Application + ?Sized,
        S: StopSignal + ?Sized,
    {
        let mut engine = Self::new(platform, config)?;

        app.initialize(&mut engine.context)
            .map_err(EngineError::ApplicationInit)?;

        log::info!("Starting main loop...");

        let mut render = |frame: &FrameInfo| -> Result<(), RenderError> {
            app.render(frame).map_err(|e| match e {
                AppError::Render(err) => err,
                other => RenderError::callback(other.to_string()),
            })
        };
        let result = engine.frame_loop.run(&mut engine.context, &mut render, stop);

        app.cleanup();
        engine.shutdown();

        log::info!("Engine shutdown complete");
        Ok(result)
    }

    /// Release the graphics context
    pub fn shutdown(&mut self) {
        self.context.shutdown();
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Graphics context could not be created
    #[error("Engine initialization failed: {0}")]
    Initialization(#[from] InitError),

    /// Application initialization failed
    #[error("Application initialization failed: {0}")]
    ApplicationInit(#[source] AppError),
}
