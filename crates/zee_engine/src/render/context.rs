//! Graphics context lifecycle
//!
//! [`GraphicsContext`] owns the video subsystem, the window and the OpenGL
//! context, in that acquisition order. Resources are always released in
//! reverse order, and only the ones that were actually acquired:
//!
//! ```text
//! initialize:  video subsystem → window → render context → swap interval
//! shutdown:    render context  → window → video subsystem
//! ```
//!
//! A failed [`GraphicsContext::initialize`] drops the partially built context
//! before returning, so callers never observe a half-constructed one. The
//! `Drop` impl runs [`GraphicsContext::shutdown`], which makes release
//! unconditional on every exit path.

use std::ffi::c_void;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::{ConfigError, ContextConfig};
use crate::platform::{PlatformBinding, PlatformError, SwapInterval, WindowDescriptor};

/// Lifecycle stage of a [`GraphicsContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextState {
    /// Nothing acquired yet
    Uninitialized,
    /// Video subsystem running
    SubsystemReady,
    /// Window created
    WindowReady,
    /// Render context created and current
    ContextReady,
    /// Initialization failed part way
    Failed,
    /// Everything released
    ShutDown,
}

/// Initialization errors
///
/// Whichever stage failed, everything acquired before it has already been
/// released by the time the caller sees the error.
#[derive(Error, Debug)]
pub enum InitError {
    /// Configuration rejected before touching the platform
    #[error("Invalid context configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Video subsystem could not be started
    #[error("Video subsystem initialization failed: {0}")]
    SubsystemInitFailed(#[source] PlatformError),

    /// Window could not be created
    #[error("Window creation failed: {0}")]
    WindowCreationFailed(#[source] PlatformError),

    /// Render context could not be created
    #[error("Render context creation failed: {0}")]
    ContextCreationFailed(#[source] PlatformError),
}

/// Non-fatal problems raised during initialization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextWarning {
    /// Vertical sync was requested but could not be enabled
    VsyncUnavailable(PlatformError),
}

/// Window, render context and video subsystem with strict ownership
pub struct GraphicsContext<P: PlatformBinding> {
    platform: P,
    config: ContextConfig,
    video_subsystem_active: bool,
    window: Option<P::Window>,
    render_context: Option<P::RenderContext>,
    vsync_enabled: bool,
    state: ContextState,
    warnings: Vec<ContextWarning>,
}

impl<P: PlatformBinding> GraphicsContext<P> {
    /// Acquire the video subsystem, a window and a render context
    ///
    /// Vsync is requested last when `config.vsync` is set; failing to enable
    /// it only records [`ContextWarning::VsyncUnavailable`].
    pub fn initialize(platform: P, config: &ContextConfig) -> Result<Self, InitError> {
        config.validate()?;

        let mut context = Self {
            platform,
            config: config.clone(),
            video_subsystem_active: false,
            window: None,
            render_context: None,
            vsync_enabled: false,
            state: ContextState::Uninitialized,
            warnings: Vec::new(),
        };

        // On error the partial context is dropped here, which releases
        // whatever was acquired
        context.acquire().map_err(|err| {
            log::error!("{}", err);
            context.state = ContextState::Failed;
            err
        })?;

        Ok(context)
    }

    fn acquire(&mut self) -> Result<(), InitError> {
        log::info!("Initializing video subsystem...");
        self.platform
            .init_video_subsystem()
            .map_err(InitError::SubsystemInitFailed)?;
        self.video_subsystem_active = true;
        self.state = ContextState::SubsystemReady;

        log::info!(
            "Creating {}x{} window \"{}\"...",
            self.config.width,
            self.config.height,
            self.config.title
        );
        let descriptor = WindowDescriptor::from_config(&self.config);
        let window = self.window.insert(
            self.platform
                .create_window(&descriptor)
                .map_err(InitError::WindowCreationFailed)?,
        );
        self.state = ContextState::WindowReady;

        log::info!("Creating OpenGL {} context...", self.config.gl_version);
        let render_context = self
            .platform
            .create_render_context(window, self.config.gl_version)
            .map_err(InitError::ContextCreationFailed)?;
        self.render_context = Some(render_context);
        self.state = ContextState::ContextReady;

        if self.config.vsync {
            match self.platform.set_swap_interval(SwapInterval::VSync) {
                Ok(()) => self.vsync_enabled = true,
                Err(err) => {
                    log::warn!("Vsync unavailable, presenting unpaced: {}", err);
                    self.warnings.push(ContextWarning::VsyncUnavailable(err));
                }
            }
        } else if let Err(err) = self.platform.set_swap_interval(SwapInterval::Immediate) {
            log::debug!("Could not disable swap interval: {}", err);
        }

        log::info!("Graphics context ready (vsync: {})", self.vsync_enabled);
        Ok(())
    }

    /// Release the render context, the window and the video subsystem
    ///
    /// Idempotent: resources already released are skipped.
    pub fn shutdown(&mut self) {
        if let Some(render_context) = self.render_context.take() {
            log::debug!("Destroying render context");
            self.platform.destroy_render_context(render_context);
        }

        if let Some(window) = self.window.take() {
            log::debug!("Destroying window");
            self.platform.destroy_window(window);
        }

        if self.video_subsystem_active {
            log::debug!("Shutting down video subsystem");
            self.platform.shutdown_video_subsystem();
            self.video_subsystem_active = false;
        }

        self.vsync_enabled = false;
        if self.state != ContextState::Failed {
            if self.state != ContextState::ShutDown {
                log::info!("Graphics context shut down");
            }
            self.state = ContextState::ShutDown;
        }
    }

    /// Present the back buffer
    ///
    /// No-op once the context has been shut down.
    pub fn present(&mut self) {
        if self.render_context.is_none() {
            return;
        }
        if let Some(window) = self.window.as_mut() {
            self.platform.swap_buffers(window);
        }
    }

    /// Pump window events; true when the window system asked to close
    pub fn poll_events(&mut self) -> bool {
        match self.window.as_mut() {
            Some(window) => self.platform.poll_events(window),
            None => false,
        }
    }

    /// Platform clock
    pub fn elapsed(&self) -> Duration {
        self.platform.elapsed()
    }

    /// Block for `ms` milliseconds
    pub fn sleep_milliseconds(&mut self, ms: u64) {
        self.platform.sleep_milliseconds(ms);
    }

    /// Address of an OpenGL function, or null without a current context
    pub fn get_proc_address(&mut self, name: &str) -> *const c_void {
        if self.render_context.is_none() {
            return std::ptr::null();
        }
        match self.window.as_mut() {
            Some(window) => self.platform.get_proc_address(window, name),
            None => std::ptr::null(),
        }
    }

    /// Current lifecycle stage
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Whether presentation is paced by vertical sync
    pub fn vsync_enabled(&self) -> bool {
        self.vsync_enabled
    }

    /// Whether the video subsystem is running
    pub fn is_subsystem_active(&self) -> bool {
        self.video_subsystem_active
    }

    /// Whether a window is owned
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    /// Whether a render context is owned
    pub fn has_render_context(&self) -> bool {
        self.render_context.is_some()
    }

    /// Non-fatal problems seen during initialization
    pub fn warnings(&self) -> &[ContextWarning] {
        &self.warnings
    }

    /// Configuration the context was created from
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }
}

impl<P: PlatformBinding> Drop for GraphicsContext<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Source of OpenGL function pointers for application code
pub trait ProcAddressLoader {
    /// Address of `name`, or null when unavailable
    fn get_proc_address(&mut self, name: &str) -> *const c_void;
}

impl<P: PlatformBinding> ProcAddressLoader for GraphicsContext<P> {
    fn get_proc_address(&mut self, name: &str) -> *const c_void {
        GraphicsContext::get_proc_address(self, name)
    }
}
