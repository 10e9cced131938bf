//! Platform binding layer
//!
//! [`PlatformBinding`] is the capability surface the graphics context and the
//! frame loop consume from the host windowing library: subsystem start/stop,
//! window and render-context creation, buffer swaps, event polling, a
//! monotonic clock and sleeping.
//!
//! ```text
//! ┌──────────────────────────────┐
//! │ FrameLoop / GraphicsContext  │
//! └──────────────┬───────────────┘
//!                │ PlatformBinding
//!      ┌─────────▼─────────┐
//!      │ GlfwPlatform      │ ← real windows (glfw_backend.rs)
//!      │ RecordingPlatform │ ← tests only (testing.rs)
//!      └───────────────────┘
//! ```
//!
//! Window and render-context handles are associated types. They are moved
//! into the `destroy_*` calls, so a binding can never be asked to release the
//! same handle twice.

pub mod glfw_backend;

#[cfg(test)]
pub(crate) mod testing;

use bitflags::bitflags;
use std::ffi::c_void;
use std::time::Duration;
use thiserror::Error;

use crate::core::config::{ContextConfig, GlVersion};

pub use glfw_backend::GlfwPlatform;

/// Error reported by the host windowing library
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct PlatformError {
    /// Which platform call failed
    pub operation: &'static str,
    /// Description reported by the host library
    pub message: String,
}

impl PlatformError {
    /// Create a new platform error
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

bitflags! {
    /// Window creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WindowFlags: u32 {
        /// Window is visible after creation
        const SHOWN = 1 << 0;
        /// Window carries an OpenGL context
        const OPENGL = 1 << 1;
    }
}

/// Initial window placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Centered on the primary display
    Centered,
}

/// Everything needed to create a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowDescriptor {
    /// Title bar text
    pub title: String,
    /// Initial placement
    pub position: WindowPosition,
    /// Client area width
    pub width: u32,
    /// Client area height
    pub height: u32,
    /// Creation flags
    pub flags: WindowFlags,
    /// Context version the window must be able to host
    pub gl_version: GlVersion,
}

impl WindowDescriptor {
    /// Centered, shown OpenGL window described by a context configuration
    pub fn from_config(config: &ContextConfig) -> Self {
        Self {
            title: config.title.clone(),
            position: WindowPosition::Centered,
            width: config.width,
            height: config.height,
            flags: WindowFlags::SHOWN | WindowFlags::OPENGL,
            gl_version: config.gl_version,
        }
    }
}

/// Buffer swap interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapInterval {
    /// Swap immediately (interval 0)
    Immediate,
    /// Wait for vertical blank (interval 1)
    VSync,
}

impl SwapInterval {
    /// Numeric interval as understood by the windowing library
    pub fn as_interval(self) -> u32 {
        match self {
            Self::Immediate => 0,
            Self::VSync => 1,
        }
    }
}

/// Capabilities consumed from the host windowing and graphics library
///
/// The binding is driven from a single thread. Implementations should not
/// assume any call order beyond what [`crate::render::GraphicsContext`]
/// guarantees: the subsystem is initialized before any window exists, a
/// render context only exists while its window does, and everything is
/// released in reverse order.
pub trait PlatformBinding {
    /// Owned window handle
    type Window;
    /// Owned render context handle
    type RenderContext;

    /// Start the video subsystem
    fn init_video_subsystem(&mut self) -> PlatformResult<()>;

    /// Create a window
    fn create_window(&mut self, descriptor: &WindowDescriptor) -> PlatformResult<Self::Window>;

    /// Create a render context bound to `window` and make it current
    fn create_render_context(
        &mut self,
        window: &mut Self::Window,
        version: GlVersion,
    ) -> PlatformResult<Self::RenderContext>;

    /// Set the swap interval for the current context
    fn set_swap_interval(&mut self, interval: SwapInterval) -> PlatformResult<()>;

    /// Present the back buffer
    fn swap_buffers(&mut self, window: &mut Self::Window);

    /// Process pending window events; returns true when the window was asked to close
    fn poll_events(&mut self, window: &mut Self::Window) -> bool;

    /// Monotonic time since the binding was created
    fn elapsed(&self) -> Duration;

    /// Block the calling thread
    fn sleep_milliseconds(&mut self, ms: u64);

    /// Address of an OpenGL entry point in the current context, or null
    fn get_proc_address(&mut self, window: &mut Self::Window, name: &str) -> *const c_void;

    /// Release a render context
    fn destroy_render_context(&mut self, context: Self::RenderContext);

    /// Release a window
    fn destroy_window(&mut self, window: Self::Window);

    /// Stop the video subsystem
    fn shutdown_video_subsystem(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_config() {
        let config = ContextConfig::new("Zee1").with_size(800, 600).with_gl_version(3, 3);
        let descriptor = WindowDescriptor::from_config(&config);

        assert_eq!(descriptor.title, "Zee1");
        assert_eq!(descriptor.position, WindowPosition::Centered);
        assert_eq!((descriptor.width, descriptor.height), (800, 600));
        assert_eq!(descriptor.flags, WindowFlags::SHOWN | WindowFlags::OPENGL);
        assert_eq!(descriptor.gl_version, GlVersion::new(3, 3));
    }

    #[test]
    fn test_swap_interval_values() {
        assert_eq!(SwapInterval::Immediate.as_interval(), 0);
        assert_eq!(SwapInterval::VSync.as_interval(), 1);
    }

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::new("create_window", "no display");
        assert_eq!(err.to_string(), "create_window failed: no display");
    }
}
