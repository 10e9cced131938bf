//! Application trait and lifecycle management

use crate::render::{FrameInfo, ProcAddressLoader, RenderError};
use thiserror::Error;

/// Application lifecycle trait
///
/// Implement this trait to drive a window with [`crate::Engine::run`].
pub trait Application {
    /// Initialize the application
    ///
    /// Called once after the graphics context is ready and current. Load
    /// OpenGL function pointers through `loader` and create GPU objects here.
    fn initialize(&mut self, loader: &mut dyn ProcAddressLoader) -> Result<(), AppError>;

    /// Render one frame
    ///
    /// Called every frame before the buffer swap. Returning an error ends the
    /// frame loop; the last presented frame stays on screen.
    fn render(&mut self, frame: &FrameInfo) -> Result<(), AppError>;

    /// Cleanup the application
    ///
    /// Called when the loop has ended, while the context is still current.
    /// Not called when [`Application::initialize`] failed.
    fn cleanup(&mut self);
}

/// Application-level errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Rendering error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Graphics API setup or call failed
    #[error("Graphics error: {0}")]
    Graphics(String),

    /// Custom application error
    #[error("Application error: {0}")]
    Custom(String),
}
