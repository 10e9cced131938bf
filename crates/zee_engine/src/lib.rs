//! # Zee Engine
//!
//! Window and OpenGL context lifecycle management with a paced frame loop.
//!
//! ## Features
//!
//! - **Ordered Lifecycle**: video subsystem, window and render context are
//!   acquired in order and always released in reverse order
//! - **No Partial Contexts**: a failed initialization releases whatever it
//!   had acquired before returning the error
//! - **Frame Loop**: render/present cycles paced by vsync or a minimum frame
//!   interval, with cooperative cancellation between frames
//! - **Pluggable Platform**: GLFW for real windows, any [`platform::PlatformBinding`]
//!   for everything else
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zee_engine::prelude::*;
//!
//! struct MyApp;
//!
//! impl Application for MyApp {
//!     fn initialize(&mut self, loader: &mut dyn ProcAddressLoader) -> Result<(), AppError> {
//!         // Load GL function pointers, create GPU objects
//!         Ok(())
//!     }
//!
//!     fn render(&mut self, frame: &FrameInfo) -> Result<(), AppError> {
//!         // Draw the frame
//!         Ok(())
//!     }
//!
//!     fn cleanup(&mut self) {
//!         // Release GPU objects
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut app = MyApp;
//!     Engine::run(GlfwPlatform::new(), &config, &mut app, &|| false)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod platform;
pub mod render;

mod application;
mod engine;

pub use application::{AppError, Application};
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        core::config::{Config, ContextConfig, EngineConfig, FrameLoopConfig, GlVersion},
        platform::{GlfwPlatform, PlatformBinding},
        render::{
            FrameInfo, FrameLoop, GraphicsContext, ProcAddressLoader, RenderError, RunResult,
            StopReason, StopSignal,
        },
        AppError, Application, Engine, EngineError,
    };
}
