//! Rendering core
//!
//! - [`GraphicsContext`]: ownership and ordered teardown of the video
//!   subsystem, window and OpenGL context
//! - [`FrameLoop`]: paced render/present cycles with cooperative cancellation

pub mod context;
pub mod frame_loop;

pub use context::{ContextState, ContextWarning, GraphicsContext, InitError, ProcAddressLoader};
pub use frame_loop::{
    FrameInfo, FrameLoop, LoopState, RenderCallback, RenderError, RunResult, StopReason, StopSignal,
};
