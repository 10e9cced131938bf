//! # Core Engine Module
//!
//! Shared configuration types used by the platform layer, the graphics
//! context and the frame loop.

pub mod config;

pub use config::{
    Config,
    ConfigError,
    ContextConfig,
    EngineConfig,
    FrameLoopConfig,
    GlVersion,
};
