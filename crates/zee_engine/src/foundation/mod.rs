//! Foundation module - Core utilities and types
//!
//! - Frame timing driven by the platform clock
//! - Logging setup

pub mod time;
pub mod logging;
