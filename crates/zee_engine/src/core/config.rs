//! # Engine Configuration
//!
//! Configuration for the graphics context and the frame loop. Both halves are
//! grouped under [`EngineConfig`], which can be persisted as TOML or RON
//! through the [`Config`] trait.
//!
//! Every type here validates itself before any platform resource is touched,
//! so a bad value never results in a half-created window.

use serde::{Serialize, Deserialize};
use std::time::Duration;

pub use crate::config::{Config, ConfigError};

/// Requested OpenGL context version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GlVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl GlVersion {
    /// Create a new version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Whether a context of version `self` can serve a request for `requested`
    pub fn satisfies(self, requested: Self) -> bool {
        self >= requested
    }
}

impl Default for GlVersion {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// # Graphics Context Configuration
///
/// Describes the window and OpenGL context to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Whether to request vertical sync
    pub vsync: bool,
    /// Requested OpenGL version
    pub gl_version: GlVersion,
}

impl ContextConfig {
    /// Create a configuration with the given title and default everything else
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set window size
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set requested OpenGL version
    pub fn with_gl_version(mut self, major: u32, minor: u32) -> Self {
        self.gl_version = GlVersion::new(major, minor);
        self
    }

    /// Enable or disable vertical sync
    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Check title and dimensions
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "title",
                reason: "window title must not be empty".to_string(),
            });
        }
        if self.width == 0 {
            return Err(ConfigError::Invalid {
                field: "width",
                reason: "window width must be positive".to_string(),
            });
        }
        if self.height == 0 {
            return Err(ConfigError::Invalid {
                field: "height",
                reason: "window height must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            title: "Zee1".to_string(),
            width: 1024,
            height: 768,
            vsync: true,
            gl_version: GlVersion::default(),
        }
    }
}

/// # Frame Loop Configuration
///
/// `min_frame_interval_ms` is only honored when vsync is unavailable or
/// disabled. `None` declares that something outside the loop paces frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// Minimum time between frame starts, in milliseconds
    pub min_frame_interval_ms: Option<u64>,
    /// Stop after this many presented frames
    pub max_frames: Option<u64>,
}

impl FrameLoopConfig {
    /// Set the minimum frame interval
    pub fn with_min_frame_interval(mut self, interval: Duration) -> Self {
        self.min_frame_interval_ms = Some(u64::try_from(interval.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Declare that frames are paced externally
    pub fn externally_paced(mut self) -> Self {
        self.min_frame_interval_ms = None;
        self
    }

    /// Stop after a fixed number of frames
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// Minimum frame interval as a duration, if the loop paces itself
    pub fn min_frame_interval(&self) -> Option<Duration> {
        self.min_frame_interval_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            min_frame_interval_ms: Some(16),
            max_frames: None,
        }
    }
}

/// # Engine Configuration
///
/// Top-level configuration loaded by applications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window and context settings
    pub context: ContextConfig,
    /// Frame pacing settings
    pub frame_loop: FrameLoopConfig,
}

impl EngineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.context.validate()
    }
}

impl Config for EngineConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_window() {
        let config = ContextConfig::default();
        assert_eq!(config.title, "Zee1");
        assert_eq!((config.width, config.height), (1024, 768));
        assert_eq!(config.gl_version, GlVersion::new(2, 1));
        assert!(config.vsync);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let empty_title = ContextConfig::new("   ");
        assert!(matches!(empty_title.validate(), Err(ConfigError::Invalid { field: "title", .. })));

        let zero_width = ContextConfig::new("Zee1").with_size(0, 600);
        assert!(matches!(zero_width.validate(), Err(ConfigError::Invalid { field: "width", .. })));

        let zero_height = ContextConfig::new("Zee1").with_size(800, 0);
        assert!(matches!(zero_height.validate(), Err(ConfigError::Invalid { field: "height", .. })));
    }

    #[test]
    fn test_gl_version_ordering() {
        assert!(GlVersion::new(2, 1).satisfies(GlVersion::new(2, 1)));
        assert!(GlVersion::new(3, 0).satisfies(GlVersion::new(2, 1)));
        assert!(GlVersion::new(4, 6).satisfies(GlVersion::new(3, 3)));
        assert!(!GlVersion::new(2, 0).satisfies(GlVersion::new(2, 1)));
        assert!(!GlVersion::new(1, 5).satisfies(GlVersion::new(2, 0)));
        assert_eq!(GlVersion::new(3, 3).to_string(), "3.3");
    }

    #[test]
    fn test_frame_interval() {
        let config = FrameLoopConfig::default();
        assert_eq!(config.min_frame_interval(), Some(Duration::from_millis(16)));

        let paced = FrameLoopConfig::default().with_min_frame_interval(Duration::from_millis(33));
        assert_eq!(paced.min_frame_interval_ms, Some(33));

        let external = FrameLoopConfig::default().externally_paced();
        assert_eq!(external.min_frame_interval(), None);

        let zero = FrameLoopConfig { min_frame_interval_ms: Some(0), max_frames: None };
        assert_eq!(zero.min_frame_interval(), None);
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zee.toml");

        let config = EngineConfig {
            context: ContextConfig::new("Round Trip").with_size(640, 480).with_vsync(false),
            frame_loop: FrameLoopConfig::default().with_max_frames(120),
        };
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zee.ron");

        let config = EngineConfig {
            context: ContextConfig::new("Ron").with_gl_version(3, 3),
            frame_loop: FrameLoopConfig::default().externally_paced(),
        };
        config.save_to_file(&path).unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "[context]\nwidth = 1920\nheight = 1080\n").unwrap();

        let loaded = EngineConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.context.width, 1920);
        assert_eq!(loaded.context.height, 1080);
        assert_eq!(loaded.context.title, "Zee1");
        assert_eq!(loaded.frame_loop, FrameLoopConfig::default());
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zee.yaml");

        let err = EngineConfig::default().save_to_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
        assert!(!path.exists());

        let err = EngineConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[context\nwidth = ").unwrap();

        let err = EngineConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
