//! GLFW platform binding
//!
//! Creates real windows with OpenGL contexts. GLFW reports failures through
//! an error callback rather than return values, so the callback stores the
//! most recent description and each fallible call turns it into a
//! [`PlatformError`].

use glfw::Context;
use std::ffi::c_void;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{
    PlatformBinding, PlatformError, PlatformResult, SwapInterval, WindowDescriptor, WindowFlags,
    WindowPosition,
};
use crate::core::config::GlVersion;

/// GLFW window wrapper
pub struct GlfwWindow {
    handle: glfw::PWindow,
    events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

/// OpenGL context owned by a [`GlfwWindow`]
///
/// GLFW ties the context to its window; this token records that the context
/// was made current and which version the driver actually provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlfwRenderContext {
    version: GlVersion,
}

/// Platform binding backed by GLFW
pub struct GlfwPlatform {
    glfw: Option<glfw::Glfw>,
    last_error: Arc<Mutex<Option<String>>>,
    started: Instant,
}

impl Default for GlfwPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl GlfwPlatform {
    /// Create an unstarted binding
    pub fn new() -> Self {
        Self {
            glfw: None,
            last_error: Arc::new(Mutex::new(None)),
            started: Instant::now(),
        }
    }

    fn take_error(&self, operation: &'static str, fallback: &str) -> PlatformError {
        let message = self
            .last_error
            .lock()
            .ok()
            .and_then(|mut slot| slot.take())
            .unwrap_or_else(|| fallback.to_string());
        PlatformError::new(operation, message)
    }

    fn clear_error(&self) {
        if let Ok(mut slot) = self.last_error.lock() {
            *slot = None;
        }
    }

    fn glfw_mut(&mut self, operation: &'static str) -> PlatformResult<&mut glfw::Glfw> {
        self.glfw
            .as_mut()
            .ok_or_else(|| PlatformError::new(operation, "video subsystem is not initialized"))
    }
}

impl PlatformBinding for GlfwPlatform {
    type Window = GlfwWindow;
    type RenderContext = GlfwRenderContext;

    fn init_video_subsystem(&mut self) -> PlatformResult<()> {
        if self.glfw.is_some() {
            return Ok(());
        }

        let slot = Arc::clone(&self.last_error);
        let glfw = glfw::init(move |error: glfw::Error, description: String| {
            log::error!("GLFW error {:?}: {}", error, description);
            if let Ok(mut last) = slot.lock() {
                *last = Some(description);
            }
        })
        .map_err(|e| PlatformError::new("init_video_subsystem", format!("{:?}", e)))?;

        log::debug!("GLFW {} initialized", glfw::get_version_string());
        self.glfw = Some(glfw);
        Ok(())
    }

    fn create_window(&mut self, descriptor: &WindowDescriptor) -> PlatformResult<GlfwWindow> {
        self.clear_error();
        let glfw = self.glfw_mut("create_window")?;

        if descriptor.flags.contains(WindowFlags::OPENGL) {
            glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::OpenGl));
            glfw.window_hint(glfw::WindowHint::ContextVersion(
                descriptor.gl_version.major,
                descriptor.gl_version.minor,
            ));
        } else {
            glfw.window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));
        }
        glfw.window_hint(glfw::WindowHint::Resizable(false));
        // Shown only after it has been positioned
        glfw.window_hint(glfw::WindowHint::Visible(false));

        let created = glfw.create_window(
            descriptor.width,
            descriptor.height,
            &descriptor.title,
            glfw::WindowMode::Windowed,
        );
        let (mut handle, events) = match created {
            Some(window) => window,
            None => return Err(self.take_error("create_window", "GLFW returned no window")),
        };

        let position = match descriptor.position {
            WindowPosition::Centered => glfw
                .with_primary_monitor(|_, monitor| monitor.and_then(|m| m.get_video_mode()))
                .map(|mode| {
                    (
                        (mode.width as i32 - descriptor.width as i32) / 2,
                        (mode.height as i32 - descriptor.height as i32) / 2,
                    )
                }),
        };
        if let Some((x, y)) = position {
            handle.set_pos(x, y);
        }

        handle.set_close_polling(true);
        handle.set_framebuffer_size_polling(true);
        handle.set_focus_polling(true);

        if descriptor.flags.contains(WindowFlags::SHOWN) {
            handle.show();
        }

        log::debug!(
            "Created {}x{} window \"{}\"",
            descriptor.width,
            descriptor.height,
            descriptor.title
        );
        Ok(GlfwWindow { handle, events })
    }

    fn create_render_context(
        &mut self,
        window: &mut GlfwWindow,
        version: GlVersion,
    ) -> PlatformResult<GlfwRenderContext> {
        self.clear_error();
        window.handle.make_current();

        if !window.handle.is_current() {
            return Err(self.take_error("create_render_context", "window has no OpenGL context"));
        }

        let reported = window.handle.get_context_version();
        let actual = GlVersion::new(reported.major as u32, reported.minor as u32);
        if !actual.satisfies(version) {
            glfw::make_context_current(None);
            return Err(PlatformError::new(
                "create_render_context",
                format!("requested OpenGL {} but driver provided {}", version, actual),
            ));
        }

        log::debug!("OpenGL {} context is current", actual);
        Ok(GlfwRenderContext { version: actual })
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) -> PlatformResult<()> {
        self.clear_error();
        let glfw = self.glfw_mut("set_swap_interval")?;
        glfw.set_swap_interval(match interval {
            SwapInterval::Immediate => glfw::SwapInterval::None,
            SwapInterval::VSync => glfw::SwapInterval::Sync(1),
        });

        let failed = self.last_error.lock().map(|slot| slot.is_some()).unwrap_or(false);
        if failed {
            return Err(self.take_error("set_swap_interval", "swap interval rejected"));
        }
        Ok(())
    }

    fn swap_buffers(&mut self, window: &mut GlfwWindow) {
        window.handle.swap_buffers();
    }

    fn poll_events(&mut self, window: &mut GlfwWindow) -> bool {
        if let Some(glfw) = self.glfw.as_mut() {
            glfw.poll_events();
        }

        for (_, event) in glfw::flush_messages(&window.events) {
            match event {
                glfw::WindowEvent::Close => log::info!("Window close requested"),
                glfw::WindowEvent::FramebufferSize(width, height) => {
                    log::debug!("Framebuffer resized to {}x{}", width, height);
                }
                other => log::trace!("Window event: {:?}", other),
            }
        }

        window.handle.should_close()
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    fn sleep_milliseconds(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
    }

    fn get_proc_address(&mut self, window: &mut GlfwWindow, name: &str) -> *const c_void {
        window.handle.get_proc_address(name) as *const c_void
    }

    fn destroy_render_context(&mut self, context: GlfwRenderContext) {
        log::debug!("Releasing OpenGL {} context", context.version);
        glfw::make_context_current(None);
    }

    fn destroy_window(&mut self, window: GlfwWindow) {
        log::debug!("Destroying window");
        drop(window);
    }

    fn shutdown_video_subsystem(&mut self) {
        // Dropping the last Glfw handle terminates the library
        if self.glfw.take().is_some() {
            log::debug!("GLFW terminated");
        }
    }
}
