//! Recording platform binding for tests
//!
//! Every call is appended to a shared [`Ledger`], which tests keep a handle to
//! after the binding has been moved into a graphics context. Failures can be
//! injected per stage, and time only moves when the code under test sleeps
//! (or when a frame cost is configured), so pacing assertions are exact.

use std::cell::RefCell;
use std::ffi::c_void;
use std::rc::Rc;
use std::time::Duration;

use super::{PlatformBinding, PlatformError, PlatformResult, SwapInterval, WindowDescriptor};
use crate::core::config::GlVersion;

/// One recorded platform call
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    InitVideo,
    CreateWindow(String),
    CreateRenderContext(u32),
    SetSwapInterval(SwapInterval),
    SwapBuffers(u32),
    PollEvents(u32),
    Sleep(u64),
    DestroyRenderContext(u32),
    DestroyWindow(u32),
    ShutdownVideo,
}

/// Shared call log, failure switches and fake clock
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    pub calls: Vec<Call>,
    pub fail_init: bool,
    pub fail_window: bool,
    pub fail_context: bool,
    pub fail_vsync: bool,
    /// `poll_events` reports a close request from this poll onwards (1-based)
    pub close_on_poll: Option<u32>,
    /// Time added by every buffer swap
    pub frame_cost: Duration,
    pub now: Duration,
    polls: u32,
    next_id: u32,
    live_windows: Vec<u32>,
    live_contexts: Vec<u32>,
    video_active: bool,
}

impl Ledger {
    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn acquisitions(&self) -> usize {
        self.count(|c| matches!(c, Call::InitVideo | Call::CreateWindow(_) | Call::CreateRenderContext(_)))
    }

    pub fn releases(&self) -> usize {
        self.count(|c| {
            matches!(c, Call::ShutdownVideo | Call::DestroyWindow(_) | Call::DestroyRenderContext(_))
        })
    }

    /// Nothing acquired is still alive
    pub fn is_balanced(&self) -> bool {
        self.live_windows.is_empty() && self.live_contexts.is_empty() && !self.video_active
    }

    pub fn swaps(&self) -> usize {
        self.count(|c| matches!(c, Call::SwapBuffers(_)))
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Sleep(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }

    /// Calls excluding per-frame traffic
    pub fn lifecycle(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|c| !matches!(c, Call::SwapBuffers(_) | Call::PollEvents(_) | Call::Sleep(_)))
            .cloned()
            .collect()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FakeWindow(pub u32);

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct FakeContext(pub u32);

/// Platform binding that records instead of opening windows
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingPlatform {
    ledger: Rc<RefCell<Ledger>>,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for inspecting the log after the binding has been moved
    pub fn ledger(&self) -> Rc<RefCell<Ledger>> {
        Rc::clone(&self.ledger)
    }

    pub fn failing_init() -> Self {
        let platform = Self::new();
        platform.ledger.borrow_mut().fail_init = true;
        platform
    }

    pub fn failing_window() -> Self {
        let platform = Self::new();
        platform.ledger.borrow_mut().fail_window = true;
        platform
    }

    pub fn failing_context() -> Self {
        let platform = Self::new();
        platform.ledger.borrow_mut().fail_context = true;
        platform
    }

    pub fn failing_vsync() -> Self {
        let platform = Self::new();
        platform.ledger.borrow_mut().fail_vsync = true;
        platform
    }

    fn record(&self, call: Call) {
        self.ledger.borrow_mut().calls.push(call);
    }
}

impl PlatformBinding for RecordingPlatform {
    type Window = FakeWindow;
    type RenderContext = FakeContext;

    fn init_video_subsystem(&mut self) -> PlatformResult<()> {
        self.record(Call::InitVideo);
        let mut ledger = self.ledger.borrow_mut();
        if ledger.fail_init {
            return Err(PlatformError::new("init_video_subsystem", "no video device"));
        }
        ledger.video_active = true;
        Ok(())
    }

    fn create_window(&mut self, descriptor: &WindowDescriptor) -> PlatformResult<FakeWindow> {
        self.record(Call::CreateWindow(descriptor.title.clone()));
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.video_active, "window created before video subsystem");
        if ledger.fail_window {
            return Err(PlatformError::new("create_window", "no display"));
        }
        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.live_windows.push(id);
        Ok(FakeWindow(id))
    }

    fn create_render_context(
        &mut self,
        window: &mut FakeWindow,
        _version: GlVersion,
    ) -> PlatformResult<FakeContext> {
        self.record(Call::CreateRenderContext(window.0));
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.live_windows.contains(&window.0), "context for a dead window");
        if ledger.fail_context {
            return Err(PlatformError::new("create_render_context", "unsupported version"));
        }
        ledger.next_id += 1;
        let id = ledger.next_id;
        ledger.live_contexts.push(id);
        Ok(FakeContext(id))
    }

    fn set_swap_interval(&mut self, interval: SwapInterval) -> PlatformResult<()> {
        self.record(Call::SetSwapInterval(interval));
        if self.ledger.borrow().fail_vsync {
            return Err(PlatformError::new("set_swap_interval", "swap control unsupported"));
        }
        Ok(())
    }

    fn swap_buffers(&mut self, window: &mut FakeWindow) {
        self.record(Call::SwapBuffers(window.0));
        let mut ledger = self.ledger.borrow_mut();
        let cost = ledger.frame_cost;
        ledger.now += cost;
    }

    fn poll_events(&mut self, window: &mut FakeWindow) -> bool {
        self.record(Call::PollEvents(window.0));
        let mut ledger = self.ledger.borrow_mut();
        ledger.polls += 1;
        ledger.close_on_poll.map_or(false, |poll| ledger.polls >= poll)
    }

    fn elapsed(&self) -> Duration {
        self.ledger.borrow().now
    }

    fn sleep_milliseconds(&mut self, ms: u64) {
        self.record(Call::Sleep(ms));
        self.ledger.borrow_mut().now += Duration::from_millis(ms);
    }

    fn get_proc_address(&mut self, _window: &mut FakeWindow, _name: &str) -> *const c_void {
        std::ptr::null()
    }

    fn destroy_render_context(&mut self, context: FakeContext) {
        self.record(Call::DestroyRenderContext(context.0));
        let mut ledger = self.ledger.borrow_mut();
        let index = ledger.live_contexts.iter().position(|id| *id == context.0);
        assert!(index.is_some(), "render context {} released twice", context.0);
        if let Some(index) = index {
            ledger.live_contexts.remove(index);
        }
    }

    fn destroy_window(&mut self, window: FakeWindow) {
        self.record(Call::DestroyWindow(window.0));
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.live_contexts.is_empty(), "window destroyed while its context is alive");
        let index = ledger.live_windows.iter().position(|id| *id == window.0);
        assert!(index.is_some(), "window {} released twice", window.0);
        if let Some(index) = index {
            ledger.live_windows.remove(index);
        }
    }

    fn shutdown_video_subsystem(&mut self) {
        self.record(Call::ShutdownVideo);
        let mut ledger = self.ledger.borrow_mut();
        assert!(ledger.live_windows.is_empty(), "video shut down while a window is alive");
        ledger.video_active = false;
    }
}
