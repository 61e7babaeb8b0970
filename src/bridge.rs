//! The bridge: inbound report surface and its wiring.

use crate::clipboard::{ClipboardBridge, HostClipboard, LinkOpener, MemoryClipboard, NoLinkOpener};
use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::grab::{CursorModeListener, GrabDebouncer, GrabListener, GrabState};
use crate::keyboard::KeyForwarder;
use crate::keycode::GLFW_HOVERED;
use crate::mouse::MouseSequencer;
use crate::scheduler::FrameScheduler;
use crate::sink::NativeSink;
use crate::state::BridgeState;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<CallbackBridge> = OnceLock::new();

/// Install `bridge` as the process-wide instance.
///
/// The global lives until the process exits. Only the first call succeeds.
pub fn install(bridge: CallbackBridge) -> Result<&'static CallbackBridge> {
    let mut fresh = false;
    let installed = GLOBAL.get_or_init(|| {
        fresh = true;
        bridge
    });
    if fresh {
        log::info!("global callback bridge installed");
        Ok(installed)
    } else {
        Err(Error::AlreadyInstalled)
    }
}

/// The process-wide bridge, if one was installed.
pub fn global() -> Option<&'static CallbackBridge> {
    GLOBAL.get()
}

/// Builder for [`CallbackBridge`].
pub struct BridgeBuilder {
    sink: Arc<dyn NativeSink>,
    scheduler: Arc<dyn FrameScheduler>,
    config: BridgeConfig,
    clipboard: Option<Arc<dyn HostClipboard>>,
    opener: Option<Arc<dyn LinkOpener>>,
    listener: Option<Box<dyn GrabListener>>,
}

impl BridgeBuilder {
    pub fn config(mut self, config: BridgeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn HostClipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn link_opener(mut self, opener: Arc<dyn LinkOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Replace the default [`CursorModeListener`].
    pub fn grab_listener<L: GrabListener + 'static>(mut self, listener: L) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn build(self) -> CallbackBridge {
        let state = Arc::new(BridgeState::new());
        let listener: Box<dyn GrabListener> = match self.listener {
            Some(listener) => listener,
            None => Box::new(CursorModeListener::new(self.sink.clone())),
        };
        let clipboard: Arc<dyn HostClipboard> = match self.clipboard {
            Some(clipboard) => clipboard,
            None => Arc::new(MemoryClipboard::new()),
        };
        let opener: Arc<dyn LinkOpener> = match self.opener {
            Some(opener) => opener,
            None => Arc::new(NoLinkOpener),
        };

        CallbackBridge {
            keys: KeyForwarder::new(state.clone(), self.sink.clone()),
            mouse: MouseSequencer::new(
                state.clone(),
                self.sink.clone(),
                self.scheduler.clone(),
                self.config.mouse_release_delay,
            ),
            grab: GrabDebouncer::new(self.scheduler, self.config.grab_settle_delay, listener),
            clipboard: ClipboardBridge::new(clipboard, opener, self.config.clip_label.clone()),
            sink: self.sink,
            state,
            config: self.config,
        }
    }
}

/// Normalizes UI input and forwards it to a native GLFW-style sink.
///
/// All `report_*` calls are expected from one producer thread. Delayed work
/// (tap releases, grab settle checks) runs on the scheduler's thread.
pub struct CallbackBridge {
    config: BridgeConfig,
    state: Arc<BridgeState>,
    sink: Arc<dyn NativeSink>,
    keys: KeyForwarder,
    mouse: MouseSequencer,
    grab: GrabDebouncer,
    clipboard: ClipboardBridge,
}

impl CallbackBridge {
    pub fn builder(sink: Arc<dyn NativeSink>, scheduler: Arc<dyn FrameScheduler>) -> BridgeBuilder {
        BridgeBuilder {
            sink,
            scheduler,
            config: BridgeConfig::default(),
            clipboard: None,
            opener: None,
            listener: None,
        }
    }

    /// Bridge with default config, an in-memory clipboard and the cursor-mode
    /// grab listener.
    pub fn new(sink: Arc<dyn NativeSink>, scheduler: Arc<dyn FrameScheduler>) -> Self {
        Self::builder(sink, scheduler).build()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn state(&self) -> &BridgeState {
        &self.state
    }

    // Mouse

    /// Tap `button`: press now, release after the configured delay.
    pub fn report_button(&self, button: i32) {
        self.mouse.report_button(button);
    }

    pub fn report_button_state(&self, button: i32, is_down: bool) {
        self.mouse.report_button_state(button, is_down);
    }

    pub fn report_button_at(&self, button: i32, x: f32, y: f32) {
        self.mouse.report_button_at(button, x, y);
    }

    /// Press and release `button` immediately.
    pub fn report_click(&self, button: i32) {
        self.mouse.click(button);
    }

    pub fn set_cursor_pos(&self, x: f32, y: f32) {
        self.mouse.set_cursor_pos(x, y);
    }

    pub fn set_cursor_delta(&self, dx: f32, dy: f32) {
        self.mouse.set_cursor_delta(dx, dy);
    }

    pub fn cursor_pos(&self) -> (f32, f32) {
        self.mouse.cursor_pos()
    }

    pub fn report_scroll(&self, dx: f64, dy: f64) {
        self.mouse.report_scroll(dx, dy);
    }

    // Keyboard

    pub fn report_key(
        &self,
        key: i32,
        key_char: Option<char>,
        scancode: i32,
        mods: i32,
        is_down: bool,
    ) {
        self.keys.report_key(key, key_char, scancode, mods, is_down);
    }

    pub fn report_key_with_scancode(&self, key: i32, scancode: i32, mods: i32, is_down: bool) {
        self.keys.report_key_with_scancode(key, scancode, mods, is_down);
    }

    pub fn report_key_state(&self, key: i32, mods: i32, is_down: bool) {
        self.keys.report_key_state(key, mods, is_down);
    }

    pub fn report_key_tap(&self, key: i32) {
        self.keys.report_key_tap(key);
    }

    pub fn report_char(&self, ch: char, mods: i32) {
        self.keys.report_char(ch, mods);
    }

    pub fn set_modifier(&self, key: i32, is_down: bool) {
        self.keys.set_modifier(key, is_down);
    }

    pub fn current_modifier_mask(&self) -> i32 {
        self.keys.current_modifier_mask()
    }

    // Window

    /// Report a new logical window size. Sizes below 1x1 are dropped.
    pub fn report_window_resize(&self, width: i32, height: i32) {
        if width < 1 || height < 1 {
            log::warn!("ignoring impossible window size {}x{}", width, height);
            return;
        }
        log::debug!("window resized to {}x{}", width, height);
        self.state.window.set(width, height);
        self.sink.send_screen_size(width, height);
    }

    pub fn set_physical_size(&self, width: i32, height: i32) {
        self.state.window.set_physical(width, height);
    }

    pub fn window_size(&self) -> (i32, i32) {
        self.state.window.get()
    }

    pub fn physical_size(&self) -> (i32, i32) {
        self.state.window.physical()
    }

    /// Tell the native window whether the pointer is over it.
    pub fn report_hovered(&self, hovered: bool) {
        self.sink.set_window_attrib(GLFW_HOVERED, i32::from(hovered));
    }

    pub fn set_input_stack_queue(&self, enabled: bool) {
        self.sink.set_input_stack_queue(enabled);
    }

    // Grab

    /// Grab change reported by the native side. Committed after the settle
    /// delay unless superseded.
    pub fn notify_grab_changed(&self, grabbing: bool) {
        self.grab.notify(grabbing);
    }

    pub fn is_grabbing(&self) -> bool {
        self.grab.is_grabbing()
    }

    pub fn grab_state(&self) -> GrabState {
        self.grab.state()
    }

    // Clipboard

    /// Clipboard request from the native side. Blocks until the host answers.
    pub fn access_clipboard(&self, code: i32, payload: &str) -> Option<String> {
        self.clipboard.access(code, payload)
    }
}
