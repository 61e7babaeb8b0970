//! Pointer position and mouse button sequencing.
//!
//! Touch-emulated clicks only report a tap. [`MouseSequencer::report_button`]
//! turns a tap into a press now and a release after a fixed delay, so the
//! native side always sees complete pairs. Each tap owns its release; taps are
//! never coalesced and releases are never cancelled.

use crate::event::Action;
use crate::scheduler::FrameScheduler;
use crate::sink::NativeSink;
use crate::state::BridgeState;
use std::sync::Arc;

pub struct MouseSequencer {
    state: Arc<BridgeState>,
    sink: Arc<dyn NativeSink>,
    scheduler: Arc<dyn FrameScheduler>,
    release_delay: u32,
}

impl MouseSequencer {
    pub fn new(
        state: Arc<BridgeState>,
        sink: Arc<dyn NativeSink>,
        scheduler: Arc<dyn FrameScheduler>,
        release_delay: u32,
    ) -> Self {
        Self {
            state,
            sink,
            scheduler,
            release_delay,
        }
    }

    /// Press `button` now and release it after the release delay.
    ///
    /// The release carries the modifier mask live when it fires, not the one
    /// the press saw.
    pub fn report_button(&self, button: i32) {
        self.report_button_state(button, true);

        let state = self.state.clone();
        let sink = self.sink.clone();
        self.scheduler.schedule(
            self.release_delay,
            Box::new(move || {
                sink.send_mouse_button(button, Action::Release, state.modifiers.mask());
            }),
        );
    }

    /// Send an explicit press or release, no scheduling.
    pub fn report_button_state(&self, button: i32, is_down: bool) {
        self.sink.send_mouse_button(
            button,
            Action::from_down(is_down),
            self.state.modifiers.mask(),
        );
    }

    /// Move to `(x, y)`, then tap `button`.
    pub fn report_button_at(&self, button: i32, x: f32, y: f32) {
        self.set_cursor_pos(x, y);
        self.report_button(button);
    }

    /// Press and release `button` back to back.
    pub fn click(&self, button: i32) {
        self.report_button_state(button, true);
        self.report_button_state(button, false);
    }

    pub fn set_cursor_pos(&self, x: f32, y: f32) {
        self.state.cursor.set(x, y);
        self.sink.send_cursor_pos(x, y);
    }

    /// Move relative to the stored position.
    pub fn set_cursor_delta(&self, dx: f32, dy: f32) {
        let (x, y) = self.state.cursor.offset(dx, dy);
        self.sink.send_cursor_pos(x, y);
    }

    pub fn cursor_pos(&self) -> (f32, f32) {
        self.state.cursor.get()
    }

    pub fn report_scroll(&self, dx: f64, dy: f64) {
        self.sink.send_scroll(dx, dy);
    }

    pub fn release_delay(&self) -> u32 {
        self.release_delay
    }
}
