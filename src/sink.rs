//! The native event sink boundary.

use crate::event::{Action, SinkEvent};
use std::sync::Mutex;

/// GLFW-style callback surface of the native side.
///
/// Every call is a one-way notification; the bridge never looks at a result.
/// Implementations must be callable from both the producer thread and the
/// frame clock thread.
pub trait NativeSink: Send + Sync {
    fn send_char(&self, codepoint: u32);

    fn send_char_mods(&self, codepoint: u32, mods: i32);

    fn send_key(&self, key: i32, scancode: i32, action: Action, mods: i32);

    fn send_cursor_pos(&self, x: f32, y: f32);

    fn send_mouse_button(&self, button: i32, action: Action, mods: i32);

    fn send_scroll(&self, dx: f64, dy: f64);

    fn send_screen_size(&self, width: i32, height: i32);

    fn set_window_attrib(&self, attrib: i32, value: i32);

    /// Tell the native side whether to buffer input in its own queue.
    fn set_input_stack_queue(&self, _enabled: bool) {}
}

/// Implement NativeSink for closures taking a [`SinkEvent`].
impl<F> NativeSink for F
where
    F: Fn(SinkEvent) + Send + Sync,
{
    fn send_char(&self, codepoint: u32) {
        self(SinkEvent::Char { codepoint });
    }

    fn send_char_mods(&self, codepoint: u32, mods: i32) {
        self(SinkEvent::CharMods { codepoint, mods });
    }

    fn send_key(&self, key: i32, scancode: i32, action: Action, mods: i32) {
        self(SinkEvent::Key {
            key,
            scancode,
            action,
            mods,
        });
    }

    fn send_cursor_pos(&self, x: f32, y: f32) {
        self(SinkEvent::CursorPos { x, y });
    }

    fn send_mouse_button(&self, button: i32, action: Action, mods: i32) {
        self(SinkEvent::MouseButton {
            button,
            action,
            mods,
        });
    }

    fn send_scroll(&self, dx: f64, dy: f64) {
        self(SinkEvent::Scroll { dx, dy });
    }

    fn send_screen_size(&self, width: i32, height: i32) {
        self(SinkEvent::ScreenSize { width, height });
    }

    fn set_window_attrib(&self, attrib: i32, value: i32) {
        self(SinkEvent::WindowAttrib { attrib, value });
    }

    fn set_input_stack_queue(&self, enabled: bool) {
        self(SinkEvent::InputStackQueue { enabled });
    }
}

/// Sink that keeps every call in order.
///
/// Stands in for the native side in tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<SinkEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: SinkEvent) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(event);
    }

    /// Snapshot of all calls so far.
    pub fn events(&self) -> Vec<SinkEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Take all calls so far, leaving the log empty.
    pub fn take(&self) -> Vec<SinkEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Only the mouse button calls, as `(button, action, mods)`.
    pub fn mouse_buttons(&self) -> Vec<(i32, Action, i32)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                SinkEvent::MouseButton {
                    button,
                    action,
                    mods,
                } => Some((button, action, mods)),
                _ => None,
            })
            .collect()
    }
}

impl NativeSink for RecordingSink {
    fn send_char(&self, codepoint: u32) {
        self.push(SinkEvent::Char { codepoint });
    }

    fn send_char_mods(&self, codepoint: u32, mods: i32) {
        self.push(SinkEvent::CharMods { codepoint, mods });
    }

    fn send_key(&self, key: i32, scancode: i32, action: Action, mods: i32) {
        self.push(SinkEvent::Key {
            key,
            scancode,
            action,
            mods,
        });
    }

    fn send_cursor_pos(&self, x: f32, y: f32) {
        self.push(SinkEvent::CursorPos { x, y });
    }

    fn send_mouse_button(&self, button: i32, action: Action, mods: i32) {
        self.push(SinkEvent::MouseButton {
            button,
            action,
            mods,
        });
    }

    fn send_scroll(&self, dx: f64, dy: f64) {
        self.push(SinkEvent::Scroll { dx, dy });
    }

    fn send_screen_size(&self, width: i32, height: i32) {
        self.push(SinkEvent::ScreenSize { width, height });
    }

    fn set_window_attrib(&self, attrib: i32, value: i32) {
        self.push(SinkEvent::WindowAttrib { attrib, value });
    }

    fn set_input_stack_queue(&self, enabled: bool) {
        self.push(SinkEvent::InputStackQueue { enabled });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_closure_sink_receives_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let sink = move |event: SinkEvent| seen_clone.lock().unwrap().push(event);

        sink.send_cursor_pos(1.0, 2.0);
        sink.send_mouse_button(0, Action::Press, 0);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                SinkEvent::CursorPos { x: 1.0, y: 2.0 },
                SinkEvent::MouseButton {
                    button: 0,
                    action: Action::Press,
                    mods: 0
                },
            ]
        );
    }

    #[test]
    fn test_recording_sink_take_clears() {
        let sink = RecordingSink::new();
        sink.send_char(97);
        sink.send_scroll(0.0, 1.0);
        assert_eq!(sink.len(), 2);

        let taken = sink.take();
        assert_eq!(taken.len(), 2);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_default_input_stack_queue_is_noop() {
        struct Quiet;
        impl NativeSink for Quiet {
            fn send_char(&self, _: u32) {}
            fn send_char_mods(&self, _: u32, _: i32) {}
            fn send_key(&self, _: i32, _: i32, _: Action, _: i32) {}
            fn send_cursor_pos(&self, _: f32, _: f32) {}
            fn send_mouse_button(&self, _: i32, _: Action, _: i32) {}
            fn send_scroll(&self, _: f64, _: f64) {}
            fn send_screen_size(&self, _: i32, _: i32) {}
            fn set_window_attrib(&self, _: i32, _: i32) {}
        }
        Quiet.set_input_stack_queue(true);
    }
}
