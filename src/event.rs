//! Values describing calls made into the native sink.

use crate::keycode::{GLFW_PRESS, GLFW_RELEASE};
use crate::sink::NativeSink;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key or button action as GLFW reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Action {
    Release,
    Press,
}

impl Action {
    /// `Press` when `is_down`, `Release` otherwise.
    #[inline]
    pub fn from_down(is_down: bool) -> Self {
        if is_down {
            Action::Press
        } else {
            Action::Release
        }
    }

    /// The GLFW action integer.
    #[inline]
    pub fn raw(self) -> i32 {
        match self {
            Action::Release => GLFW_RELEASE,
            Action::Press => GLFW_PRESS,
        }
    }

    pub fn is_press(self) -> bool {
        self == Action::Press
    }
}

/// One call into the native sink.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SinkEvent {
    Char {
        codepoint: u32,
    },
    CharMods {
        codepoint: u32,
        mods: i32,
    },
    Key {
        key: i32,
        scancode: i32,
        action: Action,
        mods: i32,
    },
    CursorPos {
        x: f32,
        y: f32,
    },
    MouseButton {
        button: i32,
        action: Action,
        mods: i32,
    },
    Scroll {
        dx: f64,
        dy: f64,
    },
    ScreenSize {
        width: i32,
        height: i32,
    },
    WindowAttrib {
        attrib: i32,
        value: i32,
    },
    InputStackQueue {
        enabled: bool,
    },
}

impl SinkEvent {
    /// Replay this call on `sink`.
    pub fn dispatch<S: NativeSink + ?Sized>(&self, sink: &S) {
        match *self {
            SinkEvent::Char { codepoint } => sink.send_char(codepoint),
            SinkEvent::CharMods { codepoint, mods } => sink.send_char_mods(codepoint, mods),
            SinkEvent::Key {
                key,
                scancode,
                action,
                mods,
            } => sink.send_key(key, scancode, action, mods),
            SinkEvent::CursorPos { x, y } => sink.send_cursor_pos(x, y),
            SinkEvent::MouseButton {
                button,
                action,
                mods,
            } => sink.send_mouse_button(button, action, mods),
            SinkEvent::Scroll { dx, dy } => sink.send_scroll(dx, dy),
            SinkEvent::ScreenSize { width, height } => sink.send_screen_size(width, height),
            SinkEvent::WindowAttrib { attrib, value } => sink.set_window_attrib(attrib, value),
            SinkEvent::InputStackQueue { enabled } => sink.set_input_stack_queue(enabled),
        }
    }

    /// Check if this is a key or character event.
    pub fn is_keyboard(&self) -> bool {
        matches!(
            self,
            SinkEvent::Char { .. } | SinkEvent::CharMods { .. } | SinkEvent::Key { .. }
        )
    }

    /// Check if this is a pointer event.
    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            SinkEvent::CursorPos { .. } | SinkEvent::MouseButton { .. } | SinkEvent::Scroll { .. }
        )
    }
}
