//! Key and character forwarding.

use crate::event::Action;
use crate::sink::NativeSink;
use crate::state::BridgeState;
use std::sync::Arc;

/// Forwards key and text input, keeping the modifier latches current.
pub struct KeyForwarder {
    state: Arc<BridgeState>,
    sink: Arc<dyn NativeSink>,
}

impl KeyForwarder {
    pub fn new(state: Arc<BridgeState>, sink: Arc<dyn NativeSink>) -> Self {
        Self { state, sink }
    }

    /// Report a key transition.
    ///
    /// A `key` of 0 sends no key event, which lets text-only input through.
    /// On key-down a non-NUL `key_char` is also sent as a character, mods
    /// variant first.
    pub fn report_key(
        &self,
        key: i32,
        key_char: Option<char>,
        scancode: i32,
        mods: i32,
        is_down: bool,
    ) {
        self.state.modifiers.set_from_key(key, is_down);

        if key != 0 {
            self.sink.send_key(key, scancode, Action::from_down(is_down), mods);
        }
        if is_down && let Some(ch) = key_char.filter(|c| *c != '\0') {
            self.report_char(ch, mods);
        }
    }

    pub fn report_key_with_scancode(&self, key: i32, scancode: i32, mods: i32, is_down: bool) {
        self.report_key(key, None, scancode, mods, is_down);
    }

    pub fn report_key_state(&self, key: i32, mods: i32, is_down: bool) {
        self.report_key(key, None, 0, mods, is_down);
    }

    /// Press and release `key` with the current modifier mask.
    pub fn report_key_tap(&self, key: i32) {
        self.report_key_state(key, self.state.modifiers.mask(), true);
        self.report_key_state(key, self.state.modifiers.mask(), false);
    }

    pub fn report_char(&self, ch: char, mods: i32) {
        let codepoint = u32::from(ch);
        self.sink.send_char_mods(codepoint, mods);
        self.sink.send_char(codepoint);
    }

    /// Update one modifier latch without sending anything.
    pub fn set_modifier(&self, key: i32, is_down: bool) {
        self.state.modifiers.set_from_key(key, is_down);
    }

    pub fn current_modifier_mask(&self) -> i32 {
        self.state.modifiers.mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SinkEvent;
    use crate::keycode::{
        GLFW_KEY_A, GLFW_KEY_LEFT_CONTROL, GLFW_KEY_LEFT_SHIFT, GLFW_MOD_CONTROL, GLFW_MOD_SHIFT,
    };
    use crate::sink::RecordingSink;

    fn forwarder() -> (Arc<RecordingSink>, KeyForwarder) {
        let sink = Arc::new(RecordingSink::new());
        let keys = KeyForwarder::new(Arc::new(BridgeState::new()), sink.clone());
        (sink, keys)
    }

    #[test]
    fn test_key_down_with_char() {
        let (sink, keys) = forwarder();
        keys.report_key(GLFW_KEY_A, Some('A'), 30, GLFW_MOD_SHIFT, true);

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Key {
                    key: GLFW_KEY_A,
                    scancode: 30,
                    action: Action::Press,
                    mods: GLFW_MOD_SHIFT
                },
                SinkEvent::CharMods {
                    codepoint: 'A' as u32,
                    mods: GLFW_MOD_SHIFT
                },
                SinkEvent::Char {
                    codepoint: 'A' as u32
                },
            ]
        );
    }

    #[test]
    fn test_key_up_sends_no_char() {
        let (sink, keys) = forwarder();
        keys.report_key(GLFW_KEY_A, Some('a'), 30, 0, false);
        assert_eq!(
            sink.events(),
            vec![SinkEvent::Key {
                key: GLFW_KEY_A,
                scancode: 30,
                action: Action::Release,
                mods: 0
            }]
        );
    }

    #[test]
    fn test_zero_key_and_nul_char() {
        let (sink, keys) = forwarder();

        keys.report_key(0, Some('é'), 0, 0, true);
        assert_eq!(
            sink.take(),
            vec![
                SinkEvent::CharMods {
                    codepoint: 'é' as u32,
                    mods: 0
                },
                SinkEvent::Char {
                    codepoint: 'é' as u32
                },
            ]
        );

        keys.report_key(0, Some('\0'), 0, 0, true);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_modifier_keys_update_latches() {
        let (sink, keys) = forwarder();

        keys.report_key_state(GLFW_KEY_LEFT_CONTROL, 0, true);
        assert_eq!(keys.current_modifier_mask(), GLFW_MOD_CONTROL);
        // Still forwarded as an ordinary key.
        assert_eq!(sink.len(), 1);

        keys.report_key_state(GLFW_KEY_LEFT_CONTROL, GLFW_MOD_CONTROL, false);
        assert_eq!(keys.current_modifier_mask(), 0);
    }

    #[test]
    fn test_tap_uses_current_mask() {
        let (sink, keys) = forwarder();
        keys.set_modifier(GLFW_KEY_LEFT_SHIFT, true);
        assert!(sink.is_empty());

        keys.report_key_tap(GLFW_KEY_A);
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::Key {
                    key: GLFW_KEY_A,
                    scancode: 0,
                    action: Action::Press,
                    mods: GLFW_MOD_SHIFT
                },
                SinkEvent::Key {
                    key: GLFW_KEY_A,
                    scancode: 0,
                    action: Action::Release,
                    mods: GLFW_MOD_SHIFT
                },
            ]
        );
    }
}
