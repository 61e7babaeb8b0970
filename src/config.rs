//! Bridge configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Ticks between a tap-style press and its synthetic release.
pub const DEFAULT_MOUSE_RELEASE_DELAY: u32 = 33;
/// Ticks a grab request must survive before it is committed.
pub const DEFAULT_GRAB_SETTLE_DELAY: u32 = 16;
/// Label attached to clips copied from the native side.
pub const DEFAULT_CLIP_LABEL: &str = "callbridge";

/// Timing and labelling knobs for a [`CallbackBridge`](crate::CallbackBridge).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Delay, in clock ticks, before the release that follows a tap.
    pub mouse_release_delay: u32,
    /// Delay, in clock ticks, before a grab request is committed.
    pub grab_settle_delay: u32,
    /// Wall-clock length of one tick for real-time clocks.
    pub tick: Duration,
    /// Label given to clips on COPY.
    pub clip_label: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mouse_release_delay: DEFAULT_MOUSE_RELEASE_DELAY,
            grab_settle_delay: DEFAULT_GRAB_SETTLE_DELAY,
            tick: Duration::from_millis(1),
            clip_label: DEFAULT_CLIP_LABEL.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mouse_release_delay(mut self, ticks: u32) -> Self {
        self.mouse_release_delay = ticks;
        self
    }

    pub fn with_grab_settle_delay(mut self, ticks: u32) -> Self {
        self.grab_settle_delay = ticks;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_clip_label(mut self, label: impl Into<String>) -> Self {
        self.clip_label = label.into();
        self
    }
}
