//! # callbridge
//!
//! A stateful input-event bridge between a UI layer and a native sink that
//! speaks GLFW-style callbacks.
//!
//! ## Features
//!
//! - Modifier latches tracked independently of the input source
//! - Tap-style mouse reports expanded into press + delayed release pairs
//! - Debounced cursor grab changes (only settled requests are committed)
//! - Synchronous clipboard relay for requests coming from the native side
//! - Pluggable frame clock: manual, threaded or tokio
//! - Thread-safe design with atomic state tracking
//!
//! ## Quick Start
//!
//! ```
//! use callbridge::keycode::{GLFW_KEY_LEFT_SHIFT, GLFW_MOUSE_BUTTON_LEFT};
//! use callbridge::scheduler::ManualClock;
//! use callbridge::sink::RecordingSink;
//! use callbridge::{Action, CallbackBridge};
//! use std::sync::Arc;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let clock = Arc::new(ManualClock::new());
//! let bridge = CallbackBridge::new(sink.clone(), clock.clone());
//!
//! bridge.set_modifier(GLFW_KEY_LEFT_SHIFT, true);
//! bridge.report_button_at(GLFW_MOUSE_BUTTON_LEFT, 120.0, 80.0);
//! clock.advance(33);
//!
//! let buttons = sink.mouse_buttons();
//! assert_eq!(buttons[0].1, Action::Press);
//! assert_eq!(buttons[1].1, Action::Release);
//! ```
//!
//! ## Architecture
//!
//! Reports come in on one producer thread. Latched state (see [`state`]) is
//! plain atomics, so the frame clock thread can read it when delayed work
//! runs. Delayed work goes through a [`FrameScheduler`]; the native side and
//! the host clipboard are injected as [`NativeSink`] and
//! [`HostClipboard`](clipboard::HostClipboard) so tests can swap in doubles.

pub mod bridge;
pub mod channel;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod event;
pub mod grab;
pub mod keyboard;
pub mod keycode;
pub mod mouse;
#[cfg(feature = "recorder")]
pub mod recorder;
pub mod scheduler;
pub mod sink;
pub mod state;

// Re-exports
pub use bridge::{BridgeBuilder, CallbackBridge, global, install};
#[cfg(feature = "arboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{
    CLIPBOARD_COPY, CLIPBOARD_OPEN, CLIPBOARD_PASTE, ClipboardBridge, ClipboardCommand,
    HostClipboard, LinkOpener, LinkTarget, MemoryClipboard,
};
pub use config::BridgeConfig;
pub use error::{Error, Result};
pub use event::{Action, SinkEvent};
pub use grab::{CursorModeListener, GrabDebouncer, GrabListener, GrabState};
pub use keyboard::KeyForwarder;
pub use mouse::MouseSequencer;
#[cfg(feature = "recorder")]
pub use recorder::{RecordedCall, Recording, SinkRecorder};
#[cfg(feature = "tokio")]
pub use scheduler::TokioFrameClock;
pub use scheduler::{FrameClock, FrameScheduler, ManualClock, Task};
pub use sink::{NativeSink, RecordingSink};
pub use state::{BridgeState, CursorPosition, Modifier, ModifierState, WindowSize};
