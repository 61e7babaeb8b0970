//! Channel-backed sinks.
//!
//! Instead of calling into native code directly, a [`ChannelSink`] turns each
//! call into a [`SinkEvent`] and sends it down a channel. The consumer (often
//! the thread that owns the real native handle) drains it and replays the
//! events with [`SinkEvent::dispatch`].
//!
//! # Example (Sync)
//!
//! ```
//! use callbridge::channel::unbounded_channel_sink;
//! use callbridge::scheduler::ManualClock;
//! use callbridge::CallbackBridge;
//! use std::sync::Arc;
//!
//! let (sink, rx) = unbounded_channel_sink();
//! let bridge = CallbackBridge::new(Arc::new(sink), Arc::new(ManualClock::new()));
//!
//! bridge.report_scroll(0.0, 1.0);
//! let event = rx.try_recv().unwrap();
//! assert!(event.is_mouse());
//! ```
//!
//! # Example (Async with Tokio)
//!
//! ```ignore
//! use callbridge::channel::async_channel_sink;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (sink, mut rx) = async_channel_sink(256);
//!     // hand `sink` to a CallbackBridge ...
//!
//!     while let Some(event) = rx.recv().await {
//!         println!("{:?}", event);
//!     }
//! }
//! ```

use crate::event::{Action, SinkEvent};
use crate::sink::NativeSink;
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

enum Outlet {
    Bounded(SyncSender<SinkEvent>),
    Unbounded(Sender<SinkEvent>),
    #[cfg(feature = "tokio")]
    Tokio(tokio::sync::mpsc::Sender<SinkEvent>),
}

/// Sink that forwards every call over a channel.
pub struct ChannelSink {
    outlet: Outlet,
}

impl ChannelSink {
    fn push(&self, event: SinkEvent) {
        match &self.outlet {
            // Don't block the producer if the consumer is slow.
            Outlet::Bounded(sender) => {
                if let Err(mpsc::TrySendError::Full(event)) = sender.try_send(event) {
                    log::warn!("sink channel full, dropping {:?}", event);
                }
            }
            Outlet::Unbounded(sender) => {
                let _ = sender.send(event);
            }
            #[cfg(feature = "tokio")]
            Outlet::Tokio(sender) => {
                if let Err(tokio::sync::mpsc::error::TrySendError::Full(event)) =
                    sender.try_send(event)
                {
                    log::warn!("sink channel full, dropping {:?}", event);
                }
            }
        }
    }
}

impl NativeSink for ChannelSink {
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

/// Sink backed by a bounded channel.
///
/// # Arguments
///
/// * `capacity` - Maximum number of events to buffer. If the buffer is full,
///   new events are dropped to prevent blocking the producer.
pub fn channel_sink(capacity: usize) -> (ChannelSink, Receiver<SinkEvent>) {
    let (sender, receiver) = mpsc::sync_channel(capacity);
    let sink = ChannelSink {
        outlet: Outlet::Bounded(sender),
    };
    (sink, receiver)
}

/// Sink backed by an unbounded channel.
///
/// Nothing is ever dropped, so a stalled consumer grows memory without bound.
pub fn unbounded_channel_sink() -> (ChannelSink, Receiver<SinkEvent>) {
    let (sender, receiver) = mpsc::channel();
    let sink = ChannelSink {
        outlet: Outlet::Unbounded(sender),
    };
    (sink, receiver)
}

/// Sink backed by a bounded tokio channel.
#[cfg(feature = "tokio")]
pub fn async_channel_sink(
    capacity: usize,
) -> (ChannelSink, tokio::sync::mpsc::Receiver<SinkEvent>) {
    let (sender, receiver) = tokio::sync::mpsc::channel(capacity);
    let sink = ChannelSink {
        outlet: Outlet::Tokio(sender),
    };
    (sink, receiver)
}
