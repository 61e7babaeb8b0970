//! Capture and replay of native sink traffic.
//!
//! Ordering bugs in the native consumer (a release arriving before its press,
//! a cursor mode flipped twice) are easiest to chase with the exact call
//! sequence in hand. [`SinkRecorder`] sits in front of a real sink, forwards
//! everything and keeps a timestamped copy that can be saved as JSON and
//! replayed later.
//!
//! # Example
//!
//! ```no_run
//! use callbridge::recorder::{Recording, SinkRecorder};
//! use callbridge::sink::RecordingSink;
//! use std::sync::Arc;
//!
//! let recorder = Arc::new(SinkRecorder::new(RecordingSink::new()));
//! // ... hand `recorder.clone()` to a CallbackBridge and play ...
//!
//! let recording = recorder.finish().unwrap();
//! recording.save("session.json").unwrap();
//!
//! // Later
//! let recording = Recording::load("session.json").unwrap();
//! recording.replay(&RecordingSink::new());
//! ```

use crate::error::{Error, Result};
use crate::event::{Action, SinkEvent};
use crate::sink::NativeSink;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime};

/// A sink call with its time relative to recording start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCall {
    /// Time elapsed since recording start.
    pub elapsed: Duration,
    /// The call that was made.
    pub event: SinkEvent,
}

/// A complete recording of sink calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Recorded calls in order.
    pub calls: Vec<RecordedCall>,
    /// When the recording was created.
    pub created_at: SystemTime,
    /// Optional description.
    pub description: Option<String>,
}

impl Recording {
    /// Create a new empty recording.
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            created_at: SystemTime::now(),
            description: None,
        }
    }

    /// Set a description for this recording.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Time of the last call.
    pub fn duration(&self) -> Duration {
        self.calls
            .last()
            .map(|c| c.elapsed)
            .unwrap_or(Duration::ZERO)
    }

    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Save the recording to a file (JSON format).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("Failed to serialize recording: {}", e)))?;
        std::fs::write(path, json)
            .map_err(|e| Error::Other(format!("Failed to write recording file: {}", e)))?;
        Ok(())
    }

    /// Load a recording from a file (JSON format).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::Other(format!("Failed to read recording file: {}", e)))?;
        let recording: Recording = serde_json::from_str(&json)
            .map_err(|e| Error::Other(format!("Failed to deserialize recording: {}", e)))?;
        Ok(recording)
    }

    /// Replay every call on `sink` as fast as possible.
    pub fn replay<S: NativeSink + ?Sized>(&self, sink: &S) {
        for call in &self.calls {
            call.event.dispatch(sink);
        }
    }

    /// Replay with the original spacing, scaled by `speed`.
    ///
    /// `speed` 2.0 plays twice as fast. Blocks the calling thread.
    pub fn replay_timed<S: NativeSink + ?Sized>(&self, sink: &S, speed: f64) -> Result<()> {
        if speed <= 0.0 {
            return Err(Error::Other("Playback speed must be positive".into()));
        }

        let start = Instant::now();
        for call in &self.calls {
            let target = Duration::from_secs_f64(call.elapsed.as_secs_f64() / speed);
            let elapsed = start.elapsed();
            if target > elapsed {
                std::thread::sleep(target - elapsed);
            }
            call.event.dispatch(sink);
        }
        Ok(())
    }
}

impl Default for Recording {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink wrapper that records every call it forwards.
pub struct SinkRecorder<S: NativeSink> {
    inner: S,
    start: Instant,
    recording: Mutex<Option<Recording>>,
}

impl<S: NativeSink> SinkRecorder<S> {
    /// Start recording calls made to `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            start: Instant::now(),
            recording: Mutex::new(Some(Recording::new())),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Check if calls are still being recorded.
    pub fn is_recording(&self) -> bool {
        self.recording
            .lock()
            .map(|rec| rec.is_some())
            .unwrap_or(false)
    }

    /// Stop recording and return what was captured. Calls made afterwards are
    /// still forwarded, just not recorded.
    pub fn finish(&self) -> Result<Recording> {
        let mut rec = self
            .recording
            .lock()
            .map_err(|_| Error::ThreadError("recording mutex poisoned".into()))?;
        rec.take()
            .ok_or_else(|| Error::Other("No recording available".into()))
    }

    fn record(&self, event: SinkEvent) {
        event.dispatch(&self.inner);

        let call = RecordedCall {
            elapsed: self.start.elapsed(),
            event,
        };
        if let Ok(mut r) = self.recording.lock()
            && let Some(rec) = r.as_mut()
        {
            rec.calls.push(call);
        }
    }
}

impl<S: NativeSink> NativeSink for SinkRecorder<S> {
    fn send_char(&self, codepoint: u32) {
        self.record(SinkEvent::Char { codepoint });
    }

    fn send_char_mods(&self, codepoint: u32, mods: i32) {
        self.record(SinkEvent::CharMods { codepoint, mods });
    }

    fn send_key(&self, key: i32, scancode: i32, action: Action, mods: i32) {
        self.record(SinkEvent::Key {
            key,
            scancode,
            action,
            mods,
        });
    }

    fn send_cursor_pos(&self, x: f32, y: f32) {
        self.record(SinkEvent::CursorPos { x, y });
    }

    fn send_mouse_button(&self, button: i32, action: Action, mods: i32) {
        self.record(SinkEvent::MouseButton {
            button,
            action,
            mods,
        });
    }

    fn send_scroll(&self, dx: f64, dy: f64) {
        self.record(SinkEvent::Scroll { dx, dy });
    }

    fn send_screen_size(&self, width: i32, height: i32) {
        self.record(SinkEvent::ScreenSize { width, height });
    }

    fn set_window_attrib(&self, attrib: i32, value: i32) {
        self.record(SinkEvent::WindowAttrib { attrib, value });
    }

    fn set_input_stack_queue(&self, enabled: bool) {
        self.record(SinkEvent::InputStackQueue { enabled });
    }
}
