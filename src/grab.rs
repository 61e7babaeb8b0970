//! Cursor grab debouncing.
//!
//! The native side reports grab changes asynchronously and often in bursts
//! (focus changes toggle it several times within a frame). Each report only
//! records the request and schedules a settle check tagged with the request's
//! generation. A check that finds a newer generation drops itself, so only the
//! last request of a burst is ever committed, and it is committed once.

use crate::keycode::{GLFW_CURSOR, GLFW_CURSOR_DISABLED, GLFW_CURSOR_NORMAL};
use crate::scheduler::FrameScheduler;
use crate::sink::NativeSink;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Receives committed grab changes.
pub trait GrabListener: Send + Sync {
    fn on_grab_changed(&self, grabbing: bool);
}

/// Implement GrabListener for closures.
impl<F> GrabListener for F
where
    F: Fn(bool) + Send + Sync,
{
    fn on_grab_changed(&self, grabbing: bool) {
        self(grabbing);
    }
}

/// Default listener: switches the native cursor mode.
///
/// A grabbed cursor is disabled (hidden and locked for camera look), a
/// released one is back to normal.
pub struct CursorModeListener {
    sink: Arc<dyn NativeSink>,
    mode: AtomicI32,
}

impl CursorModeListener {
    pub fn new(sink: Arc<dyn NativeSink>) -> Self {
        Self {
            sink,
            mode: AtomicI32::new(GLFW_CURSOR_NORMAL),
        }
    }

    /// Last cursor mode sent to the sink.
    pub fn mode(&self) -> i32 {
        self.mode.load(Ordering::SeqCst)
    }
}

impl GrabListener for CursorModeListener {
    fn on_grab_changed(&self, grabbing: bool) {
        let mode = if grabbing {
            GLFW_CURSOR_DISABLED
        } else {
            GLFW_CURSOR_NORMAL
        };
        self.mode.store(mode, Ordering::SeqCst);
        self.sink.set_window_attrib(GLFW_CURSOR, mode);
    }
}

/// Observable grab state, including whether a change is still settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrabState {
    Released,
    Grabbed,
    /// Released, but the latest request asks for a grab.
    PendingGrab,
    /// Grabbed, but the latest request asks for a release.
    PendingRelease,
}

impl GrabState {
    fn from_flags(committed: bool, requested: bool) -> Self {
        match (committed, requested) {
            (false, false) => GrabState::Released,
            (true, true) => GrabState::Grabbed,
            (false, true) => GrabState::PendingGrab,
            (true, false) => GrabState::PendingRelease,
        }
    }

    /// Committed value, ignoring any pending request.
    pub fn is_grabbing(self) -> bool {
        matches!(self, GrabState::Grabbed | GrabState::PendingRelease)
    }
}

struct GrabInner {
    requested: AtomicBool,
    // Bumped on every request; a settle check only commits its own generation.
    generation: AtomicU64,
    grabbing: AtomicBool,
    // The listener doubles as the commit lock.
    listener: Mutex<Box<dyn GrabListener>>,
}

impl GrabInner {
    fn settle(&self, generation: u64, wanted: bool) {
        let listener = match self.listener.lock() {
            Ok(listener) => listener,
            Err(poisoned) => poisoned.into_inner(),
        };

        let latest = self.generation.load(Ordering::SeqCst);
        if latest != generation {
            log::debug!(
                "grab settle #{} for {} superseded by #{}, skipping",
                generation,
                wanted,
                latest
            );
            return;
        }

        self.grabbing.store(wanted, Ordering::SeqCst);
        log::info!("grab changed: {}", wanted);
        listener.on_grab_changed(wanted);
    }
}

/// Debounces grab notifications into settled commits.
pub struct GrabDebouncer {
    inner: Arc<GrabInner>,
    scheduler: Arc<dyn FrameScheduler>,
    settle_delay: u32,
}

impl GrabDebouncer {
    pub fn new(
        scheduler: Arc<dyn FrameScheduler>,
        settle_delay: u32,
        listener: Box<dyn GrabListener>,
    ) -> Self {
        Self {
            inner: Arc::new(GrabInner {
                requested: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                grabbing: AtomicBool::new(false),
                listener: Mutex::new(listener),
            }),
            scheduler,
            settle_delay,
        }
    }

    /// Record a grab change reported by the native side.
    ///
    /// Nothing observable changes until the settle delay has passed without a
    /// newer request.
    pub fn notify(&self, grabbing: bool) {
        self.inner.requested.store(grabbing, Ordering::SeqCst);
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let inner = self.inner.clone();
        self.scheduler.schedule(
            self.settle_delay,
            Box::new(move || inner.settle(generation, grabbing)),
        );
    }

    /// Last committed grab state. Never reflects a pending request.
    #[inline]
    pub fn is_grabbing(&self) -> bool {
        self.inner.grabbing.load(Ordering::SeqCst)
    }

    /// Most recent request, committed or not.
    #[inline]
    pub fn requested(&self) -> bool {
        self.inner.requested.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> GrabState {
        GrabState::from_flags(self.is_grabbing(), self.requested())
    }

    pub fn settle_delay(&self) -> u32 {
        self.settle_delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SinkEvent;
    use crate::scheduler::ManualClock;
    use crate::sink::RecordingSink;

    fn debouncer() -> (Arc<ManualClock>, GrabDebouncer, Arc<Mutex<Vec<bool>>>) {
        debouncer_with_delay(16)
    }

    fn debouncer_with_delay(
        settle_delay: u32,
    ) -> (Arc<ManualClock>, GrabDebouncer, Arc<Mutex<Vec<bool>>>) {
        let clock = Arc::new(ManualClock::new());
        let commits = Arc::new(Mutex::new(Vec::new()));
        let commits_clone = commits.clone();
        let debouncer = GrabDebouncer::new(
            clock.clone(),
            settle_delay,
            Box::new(move |grabbing: bool| commits_clone.lock().unwrap().push(grabbing)),
        );
        (clock, debouncer, commits)
    }

    #[test]
    fn test_single_change_commits_after_delay() {
        let (clock, grab, commits) = debouncer();

        grab.notify(true);
        assert!(!grab.is_grabbing());
        assert_eq!(grab.state(), GrabState::PendingGrab);

        clock.advance(15);
        assert!(!grab.is_grabbing());

        clock.advance(1);
        assert!(grab.is_grabbing());
        assert_eq!(grab.state(), GrabState::Grabbed);
        assert_eq!(*commits.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_burst_commits_only_final_value() {
        let (clock, grab, commits) = debouncer();

        grab.notify(true);
        clock.advance(4);
        grab.notify(false);
        clock.advance(4);
        grab.notify(true);

        // Step one tick at a time so any intermediate commit would be seen.
        for _ in 0..40 {
            clock.advance(1);
            let observed = commits.lock().unwrap().clone();
            assert!(observed.iter().all(|g| *g));
        }

        assert!(grab.is_grabbing());
        assert_eq!(*commits.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_burst_waits_full_delay_after_last_request() {
        let (clock, grab, commits) = debouncer();

        grab.notify(true);
        clock.advance(4);
        grab.notify(false);
        clock.advance(4);
        grab.notify(true);

        // Tick 16 is only 8 ticks after the last request.
        clock.advance(8);
        assert_eq!(clock.now(), 16);
        assert!(!grab.is_grabbing());
        assert!(commits.lock().unwrap().is_empty());

        clock.advance(8);
        assert!(grab.is_grabbing());
        assert_eq!(*commits.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_release_burst_keeps_grab_until_settled() {
        let (clock, grab, commits) = debouncer();
        grab.notify(true);
        clock.advance(16);

        grab.notify(false);
        grab.notify(true);
        grab.notify(false);
        assert_eq!(grab.state(), GrabState::PendingRelease);
        assert!(grab.is_grabbing());

        clock.advance(16);
        assert!(!grab.is_grabbing());
        assert_eq!(grab.state(), GrabState::Released);
        assert_eq!(*commits.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_custom_settle_delay() {
        let (clock, grab, commits) = debouncer_with_delay(4);
        assert_eq!(grab.settle_delay(), 4);

        grab.notify(true);
        clock.advance(3);
        assert!(!grab.is_grabbing());
        clock.advance(1);
        assert!(grab.is_grabbing());
        assert_eq!(*commits.lock().unwrap(), vec![true]);
    }

    #[test]
    fn test_cursor_mode_listener_sets_attrib() {
        let sink = Arc::new(RecordingSink::new());
        let listener = CursorModeListener::new(sink.clone());
        assert_eq!(listener.mode(), GLFW_CURSOR_NORMAL);

        listener.on_grab_changed(true);
        assert_eq!(listener.mode(), GLFW_CURSOR_DISABLED);
        listener.on_grab_changed(false);

        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::WindowAttrib {
                    attrib: GLFW_CURSOR,
                    value: GLFW_CURSOR_DISABLED
                },
                SinkEvent::WindowAttrib {
                    attrib: GLFW_CURSOR,
                    value: GLFW_CURSOR_NORMAL
                },
            ]
        );
    }

    #[test]
    fn test_concurrent_commits_do_not_interleave() {
        use std::sync::atomic::AtomicUsize;
        use std::thread;
        use std::time::Duration;

        let active = Arc::new(AtomicUsize::new(0));
        let overlapped = Arc::new(AtomicBool::new(false));
        let active_clone = active.clone();
        let overlapped_clone = overlapped.clone();

        let listener: Box<dyn GrabListener> = Box::new(move |_: bool| {
            if active_clone.fetch_add(1, Ordering::SeqCst) != 0 {
                overlapped_clone.store(true, Ordering::SeqCst);
            }
            thread::sleep(Duration::from_millis(5));
            active_clone.fetch_sub(1, Ordering::SeqCst);
        });
        let inner = Arc::new(GrabInner {
            requested: AtomicBool::new(true),
            generation: AtomicU64::new(1),
            grabbing: AtomicBool::new(false),
            listener: Mutex::new(listener),
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let inner = inner.clone();
                thread::spawn(move || inner.settle(1, true))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert!(!overlapped.load(Ordering::SeqCst));
        assert!(inner.grabbing.load(Ordering::SeqCst));
    }
}
