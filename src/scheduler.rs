//! Delayed-callback scheduling on a frame clock.
//!
//! The bridge posts two kinds of work for later: synthetic mouse releases and
//! grab settle checks. It only needs "run this after N ticks", so that is the
//! whole [`FrameScheduler`] surface. Every implementation here runs its tasks
//! on one thread (or one task) at a time, in due order.
//!
//! # Example
//!
//! ```
//! use callbridge::scheduler::{FrameScheduler, ManualClock};
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let clock = ManualClock::new();
//! let fired = Arc::new(AtomicBool::new(false));
//! let flag = fired.clone();
//! clock.schedule(33, Box::new(move || flag.store(true, Ordering::SeqCst)));
//!
//! clock.advance(32);
//! assert!(!fired.load(Ordering::SeqCst));
//! clock.advance(1);
//! assert!(fired.load(Ordering::SeqCst));
//! ```

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// A unit of delayed work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Something that can run a task after a number of frame ticks.
pub trait FrameScheduler: Send + Sync {
    /// Run `task` once `delay_ticks` ticks have elapsed.
    fn schedule(&self, delay_ticks: u32, task: Task);
}

/// Heap entry ordered so that `BinaryHeap` pops the earliest deadline first,
/// with ties broken by scheduling order.
struct Entry<T> {
    due: T,
    seq: u64,
    task: Task,
}

impl<T: Ord> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T: Ord> Eq for Entry<T> {}

impl<T: Ord> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

// ============================================================================
// Manual clock
// ============================================================================

#[derive(Default)]
struct ManualState {
    now: u64,
    seq: u64,
    queue: BinaryHeap<Entry<u64>>,
}

/// A clock that only moves when told to.
///
/// Tasks run on whichever thread calls [`ManualClock::advance`]. Useful for
/// tests and for hosts that drive the bridge from their own frame loop.
#[derive(Default)]
pub struct ManualClock {
    state: Mutex<ManualState>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Current tick.
    pub fn now(&self) -> u64 {
        self.lock().now
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Move the clock forward and run every task that falls due.
    ///
    /// Tasks scheduled by a running task are picked up in the same call if
    /// their deadline is within the advanced range. Returns how many tasks ran.
    pub fn advance(&self, ticks: u64) -> usize {
        let target = self.lock().now.saturating_add(ticks);
        let mut ran = 0;

        loop {
            let task = {
                let mut state = self.lock();
                match state.queue.peek() {
                    Some(entry) if entry.due <= target => {}
                    _ => break,
                }
                let Some(entry) = state.queue.pop() else {
                    break;
                };
                state.now = entry.due;
                entry.task
            };
            // Lock released so the task may schedule more work.
            task();
            ran += 1;
        }

        self.lock().now = target;
        ran
    }
}

impl FrameScheduler for ManualClock {
    fn schedule(&self, delay_ticks: u32, task: Task) {
        let mut state = self.lock();
        let due = state.now.saturating_add(u64::from(delay_ticks));
        let seq = state.seq;
        state.seq += 1;
        log::trace!("scheduled task #{} for tick {}", seq, due);
        state.queue.push(Entry { due, seq, task });
    }
}

// ============================================================================
// Threaded frame clock
// ============================================================================

enum Command {
    Schedule(Instant, Task),
    Stop,
}

/// A frame clock backed by one dedicated thread.
///
/// One tick lasts `tick`. The clock stops when dropped.
pub struct FrameClock {
    tick: Duration,
    sender: Sender<Command>,
    running: Arc<AtomicBool>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl FrameClock {
    /// Start the clock thread.
    pub fn start(tick: Duration) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let handle = thread::Builder::new()
            .name("callbridge-frame-clock".into())
            .spawn(move || {
                let mut queue: BinaryHeap<Entry<Instant>> = BinaryHeap::new();
                let mut seq: u64 = 0;

                loop {
                    let command = match queue.peek() {
                        Some(entry) => {
                            let wait = entry.due.saturating_duration_since(Instant::now());
                            receiver.recv_timeout(wait)
                        }
                        None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
                    };

                    match command {
                        Ok(Command::Schedule(due, task)) => {
                            queue.push(Entry { due, seq, task });
                            seq += 1;
                        }
                        Ok(Command::Stop) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }

                    let now = Instant::now();
                    while queue.peek().is_some_and(|entry| entry.due <= now) {
                        if let Some(entry) = queue.pop() {
                            (entry.task)();
                        }
                    }
                }

                running_clone.store(false, Ordering::SeqCst);
                log::info!("frame clock stopped, {} task(s) dropped", queue.len());
            })
            .map_err(|e| Error::ThreadError(format!("failed to spawn frame clock: {}", e)))?;

        log::info!("frame clock started, tick = {:?}", tick);
        Ok(Self {
            tick,
            sender,
            running,
            thread_handle: Mutex::new(Some(handle)),
        })
    }

    /// Start the clock with the tick length from `config`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        Self::start(config.tick)
    }

    /// Duration of one tick.
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Check if the clock thread is still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the clock and wait for its thread. Pending tasks are dropped.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }

        // The thread may already be gone; that is fine.
        let _ = self.sender.send(Command::Stop);

        let handle = self
            .thread_handle
            .lock()
            .map_err(|_| Error::ThreadError("frame clock handle mutex poisoned".into()))?
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| Error::ThreadError("failed to join frame clock thread".into()))?;
        }

        Ok(())
    }
}

impl FrameScheduler for FrameClock {
    fn schedule(&self, delay_ticks: u32, task: Task) {
        let due = Instant::now() + self.tick * delay_ticks;
        log::trace!("scheduled task in {} tick(s)", delay_ticks);
        if self.sender.send(Command::Schedule(due, task)).is_err() {
            log::warn!("frame clock is stopped, dropping scheduled task");
        }
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

// ============================================================================
// Tokio frame clock (behind feature flag)
// ============================================================================

#[cfg(feature = "tokio")]
pub use tokio_clock::*;

#[cfg(feature = "tokio")]
mod tokio_clock {
    use super::*;
    use tokio::sync::mpsc as tokio_mpsc;
    use tokio::time::Instant as TokioInstant;

    /// A frame clock that lives in a single tokio task.
    ///
    /// Tasks run one after another inside that task, so they never race each
    /// other. The clock task ends when this handle is dropped.
    pub struct TokioFrameClock {
        tick: Duration,
        sender: tokio_mpsc::UnboundedSender<(TokioInstant, Task)>,
    }

    impl TokioFrameClock {
        /// Spawn the clock task on the current runtime.
        ///
        /// # Panics
        ///
        /// Panics if called outside a tokio runtime.
        pub fn spawn(tick: Duration) -> Self {
            let (sender, mut receiver) = tokio_mpsc::unbounded_channel::<(TokioInstant, Task)>();

            tokio::spawn(async move {
                let mut queue: BinaryHeap<Entry<TokioInstant>> = BinaryHeap::new();
                let mut seq: u64 = 0;

                loop {
                    let next = queue.peek().map(|entry| entry.due);
                    tokio::select! {
                        received = receiver.recv() => match received {
                            Some((due, task)) => {
                                queue.push(Entry { due, seq, task });
                                seq += 1;
                            }
                            None => break,
                        },
                        _ = tokio::time::sleep_until(next.unwrap_or_else(TokioInstant::now)), if next.is_some() => {}
                    }

                    let now = TokioInstant::now();
                    while queue.peek().is_some_and(|entry| entry.due <= now) {
                        if let Some(entry) = queue.pop() {
                            (entry.task)();
                        }
                    }
                }

                log::info!("tokio frame clock stopped, {} task(s) dropped", queue.len());
            });

            Self { tick, sender }
        }

        /// Spawn the clock task with the tick length from `config`.
        pub fn from_config(config: &BridgeConfig) -> Self {
            Self::spawn(config.tick)
        }

        pub fn tick(&self) -> Duration {
            self.tick
        }
    }

    impl FrameScheduler for TokioFrameClock {
        fn schedule(&self, delay_ticks: u32, task: Task) {
            let due = TokioInstant::now() + self.tick * delay_ticks;
            if self.sender.send((due, task)).is_err() {
                log::warn!("tokio frame clock is stopped, dropping scheduled task");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Task) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        let make = move |id: u32| -> Task {
            let log = log_clone.clone();
            Box::new(move || log.lock().unwrap().push(id))
        };
        (log, make)
    }

    #[test]
    fn test_manual_clock_runs_in_due_order() {
        let clock = ManualClock::new();
        let (log, task) = recorder();

        clock.schedule(33, task(1));
        clock.schedule(16, task(2));
        clock.schedule(16, task(3));
        clock.schedule(0, task(4));
        assert_eq!(clock.pending(), 4);

        assert_eq!(clock.advance(0), 1);
        assert_eq!(clock.advance(15), 0);
        assert_eq!(clock.advance(1), 2);
        assert_eq!(clock.now(), 16);
        assert_eq!(clock.advance(100), 1);

        assert_eq!(*log.lock().unwrap(), vec![4, 2, 3, 1]);
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_manual_clock_nested_schedule() {
        let clock = Arc::new(ManualClock::new());
        let count = Arc::new(AtomicUsize::new(0));

        let inner_clock = clock.clone();
        let inner_count = count.clone();
        clock.schedule(
            5,
            Box::new(move || {
                inner_count.fetch_add(1, Ordering::SeqCst);
                let c = inner_count.clone();
                inner_clock.schedule(
                    5,
                    Box::new(move || {
                        c.fetch_add(1, Ordering::SeqCst);
                    }),
                );
            }),
        );

        assert_eq!(clock.advance(9), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(clock.advance(1), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_frame_clock_runs_tasks_after_delay() {
        let clock = FrameClock::start(Duration::from_millis(1)).unwrap();
        let (log, task) = recorder();

        clock.schedule(30, task(1));
        clock.schedule(5, task(2));

        thread::sleep(Duration::from_millis(300));
        assert_eq!(*log.lock().unwrap(), vec![2, 1]);

        clock.stop().unwrap();
        assert!(!clock.is_running());
        assert!(matches!(clock.stop(), Err(Error::NotRunning)));
    }

    #[test]
    fn test_manual_clock_saturates_at_end_of_time() {
        let clock = ManualClock::new();
        let (log, task) = recorder();

        clock.advance(u64::MAX);
        clock.schedule(33, task(1));
        assert_eq!(clock.advance(1), 1);
        assert_eq!(clock.now(), u64::MAX);
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_frame_clock_from_config_uses_tick() {
        let config = BridgeConfig::new().with_tick(Duration::from_millis(20));
        let clock = FrameClock::from_config(&config).unwrap();
        assert_eq!(clock.tick(), Duration::from_millis(20));

        let (log, task) = recorder();
        // 5 ticks at 20ms is 100ms, well past a default 1ms tick.
        clock.schedule(5, task(1));

        thread::sleep(Duration::from_millis(30));
        assert!(log.lock().unwrap().is_empty());

        thread::sleep(Duration::from_millis(250));
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }

    #[test]
    fn test_frame_clock_uses_single_thread() {
        let clock = FrameClock::start(Duration::from_millis(1)).unwrap();
        let ids = Arc::new(Mutex::new(Vec::new()));

        for delay in [3, 1, 2] {
            let ids = ids.clone();
            clock.schedule(
                delay,
                Box::new(move || ids.lock().unwrap().push(thread::current().id())),
            );
        }

        thread::sleep(Duration::from_millis(200));
        let ids = ids.lock().unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_ne!(ids[0], thread::current().id());
    }

    #[test]
    fn test_frame_clock_drops_tasks_after_stop() {
        let clock = FrameClock::start(Duration::from_millis(1)).unwrap();
        clock.stop().unwrap();

        let (log, task) = recorder();
        clock.schedule(0, task(1));
        thread::sleep(Duration::from_millis(20));
        assert!(log.lock().unwrap().is_empty());
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_frame_clock() {
        let clock = TokioFrameClock::spawn(Duration::from_millis(1));
        let (log, task) = recorder();

        clock.schedule(33, task(1));
        clock.schedule(16, task(2));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*log.lock().unwrap(), vec![2]);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(*log.lock().unwrap(), vec![2, 1]);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test(start_paused = true)]
    async fn test_tokio_frame_clock_from_config_uses_tick() {
        let config = BridgeConfig::new().with_tick(Duration::from_millis(10));
        let clock = TokioFrameClock::from_config(&config);
        assert_eq!(clock.tick(), Duration::from_millis(10));
        let (log, task) = recorder();

        clock.schedule(3, task(1));

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(log.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(*log.lock().unwrap(), vec![1]);
    }
}
