//! Timer system for Horizon Marquee.
//!
//! Provides one-shot and repeating timers that integrate with the event loop.
//! Deadline arithmetic runs on a dedicated timer thread; expired timers are
//! handed off to the owning thread as [`MarqueeEvent::Timer`] events through
//! the [`EventLoopProxy`](crate::EventLoopProxy). If the event loop has shut
//! down and the hand-off fails, the affected timer is deactivated and the
//! timer thread winds down.

use std::cmp::Ordering as CmpOrdering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use slotmap::{SlotMap, new_key_type};

use crate::application::EventLoopProxy;
use crate::error::{Result, TimerError};
use crate::event::MarqueeEvent;

new_key_type! {
    /// A unique identifier for a timer.
    pub struct TimerId;
}

/// The type of timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once after the specified duration.
    OneShot,
    /// Fires repeatedly at the specified interval.
    Repeating,
}

/// Internal timer data.
#[derive(Debug)]
struct TimerData {
    /// When this timer should next fire.
    next_fire: Instant,
    /// The interval for repeating timers.
    interval: Duration,
    /// The kind of timer.
    kind: TimerKind,
    /// Whether this timer is active.
    active: bool,
}

/// An entry in the timer queue (min-heap by fire time).
#[derive(Debug, Clone, Copy)]
struct TimerQueueEntry {
    id: TimerId,
    fire_time: Instant,
}

impl PartialEq for TimerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_time == other.fire_time
    }
}

impl Eq for TimerQueueEntry {}

impl PartialOrd for TimerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerQueueEntry {
    fn cmp(&self, other: &Self) -> CmpOrdering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other.fire_time.cmp(&self.fire_time)
    }
}

/// Manages all timers for the application.
pub struct TimerManager {
    /// All registered timers.
    timers: SlotMap<TimerId, TimerData>,
    /// Priority queue of pending timer fires (min-heap by fire time).
    queue: BinaryHeap<TimerQueueEntry>,
}

impl TimerManager {
    /// Create a new timer manager.
    pub fn new() -> Self {
        Self {
            timers: SlotMap::with_key(),
            queue: BinaryHeap::new(),
        }
    }

    /// Start a one-shot timer that fires after the specified duration.
    ///
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_one_shot(&mut self, duration: Duration) -> TimerId {
        let now = Instant::now();
        let next_fire = now + duration;

        let data = TimerData {
            next_fire,
            interval: duration,
            kind: TimerKind::OneShot,
            active: true,
        };

        let id = self.timers.insert(data);
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });

        id
    }

    /// Start a repeating timer that fires at the specified interval.
    ///
    /// The first fire occurs after `interval` duration, not immediately.
    /// Returns the timer ID that can be used to cancel the timer.
    pub fn start_repeating(&mut self, interval: Duration) -> TimerId {
        let now = Instant::now();
        let next_fire = now + interval;

        let data = TimerData {
            next_fire,
            interval,
            kind: TimerKind::Repeating,
            active: true,
        };

        let id = self.timers.insert(data);
        self.queue.push(TimerQueueEntry {
            id,
            fire_time: next_fire,
        });

        id
    }

    /// Stop and remove a timer.
    ///
    /// Returns `Ok(())` if the timer was found and removed, or an error if not found.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        if let Some(timer) = self.timers.get_mut(id) {
            timer.active = false;
            self.timers.remove(id);
            Ok(())
        } else {
            Err(TimerError::InvalidTimerId.into())
        }
    }

    /// Check if a timer is currently active.
    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| t.active)
    }

    /// Get the duration until the next timer fires, if any.
    ///
    /// Returns `None` if there are no active timers, and `Duration::ZERO`
    /// if a timer is already due.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        // Clean up any inactive timers from the front of the queue.
        while let Some(entry) = self.queue.peek() {
            if !self.timers.get(entry.id).is_some_and(|t| t.active) {
                self.queue.pop();
            } else {
                break;
            }
        }

        self.queue.peek().map(|entry| {
            let now = Instant::now();
            if entry.fire_time > now {
                entry.fire_time - now
            } else {
                Duration::ZERO
            }
        })
    }

    /// Process all timers that should fire now.
    ///
    /// Returns a list of timer events to dispatch. A repeating timer that
    /// missed several intervals yields a single event per call; its next
    /// fire is rescheduled relative to now.
    #[tracing::instrument(skip(self), target = "horizon_marquee_core::timer", level = "trace")]
    pub fn process_expired(&mut self) -> Vec<MarqueeEvent> {
        let now = Instant::now();
        let mut events = Vec::new();

        while let Some(entry) = self.queue.peek() {
            // Check if this timer should fire.
            if entry.fire_time > now {
                break;
            }

            let entry = self.queue.pop().unwrap();
            let id = entry.id;

            // Check if timer is still active.
            let Some(timer) = self.timers.get_mut(id) else {
                continue;
            };

            if !timer.active {
                continue;
            }

            // Timer has fired.
            tracing::trace!(target: "horizon_marquee_core::timer", ?id, "timer fired");
            events.push(MarqueeEvent::Timer { id });

            match timer.kind {
                TimerKind::OneShot => {
                    // One-shot timers are removed after firing.
                    timer.active = false;
                    self.timers.remove(id);
                }
                TimerKind::Repeating => {
                    // Schedule the next fire.
                    timer.next_fire = now + timer.interval;
                    self.queue.push(TimerQueueEntry {
                        id,
                        fire_time: timer.next_fire,
                    });
                }
            }
        }

        events
    }

    /// Get the number of active timers.
    pub fn active_count(&self) -> usize {
        self.timers.iter().filter(|(_, t)| t.active).count()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe wrapper around `TimerManager` shared between the application
/// facade and the timer thread.
///
/// Timer mutations wake the timer thread through a condvar so it can
/// recompute its sleep deadline.
pub(crate) struct SharedTimerManager {
    inner: Mutex<TimerManager>,
    wakeup: Condvar,
}

impl SharedTimerManager {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TimerManager::new()),
            wakeup: Condvar::new(),
        }
    }

    pub fn start_one_shot(&self, duration: Duration) -> TimerId {
        let id = self.inner.lock().start_one_shot(duration);
        self.wakeup.notify_one();
        id
    }

    pub fn start_repeating(&self, interval: Duration) -> TimerId {
        let id = self.inner.lock().start_repeating(interval);
        self.wakeup.notify_one();
        id
    }

    pub fn stop(&self, id: TimerId) -> Result<()> {
        let result = self.inner.lock().stop(id);
        self.wakeup.notify_one();
        result
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.inner.lock().is_active(id)
    }

    pub fn active_count(&self) -> usize {
        self.inner.lock().active_count()
    }

    /// Wake all waiters, taking the lock first so a waiter between its
    /// shutdown check and its park cannot miss the notification.
    pub fn notify_all(&self) {
        let _guard = self.inner.lock();
        self.wakeup.notify_all();
    }

    /// Block until at least one timer expires or `running` is cleared.
    ///
    /// Returns the expired timer events, or an empty vector when shutting
    /// down. With no timers registered this parks until a mutation or a
    /// shutdown notification arrives.
    pub fn wait_for_expired(&self, running: &AtomicBool) -> Vec<MarqueeEvent> {
        let mut inner = self.inner.lock();
        loop {
            if !running.load(Ordering::Acquire) {
                return Vec::new();
            }

            match inner.time_until_next() {
                Some(Duration::ZERO) => return inner.process_expired(),
                Some(wait) => {
                    self.wakeup.wait_for(&mut inner, wait);
                }
                None => {
                    self.wakeup.wait(&mut inner);
                }
            }
        }
    }
}

impl Default for SharedTimerManager {
    fn default() -> Self {
        Self::new()
    }
}

/// The dedicated timer thread.
///
/// Sleeps until the next deadline held by the [`SharedTimerManager`] and
/// posts expired timers to the event loop. Owned by the
/// [`Application`](crate::Application), which stops and joins it when the
/// event loop exits.
pub(crate) struct TimerThread {
    /// Thread handle for joining.
    handle: Mutex<Option<JoinHandle<()>>>,
    running: Arc<AtomicBool>,
    timers: Arc<SharedTimerManager>,
}

impl TimerThread {
    /// Spawn the timer thread.
    pub fn spawn(timers: Arc<SharedTimerManager>, proxy: EventLoopProxy) -> Self {
        let running = Arc::new(AtomicBool::new(true));

        let thread_running = running.clone();
        let thread_timers = timers.clone();

        let handle = thread::Builder::new()
            .name("marquee-timer".to_string())
            .spawn(move || {
                timer_loop(thread_timers, proxy, thread_running);
            })
            .expect("Failed to spawn timer thread");

        Self {
            handle: Mutex::new(Some(handle)),
            running,
            timers,
        }
    }

    /// Ask the timer thread to exit.
    ///
    /// This is a non-blocking call and is safe to invoke more than once.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.timers.notify_all();
    }

    /// Wait for the timer thread to finish.
    ///
    /// Returns `true` if the thread was joined successfully, `false` if
    /// already joined or the thread panicked.
    pub fn join(&self) -> bool {
        let mut handle = self.handle.lock();
        if let Some(h) = handle.take() {
            h.join().is_ok()
        } else {
            false
        }
    }

    /// Stop the timer thread and wait for it to finish.
    pub fn stop_and_join(&self) -> bool {
        self.stop();
        self.join()
    }
}

/// Body of the timer thread.
///
/// When a post fails the event loop is gone: the timer that fired is
/// deactivated so it cannot pile up further events, and the loop winds down.
fn timer_loop(timers: Arc<SharedTimerManager>, proxy: EventLoopProxy, running: Arc<AtomicBool>) {
    tracing::debug!(target: "horizon_marquee_core::timer", "timer thread started");

    while running.load(Ordering::Acquire) {
        let events = timers.wait_for_expired(&running);

        for event in events {
            let MarqueeEvent::Timer { id } = event else {
                continue;
            };

            if proxy.post(MarqueeEvent::Timer { id }).is_err() {
                tracing::warn!(
                    target: "horizon_marquee_core::timer",
                    ?id,
                    "timer hand-off failed, event loop is gone; deactivating timer"
                );
                let _ = timers.stop(id);
                running.store(false, Ordering::Release);
                break;
            }
        }
    }

    tracing::debug!(target: "horizon_marquee_core::timer", "timer thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_fires_once() {
        let mut manager = TimerManager::new();
        let id = manager.start_one_shot(Duration::from_millis(1));
        assert!(manager.is_active(id));

        std::thread::sleep(Duration::from_millis(10));

        let events = manager.process_expired();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], MarqueeEvent::Timer { id: fired } if fired == id));

        // One-shot timers are gone after firing.
        assert!(!manager.is_active(id));
        assert!(manager.process_expired().is_empty());
    }

    #[test]
    fn test_repeating_stays_active() {
        let mut manager = TimerManager::new();
        let id = manager.start_repeating(Duration::from_millis(1));

        std::thread::sleep(Duration::from_millis(10));

        let events = manager.process_expired();
        assert_eq!(events.len(), 1);
        assert!(manager.is_active(id));

        std::thread::sleep(Duration::from_millis(10));

        let events = manager.process_expired();
        assert_eq!(events.len(), 1);
        assert!(manager.is_active(id));
    }

    #[test]
    fn test_stop_removes_timer() {
        let mut manager = TimerManager::new();
        let id = manager.start_repeating(Duration::from_millis(1));

        manager.stop(id).unwrap();
        assert!(!manager.is_active(id));

        std::thread::sleep(Duration::from_millis(5));
        assert!(manager.process_expired().is_empty());
    }

    #[test]
    fn test_stop_unknown_id_is_error() {
        let mut manager = TimerManager::new();
        let id = manager.start_one_shot(Duration::from_millis(1));
        manager.stop(id).unwrap();

        // Stopping again reports an invalid ID.
        assert!(manager.stop(id).is_err());
    }

    #[test]
    fn test_time_until_next() {
        let mut manager = TimerManager::new();
        assert!(manager.time_until_next().is_none());

        manager.start_one_shot(Duration::from_secs(60));
        let wait = manager.time_until_next().unwrap();
        assert!(wait > Duration::from_secs(59));

        let due = manager.start_one_shot(Duration::ZERO);
        assert_eq!(manager.time_until_next(), Some(Duration::ZERO));
        assert!(manager.is_active(due));
    }

    #[test]
    fn test_time_until_next_skips_stopped() {
        let mut manager = TimerManager::new();
        let soon = manager.start_one_shot(Duration::from_millis(1));
        manager.start_one_shot(Duration::from_secs(60));

        manager.stop(soon).unwrap();

        // The stopped timer at the front of the queue is cleaned up.
        let wait = manager.time_until_next().unwrap();
        assert!(wait > Duration::from_secs(1));
    }

    #[test]
    fn test_active_count() {
        let mut manager = TimerManager::new();
        assert_eq!(manager.active_count(), 0);

        let a = manager.start_repeating(Duration::from_secs(1));
        let _b = manager.start_repeating(Duration::from_secs(1));
        assert_eq!(manager.active_count(), 2);

        manager.stop(a).unwrap();
        assert_eq!(manager.active_count(), 1);
    }

    #[test]
    fn test_shared_manager_basics() {
        let shared = SharedTimerManager::new();
        let id = shared.start_repeating(Duration::from_secs(1));
        assert!(shared.is_active(id));
        assert_eq!(shared.active_count(), 1);

        shared.stop(id).unwrap();
        assert!(!shared.is_active(id));
        assert_eq!(shared.active_count(), 0);
    }

    #[test]
    fn test_wait_for_expired_returns_on_shutdown() {
        let shared = Arc::new(SharedTimerManager::new());
        let running = Arc::new(AtomicBool::new(true));

        let thread_shared = shared.clone();
        let thread_running = running.clone();
        let handle = std::thread::spawn(move || {
            // No timers registered: parks until the shutdown notification.
            thread_shared.wait_for_expired(&thread_running)
        });

        std::thread::sleep(Duration::from_millis(20));
        running.store(false, Ordering::Release);
        shared.notify_all();

        let events = handle.join().unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_timer_thread_delivers_events() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let proxy = EventLoopProxy::from_sender(sender);

        let shared = Arc::new(SharedTimerManager::new());
        let thread = TimerThread::spawn(shared.clone(), proxy);

        let id = shared.start_repeating(Duration::from_millis(5));

        let event = receiver
            .recv_timeout(Duration::from_secs(2))
            .expect("timer event should arrive");
        assert!(matches!(event, MarqueeEvent::Timer { id: fired } if fired == id));

        assert!(thread.stop_and_join());
    }

    #[test]
    fn test_timer_thread_deactivates_on_dropped_receiver() {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let proxy = EventLoopProxy::from_sender(sender);
        drop(receiver);

        let shared = Arc::new(SharedTimerManager::new());
        let thread = TimerThread::spawn(shared.clone(), proxy);

        let id = shared.start_repeating(Duration::from_millis(5));

        // The failed hand-off deactivates the timer and winds the thread down.
        assert!(thread.join());
        assert!(!shared.is_active(id));
    }

    #[test]
    fn test_timer_thread_stop_is_idempotent() {
        let (sender, _receiver) = crossbeam_channel::unbounded();
        let proxy = EventLoopProxy::from_sender(sender);

        let shared = Arc::new(SharedTimerManager::new());
        let thread = TimerThread::spawn(shared, proxy);

        thread.stop();
        thread.stop();
        assert!(thread.join());
        // Joining twice reports false rather than blocking.
        assert!(!thread.join());
    }
}
