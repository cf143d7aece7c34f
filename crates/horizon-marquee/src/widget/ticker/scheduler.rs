//! The scroll scheduler.
//!
//! The scheduler owns the ticker's repeating-timer registration with the
//! application timer service. It guarantees that at most one registration is
//! live at a time: arming always cancels the previous registration first, and
//! `stop()` is synchronous — once it returns, the registration is gone from
//! the shared timer manager and any timer event still in flight is discarded
//! by the owner check ([`ScrollScheduler::owns`]).

use std::time::Duration;

use horizon_marquee_core::{Application, TimerId};

/// Cadence of the scroll-advance tick. The first tick fires one full
/// interval after arming, not immediately.
pub const TICK_INTERVAL: Duration = Duration::from_millis(30);

/// The timer registrations the scheduler depends on.
///
/// The production implementation is [`AppTimerService`], backed by the global
/// [`Application`]. Tests substitute a recording fake so scheduling semantics
/// can be verified without an event loop.
pub trait TimerService: Send {
    /// Register a repeating timer; `None` if no timer backend is available.
    fn start_repeating(&self, interval: Duration) -> Option<TimerId>;

    /// Deregister a timer. Unknown IDs are ignored.
    fn stop(&self, id: TimerId);
}

/// Timer service backed by the global [`Application`].
#[derive(Debug, Default)]
pub struct AppTimerService;

impl TimerService for AppTimerService {
    fn start_repeating(&self, interval: Duration) -> Option<TimerId> {
        let Some(app) = Application::try_instance() else {
            tracing::warn!(
                target: "horizon_marquee::ticker",
                "no application instance; scroll timer not armed"
            );
            return None;
        };
        Some(app.start_repeating_timer(interval))
    }

    fn stop(&self, id: TimerId) {
        if let Some(app) = Application::try_instance() {
            let _ = app.stop_timer(id);
        }
    }
}

/// Owns the ticker's periodic-tick registration.
///
/// At most one registration is live at a time; it is cancelled whenever the
/// layout is rebuilt or the widget is torn down.
pub struct ScrollScheduler {
    timers: Box<dyn TimerService>,
    timer: Option<TimerId>,
}

impl ScrollScheduler {
    /// Create a scheduler backed by the global application's timer service.
    pub fn new() -> Self {
        Self::with_service(Box::new(AppTimerService))
    }

    /// Create a scheduler with an explicit timer service.
    pub fn with_service(timers: Box<dyn TimerService>) -> Self {
        Self {
            timers,
            timer: None,
        }
    }

    /// Arm the periodic tick.
    ///
    /// Any prior registration is fully cancelled first, so two schedules can
    /// never coexist. With `displacement == 0` nothing is armed: zero speed
    /// means no autoscroll, not "move by zero". Returns whether a schedule
    /// is now armed.
    pub fn start(&mut self, displacement: i32) -> bool {
        self.stop();

        if displacement == 0 {
            tracing::debug!(
                target: "horizon_marquee::ticker",
                "displacement is zero; scroll timer not armed"
            );
            return false;
        }

        match self.timers.start_repeating(TICK_INTERVAL) {
            Some(id) => {
                tracing::debug!(
                    target: "horizon_marquee::ticker",
                    ?id,
                    interval_ms = TICK_INTERVAL.as_millis() as u64,
                    "scroll timer armed"
                );
                self.timer = Some(id);
                true
            }
            None => false,
        }
    }

    /// Cancel the armed schedule, if any.
    ///
    /// Idempotent. After this returns no further ticks are delivered: the
    /// registration is removed from the timer service, and a timer event
    /// already in the channel fails the [`owns`](Self::owns) check.
    pub fn stop(&mut self) {
        if let Some(id) = self.timer.take() {
            self.timers.stop(id);
            tracing::debug!(target: "horizon_marquee::ticker", ?id, "scroll timer cancelled");
        }
    }

    /// Whether a schedule is currently armed.
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// The live timer registration, if armed.
    pub fn timer_id(&self) -> Option<TimerId> {
        self.timer
    }

    /// Check whether a delivered timer event belongs to the live schedule.
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }
}

impl Default for ScrollScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScrollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use slotmap::SlotMap;
    use std::sync::Arc;

    /// Records every registration the scheduler makes.
    #[derive(Clone, Default)]
    struct FakeTimers {
        inner: Arc<Mutex<FakeTimersInner>>,
    }

    #[derive(Default)]
    struct FakeTimersInner {
        registrations: SlotMap<TimerId, ()>,
        started: usize,
        stopped: usize,
    }

    impl FakeTimers {
        fn active_count(&self) -> usize {
            self.inner.lock().registrations.len()
        }

        fn started(&self) -> usize {
            self.inner.lock().started
        }

        fn stopped(&self) -> usize {
            self.inner.lock().stopped
        }
    }

    impl TimerService for FakeTimers {
        fn start_repeating(&self, _interval: Duration) -> Option<TimerId> {
            let mut inner = self.inner.lock();
            inner.started += 1;
            Some(inner.registrations.insert(()))
        }

        fn stop(&self, id: TimerId) {
            let mut inner = self.inner.lock();
            if inner.registrations.remove(id).is_some() {
                inner.stopped += 1;
            }
        }
    }

    fn scheduler_with_fake() -> (ScrollScheduler, FakeTimers) {
        let fake = FakeTimers::default();
        let scheduler = ScrollScheduler::with_service(Box::new(fake.clone()));
        (scheduler, fake)
    }

    #[test]
    fn test_start_arms_one_registration() {
        let (mut scheduler, fake) = scheduler_with_fake();

        assert!(scheduler.start(3));
        assert!(scheduler.is_armed());
        assert_eq!(fake.active_count(), 1);
    }

    #[test]
    fn test_zero_displacement_arms_nothing() {
        let (mut scheduler, fake) = scheduler_with_fake();

        assert!(!scheduler.start(0));
        assert!(!scheduler.is_armed());
        assert_eq!(fake.started(), 0);
    }

    #[test]
    fn test_restart_cancels_prior_schedule() {
        let (mut scheduler, fake) = scheduler_with_fake();

        scheduler.start(3);
        let first = scheduler.timer_id().unwrap();
        scheduler.start(5);
        let second = scheduler.timer_id().unwrap();

        assert_ne!(first, second);
        // The old registration was cancelled; only one is ever live.
        assert_eq!(fake.active_count(), 1);
        assert_eq!(fake.stopped(), 1);
        assert!(!scheduler.owns(first));
        assert!(scheduler.owns(second));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut scheduler, fake) = scheduler_with_fake();

        scheduler.start(2);
        scheduler.stop();
        scheduler.stop();

        assert!(!scheduler.is_armed());
        assert_eq!(fake.active_count(), 0);
        assert_eq!(fake.stopped(), 1);
    }

    #[test]
    fn test_stale_event_fails_owner_check() {
        let (mut scheduler, _fake) = scheduler_with_fake();

        scheduler.start(3);
        let stale = scheduler.timer_id().unwrap();
        scheduler.stop();

        // An event for the cancelled registration must be discarded.
        assert!(!scheduler.owns(stale));
    }

    #[test]
    fn test_drop_releases_registration() {
        let fake = FakeTimers::default();
        {
            let mut scheduler = ScrollScheduler::with_service(Box::new(fake.clone()));
            scheduler.start(1);
            assert_eq!(fake.active_count(), 1);
        }
        assert_eq!(fake.active_count(), 0);
    }
}
