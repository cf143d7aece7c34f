//! The main Application struct and event loop.
//!
//! The event loop is a channel drain: every cross-thread interaction (timer
//! fires, queued signal deliveries, quit requests) arrives as a
//! [`MarqueeEvent`] on an unbounded channel and is dispatched in issue order
//! on the owning thread. Deadline arithmetic lives on a dedicated timer
//! thread so the loop itself never does timed waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::{Mutex, RwLock};
use static_assertions::assert_impl_all;

use crate::error::{MarqueeError, Result};
use crate::event::MarqueeEvent;
use crate::invocation::{QueuedInvocation, invocation_registry};
use crate::thread_check;
use crate::timer::{SharedTimerManager, TimerId, TimerThread};

/// Global application instance.
static APPLICATION: OnceLock<Application> = OnceLock::new();

/// A cloneable handle for posting events to the event loop from any thread.
///
/// The proxy is handed to background threads (the timer thread, workers,
/// control threads) so they can wake the owning thread. Posting fails with
/// [`MarqueeError::EventLoopExited`] once the loop has shut down and dropped
/// its receiver; callers are expected to treat that as a signal to stop
/// producing events.
#[derive(Clone)]
pub struct EventLoopProxy {
    sender: Sender<MarqueeEvent>,
}

impl EventLoopProxy {
    /// Wrap a raw channel sender.
    pub(crate) fn from_sender(sender: Sender<MarqueeEvent>) -> Self {
        Self { sender }
    }

    /// Post an event to the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::EventLoopExited`] if the event loop has shut
    /// down and can no longer receive events.
    pub fn post(&self, event: MarqueeEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| MarqueeError::EventLoopExited)
    }
}

assert_impl_all!(EventLoopProxy: Send, Sync, Clone);

/// The main application struct, managing the event loop and global state.
///
/// This is a singleton - only one `Application` can exist per process.
///
/// # Example
///
/// ```no_run
/// use horizon_marquee_core::Application;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let app = Application::new()?;
///     // Connect signals, start timers, attach widgets, etc.
///     Ok(app.run()?)
/// }
/// ```
pub struct Application {
    /// Sender side of the event channel, cloned into proxies.
    sender: Sender<MarqueeEvent>,
    /// Receiver side, consumed by `run()`.
    receiver: Mutex<Option<Receiver<MarqueeEvent>>>,
    /// Timer manager shared with the timer thread.
    timers: Arc<SharedTimerManager>,
    /// The dedicated timer thread.
    timer_thread: TimerThread,
    /// Flag indicating the application should quit.
    should_quit: AtomicBool,
    /// User-provided event handler.
    event_handler: RwLock<Option<Box<dyn Fn(&MarqueeEvent) + Send + Sync>>>,
}

impl Application {
    /// Create a new application instance.
    ///
    /// This must be called from the owning thread before any other Horizon
    /// Marquee operations. Only one `Application` can exist per process.
    /// The calling thread is recorded as the owning thread for affinity
    /// checks, and the timer thread is spawned here.
    ///
    /// # Errors
    ///
    /// Returns an error if an `Application` has already been initialized.
    pub fn new() -> Result<&'static Application> {
        let (sender, receiver) = unbounded();
        let proxy = EventLoopProxy::from_sender(sender.clone());

        let timers = Arc::new(SharedTimerManager::new());
        let timer_thread = TimerThread::spawn(timers.clone(), proxy);

        let app = Application {
            sender,
            receiver: Mutex::new(Some(receiver)),
            timers,
            timer_thread,
            should_quit: AtomicBool::new(false),
            event_handler: RwLock::new(None),
        };

        if let Err(app) = APPLICATION.set(app) {
            // Lost the race: wind down the timer thread we just spawned.
            app.timer_thread.stop_and_join();
            return Err(MarqueeError::ApplicationAlreadyInitialized);
        }

        // Record the owning thread for affinity checks.
        thread_check::set_main_thread();

        Ok(APPLICATION.get().unwrap())
    }

    /// Get the global application instance.
    ///
    /// # Panics
    ///
    /// Panics if `Application::new()` has not been called yet.
    pub fn instance() -> &'static Application {
        APPLICATION
            .get()
            .expect("Application not initialized. Call Application::new() first.")
    }

    /// Try to get the global application instance.
    ///
    /// Returns `None` if `Application::new()` has not been called yet.
    pub fn try_instance() -> Option<&'static Application> {
        APPLICATION.get()
    }

    /// Run the main event loop.
    ///
    /// This method takes ownership of the calling thread and blocks until
    /// `quit()` is called. Events are dispatched in the order they were
    /// posted. When the loop exits the timer thread is stopped and joined,
    /// and any later posts fail with [`MarqueeError::EventLoopExited`].
    ///
    /// # Errors
    ///
    /// Returns an error if the event loop has already been consumed by a
    /// previous call to `run()`.
    #[tracing::instrument(skip(self), target = "horizon_marquee_core::event_loop", level = "debug")]
    pub fn run(&self) -> Result<()> {
        tracing::info!(target: "horizon_marquee_core::event_loop", "starting event loop");

        let receiver = self.receiver.lock().take();
        let Some(receiver) = receiver else {
            return Err(MarqueeError::EventLoopExited);
        };

        while !self.should_quit() {
            match receiver.recv() {
                Ok(event) => self.dispatch(&event),
                Err(_) => break,
            }
        }

        tracing::info!(target: "horizon_marquee_core::event_loop", "event loop exited");

        // Stop the timer thread before the receiver drops so a normal
        // shutdown does not trip the hand-off failure path.
        self.timer_thread.stop_and_join();

        Ok(())
    }

    /// Request the application to quit.
    ///
    /// This sends a quit event to the event loop, which will cause `run()` to
    /// return on the next iteration. The quit is not immediate.
    pub fn quit(&self) {
        tracing::info!(target: "horizon_marquee_core::event_loop", "quit requested");
        self.should_quit.store(true, Ordering::SeqCst);
        // Wake up the event loop to process the quit.
        let _ = self.sender.send(MarqueeEvent::Quit);
    }

    /// Check if a quit has been requested.
    pub fn should_quit(&self) -> bool {
        self.should_quit.load(Ordering::SeqCst)
    }

    /// Post an event to the event loop.
    ///
    /// This is thread-safe and can be called from any thread.
    pub fn post_event(&self, event: MarqueeEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| MarqueeError::EventLoopExited)
    }

    /// Get a proxy for posting events from other threads.
    pub fn proxy(&self) -> EventLoopProxy {
        EventLoopProxy::from_sender(self.sender.clone())
    }

    /// Set a handler for events.
    ///
    /// The handler will be called on the owning thread for each
    /// `MarqueeEvent` that is processed.
    pub fn set_event_handler<F>(&self, handler: F)
    where
        F: Fn(&MarqueeEvent) + Send + Sync + 'static,
    {
        *self.event_handler.write() = Some(Box::new(handler));
    }

    /// Clear the event handler.
    pub fn clear_event_handler(&self) {
        *self.event_handler.write() = None;
    }

    /// Execute a closure on the owning thread.
    ///
    /// If called from the owning thread the closure runs immediately.
    /// Otherwise it is registered as a queued invocation and posted to the
    /// event loop, running when the loop processes the event.
    ///
    /// # Errors
    ///
    /// Returns [`MarqueeError::EventLoopExited`] if the closure had to be
    /// queued but the event loop is gone. The closure is dropped without
    /// running in that case.
    pub fn invoke_on_main_thread<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if thread_check::is_main_thread() {
            f();
            return Ok(());
        }

        let invocation_id = invocation_registry().register(QueuedInvocation::new(f));
        if let Err(err) = self.post_event(MarqueeEvent::QueuedInvoke { invocation_id }) {
            // Withdraw the registration so the closure does not leak.
            let _ = invocation_registry().take(invocation_id);
            return Err(err);
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Timer API
    // -------------------------------------------------------------------------

    /// Start a one-shot timer that fires after the specified duration.
    ///
    /// The fire is delivered as a [`MarqueeEvent::Timer`] to the event
    /// handler. Returns a `TimerId` that can be used to cancel the timer.
    pub fn start_timer(&self, duration: Duration) -> TimerId {
        self.timers.start_one_shot(duration)
    }

    /// Start a repeating timer that fires at the specified interval.
    ///
    /// The first fire occurs one full interval after this call. Returns a
    /// `TimerId` that can be used to cancel the timer.
    pub fn start_repeating_timer(&self, interval: Duration) -> TimerId {
        self.timers.start_repeating(interval)
    }

    /// Stop a timer.
    ///
    /// Once this returns, no further events for this timer will be produced
    /// by the timer thread. An event already in the channel may still be
    /// dispatched; handlers that care must check the timer is still theirs.
    pub fn stop_timer(&self, id: TimerId) -> Result<()> {
        self.timers.stop(id)
    }

    /// Check if a timer is active.
    pub fn is_timer_active(&self, id: TimerId) -> bool {
        self.timers.is_active(id)
    }

    // -------------------------------------------------------------------------
    // Internal methods
    // -------------------------------------------------------------------------

    /// Dispatch a single event on the owning thread.
    fn dispatch(&self, event: &MarqueeEvent) {
        tracing::trace!(target: "horizon_marquee_core::event_loop", ?event, "received event");
        match event {
            MarqueeEvent::Quit => {
                tracing::debug!(target: "horizon_marquee_core::event_loop", "processing quit event");
                self.should_quit.store(true, Ordering::SeqCst);
            }
            MarqueeEvent::Timer { .. } => {
                // Dispatch to user handler.
                if let Some(ref handler) = *self.event_handler.read() {
                    handler(event);
                }
            }
            MarqueeEvent::QueuedInvoke { invocation_id } => {
                // Execute the queued invocation.
                tracing::trace!(
                    target: "horizon_marquee_core::event_loop",
                    invocation_id,
                    "executing queued invocation"
                );
                if let Some(invocation) = invocation_registry().take(*invocation_id) {
                    invocation.execute();
                } else {
                    tracing::warn!(
                        target: "horizon_marquee_core::event_loop",
                        invocation_id,
                        "queued invocation not found (already executed or cancelled)"
                    );
                }
            }
            MarqueeEvent::WakeUp => {
                // Nothing to do; the recv itself was the point.
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Application::new() installs a process-wide singleton, so these
    // tests exercise the underlying pieces without creating one.

    #[test]
    fn test_timer_manager_basic() {
        let manager = SharedTimerManager::new();

        let id = manager.start_one_shot(Duration::from_millis(100));
        assert!(manager.is_active(id));

        manager.stop(id).unwrap();
        assert!(!manager.is_active(id));
    }

    #[test]
    fn test_proxy_preserves_post_order() {
        let (sender, receiver) = unbounded();
        let proxy = EventLoopProxy::from_sender(sender);

        proxy.post(MarqueeEvent::WakeUp).unwrap();
        proxy
            .post(MarqueeEvent::QueuedInvoke { invocation_id: 7 })
            .unwrap();
        proxy.post(MarqueeEvent::Quit).unwrap();

        assert!(matches!(receiver.recv().unwrap(), MarqueeEvent::WakeUp));
        assert!(matches!(
            receiver.recv().unwrap(),
            MarqueeEvent::QueuedInvoke { invocation_id: 7 }
        ));
        assert!(matches!(receiver.recv().unwrap(), MarqueeEvent::Quit));
    }

    #[test]
    fn test_proxy_post_fails_after_receiver_drop() {
        let (sender, receiver) = unbounded();
        let proxy = EventLoopProxy::from_sender(sender);
        drop(receiver);

        let result = proxy.post(MarqueeEvent::WakeUp);
        assert!(matches!(result, Err(MarqueeError::EventLoopExited)));
    }

    #[test]
    fn test_proxy_clones_share_the_channel() {
        let (sender, receiver) = unbounded();
        let proxy = EventLoopProxy::from_sender(sender);
        let clone = proxy.clone();

        let handle = std::thread::spawn(move || {
            clone.post(MarqueeEvent::WakeUp).unwrap();
        });
        handle.join().unwrap();

        proxy.post(MarqueeEvent::Quit).unwrap();

        assert!(matches!(receiver.recv().unwrap(), MarqueeEvent::WakeUp));
        assert!(matches!(receiver.recv().unwrap(), MarqueeEvent::Quit));
    }
}
