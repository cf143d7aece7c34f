//! Queued cross-thread invocations.
//!
//! [`Application::invoke_on_main_thread`](crate::Application::invoke_on_main_thread)
//! hands closures from background threads to the owning thread. The closure
//! itself cannot travel inside a [`MarqueeEvent`](crate::MarqueeEvent) (events
//! are plain data), so it parks here: the caller registers it, posts a
//! `QueuedInvoke` event carrying the registration ID, and the event loop
//! takes it back out and runs it. Fire-and-forget: a closure whose event is
//! never dispatched (loop gone) is simply dropped without running.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// A closure parked until the owning thread picks it up.
pub struct QueuedInvocation {
    func: Box<dyn FnOnce() + Send>,
}

impl QueuedInvocation {
    /// Park a closure for later execution on the owning thread.
    pub fn new<F>(func: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }

    /// Run the parked closure, consuming the invocation.
    pub fn execute(self) {
        (self.func)();
    }
}

/// Holds parked invocations keyed by the ID carried in the posted event.
#[derive(Default)]
pub struct InvocationRegistry {
    pending: Mutex<HashMap<u64, QueuedInvocation>>,
    next_id: AtomicU64,
}

impl InvocationRegistry {
    /// Park an invocation and return the ID to post with the event.
    pub fn register(&self, invocation: QueuedInvocation) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.pending.lock().insert(id, invocation);
        tracing::trace!(target: "horizon_marquee_core::invocation", id, "invocation parked");
        id
    }

    /// Withdraw a parked invocation.
    ///
    /// Returns `None` if it was already taken or withdrawn after a failed
    /// post.
    pub fn take(&self, id: u64) -> Option<QueuedInvocation> {
        self.pending.lock().remove(&id)
    }

    /// Number of invocations currently parked.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

/// The process-wide registry shared by all event-loop proxies.
pub fn invocation_registry() -> &'static InvocationRegistry {
    static REGISTRY: OnceLock<InvocationRegistry> = OnceLock::new();
    REGISTRY.get_or_init(InvocationRegistry::default)
}
