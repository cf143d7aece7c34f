//! Event types carried by the Horizon Marquee event loop.

use crate::timer::TimerId;

/// Events dispatched through the Horizon Marquee event loop.
///
/// Events are posted through an [`EventLoopProxy`](crate::EventLoopProxy)
/// from any thread and drained on the owning thread by
/// [`Application::run`](crate::Application::run). The channel preserves issue
/// order, so events are always delivered in the order they were posted.
#[derive(Debug, Clone)]
pub enum MarqueeEvent {
    /// A timer has fired.
    Timer {
        /// The timer that fired.
        id: TimerId,
    },

    /// A queued invocation (for cross-thread slot or closure delivery).
    QueuedInvoke {
        /// Unique identifier for this queued invocation.
        invocation_id: u64,
    },

    /// Request to quit the application.
    Quit,

    /// Wake up the event loop (for polling changes).
    WakeUp,
}
