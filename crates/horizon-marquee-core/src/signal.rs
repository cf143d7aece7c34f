//! Signal/slot notifications for widget state changes.
//!
//! A [`Signal`] is a typed notification source: the ticker exposes one per
//! observable change (offset applied, wrap-around, speed change) and hosts
//! connect closures to them. Delivery is direct: `emit` runs every connected
//! slot inline on the emitting thread, which for widget signals is always the
//! owning thread. Cross-thread traffic in this toolkit rides the event-loop
//! channel, not signals, so there is no queued delivery mode here.
//!
//! Slots receive the emitted value by reference and may themselves connect or
//! disconnect slots on the same signal: `emit` snapshots the connection table
//! before invoking anything, so mutation during delivery never deadlocks.
//! Connections made while an emit is in flight are first invoked on the next
//! emit.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use static_assertions::assert_impl_all;

new_key_type! {
    /// Identifies one signal/slot connection.
    ///
    /// Returned by [`Signal::connect`]; pass it to [`Signal::disconnect`] to
    /// remove that slot.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type SlotTable<Args> = Arc<Mutex<SlotMap<ConnectionId, Slot<Args>>>>;

/// A typed notification source with direct (inline) slot delivery.
///
/// # Example
///
/// ```
/// use horizon_marquee_core::Signal;
///
/// let scrolled = Signal::<i32>::new();
/// let id = scrolled.connect(|offset| println!("offset now {offset}"));
///
/// scrolled.emit(42);
/// scrolled.disconnect(id);
/// ```
pub struct Signal<Args> {
    connections: SlotTable<Args>,
}

assert_impl_all!(Signal<i32>: Send, Sync);

impl<Args> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Connect a slot.
    ///
    /// The slot runs inline on whichever thread calls [`emit`](Self::emit)
    /// and receives the emitted value by reference.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connections.lock().insert(Arc::new(slot));
        tracing::trace!(target: "horizon_marquee_core::signal", ?id, "slot connected");
        id
    }

    /// Connect a slot whose lifetime is tied to the returned guard.
    ///
    /// The connection is removed when the [`ConnectionGuard`] drops, so a
    /// host can scope an observer to a stack frame instead of tracking the
    /// ID manually.
    pub fn connect_scoped<F>(&self, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        ConnectionGuard {
            connections: self.connections.clone(),
            id: self.connect(slot),
        }
    }

    /// Remove one connection. Returns whether it was still present.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let removed = self.connections.lock().remove(id).is_some();
        if removed {
            tracing::trace!(target: "horizon_marquee_core::signal", ?id, "slot disconnected");
        }
        removed
    }

    /// Remove every connection.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Invoke every connected slot with a reference to `args`.
    ///
    /// The connection table is snapshotted first, so slots may connect or
    /// disconnect on this same signal without deadlocking; such changes take
    /// effect from the next emit.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(
            target: "horizon_marquee_core::signal",
            slots = slots.len(),
            "emitting"
        );
        for slot in slots {
            slot(&args);
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Clone for Signal<Args> {
    fn clone(&self) -> Self {
        Self {
            connections: self.connections.clone(),
        }
    }
}

/// Disconnects its connection when dropped.
///
/// Created by [`Signal::connect_scoped`]. The guard holds the connection
/// table alive independently of the signal's owner, so it stays valid even
/// if the owning widget is dropped first.
pub struct ConnectionGuard<Args> {
    connections: SlotTable<Args>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        self.connections.lock().remove(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

    #[test]
    fn test_emit_delivers_value_to_slot() {
        let scrolled = Signal::<i32>::new();
        let seen = Arc::new(AtomicI32::new(-1));

        let seen_clone = seen.clone();
        scrolled.connect(move |offset| {
            seen_clone.store(*offset, Ordering::SeqCst);
        });

        scrolled.emit(37);
        assert_eq!(seen.load(Ordering::SeqCst), 37);
    }

    #[test]
    fn test_all_slots_run_per_emit() {
        let signal = Signal::<()>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            signal.connect(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(signal.connection_count(), 3);

        signal.emit(());
        signal.emit(());
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn test_disconnect_stops_delivery() {
        let signal = Signal::<i32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let calls_clone = calls.clone();
        let id = signal.connect(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        signal.emit(1);
        assert!(signal.disconnect(id));
        signal.emit(2);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // Second disconnect finds nothing.
        assert!(!signal.disconnect(id));
    }

    #[test]
    fn test_emit_with_no_connections_is_harmless() {
        let signal = Signal::<i32>::new();
        signal.emit(5);
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn test_emit_runs_inline_on_the_emitting_thread() {
        let signal = Signal::<i32>::new();
        let sum = Arc::new(AtomicI32::new(0));

        let sum_clone = sum.clone();
        signal.connect(move |n| {
            sum_clone.fetch_add(*n, Ordering::SeqCst);
        });

        let worker = signal.clone();
        std::thread::spawn(move || {
            worker.emit(10);
        })
        .join()
        .unwrap();

        // Direct delivery: the slot already ran by the time the thread joined.
        assert_eq!(sum.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_slot_may_connect_during_emit() {
        let signal = Signal::<i32>::new();
        let late_calls = Arc::new(AtomicUsize::new(0));

        let inner_signal = signal.clone();
        let late_calls_clone = late_calls.clone();
        signal.connect(move |_| {
            let late_calls = late_calls_clone.clone();
            inner_signal.connect(move |_| {
                late_calls.fetch_add(1, Ordering::SeqCst);
            });
        });

        // The snapshot keeps the first emit from running the new slot.
        signal.emit(0);
        assert_eq!(late_calls.load(Ordering::SeqCst), 0);

        signal.emit(0);
        assert_eq!(late_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_scoped_connection_drops_with_guard() {
        let signal = Signal::<i32>::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = calls.clone();
            let _guard = signal.connect_scoped(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
            signal.emit(1);
            assert_eq!(signal.connection_count(), 1);
        }

        signal.emit(2);
        assert_eq!(signal.connection_count(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disconnect_all_clears_every_slot() {
        let signal = Signal::<i32>::new();
        signal.connect(|_| {});
        signal.connect(|_| {});

        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }
}
