//! The scroll output seam.
//!
//! The ticker engine drives exactly one output: a horizontal scroll offset.
//! [`ScrollSurface`] is the seam between the engine and whatever actually
//! displays that offset. The engine distinguishes two motions: an immediate
//! jump (used to hide the wrap-around rewind) and a smooth glide (the
//! ordinary per-tick step). A surface that cannot animate may treat both the
//! same; the engine's correctness does not depend on animation.

use parking_lot::Mutex;
use std::sync::Arc;

/// A rendering surface that consumes scroll offsets.
///
/// Implementations must be `Send` because the view that owns the surface may
/// be driven from an event-handler closure handed across threads.
pub trait ScrollSurface: Send {
    /// Apply the offset immediately, with no animation.
    ///
    /// Used on wrap-around so the rewind is an instant cut rather than a
    /// visible fast-rewind.
    fn jump_to(&mut self, offset: i32);

    /// Transition smoothly toward the offset.
    fn glide_to(&mut self, offset: i32);
}

/// A single applied scroll motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Immediate, non-animated application of an offset.
    Jump(i32),
    /// Smooth transition toward an offset.
    Glide(i32),
}

impl Motion {
    /// The target offset of this motion.
    pub fn offset(&self) -> i32 {
        match *self {
            Motion::Jump(offset) | Motion::Glide(offset) => offset,
        }
    }
}

/// A [`ScrollSurface`] that records every applied motion.
///
/// Used by tests and the demo to observe the jump/glide asymmetry without a
/// real display. Clones share the same motion log, so a host can keep a
/// clone for inspection while the view owns the original.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    motions: Arc<Mutex<Vec<Motion>>>,
}

impl RecordingSurface {
    /// Create a new, empty recording surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded motions, in application order.
    pub fn motions(&self) -> Vec<Motion> {
        self.motions.lock().clone()
    }

    /// The most recently applied motion, if any.
    pub fn last(&self) -> Option<Motion> {
        self.motions.lock().last().copied()
    }

    /// Number of motions applied so far.
    pub fn len(&self) -> usize {
        self.motions.lock().len()
    }

    /// Check whether any motion has been applied.
    pub fn is_empty(&self) -> bool {
        self.motions.lock().is_empty()
    }

    /// Discard all recorded motions.
    pub fn clear(&self) {
        self.motions.lock().clear();
    }
}

impl ScrollSurface for RecordingSurface {
    fn jump_to(&mut self, offset: i32) {
        self.motions.lock().push(Motion::Jump(offset));
    }

    fn glide_to(&mut self, offset: i32) {
        self.motions.lock().push(Motion::Glide(offset));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_preserves_order_and_kind() {
        let mut surface = RecordingSurface::new();
        surface.glide_to(3);
        surface.glide_to(6);
        surface.jump_to(0);

        assert_eq!(
            surface.motions(),
            vec![Motion::Glide(3), Motion::Glide(6), Motion::Jump(0)]
        );
        assert_eq!(surface.last(), Some(Motion::Jump(0)));
    }

    #[test]
    fn test_clones_share_the_log() {
        let mut surface = RecordingSurface::new();
        let observer = surface.clone();

        surface.glide_to(5);
        assert_eq!(observer.len(), 1);
        assert_eq!(observer.last(), Some(Motion::Glide(5)));

        observer.clear();
        assert!(surface.is_empty());
    }

    #[test]
    fn test_motion_offset() {
        assert_eq!(Motion::Jump(0).offset(), 0);
        assert_eq!(Motion::Glide(42).offset(), 42);
    }
}
