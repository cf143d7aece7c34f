//! Owning-thread checks.
//!
//! Item sequences, layout geometry, and scroll state belong to exactly one
//! thread: the one that created the [`Application`](crate::Application) and
//! drains its event loop. Background threads never touch that state directly;
//! they hand work off through the event channel or
//! [`Application::invoke_on_main_thread`](crate::Application::invoke_on_main_thread).
//!
//! The owning thread is recorded by `Application::new()`. Mutating widget
//! entry points guard themselves with [`debug_assert_main_thread!`], which is
//! free in release builds; [`assert_main_thread!`] is the always-on variant
//! for paths where the check must survive into release.

use std::sync::OnceLock;
use std::thread::ThreadId;

/// The recorded owning thread, set once at application startup.
static MAIN_THREAD_ID: OnceLock<ThreadId> = OnceLock::new();

/// Record the calling thread as the owning thread.
///
/// Called by `Application::new()`. Calling it again from the same thread is
/// a no-op.
///
/// # Panics
///
/// Panics if the owning thread was already recorded as a different thread.
pub fn set_main_thread() {
    let current = std::thread::current().id();
    if MAIN_THREAD_ID.set(current).is_err() && MAIN_THREAD_ID.get() != Some(&current) {
        panic!("owning thread already recorded as a different thread");
    }
}

/// The owning thread's ID, if one has been recorded.
#[inline]
pub fn main_thread_id() -> Option<ThreadId> {
    MAIN_THREAD_ID.get().copied()
}

/// Whether the calling thread is the owning thread.
///
/// Before `Application::new()` records an owning thread this returns `true`,
/// so early construction (building widgets before the application exists)
/// passes the guards.
#[inline]
pub fn is_main_thread() -> bool {
    match MAIN_THREAD_ID.get() {
        Some(&main_id) => std::thread::current().id() == main_id,
        None => true,
    }
}

/// Panic unless called on the owning thread. Active in all builds.
#[macro_export]
macro_rules! assert_main_thread {
    () => {
        $crate::assert_main_thread!("widget state touched off the owning thread")
    };
    ($msg:expr) => {
        if !$crate::thread_check::is_main_thread() {
            $crate::thread_check::panic_not_main_thread($msg, file!(), line!());
        }
    };
}

/// Debug-build-only owning-thread assertion.
///
/// Compiles to nothing in release builds, so mutating widget entry points
/// can carry it unconditionally.
#[macro_export]
macro_rules! debug_assert_main_thread {
    () => {
        #[cfg(debug_assertions)]
        $crate::assert_main_thread!()
    };
    ($msg:expr) => {
        #[cfg(debug_assertions)]
        $crate::assert_main_thread!($msg)
    };
}

/// Panic path for the assertion macros.
#[cold]
#[inline(never)]
#[doc(hidden)]
pub fn panic_not_main_thread(msg: &str, file: &str, line: u32) -> ! {
    let current = std::thread::current();
    panic!(
        "{msg} ({file}:{line}): current thread {:?} ({:?}) is not the owning thread {:?}; \
         marshal the call with Application::invoke_on_main_thread or post an event \
         through the EventLoopProxy",
        current.name().unwrap_or("<unnamed>"),
        current.id(),
        main_thread_id(),
    );
}
