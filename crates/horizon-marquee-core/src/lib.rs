//! Core systems for Horizon Marquee.
//!
//! This crate provides the foundational components of the Horizon Marquee
//! widget toolkit:
//!
//! - **Event Loop**: A channel-driven event loop that dispatches all work on
//!   the owning thread, in the order it was posted
//! - **Application**: Global application state and lifecycle management
//! - **Signal/Slot System**: Type-safe widget notifications with direct
//!   (inline) delivery
//! - **Timers**: One-shot and repeating timers driven by a dedicated timer
//!   thread that hands fires to the event loop
//! - **Queued Invocations**: Marshalling closures from background threads
//!   onto the owning thread
//! - **Thread Checks**: Owning-thread assertions guarding widget state
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_marquee_core::Signal;
//!
//! // Create a signal that notifies when the scroll offset changes
//! let scrolled = Signal::<i32>::new();
//!
//! // Connect a slot to handle the signal
//! let conn_id = scrolled.connect(|offset| {
//!     println!("Scrolled to: {}", offset);
//! });
//!
//! // Emit the signal
//! scrolled.emit(42);
//!
//! // Disconnect when done
//! scrolled.disconnect(conn_id);
//! ```
//!
//! # Event Loop Example
//!
//! ```no_run
//! use horizon_marquee_core::{Application, MarqueeEvent};
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::new()?;
//!
//!     // Set up an event handler
//!     app.set_event_handler(|event| {
//!         match event {
//!             MarqueeEvent::Timer { id } => {
//!                 println!("Timer {:?} fired!", id);
//!             }
//!             _ => {}
//!         }
//!     });
//!
//!     // Start a repeating timer
//!     let _timer_id = app.start_repeating_timer(Duration::from_millis(30));
//!
//!     // Run the event loop (blocks until quit)
//!     Ok(app.run()?)
//! }
//! ```

mod application;
mod error;
mod event;
pub mod invocation;
pub mod signal;
pub mod thread_check;
mod timer;

pub use application::{Application, EventLoopProxy};
pub use error::{MarqueeError, Result, TimerError};
pub use event::MarqueeEvent;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use thread_check::{is_main_thread, main_thread_id};
pub use timer::{TimerId, TimerKind};
