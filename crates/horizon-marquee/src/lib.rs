//! Horizon Marquee - an auto-scrolling ticker widget with a headless engine.
//!
//! The crate provides [`TickerView`](widget::TickerView), a widget that lays
//! out an ordered run of items end-to-end and scrolls it horizontally on a
//! fixed cadence, looping seamlessly when the run has passed the viewport.
//! Scroll output goes through the [`ScrollSurface`](widget::ticker::ScrollSurface)
//! seam, so the engine runs the same against a real display or a recording
//! test surface.
//!
//! # Example
//!
//! ```no_run
//! use horizon_marquee::geometry::Rect;
//! use horizon_marquee::widget::ticker::{RecordingSurface, TickerView};
//! use horizon_marquee::widget::{TextLabel, Widget};
//! use horizon_marquee::{Application, MarqueeEvent};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::new()?;
//!
//!     let mut ticker = TickerView::new(Box::new(RecordingSurface::new()));
//!     ticker.set_geometry(Rect::new(0, 0, 480, 40));
//!     ticker.set_items(
//!         (1..=50)
//!             .map(|n| Box::new(TextLabel::new(n.to_string())) as _)
//!             .collect(),
//!     );
//!     ticker.set_speed_percent(40);
//!     ticker.notify_attached();
//!
//!     // Drive ticks from the event loop...
//!     Ok(app.run()?)
//! }
//! ```

pub mod error;
pub mod geometry;
pub mod widget;

pub use error::{TickerError, TickerResult};
pub use geometry::{ContentMargins, Point, Rect, Size};
pub use widget::{TextLabel, TickerItem, TickerView, Widget, WidgetBase};

// Core re-exports so hosts only need one dependency.
pub use horizon_marquee_core::{
    Application, ConnectionGuard, ConnectionId, EventLoopProxy, MarqueeError, MarqueeEvent,
    Signal, TimerId,
};
