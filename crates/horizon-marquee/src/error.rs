//! Error types for the widget crate.

use thiserror::Error;

/// Errors that can occur while driving the ticker engine.
#[derive(Error, Debug)]
pub enum TickerError {
    /// Geometry was queried before a layout pass completed.
    ///
    /// A tick that hits this error is skipped; scroll state is left
    /// unchanged until the next tick.
    #[error("layout has not completed a pass yet")]
    LayoutNotReady,

    /// The scroll surface is no longer attached to a display.
    #[error("scroll surface is detached")]
    SurfaceDetached,

    /// An error from the core application layer.
    #[error(transparent)]
    Core(#[from] horizon_marquee_core::MarqueeError),
}

/// Result type for ticker operations.
pub type TickerResult<T> = Result<T, TickerError>;
