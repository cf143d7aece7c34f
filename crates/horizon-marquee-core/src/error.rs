//! Error types for Horizon Marquee.

use std::fmt;

/// The main error type for Horizon Marquee operations.
#[derive(Debug)]
pub enum MarqueeError {
    /// Application has already been initialized.
    ApplicationAlreadyInitialized,
    /// The event loop has already exited or its receiver was consumed.
    ///
    /// Posting an event after the loop is gone fails with this variant; the
    /// timer thread treats it as a dropped hand-off.
    EventLoopExited,
    /// Timer-related error.
    Timer(TimerError),
}

impl fmt::Display for MarqueeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApplicationAlreadyInitialized => {
                write!(f, "Application has already been initialized")
            }
            Self::EventLoopExited => {
                write!(f, "The event loop has already exited")
            }
            Self::Timer(err) => write!(f, "Timer error: {err}"),
        }
    }
}

impl std::error::Error for MarqueeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Timer(err) => Some(err),
            _ => None,
        }
    }
}

/// Timer-specific errors.
#[derive(Debug)]
pub enum TimerError {
    /// The timer ID is invalid or has already been removed.
    InvalidTimerId,
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimerId => write!(f, "Invalid or expired timer ID"),
        }
    }
}

impl std::error::Error for TimerError {}

impl From<TimerError> for MarqueeError {
    fn from(err: TimerError) -> Self {
        Self::Timer(err)
    }
}

/// A specialized Result type for Horizon Marquee operations.
pub type Result<T> = std::result::Result<T, MarqueeError>;
