//! Widget system for Horizon Marquee.
//!
//! This module provides the widget architecture:
//!
//! - [`Widget`] trait: The base trait for all UI elements
//! - [`WidgetBase`]: Common implementation for widget functionality
//! - [`TextLabel`]: A minimal text widget used as ticker content
//! - [`ticker`]: The auto-scrolling ticker view and its engine
//!
//! Each widget contains a [`WidgetBase`] that handles common state and
//! implements the [`Widget`] trait on top of it.

mod base;
mod label;
pub mod ticker;
mod traits;

pub use base::WidgetBase;
pub use label::TextLabel;
pub use ticker::{TickerItem, TickerView};
pub use traits::Widget;
