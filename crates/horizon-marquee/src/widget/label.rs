//! Text label widget implementation.
//!
//! This module provides [`TextLabel`], a minimal text widget used as ticker
//! content. Without a text-shaping backend the label sizes itself from a
//! fixed per-glyph advance, which is all the ticker engine needs: it treats
//! items as opaque boxes and only reads their preferred size.
//!
//! # Example
//!
//! ```
//! use horizon_marquee::widget::TextLabel;
//!
//! let label = TextLabel::new("42").with_char_advance(10);
//! assert_eq!(label.text(), "42");
//! ```

use horizon_marquee_core::Signal;

use crate::geometry::Size;
use crate::widget::ticker::TickerItem;
use crate::widget::{Widget, WidgetBase};

/// Default horizontal advance per glyph, in pixels.
const DEFAULT_CHAR_ADVANCE: i32 = 9;

/// Default line height, in pixels.
const DEFAULT_LINE_HEIGHT: i32 = 18;

/// A single-line text label.
///
/// # Signals
///
/// - `text_changed(String)`: Emitted when the text changes
pub struct TextLabel {
    /// Widget base.
    base: WidgetBase,

    /// The displayed text.
    text: String,

    /// Horizontal advance per glyph.
    char_advance: i32,

    /// Height of the single text line.
    line_height: i32,

    /// Signal emitted when the text changes.
    pub text_changed: Signal<String>,
}

impl TextLabel {
    /// Create a new label with the given text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            base: WidgetBase::new(),
            text: text.into(),
            char_advance: DEFAULT_CHAR_ADVANCE,
            line_height: DEFAULT_LINE_HEIGHT,
            text_changed: Signal::new(),
        }
    }

    /// Get the label's text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the label's text.
    ///
    /// This will emit `text_changed` if the text actually changed.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text.clone();
            self.text_changed.emit(text);
        }
    }

    /// Set the per-glyph advance using the builder pattern.
    pub fn with_char_advance(mut self, advance: i32) -> Self {
        self.char_advance = advance.max(1);
        self
    }

    /// Set the line height using the builder pattern.
    pub fn with_line_height(mut self, height: i32) -> Self {
        self.line_height = height.max(1);
        self
    }

    /// Get the per-glyph advance.
    pub fn char_advance(&self) -> i32 {
        self.char_advance
    }

    /// Get the line height.
    pub fn line_height(&self) -> i32 {
        self.line_height
    }
}

impl Widget for TextLabel {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> Size {
        let glyphs = self.text.chars().count() as i32;
        Size::new(glyphs * self.char_advance, self.line_height)
    }
}

impl TickerItem for TextLabel {
    fn preferred_size(&self) -> Size {
        self.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_size_hint_scales_with_text() {
        let short = TextLabel::new("7").with_char_advance(10).with_line_height(20);
        let long = TextLabel::new("4711").with_char_advance(10).with_line_height(20);

        assert_eq!(short.size_hint(), Size::new(10, 20));
        assert_eq!(long.size_hint(), Size::new(40, 20));
    }

    #[test]
    fn test_preferred_size_matches_hint() {
        let label = TextLabel::new("tick");
        assert_eq!(label.preferred_size(), label.size_hint());
    }

    #[test]
    fn test_set_text_emits_once_per_change() {
        let mut label = TextLabel::new("a");
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        label.text_changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        label.set_text("b");
        label.set_text("b");
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(label.text(), "b");
    }
}
