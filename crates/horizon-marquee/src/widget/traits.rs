//! Core widget trait definitions.
//!
//! This module defines the [`Widget`] trait which is the foundation for all
//! UI elements in Horizon Marquee.

use crate::geometry::{Rect, Size};

use super::base::WidgetBase;

/// The base trait for all UI elements.
///
/// Widgets delegate their common state to an embedded [`WidgetBase`] and
/// provide a [`size_hint`](Widget::size_hint) for layout.
pub trait Widget {
    /// Get a reference to the widget's base.
    fn widget_base(&self) -> &WidgetBase;

    /// Get a mutable reference to the widget's base.
    fn widget_base_mut(&mut self) -> &mut WidgetBase;

    /// The size the widget would like to have.
    fn size_hint(&self) -> Size;

    /// Get the widget's geometry (position and size).
    fn geometry(&self) -> Rect {
        self.widget_base().geometry()
    }

    /// Set the widget's geometry.
    fn set_geometry(&mut self, rect: Rect) {
        self.widget_base_mut().set_geometry(rect);
    }

    /// Get the widget's size.
    fn size(&self) -> Size {
        self.widget_base().size()
    }

    /// Check if the widget is visible.
    fn is_visible(&self) -> bool {
        self.widget_base().is_visible()
    }

    /// Set whether the widget is visible.
    fn set_visible(&mut self, visible: bool) {
        self.widget_base_mut().set_visible(visible);
    }

    /// Show the widget.
    fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the widget.
    fn hide(&mut self) {
        self.set_visible(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        base: WidgetBase,
        hint: Size,
    }

    impl Widget for Fixed {
        fn widget_base(&self) -> &WidgetBase {
            &self.base
        }

        fn widget_base_mut(&mut self) -> &mut WidgetBase {
            &mut self.base
        }

        fn size_hint(&self) -> Size {
            self.hint
        }
    }

    #[test]
    fn test_default_methods_delegate_to_base() {
        let mut widget = Fixed {
            base: WidgetBase::new(),
            hint: Size::new(80, 30),
        };

        widget.set_geometry(Rect::new(1, 2, 3, 4));
        assert_eq!(widget.geometry(), Rect::new(1, 2, 3, 4));
        assert_eq!(widget.size(), Size::new(3, 4));
        assert_eq!(widget.size_hint(), Size::new(80, 30));

        widget.hide();
        assert!(!widget.is_visible());
        widget.show();
        assert!(widget.is_visible());
    }
}
