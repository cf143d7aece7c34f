//! Widget base implementation.
//!
//! This module provides `WidgetBase`, the common implementation details for
//! all widgets: geometry, visibility, and the attached-to-display flag.

use horizon_marquee_core::Signal;

use crate::geometry::{Rect, Size};

/// The base implementation for all widgets.
///
/// Widget implementations include this as a field and delegate common
/// operations to it.
///
/// # Example
///
/// ```ignore
/// use horizon_marquee::widget::{Widget, WidgetBase};
/// use horizon_marquee::geometry::Size;
///
/// struct MyWidget {
///     base: WidgetBase,
/// }
///
/// impl Widget for MyWidget {
///     fn widget_base(&self) -> &WidgetBase { &self.base }
///     fn widget_base_mut(&mut self) -> &mut WidgetBase { &mut self.base }
///
///     fn size_hint(&self) -> Size {
///         Size::new(100, 30)
///     }
/// }
/// ```
pub struct WidgetBase {
    /// The widget's geometry (position relative to parent and size).
    geometry: Rect,

    /// Whether the widget is visible.
    visible: bool,

    /// Whether the widget is attached to a display.
    attached: bool,

    /// Signal emitted when the geometry changes.
    pub geometry_changed: Signal<Rect>,

    /// Signal emitted when visibility changes.
    pub visible_changed: Signal<bool>,
}

impl WidgetBase {
    /// Create a new widget base.
    pub fn new() -> Self {
        Self {
            geometry: Rect::ZERO,
            visible: true,
            attached: false,
            geometry_changed: Signal::new(),
            visible_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Get the widget's geometry (position and size).
    #[inline]
    pub fn geometry(&self) -> Rect {
        self.geometry
    }

    /// Set the widget's geometry.
    ///
    /// This will emit `geometry_changed` if the geometry actually changed.
    pub fn set_geometry(&mut self, rect: Rect) {
        if self.geometry != rect {
            self.geometry = rect;
            self.geometry_changed.emit(rect);
        }
    }

    /// Get the widget's size.
    #[inline]
    pub fn size(&self) -> Size {
        self.geometry.size
    }

    /// Set the widget's size.
    pub fn set_size(&mut self, size: Size) {
        if self.geometry.size != size {
            let new_geometry = Rect {
                origin: self.geometry.origin,
                size,
            };
            self.geometry = new_geometry;
            self.geometry_changed.emit(new_geometry);
        }
    }

    /// Resize the widget.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.set_size(Size::new(width, height));
    }

    /// Get the widget's width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.geometry.size.width
    }

    /// Get the widget's height.
    #[inline]
    pub fn height(&self) -> i32 {
        self.geometry.size.height
    }

    /// Get a rectangle representing the widget's local coordinate space.
    ///
    /// This is always positioned at (0, 0) with the widget's size.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.geometry.size.width, self.geometry.size.height)
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// Check if the widget is visible.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the widget is visible.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.visible_changed.emit(visible);
        }
    }

    /// Show the widget.
    pub fn show(&mut self) {
        self.set_visible(true);
    }

    /// Hide the widget.
    pub fn hide(&mut self) {
        self.set_visible(false);
    }

    // =========================================================================
    // Attachment
    // =========================================================================

    /// Check if the widget is attached to a display.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Set the attached state (used by the lifecycle hooks).
    pub(crate) fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_geometry_change_emits_signal() {
        let mut base = WidgetBase::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        base.geometry_changed.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        base.set_geometry(Rect::new(0, 0, 100, 40));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Setting the same geometry again does not re-emit.
        base.set_geometry(Rect::new(0, 0, 100, 40));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resize_updates_size_only() {
        let mut base = WidgetBase::new();
        base.set_geometry(Rect::new(5, 6, 10, 10));
        base.resize(200, 40);
        assert_eq!(base.geometry(), Rect::new(5, 6, 200, 40));
        assert_eq!(base.rect(), Rect::new(0, 0, 200, 40));
    }

    #[test]
    fn test_visibility_toggles() {
        let mut base = WidgetBase::new();
        assert!(base.is_visible());
        base.hide();
        assert!(!base.is_visible());
        base.show();
        assert!(base.is_visible());
    }

    #[test]
    fn test_attached_defaults_off() {
        let mut base = WidgetBase::new();
        assert!(!base.is_attached());
        base.set_attached(true);
        assert!(base.is_attached());
    }
}
