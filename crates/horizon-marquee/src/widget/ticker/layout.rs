//! Layout builder for the ticker run.
//!
//! The builder arranges the items end-to-end in content coordinates: the
//! first real item is pushed one full viewport width to the right (it must
//! arrive from the edge, never start pre-visible), interior items get a small
//! fixed margin, the last real item trails out by another viewport width, and
//! an invisible sentinel cell closes the run. The sentinel entering the
//! viewport is what signals a completed cycle.

use crate::geometry::{ContentMargins, Rect, Size};

use super::TickerItem;

/// Margins applied between interior ticker cells.
pub const INTERIOR_MARGINS: ContentMargins = ContentMargins::new(10, 3, 5, 3);

/// Width of the sentinel cell: one ordinary inter-item margin.
const SENTINEL_WIDTH: i32 = INTERIOR_MARGINS.left;

/// One positioned cell of the ticker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutCell {
    /// Absolute bounds in content coordinates.
    rect: Rect,
    /// Margins that were applied around this cell.
    margins: ContentMargins,
    /// Whether the cell holds visible content. False only for the sentinel.
    visible: bool,
}

impl LayoutCell {
    /// Absolute bounds of the cell in content coordinates.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// The margins applied around this cell.
    #[inline]
    pub fn margins(&self) -> ContentMargins {
        self.margins
    }

    /// Whether the cell holds visible content.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// The computed linear arrangement of a ticker's items.
///
/// Built from an item sequence and the viewport size; immutable once built.
/// The sentinel cell is always the last element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerLayout {
    cells: Vec<LayoutCell>,
    viewport: Size,
    total_content_width: i32,
}

impl TickerLayout {
    /// Build the arrangement for the given items and viewport.
    ///
    /// Returns `None` for an empty item sequence or an empty viewport; in
    /// both cases no geometry exists for the engine to scroll over.
    ///
    /// Building is a pure function of its inputs: the same items and viewport
    /// always yield the same arrangement.
    pub fn build(items: &[Box<dyn TickerItem>], viewport: Size) -> Option<Self> {
        if items.is_empty() || viewport.is_empty() {
            return None;
        }

        let mut cells = Vec::with_capacity(items.len() + 1);
        let last = items.len() - 1;
        let mut x = 0;

        for (i, item) in items.iter().enumerate() {
            let size = item.preferred_size();
            let margins = ContentMargins {
                // Lead-in: the first item starts fully offscreen. The last
                // item's left margin is the interior trailing margin, not the
                // leading one.
                left: if i == 0 {
                    viewport.width
                } else if i == last {
                    INTERIOR_MARGINS.right
                } else {
                    INTERIOR_MARGINS.left
                },
                // Trail-out: the last item clears the viewport before the
                // sentinel arrives.
                right: if i == last {
                    viewport.width
                } else {
                    INTERIOR_MARGINS.right
                },
                ..INTERIOR_MARGINS
            };

            x += margins.left;
            cells.push(LayoutCell {
                rect: Rect::new(x, margins.top, size.width, size.height),
                margins,
                visible: true,
            });
            x += size.width + margins.right;
        }

        // The sentinel closes the run: zero content, one margin wide, tall
        // enough to intersect the viewport band.
        let margins = INTERIOR_MARGINS;
        let height = (viewport.height - margins.vertical()).max(1);
        x += margins.left;
        let rect = Rect::new(x, margins.top, SENTINEL_WIDTH, height);
        x += rect.width() + margins.right;
        cells.push(LayoutCell {
            rect,
            margins,
            visible: false,
        });

        Some(Self {
            cells,
            viewport,
            total_content_width: x,
        })
    }

    /// All cells in display order, sentinel last.
    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    /// Number of cells, including the sentinel.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The sentinel cell.
    pub fn sentinel(&self) -> &LayoutCell {
        // build() always appends the sentinel last.
        &self.cells[self.cells.len() - 1]
    }

    /// Absolute bounds of the sentinel in content coordinates.
    pub fn sentinel_bounds(&self) -> Rect {
        self.sentinel().rect
    }

    /// The viewport size this layout was built against.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Total scrollable span of the run, margins included.
    pub fn total_content_width(&self) -> i32 {
        self.total_content_width
    }
}
