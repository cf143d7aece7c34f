//! The auto-scrolling ticker widget.
//!
//! [`TickerView`] lays out an ordered sequence of opaque items end-to-end,
//! advances a horizontal scroll offset on a fixed 30 ms cadence, and loops
//! seamlessly: when the invisible sentinel cell at the end of the run enters
//! the viewport, the offset snaps back to zero with an instant jump so the
//! rewind is never visible.
//!
//! The engine never inspects item content; it only reads preferred sizes
//! through [`TickerItem`]. All scroll and layout state is owned by the thread
//! that runs the application's event loop — the timer thread only requests
//! hand-offs, and [`TickerView::handle_timer`] applies them.
//!
//! # Example
//!
//! ```
//! use horizon_marquee::geometry::{Rect, Size};
//! use horizon_marquee::widget::ticker::{RecordingSurface, TickerView};
//! use horizon_marquee::widget::{TextLabel, Widget};
//!
//! let surface = RecordingSurface::new();
//! let mut ticker = TickerView::new(Box::new(surface.clone()));
//! ticker.set_geometry(Rect::new(0, 0, 480, 40));
//!
//! ticker.set_items(
//!     (1..=50)
//!         .map(|n| Box::new(TextLabel::new(n.to_string())) as _)
//!         .collect(),
//! );
//! ticker.set_speed_percent(40);
//! ticker.notify_attached();
//! ```

mod layout;
mod scheduler;
mod surface;

pub use layout::{INTERIOR_MARGINS, LayoutCell, TickerLayout};
pub use scheduler::{AppTimerService, ScrollScheduler, TICK_INTERVAL, TimerService};
pub use surface::{Motion, RecordingSurface, ScrollSurface};

use horizon_marquee_core::{Signal, TimerId, debug_assert_main_thread};
use static_assertions::assert_impl_all;

use crate::error::TickerError;
use crate::geometry::{Point, Rect, Size};
use crate::widget::{Widget, WidgetBase};

/// Tracing target for the ticker engine.
const TICKER: &str = "horizon_marquee::ticker";

/// An opaque renderable unit the ticker can scroll.
///
/// The engine only reads the preferred size; content stays opaque. `Send` is
/// required because items travel with the view into event-handler closures.
pub trait TickerItem: Send {
    /// The size the item wants to occupy in the run.
    fn preferred_size(&self) -> Size;
}

/// Where the view is in its display lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Not attached to a display; nothing is scheduled.
    #[default]
    Detached,
    /// Attached, layout requested, waiting for the pass to complete.
    AwaitingLayout,
    /// Layout complete; the scroll schedule may be armed.
    Active,
}

/// The scroll position and per-tick step.
///
/// `displacement` is derived from `input_speed_percent` via
/// `ceil(percent * 5 / 100)` and kept as a separate field: the raw-unit
/// getter reports it directly rather than re-inverting the formula.
#[derive(Debug, Clone, Copy, Default)]
struct ScrollState {
    /// Current horizontal offset, within `[0, total_content_width]`.
    offset: i32,
    /// Per-tick offset increment, in raw units (0..=5).
    displacement: i32,
    /// The speed percentage the host last supplied, clamped to 0..=100.
    input_speed_percent: u16,
}

/// One-shot token for the "layout completed" notification.
///
/// Armed when a rebuild starts, consumed exactly once when the surface
/// reports completion; later notifications find it gone and do nothing.
#[derive(Debug)]
struct LayoutCompletion;

/// A horizontally auto-scrolling ticker.
///
/// # Signals
///
/// - `scrolled(i32)`: Emitted after every applied advance
/// - `wrapped(())`: Emitted on each reset-to-zero
/// - `speed_changed(u16)`: Emitted when the percentage changes the displacement
/// - `items_changed(usize)`: Emitted after content is replaced or appended
pub struct TickerView {
    /// Widget base.
    base: WidgetBase,

    /// The content sequence, in display order. Never reordered.
    items: Vec<Box<dyn TickerItem>>,

    /// The computed arrangement, absent until a rebuild succeeds.
    layout: Option<TickerLayout>,

    /// Scroll offset and speed.
    scroll: ScrollState,

    /// The periodic-tick registration.
    scheduler: ScrollScheduler,

    /// The rendering surface consuming scroll offsets.
    surface: Box<dyn ScrollSurface>,

    /// Display lifecycle.
    lifecycle: LifecycleState,

    /// Armed by a rebuild, consumed by the layout-completion notification.
    layout_completion: Option<LayoutCompletion>,

    /// Signal emitted after every applied advance.
    pub scrolled: Signal<i32>,

    /// Signal emitted on each wrap-around reset.
    pub wrapped: Signal<()>,

    /// Signal emitted when a speed change takes effect.
    pub speed_changed: Signal<u16>,

    /// Signal emitted after content is replaced or appended.
    pub items_changed: Signal<usize>,
}

assert_impl_all!(TickerView: Send);

impl TickerView {
    /// Create a ticker driving the given surface, scheduled through the
    /// global application's timer service.
    pub fn new(surface: Box<dyn ScrollSurface>) -> Self {
        Self::with_timer_service(surface, Box::new(AppTimerService))
    }

    /// Create a ticker with an explicit timer service.
    pub fn with_timer_service(
        surface: Box<dyn ScrollSurface>,
        timers: Box<dyn TimerService>,
    ) -> Self {
        Self {
            base: WidgetBase::new(),
            items: Vec::new(),
            layout: None,
            scroll: ScrollState::default(),
            scheduler: ScrollScheduler::with_service(timers),
            surface,
            lifecycle: LifecycleState::Detached,
            layout_completion: None,
            scrolled: Signal::new(),
            wrapped: Signal::new(),
            speed_changed: Signal::new(),
            items_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the content sequence and rebuild the layout.
    pub fn set_items(&mut self, items: Vec<Box<dyn TickerItem>>) {
        debug_assert_main_thread!();
        self.items = items;
        self.items_changed.emit(self.items.len());
        self.rebuild_and_show();
    }

    /// Append one item to the content sequence.
    ///
    /// Does not rebuild; call [`rebuild_and_show`](Self::rebuild_and_show)
    /// when the batch is complete.
    pub fn add_item(&mut self, item: Box<dyn TickerItem>) {
        debug_assert_main_thread!();
        self.items.push(item);
        self.items_changed.emit(self.items.len());
    }

    /// Number of items in the content sequence.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    // =========================================================================
    // Layout and lifecycle
    // =========================================================================

    /// Rebuild the layout and, once the pass completes, arm the scroll
    /// schedule.
    ///
    /// Any schedule referencing the old layout is stopped first. With no
    /// items (or no viewport geometry yet) the engine stays idle: no layout,
    /// no schedule, offset untouched. Otherwise the scroll offset resets to
    /// zero and the one-shot layout-completion notification is armed; the
    /// in-process layout pass completes synchronously, so the notification is
    /// consumed before this returns.
    pub fn rebuild_and_show(&mut self) {
        debug_assert_main_thread!();
        self.scheduler.stop();

        if self.items.is_empty() {
            self.layout = None;
            tracing::debug!(target: TICKER, "no items; ticker stays idle");
            return;
        }

        let viewport = self.base.size();
        self.layout = TickerLayout::build(&self.items, viewport);
        let Some(layout) = &self.layout else {
            tracing::warn!(
                target: TICKER,
                ?viewport,
                "viewport has no geometry; layout deferred"
            );
            return;
        };

        tracing::debug!(
            target: TICKER,
            cells = layout.cell_count(),
            total_width = layout.total_content_width(),
            "layout rebuilt"
        );

        self.scroll.offset = 0;
        self.surface.jump_to(0);
        self.scrolled.emit(0);

        self.layout_completion = Some(LayoutCompletion);
        self.notify_layout_complete();
    }

    /// Consume the one-shot layout-completion notification and arm the
    /// schedule.
    ///
    /// The first call after a rebuild takes the token; any further calls
    /// find it consumed and do nothing. Scheduling only happens while
    /// attached — a detached view swallows the notification and re-runs the
    /// layout pass on the next attach.
    pub fn notify_layout_complete(&mut self) {
        debug_assert_main_thread!();
        if self.layout_completion.take().is_none() {
            return;
        }

        if !self.base.is_attached() {
            return;
        }

        self.lifecycle = LifecycleState::Active;
        self.scheduler.start(self.scroll.displacement);
    }

    /// Lifecycle hook: the view was attached to a display.
    ///
    /// Triggers a layout pass and, once it completes, arms the schedule.
    pub fn notify_attached(&mut self) {
        debug_assert_main_thread!();
        tracing::debug!(target: TICKER, "attached to display");
        self.base.set_attached(true);
        self.lifecycle = LifecycleState::AwaitingLayout;
        self.rebuild_and_show();
    }

    /// Lifecycle hook: the view was detached from the display.
    ///
    /// Stops the schedule unconditionally and synchronously; all timer
    /// resources are released before this returns.
    pub fn notify_detached(&mut self) {
        debug_assert_main_thread!();
        tracing::debug!(target: TICKER, "detached from display");
        self.scheduler.stop();
        self.lifecycle = LifecycleState::Detached;
        self.base.set_attached(false);
    }

    /// Current lifecycle state.
    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// The computed layout, if a pass has completed.
    pub fn layout(&self) -> Option<&TickerLayout> {
        self.layout.as_ref()
    }

    /// Whether the scroll schedule is currently armed.
    pub fn is_scrolling(&self) -> bool {
        self.scheduler.is_armed()
    }

    // =========================================================================
    // Speed
    // =========================================================================

    /// Set the scroll speed as a percentage in 0..=100.
    ///
    /// Out-of-range input is clamped. The derived displacement is
    /// `ceil(percent * 5 / 100)` raw units per tick and takes effect on the
    /// next tick; it does not arm a schedule by itself.
    pub fn set_speed_percent(&mut self, percent: u16) {
        debug_assert_main_thread!();
        let clamped = percent.min(100);
        if clamped != percent {
            tracing::warn!(target: TICKER, percent, clamped, "speed percentage out of range");
        }

        self.scroll.input_speed_percent = clamped;
        let displacement = displacement_for_percent(clamped);
        if displacement != self.scroll.displacement {
            self.scroll.displacement = displacement;
            tracing::debug!(target: TICKER, percent = clamped, displacement, "speed changed");
            self.speed_changed.emit(clamped);
        }
    }

    /// The speed percentage the host last supplied.
    pub fn input_speed_percent(&self) -> u16 {
        self.scroll.input_speed_percent
    }

    /// The per-tick displacement in raw units.
    ///
    /// Deliberately not the inverse of [`set_speed_percent`](Self::set_speed_percent):
    /// the setter takes a 0..=100 percentage, this getter reports the derived
    /// internal step directly.
    pub fn speed_units(&self) -> i32 {
        self.scroll.displacement
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Current horizontal scroll offset.
    pub fn scroll_x(&self) -> i32 {
        self.scroll.offset
    }

    /// Jump to a horizontal offset, clamped to the scrollable span.
    pub fn set_scroll_x(&mut self, x: i32) {
        debug_assert_main_thread!();
        let max_x = self
            .layout
            .as_ref()
            .map_or(0, TickerLayout::total_content_width);
        let clamped = x.clamp(0, max_x);
        if self.scroll.offset != clamped {
            self.scroll.offset = clamped;
            self.surface.jump_to(clamped);
            self.scrolled.emit(clamped);
        }
    }

    /// Route a delivered timer event to the advancer.
    ///
    /// Events whose registration is no longer live (the schedule was stopped
    /// or rearmed after the event was posted) are discarded. Returns whether
    /// the event was consumed.
    pub fn handle_timer(&mut self, id: TimerId) -> bool {
        if !self.scheduler.owns(id) {
            return false;
        }
        self.tick();
        true
    }

    /// Advance the scroll position by one tick.
    ///
    /// A tick that cannot compute geometry is skipped with a warning; state
    /// is unchanged until the next tick.
    pub fn tick(&mut self) {
        debug_assert_main_thread!();
        if let Err(err) = self.advance() {
            tracing::warn!(target: TICKER, %err, "tick skipped");
        }
    }

    /// The wrap-around algorithm.
    ///
    /// The sentinel test runs against the pre-advance offset, so the reset
    /// lands one tick after the sentinel first becomes visible. That lag and
    /// the jump/glide asymmetry both come from the reference behavior and
    /// are intentional: the hard jump makes the rewind an invisible cut.
    fn advance(&mut self) -> Result<(), TickerError> {
        let layout = self.layout.as_ref().ok_or(TickerError::LayoutNotReady)?;

        let candidate = self.scroll.offset + self.scroll.displacement;
        let viewport = Rect::from_origin_size(
            Point::new(self.scroll.offset, 0),
            layout.viewport(),
        );

        if layout.sentinel_bounds().intersects(&viewport) {
            tracing::trace!(target: TICKER, offset = self.scroll.offset, "wrap-around");
            self.scroll.offset = 0;
            self.surface.jump_to(0);
            self.wrapped.emit(());
            self.scrolled.emit(0);
        } else {
            let next = candidate.min(layout.total_content_width());
            self.scroll.offset = next;
            self.surface.glide_to(next);
            self.scrolled.emit(next);
        }

        Ok(())
    }
}

impl Widget for TickerView {
    fn widget_base(&self) -> &WidgetBase {
        &self.base
    }

    fn widget_base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn size_hint(&self) -> Size {
        // Wide enough for the viewport, tall enough for the tallest item
        // plus the interior vertical margins.
        let tallest = self
            .items
            .iter()
            .map(|item| item.preferred_size().height)
            .max()
            .unwrap_or(0);
        Size::new(
            self.base.width(),
            tallest + INTERIOR_MARGINS.vertical(),
        )
    }
}

impl Drop for TickerView {
    fn drop(&mut self) {
        // Teardown releases the timer registration.
        self.scheduler.stop();
    }
}

/// Derive the per-tick displacement from a speed percentage.
///
/// `ceil(percent * 5 / 100)`, so the result is always in 0..=5 and any
/// non-zero speed moves at least one unit per tick.
fn displacement_for_percent(percent: u16) -> i32 {
    (u32::from(percent) * 5).div_ceil(100) as i32
}
