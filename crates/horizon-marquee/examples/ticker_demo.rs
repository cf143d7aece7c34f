//! Ticker demo: 50 numbered labels scrolling over a recording surface.
//!
//! Builds the classic numbered-label run, attaches the ticker, and drives it
//! from the application event loop. A control thread sweeps the speed through
//! a few percentages, marshalling each change onto the owning thread, then
//! quits the loop. Offsets are observed through the `scrolled` signal and the
//! recording surface.
//!
//! Run with:
//!
//! ```sh
//! cargo run --example ticker_demo
//! RUST_LOG=horizon_marquee=trace cargo run --example ticker_demo
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use parking_lot::Mutex;
use tracing_subscriber::EnvFilter;

use horizon_marquee::geometry::Rect;
use horizon_marquee::widget::ticker::{Motion, RecordingSurface, TICK_INTERVAL, TickerView};
use horizon_marquee::widget::{TextLabel, Widget};
use horizon_marquee::{Application, MarqueeEvent};

/// Speed percentages the demo sweeps through while running.
const SPEED_SWEEP: [u16; 3] = [40, 80, 10];

/// Ticks spent at each sweep stage before moving on.
const TICKS_PER_STAGE: u32 = 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,horizon_marquee=debug")),
        )
        .init();

    let app = Application::new()?;

    let surface = RecordingSurface::new();
    let mut view = TickerView::new(Box::new(surface.clone()));
    view.set_geometry(Rect::new(0, 0, 480, 40));

    view.set_items(
        (1..=50)
            .map(|n| Box::new(TextLabel::new(n.to_string())) as _)
            .collect(),
    );

    // Seed the speed readout from the raw-unit getter, then pick a real pace.
    tracing::info!(seed_units = view.speed_units(), "speed control seeded");
    view.set_speed_percent(SPEED_SWEEP[0]);

    // The offset trace lives only as long as the demo's main frame.
    let _scroll_log = view.scrolled.connect_scoped(|offset| {
        tracing::trace!(offset, "scrolled");
    });
    view.wrapped.connect(|_| {
        tracing::info!("wrap-around: run restarted");
    });
    view.speed_changed.connect(|percent| {
        tracing::info!(percent, "speed changed");
    });

    view.notify_attached();

    let ticker = Arc::new(Mutex::new(view));
    let ticks = Arc::new(AtomicUsize::new(0));

    let handler_ticker = ticker.clone();
    let handler_ticks = ticks.clone();
    app.set_event_handler(move |event| {
        let MarqueeEvent::Timer { id } = event else {
            return;
        };
        if handler_ticker.lock().handle_timer(*id) {
            handler_ticks.fetch_add(1, Ordering::SeqCst);
        }
    });

    // Control thread: sweeps the speed from off the owning thread, then
    // quits. Each change is marshalled through a queued invocation so the
    // widget is only ever touched by the event loop's thread.
    let control_ticker = ticker.clone();
    let control = thread::spawn(move || {
        for &percent in &SPEED_SWEEP[1..] {
            thread::sleep(TICK_INTERVAL * TICKS_PER_STAGE);
            let ticker = control_ticker.clone();
            let queued = app.invoke_on_main_thread(move || {
                ticker.lock().set_speed_percent(percent);
            });
            if queued.is_err() {
                return;
            }
        }
        thread::sleep(TICK_INTERVAL * TICKS_PER_STAGE);
        app.quit();
    });

    app.run()?;
    let _ = control.join();

    let mut view = ticker.lock();
    view.notify_detached();

    let motions = surface.motions();
    let jumps = motions
        .iter()
        .filter(|m| matches!(m, Motion::Jump(_)))
        .count();
    tracing::info!(
        ticks = ticks.load(Ordering::SeqCst),
        motions = motions.len(),
        jumps,
        final_offset = view.scroll_x(),
        "demo finished"
    );

    Ok(())
}
