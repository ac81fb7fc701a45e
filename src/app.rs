use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info};
use serde::Serialize;

use crate::error::PlotError;
use crate::publisher::ImagePublisher;
use crate::render::Renderer;
use crate::series::PlotSeries;

#[derive(Debug, Default)]
struct SessionState {
    series: PlotSeries,
    button_count: u64,
    elapsed_ms: u64,
    reset_elapsed: bool,
}

/// What the page needs to refresh its labels and image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub counter_label: String,
    pub time_label: String,
    pub image_src: String,
}

/// State and handlers for one connected page.
///
/// Button handlers and the ticker both go through the same mutex, so
/// mutations from the two contexts are serialized.
#[derive(Debug)]
pub struct Session {
    state: Mutex<SessionState>,
    publisher: ImagePublisher,
    tick_period: Duration,
}

pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(100);

impl Session {
    /// Session with the default tick period and its first image published.
    pub fn new(renderer: Renderer) -> Result<Session, PlotError> {
        Self::with_tick_period(renderer, DEFAULT_TICK_PERIOD)
    }

    pub fn with_tick_period(
        renderer: Renderer,
        tick_period: Duration,
    ) -> Result<Session, PlotError> {
        let session = Self::from_publisher(ImagePublisher::new(renderer), tick_period);
        session.redraw(&session.lock())?;
        info!("session ready, image at {}", session.publisher.image_src());
        Ok(session)
    }

    /// Wrap `publisher` as is. Nothing is drawn until the first handler runs.
    pub fn from_publisher(publisher: ImagePublisher, tick_period: Duration) -> Session {
        Session {
            state: Mutex::new(SessionState::default()),
            publisher,
            tick_period,
        }
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    pub fn publisher(&self) -> &ImagePublisher {
        &self.publisher
    }

    /// "Data" button: extend the random walk and redraw.
    pub fn on_data(&self) -> Result<(), PlotError> {
        let mut state = self.lock();
        let value = state.series.push_step(&mut rand::rng());
        debug!("appended {value}, series has {} samples", state.series.len());
        self.redraw(&state)
    }

    /// "Clear" button: back to a single zero sample.
    pub fn on_clear(&self) -> Result<(), PlotError> {
        let mut state = self.lock();
        state.series.reset();
        debug!("series cleared");
        self.redraw(&state)
    }

    pub fn on_count(&self) {
        self.lock().button_count += 1;
    }

    pub fn on_count_reset(&self) {
        self.lock().button_count = 0;
    }

    /// Takes effect on the next tick.
    pub fn on_timer_reset(&self) {
        self.lock().reset_elapsed = true;
    }

    /// Ticker callback, adds one tick period to the elapsed time.
    pub fn tick(&self) {
        let mut state = self.lock();
        if state.reset_elapsed {
            state.elapsed_ms = 0;
            state.reset_elapsed = false;
        } else {
            state.elapsed_ms += self.tick_period.as_millis() as u64;
        }
    }

    pub fn series(&self) -> PlotSeries {
        self.lock().series.clone()
    }

    pub fn button_count(&self) -> u64 {
        self.lock().button_count
    }

    /// Elapsed time truncated to tenths of a second.
    pub fn elapsed_tenths(&self) -> u64 {
        self.lock().elapsed_ms / 100
    }

    pub fn counter_label(&self) -> String {
        format!("Button presses: {}", self.button_count())
    }

    pub fn time_label(&self) -> String {
        format_elapsed(self.elapsed_tenths())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            counter_label: self.counter_label(),
            time_label: self.time_label(),
            image_src: self.publisher.image_src(),
        }
    }

    fn redraw(&self, state: &SessionState) -> Result<(), PlotError> {
        self.publisher.redraw(&state.series).map(|_| ())
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub fn format_elapsed(tenths: u64) -> String {
    format!("Elapsed time: {}.{}", tenths / 10, tenths % 10)
}
