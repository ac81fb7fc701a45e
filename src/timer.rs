use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{bounded, tick, Sender};
use log::{debug, warn};

/// Fixed-rate background ticker with an explicit stop signal.
pub struct ElapsedTimer {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    pub fn start<F>(period: Duration, mut on_tick: F) -> ElapsedTimer
    where
        F: FnMut() + Send + 'static,
    {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let ticker = tick(period);
        debug!("starting ticker with period {period:?}");

        let handle = thread::spawn(move || loop {
            crossbeam::select! {
                recv(ticker) -> _ => on_tick(),
                recv(stop_rx) -> _ => break,
            }
        });

        ElapsedTimer {
            stop: Some(stop_tx),
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the ticker thread and wait for it to exit.
    pub fn stop(&mut self) {
        // Dropping the sender also wakes the select.
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("ticker thread panicked");
            }
            debug!("ticker stopped");
        }
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
