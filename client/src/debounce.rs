//! Keystroke debouncing
//!
//! A single pending timer: every edited value replaces the pending value
//! and pushes the deadline out by the full window, so only the last value
//! of a quiet period is submitted.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tokio::time::{sleep_until, Instant};

use crate::controller::SearchController;

/// Quiet period after the last keystroke before a query is submitted
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Debounces edited input values into controller submissions
pub struct Debouncer {
    controller: Arc<SearchController>,
    rx: Receiver<String>,
    window: Duration,
}

impl Debouncer {
    /// Create a debouncer with the default window
    pub fn new(controller: Arc<SearchController>, rx: Receiver<String>) -> Self {
        Self {
            controller,
            rx,
            window: DEFAULT_DEBOUNCE,
        }
    }

    /// Override the debounce window
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Run until the input channel closes.
    ///
    /// A value still pending at close is discarded; the sender going away
    /// means the user is leaving, not searching.
    pub async fn run(mut self) {
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();

        loop {
            tokio::select! {
                event = self.rx.recv() => match event {
                    Some(value) => {
                        pending = Some(value);
                        deadline = Instant::now() + self.window;
                    }
                    None => break,
                },
                _ = sleep_until(deadline), if pending.is_some() => {
                    if let Some(value) = pending.take() {
                        self.controller.submit(&value).await;
                    }
                }
            }
        }
    }
}
