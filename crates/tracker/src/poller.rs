//! Recurring poll task.
//!
//! A fixed-period loop that runs `poll_cycle` against the tracker until
//! cancelled. Not started at process start; the `check` command toggles
//! it, and the command layer stops it when a removal empties the
//! watchlist. Stopping never interrupts a cycle already in flight, it
//! only prevents the next tick.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    tokio_util::sync::CancellationToken,
    tracing::{debug, info},
};

use crate::tracker::PresenceTracker;

/// Drives recurring poll cycles against a shared [`PresenceTracker`].
pub struct Poller {
    tracker: Arc<PresenceTracker>,
    interval: Duration,
    cancel: Mutex<Option<CancellationToken>>,
}

impl Poller {
    pub fn new(tracker: Arc<PresenceTracker>, interval: Duration) -> Self {
        Self {
            tracker,
            interval,
            cancel: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Spawn the poll loop. Returns false if it is already running.
    pub fn start(&self) -> bool {
        let mut guard = self.cancel.lock().unwrap_or_else(|e| e.into_inner());
        if guard.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        *guard = Some(cancel.clone());

        let tracker = Arc::clone(&self.tracker);
        let interval = self.interval;
        tokio::spawn(async move {
            info!(interval_secs = interval.as_secs(), "presence poller started");
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("presence poller stopped");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {
                        if tracker.is_empty().await {
                            debug!("watchlist empty, skipping poll tick");
                            continue;
                        }
                        tracker.poll_cycle(false).await;
                    }
                }
            }
        });

        true
    }

    /// Cancel the poll loop. Returns false if it was not running.
    pub fn stop(&self) -> bool {
        let token = self
            .cancel
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match token {
            Some(token) => {
                token.cancel();
                true
            },
            None => false,
        }
    }
}
