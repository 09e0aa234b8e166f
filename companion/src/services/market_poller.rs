//! # Market Data Poller
//!
//! Fetches the market snapshot on start and on every tick of a fixed interval.
//! A manual refresh is an out-of-band tick and is ignored while another fetch is
//! in flight. Failed polls keep the last good snapshot; only a failed first load
//! shows the error state.

use crate::app::events::{EventSink, SessionEvent};
use crate::app::generation::Generation;
use crate::app::state::{MarketState, PollStatus};
use crate::core::{MarketService, SessionError};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct MarketPoller {
    inner: Arc<PollerInner>,
    interval: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct PollerInner {
    service: Arc<dyn MarketService>,
    state: Arc<RwLock<MarketState>>,
    events: EventSink,
    generation: Generation,
    fetching: AtomicBool,
}

impl MarketPoller {
    pub fn new(
        service: Arc<dyn MarketService>,
        state: Arc<RwLock<MarketState>>,
        events: EventSink,
        generation: Generation,
        interval: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(PollerInner {
                service,
                state,
                events,
                generation,
                fetching: AtomicBool::new(false),
            }),
            interval,
            task: Mutex::new(None),
        }
    }

    /// Start polling: fetch now, then every interval. No-op when already running.
    pub fn start(&self) {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let interval = self.interval;
        *task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                inner.refresh().await;
            }
        }));
        tracing::info!(interval_secs = interval.as_secs_f64(), "Market polling started");
    }

    /// Cancel the recurring timer. An in-flight fetch is dropped with it.
    pub fn stop(&self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
            tracing::info!("Market polling stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Fetch once. Returns `false` when skipped because a fetch is in flight.
    pub async fn refresh(&self) -> bool {
        self.inner.refresh().await
    }

    pub fn state(&self) -> MarketState {
        self.inner.state.read().clone()
    }

    pub fn load_more(&self) {
        self.inner.state.write().load_more();
    }
}

impl Drop for MarketPoller {
    fn drop(&mut self) {
        if let Some(task) = self.task.get_mut().take() {
            task.abort();
        }
    }
}

/// Clears the fetching flag even when the fetch is aborted mid-flight.
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl PollerInner {
    async fn refresh(&self) -> bool {
        // Skip if already fetching (prevents task pileup)
        if self
            .fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Market refresh already in flight - skipping");
            return false;
        }
        let guard = FetchGuard(&self.fetching);

        let token = self.generation.current();
        {
            let mut state = self.state.write();
            state.status = match state.status {
                PollStatus::Ready | PollStatus::Refreshing => PollStatus::Refreshing,
                _ => PollStatus::Loading,
            };
        }

        let result = self.service.market_snapshot().await;
        drop(guard);

        if !self.generation.is_current(token) {
            tracing::debug!("Discarding market snapshot from a previous session");
            return true;
        }

        match result {
            Ok(coins) => {
                let count = coins.len();
                {
                    let mut state = self.state.write();
                    state.coins = coins;
                    state.status = PollStatus::Ready;
                    state.error = None;
                    state.last_updated = Some(chrono::Local::now());
                }
                tracing::debug!(coin_count = count, "Market snapshot updated");
                self.events.emit(SessionEvent::MarketUpdated(count));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Market poll failed");
                let error = SessionError::from(e);
                let message = error.to_string();
                {
                    let mut state = self.state.write();
                    if state.status == PollStatus::Refreshing {
                        // Keep showing the last good snapshot
                        state.status = PollStatus::Ready;
                    } else {
                        state.status = PollStatus::Error;
                        state.error = Some(error);
                    }
                }
                self.events.emit(SessionEvent::MarketFailed(message));
            }
        }
        true
    }
}
