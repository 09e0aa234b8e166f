//! # Explorer History
//!
//! Recent transactions of a watched address from a block explorer. The list is
//! never empty: it starts as the sample set and only live results replace it.

use crate::app::events::{EventSink, SessionEvent};
use crate::app::generation::Generation;
use crate::core::ExplorerService;
use lib_eth::sample::sample_explorer_history;
use parking_lot::RwLock;
use shared::{DataSource, ExplorerTx};
use std::sync::Arc;

/// Entries shown while collapsed.
pub const PREVIEW_LEN: usize = 6;
/// Entries requested from the explorer.
pub const PAGE_SIZE: u32 = 10;
/// Notice shown when the explorer could not be read.
pub const LOAD_FAILED_NOTICE: &str = "Failed to load real data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerState {
    pub entries: Vec<ExplorerTx>,
    pub source: DataSource,
    pub notice: Option<String>,
}

impl Default for ExplorerState {
    fn default() -> Self {
        Self {
            entries: sample_explorer_history(),
            source: DataSource::Sample,
            notice: None,
        }
    }
}

impl ExplorerState {
    /// Entries to render: the first [`PREVIEW_LEN`] unless expanded.
    pub fn visible(&self, expanded: bool) -> &[ExplorerTx] {
        if expanded {
            &self.entries
        } else {
            &self.entries[..PREVIEW_LEN.min(self.entries.len())]
        }
    }

    pub fn hidden_count(&self) -> usize {
        self.entries.len().saturating_sub(PREVIEW_LEN)
    }
}

pub struct ExplorerHistory {
    service: Arc<dyn ExplorerService>,
    address: String,
    state: RwLock<ExplorerState>,
    events: EventSink,
    generation: Generation,
}

impl ExplorerHistory {
    pub fn new(
        service: Arc<dyn ExplorerService>,
        address: impl Into<String>,
        events: EventSink,
        generation: Generation,
    ) -> Self {
        Self {
            service,
            address: address.into(),
            state: RwLock::new(ExplorerState::default()),
            events,
            generation,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn state(&self) -> ExplorerState {
        self.state.read().clone()
    }

    /// Reload for the current connection state. Disconnected sessions see the
    /// sample set; connected ones fetch the watched address.
    pub async fn refresh(&self, connected: bool) -> ExplorerState {
        if !connected {
            *self.state.write() = ExplorerState::default();
            return self.state();
        }

        let token = self.generation.current();
        let result = self.service.account_transactions(&self.address, PAGE_SIZE).await;
        if !self.generation.is_current(token) {
            tracing::debug!("Session torn down during explorer fetch - discarding result");
            return self.state();
        }
        {
            let mut state = self.state.write();
            match result {
                Ok(txs) if !txs.is_empty() => {
                    tracing::info!(tx_count = txs.len(), "Explorer history loaded");
                    *state = ExplorerState {
                        entries: txs,
                        source: DataSource::Live,
                        notice: None,
                    };
                }
                Ok(_) => {
                    tracing::info!(address = %self.address, "Explorer has no transactions - keeping sample");
                    state.notice = None;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Explorer fetch failed - keeping sample");
                    state.notice = Some(LOAD_FAILED_NOTICE.to_string());
                }
            }
        }

        let state = self.state();
        self.events.emit(SessionEvent::ExplorerUpdated(state.entries.len()));
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events;
    use crate::services::testing::MockExplorer;
    use shared::{Ether, TxStatus};
    use std::time::Duration;

    const WATCHED: &str = "0xA9A9F177d1085AeD15E92Dad3Deb1252E46DF46D";

    fn history(service: Arc<MockExplorer>) -> ExplorerHistory {
        let (sink, _rx) = events::channel();
        ExplorerHistory::new(service, WATCHED, sink, Generation::new())
    }

    fn tx(i: i64) -> ExplorerTx {
        ExplorerTx {
            from: "0xaa".into(),
            to: "0xbb".into(),
            value: Ether::parse("1").unwrap(),
            timestamp: 1_700_000_000 - i,
            status: TxStatus::Success,
        }
    }

    #[tokio::test]
    async fn test_starts_with_sample_preview() {
        let explorer = history(Arc::new(MockExplorer::default()));
        let state = explorer.state();
        assert_eq!(state.source, DataSource::Sample);
        assert_eq!(state.visible(false).len(), 6);
        assert_eq!(state.visible(true).len(), 8);
        assert_eq!(state.hidden_count(), 2);
    }

    #[tokio::test]
    async fn test_disconnected_does_not_fetch() {
        let service = Arc::new(MockExplorer::returning(vec![tx(1)]));
        let explorer = history(Arc::clone(&service));

        let state = explorer.refresh(false).await;
        assert_eq!(state.source, DataSource::Sample);
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn test_live_results_replace_sample() {
        let explorer = history(Arc::new(MockExplorer::returning((0..3).map(tx).collect())));
        let state = explorer.refresh(true).await;
        assert_eq!(state.source, DataSource::Live);
        assert_eq!(state.entries.len(), 3);
        assert_eq!(state.hidden_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_keeps_sample_quietly() {
        let explorer = history(Arc::new(MockExplorer::returning(Vec::new())));
        let state = explorer.refresh(true).await;
        assert_eq!(state.source, DataSource::Sample);
        assert_eq!(state.notice, None);
    }

    #[tokio::test]
    async fn test_failure_keeps_sample_with_notice() {
        let explorer = history(Arc::new(MockExplorer::failing("rate limited")));
        let state = explorer.refresh(true).await;
        assert_eq!(state.entries.len(), 8);
        assert_eq!(state.notice.as_deref(), Some(LOAD_FAILED_NOTICE));
    }

    #[tokio::test]
    async fn test_teardown_discards_late_explorer_result() {
        let service = Arc::new(MockExplorer::returning((0..3).map(tx).collect()).slow(Duration::from_millis(50)));
        let (sink, rx) = events::channel();
        let generation = Generation::new();
        let explorer = Arc::new(ExplorerHistory::new(service, WATCHED, sink, generation.clone()));

        let task = tokio::spawn({
            let explorer = Arc::clone(&explorer);
            async move { explorer.refresh(true).await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        generation.advance();

        let state = task.await.unwrap();
        assert_eq!(state.source, DataSource::Sample);
        assert_eq!(explorer.state().entries.len(), 8);
        assert!(rx.try_recv().is_err());
    }
}
