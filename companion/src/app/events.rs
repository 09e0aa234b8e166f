//! # Session Events
//!
//! Notifications fanned out to the UI after state changes. The state itself is
//! the source of truth; events only say what changed.

use crate::core::SessionError;
use shared::History;

/// Capacity of the event channel. Events beyond it are dropped.
pub const EVENT_BUFFER: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Provider detection finished
    ProviderDetected(bool),
    /// Connected account changed
    AccountChanged(Option<String>),
    /// Ledger history replaced
    HistoryLoaded(History),
    /// Cached ledger size changed
    TransactionCountUpdated(u64),
    /// Submission loading flag toggled
    LoadingChanged(bool),
    /// Error surface set
    ErrorRaised(SessionError),
    /// Error surface cleared
    ErrorCleared,
    /// Ledger, counter and draft resynchronised after a submission
    Resynced,
    /// Market snapshot replaced
    MarketUpdated(usize),
    /// Market poll failed
    MarketFailed(String),
    /// Explorer preview replaced
    ExplorerUpdated(usize),
    /// User signed in
    SignedIn(String),
}

/// Sending half shared by the services.
#[derive(Clone)]
pub struct EventSink {
    tx: async_channel::Sender<SessionEvent>,
}

impl EventSink {
    pub fn new(tx: async_channel::Sender<SessionEvent>) -> Self {
        Self { tx }
    }

    /// Publish without waiting. A full or closed channel drops the event.
    pub fn emit(&self, event: SessionEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::debug!(error = %e, "Session event dropped");
        }
    }
}

/// Create the session event channel.
pub fn channel() -> (EventSink, async_channel::Receiver<SessionEvent>) {
    let (tx, rx) = async_channel::bounded(EVENT_BUFFER);
    (EventSink::new(tx), rx)
}
