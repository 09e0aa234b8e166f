//! # Application Layer
//!
//! Session state, events and the [`SessionContext`] that orchestrates the services.

pub mod context;
pub mod events;
pub mod generation;
pub mod state;

pub use context::{Collaborators, SessionContext, SessionOptions};
pub use events::SessionEvent;
pub use state::{MarketState, PollStatus, SessionState};
