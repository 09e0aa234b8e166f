//! # Core Abstractions
//!
//! - **[`error`]**: the user-facing session error taxonomy (`SessionError`)
//! - **[`service`]**: service traits for dependency injection (`MarketService`,
//!   `ExplorerService`, `AuthService`)
//!
//! The wallet provider and contract traits live in `lib-eth` next to their
//! implementations; the traits here cover the plain HTTP collaborators.

pub mod error;
pub mod service;

pub use error::SessionError;
pub use service::{AuthService, AuthUser, ExplorerService, MarketService};
