//! # Model Layer
//!
//! Durable client-side state.

pub mod store;
