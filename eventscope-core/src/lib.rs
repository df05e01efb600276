//! Core types for the eventscope ecosystem.
//!
//! This crate provides the domain core shared by the eventscope CLI:
//! - `Event` and `EventDraft` for schedule entries
//! - `Schedule`, the owner of the event collection and its lifecycle
//! - `store` for local persistence of the collection
//! - `mirror` for the external calendar provider protocol
//! - `invite` for the invitation-mail contract

pub mod config;
pub mod error;
pub mod event;
pub mod invite;
pub mod mirror;
pub mod retention;
pub mod schedule;
pub mod store;

// Re-export the types most callers need at crate root for convenience
pub use error::{EventScopeError, EventScopeResult};
pub use event::*;
pub use schedule::Schedule;
