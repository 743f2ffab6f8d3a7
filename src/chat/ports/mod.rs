//! Port contracts for the chat aggregation store.
//!
//! Ports define the interfaces collaborators implement to plug into the
//! store.

pub mod listener;

pub use listener::{ListenerResult, MessageListener};
