//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe implementations suitable for
//! tests and for collaborators that poll instead of reacting.

mod recording_listener;

pub use recording_listener::RecordingListener;
