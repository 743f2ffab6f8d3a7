//! Service layer for the chat aggregation store.

mod config;
mod listeners;
mod snapshot;
mod store;

pub use config::StoreConfig;
pub use listeners::{FanOutReport, ListenerRegistry};
pub use snapshot::{StoreSnapshot, StoreStats};
pub use store::{AggregationStore, IngestOutcome};
