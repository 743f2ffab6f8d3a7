//! Aggregation of a scraped chat stream.
//!
//! An external scraper feeds observed messages into an
//! [`AggregationStore`](services::AggregationStore), which keeps a bounded
//! most-recent-first buffer of everything it has seen, a bounded thread per
//! conversation, and a passive cache of the channel and direct-message
//! catalogs. Listeners hear about each message whose timestamp is newer than
//! anything seen before.
//!
//! # Architecture
//!
//! - **Domain**: value types ([`domain::ChatMessage`], [`domain::Conversation`],
//!   [`domain::CatalogEntry`], [`domain::ObservedTimestamp`])
//! - **Ports**: the [`ports::MessageListener`] observer contract
//! - **Adapters**: [`adapters::memory::RecordingListener`]
//! - **Services**: [`services::AggregationStore`] and its configuration
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use chat_aggregator::chat::adapters::memory::RecordingListener;
//! use chat_aggregator::chat::domain::ChatMessage;
//! use chat_aggregator::chat::services::AggregationStore;
//!
//! let store = AggregationStore::new();
//! let recorder = RecordingListener::new();
//! store.on_new_messages(Arc::new(recorder.clone()));
//!
//! store.add_new_message(ChatMessage::new("2", "later", "Ada", "2024-05-01T10:05:00Z"));
//! store.add_new_message(ChatMessage::new("1", "earlier", "Ada", "2024-05-01T10:00:00Z"));
//!
//! // Both are buffered, but only the first was newer than anything seen.
//! assert_eq!(store.all_messages().len(), 2);
//! assert_eq!(recorder.batch_count(), 1);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
