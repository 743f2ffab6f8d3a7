//! Retention and paging configuration for the aggregation store.

use serde::{Deserialize, Serialize};

/// Retention limits applied by [`AggregationStore`](super::AggregationStore).
///
/// The global buffer and the per-conversation threads evict independently:
/// the global buffer by total insertion count, each thread by its own
/// insertion count. Neither eviction looks at novelty or read state.
///
/// # Examples
///
/// ```
/// use chat_aggregator::chat::services::StoreConfig;
///
/// let config = StoreConfig::default();
/// assert_eq!(config.global_capacity, 100);
/// assert_eq!(config.conversation_capacity, 50);
///
/// let compact = StoreConfig::compact();
/// assert!(compact.global_capacity < config.global_capacity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum number of messages kept in the global recent buffer.
    pub global_capacity: usize,
    /// Maximum number of messages kept per conversation thread.
    pub conversation_capacity: usize,
    /// Page size used by `recent_messages_default`.
    pub default_recent_count: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            global_capacity: 100,
            conversation_capacity: 50,
            default_recent_count: 5,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with reduced limits.
    ///
    /// Useful for memory-constrained hosts.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            global_capacity: 25,
            conversation_capacity: 10,
            default_recent_count: 3,
        }
    }
}
