//! Shared world state for message stream BDD scenarios.

use chat_aggregator::chat::{
    adapters::memory::RecordingListener, error::CatalogError, services::AggregationStore,
};
use rstest::fixture;

/// Scenario world for message stream behaviour tests.
pub struct MessageStreamWorld {
    pub store: AggregationStore,
    pub recorder: RecordingListener,
    pub last_attach_result: Option<Result<(), CatalogError>>,
}

impl MessageStreamWorld {
    /// Creates a world with an empty store and an unsubscribed recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: AggregationStore::new(),
            recorder: RecordingListener::new(),
            last_attach_result: None,
        }
    }
}

impl Default for MessageStreamWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> MessageStreamWorld {
    MessageStreamWorld::default()
}
