//! In-memory implementation of the `MessageListener` port.

use std::sync::{Arc, PoisonError, RwLock};

use crate::chat::{
    domain::ChatMessage,
    ports::listener::{ListenerResult, MessageListener},
};

/// Listener that keeps every batch it is handed.
///
/// Clones share the same recording, so a test can register one clone with
/// the store and inspect another.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chat_aggregator::chat::adapters::memory::RecordingListener;
/// use chat_aggregator::chat::domain::ChatMessage;
/// use chat_aggregator::chat::services::AggregationStore;
///
/// let store = AggregationStore::new();
/// let recorder = RecordingListener::new();
/// store.on_new_messages(Arc::new(recorder.clone()));
///
/// store.add_new_message(ChatMessage::new("m1", "hi", "Ada", "2024-05-01T10:00:00Z"));
/// assert_eq!(recorder.batch_count(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct RecordingListener {
    batches: Arc<RwLock<Vec<Vec<ChatMessage>>>>,
}

impl RecordingListener {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded batch, in delivery order.
    #[must_use]
    pub fn batches(&self) -> Vec<Vec<ChatMessage>> {
        self.batches
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns every recorded message flattened in delivery order.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.batches().into_iter().flatten().collect()
    }

    /// Returns the number of batches delivered so far.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches
            .read()
            .map(|guard| guard.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }

    /// Forgets everything recorded so far.
    pub fn reset(&self) {
        self.batches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl MessageListener for RecordingListener {
    fn on_new_messages(&self, batch: &[ChatMessage]) -> ListenerResult {
        self.batches
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(batch.to_vec());
        Ok(())
    }
}
