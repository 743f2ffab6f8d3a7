//! Shared test helpers for in-memory store integration tests.

use std::sync::Arc;

use chat_aggregator::chat::{
    adapters::memory::RecordingListener,
    domain::{ChatMessage, ConversationId, ElementRef},
    services::AggregationStore,
};
use rstest::fixture;

/// 2024-05-01T09:00:00Z in epoch milliseconds.
const BASE_EPOCH_MILLIS: u64 = 1_714_554_000_000;

/// A store with a recorder already subscribed.
pub struct ObservedStore {
    pub store: AggregationStore,
    pub recorder: RecordingListener,
}

/// Provides a fresh store with a recording listener attached.
#[fixture]
pub fn observed() -> ObservedStore {
    let store = AggregationStore::new();
    let recorder = RecordingListener::new();
    store.on_new_messages(Arc::new(recorder.clone()));
    ObservedStore { store, recorder }
}

/// Provides the conversation used by most scenarios.
#[fixture]
pub fn support_thread() -> ConversationId {
    ConversationId::from("support")
}

/// Builds the message a scraper would produce for line `n` of a thread.
///
/// Line `n` is stamped `n` seconds after a fixed base instant, expressed
/// in epoch milliseconds the way some chat widgets render it.
pub fn scraped_line(conversation: &ConversationId, n: u32) -> ChatMessage {
    let stamp = BASE_EPOCH_MILLIS + u64::from(n) * 1_000;
    ChatMessage::new(
        format!("{conversation}-{n}"),
        format!("line {n}"),
        "Customer",
        stamp.to_string(),
    )
    .with_conversation(conversation.clone())
    .with_element(ElementRef::new(format!("#row-{n}")))
}

/// Simulates one scraper poll: every visible line is re-submitted.
///
/// Returns the number of submissions that were announced as new.
pub fn poll(store: &AggregationStore, visible: &[ChatMessage]) -> usize {
    visible
        .iter()
        .filter(|message| store.add_new_message((*message).clone()).is_novel())
        .count()
}
