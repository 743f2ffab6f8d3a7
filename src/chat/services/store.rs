//! The message and conversation aggregation store.
//!
//! [`AggregationStore`] owns the global recent-message buffer, the
//! conversation threads, the channel and direct-message catalogs, the
//! recency marker used for novelty checks, and the listener registry.
//! Read accessors always hand out copies; nothing outside the store can
//! reach its containers.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};
use std::slice;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, trace};

use super::{
    config::StoreConfig,
    listeners::{self, FanOutReport, ListenerRegistry},
    snapshot::{StoreSnapshot, StoreStats},
};
use crate::chat::{
    domain::{
        CatalogEntry, CatalogKind, ChatMessage, Conversation, ConversationId, MessageId, Novelty,
        ObservedTimestamp, SubscriptionId,
    },
    error::CatalogError,
    ports::listener::MessageListener,
};

/// What happened to a message handed to
/// [`AggregationStore::add_new_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The message had no text and was ignored; nothing changed.
    Rejected,
    /// Stored, but its timestamp was not newer than the recency marker, so
    /// no listener was called.
    Stale,
    /// Stored and announced to listeners.
    Novel(FanOutReport),
}

impl IngestOutcome {
    /// Returns `true` unless the message was rejected.
    #[must_use]
    pub const fn is_stored(&self) -> bool {
        !matches!(self, Self::Rejected)
    }

    /// Returns `true` if listeners were notified.
    #[must_use]
    pub const fn is_novel(&self) -> bool {
        matches!(self, Self::Novel(_))
    }
}

#[derive(Debug, Default)]
struct StoreState {
    messages: VecDeque<ChatMessage>,
    conversations: HashMap<ConversationId, Conversation>,
    conversation_order: Vec<ConversationId>,
    last_message_timestamp: Option<ObservedTimestamp>,
    channels: Vec<CatalogEntry>,
    direct_messages: Vec<CatalogEntry>,
}

impl StoreState {
    fn ingest(&mut self, message: ChatMessage, config: &StoreConfig) -> Novelty {
        if let Some(conversation_id) = message.conversation_id() {
            let thread = match self.conversations.entry(conversation_id.clone()) {
                Entry::Occupied(occupied) => occupied.into_mut(),
                Entry::Vacant(vacant) => {
                    self.conversation_order.push(vacant.key().clone());
                    let started = Conversation::start(vacant.key().clone(), &message);
                    vacant.insert(started)
                }
            };
            thread.record(message.clone(), config.conversation_capacity);
        }

        let novelty = message
            .timestamp()
            .novelty_against(self.last_message_timestamp.as_ref());
        if novelty == Novelty::Unordered {
            debug!(
                message_id = %message.id(),
                timestamp = %message.timestamp(),
                "timestamp not comparable, treating message as new"
            );
        }
        if novelty.is_novel() {
            self.last_message_timestamp = Some(message.timestamp().clone());
        }

        self.messages.push_front(message);
        self.messages.truncate(config.global_capacity);
        novelty
    }

    fn catalog(&self, kind: CatalogKind) -> &[CatalogEntry] {
        match kind {
            CatalogKind::Channel => &self.channels,
            CatalogKind::DirectMessage => &self.direct_messages,
        }
    }

    fn catalog_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogEntry> {
        match kind {
            CatalogKind::Channel => &mut self.channels,
            CatalogKind::DirectMessage => &mut self.direct_messages,
        }
    }

    fn conversations_by_recency(&self) -> Vec<Conversation> {
        let mut conversations: Vec<Conversation> = self
            .conversation_order
            .iter()
            .filter_map(|id| self.conversations.get(id))
            .cloned()
            .collect();
        conversations.sort_by(|a, b| a.last_timestamp().recency_cmp(b.last_timestamp()));
        conversations
    }
}

/// In-memory, bounded, de-duplicated view of a scraped chat stream.
///
/// The store is a cheap handle: clones share the same state, so one
/// instance can be handed to the scraper, the renderer, and the admin
/// dashboard. Listener fan-out runs after the state lock has been released,
/// which lets a listener read from its own clone of the store.
///
/// The novelty decision is made under the state lock but delivery is not.
/// When clones ingest concurrently, listeners may therefore see a newer
/// message before an older one that was accepted first. Callers that need
/// strict delivery order should ingest from a single thread.
///
/// # Example
///
/// ```
/// use chat_aggregator::chat::domain::{ChatMessage, ConversationId};
/// use chat_aggregator::chat::services::AggregationStore;
///
/// let store = AggregationStore::new();
/// let c1 = ConversationId::from("c1");
///
/// store.add_new_message(
///     ChatMessage::new("1", "hi", "Ada", "2024-05-01T10:00:00Z").with_conversation(c1.clone()),
/// );
/// store.add_new_message(
///     ChatMessage::new("2", "there", "Ada", "2024-05-01T10:01:00Z").with_conversation(c1.clone()),
/// );
///
/// let thread = store.conversation(&c1).expect("thread exists");
/// assert_eq!(thread.unread_count(), 2);
/// assert_eq!(thread.last_message(), "there");
/// assert_eq!(store.all_messages().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AggregationStore {
    state: Arc<RwLock<StoreState>>,
    listeners: Arc<RwLock<ListenerRegistry>>,
    config: StoreConfig,
}

impl AggregationStore {
    /// Creates an empty store with default retention limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with custom retention limits.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the retention configuration.
    #[must_use]
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Every mutation finishes before listeners run, so a poisoned lock
    // still guards consistent state.
    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_listeners(&self) -> RwLockReadGuard<'_, ListenerRegistry> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_listeners(&self) -> RwLockWriteGuard<'_, ListenerRegistry> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ingests one scraped message.
    ///
    /// Messages without text are ignored. Otherwise the message is appended
    /// to its conversation thread (when it has one), prepended to the global
    /// buffer, and, if its timestamp is novel, recorded as the new recency
    /// marker and announced to listeners as a single-message batch.
    ///
    /// Global-buffer retention is independent of novelty: stale messages
    /// are still stored.
    pub fn add_new_message(&self, message: ChatMessage) -> IngestOutcome {
        if message.text().is_empty() {
            debug!(message_id = %message.id(), "ignoring message without text");
            return IngestOutcome::Rejected;
        }

        let novelty = self.write_state().ingest(message.clone(), &self.config);
        trace!(
            message_id = %message.id(),
            conversation_id = ?message.conversation_id().map(ConversationId::as_str),
            ?novelty,
            "message stored"
        );

        if !novelty.is_novel() {
            return IngestOutcome::Stale;
        }
        IngestOutcome::Novel(self.notify_listeners(slice::from_ref(&message)))
    }

    /// Reconciles mutable fields from a fresh scrape.
    ///
    /// For each message in `latest`, the most recent global-buffer entry with
    /// the same id and every entry with that id in its conversation thread
    /// take the fresh `is_read` and `element`. Messages that are not already
    /// in the global buffer are ignored; this never inserts and never
    /// notifies.
    ///
    /// Returns the number of global-buffer entries updated.
    pub fn update_existing_message_details(&self, latest: &[ChatMessage]) -> usize {
        let mut guard = self.write_state();
        let state = &mut *guard;
        let mut reconciled = 0;

        for fresh in latest {
            let Some(existing) = state
                .messages
                .iter_mut()
                .find(|message| message.id() == fresh.id())
            else {
                continue;
            };
            existing.refresh_from(fresh);
            reconciled += 1;

            if let Some(thread) = existing
                .conversation_id()
                .and_then(|id| state.conversations.get_mut(id))
            {
                thread.refresh(fresh);
            }
        }
        reconciled
    }

    /// Registers a listener for newly accepted messages.
    ///
    /// Returns the handle to pass to [`AggregationStore::unsubscribe`].
    pub fn on_new_messages(&self, listener: Arc<dyn MessageListener>) -> SubscriptionId {
        self.write_listeners().register(listener)
    }

    /// Removes a listener by identity.
    ///
    /// Every registration of the same listener instance is removed. Returns
    /// `false` if the handle is unknown, for example after a clear.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.write_listeners().unregister(id)
    }

    /// Calls every registered listener with `batch`, in registration order.
    ///
    /// Listener failures are logged and counted, never propagated. An empty
    /// batch calls nobody.
    pub fn notify_listeners(&self, batch: &[ChatMessage]) -> FanOutReport {
        if batch.is_empty() {
            return FanOutReport::default();
        }
        let registrations = self.read_listeners().snapshot();
        listeners::deliver(&registrations, batch)
    }

    /// Returns a copy of the global buffer, most recently inserted first.
    #[must_use]
    pub fn all_messages(&self) -> Vec<ChatMessage> {
        self.read_state().messages.iter().cloned().collect()
    }

    /// Returns up to `count` entries from the front of the global buffer.
    #[must_use]
    pub fn recent_messages(&self, count: usize) -> Vec<ChatMessage> {
        self.read_state()
            .messages
            .iter()
            .take(count)
            .cloned()
            .collect()
    }

    /// Returns [`StoreConfig::default_recent_count`] recent messages.
    #[must_use]
    pub fn recent_messages_default(&self) -> Vec<ChatMessage> {
        self.recent_messages(self.config.default_recent_count)
    }

    /// Returns every conversation thread, most recently active first.
    ///
    /// Threads whose last timestamp does not parse come after all others.
    /// They move to the end of the list rather than keeping their position
    /// among the comparable threads; among themselves they keep first-seen
    /// order.
    #[must_use]
    pub fn all_conversations(&self) -> Vec<Conversation> {
        self.read_state().conversations_by_recency()
    }

    /// Returns a copy of one conversation thread.
    #[must_use]
    pub fn conversation(&self, id: &ConversationId) -> Option<Conversation> {
        self.read_state().conversations.get(id).cloned()
    }

    /// Returns a thread's messages sorted oldest first, or an empty vector
    /// for an unknown id.
    #[must_use]
    pub fn conversation_messages(&self, id: &ConversationId) -> Vec<ChatMessage> {
        self.read_state()
            .conversations
            .get(id)
            .map(Conversation::chronological_messages)
            .unwrap_or_default()
    }

    /// Resets a thread's unread counter and marks its messages read.
    ///
    /// The global-buffer copies of those messages are marked read as well.
    /// Returns `false` for an unknown id.
    pub fn mark_conversation_as_read(&self, id: &ConversationId) -> bool {
        let mut guard = self.write_state();
        let state = &mut *guard;
        let Some(thread) = state.conversations.get_mut(id) else {
            return false;
        };
        thread.mark_read();

        let read_ids: HashSet<&MessageId> = thread.messages().iter().map(ChatMessage::id).collect();
        state
            .messages
            .iter_mut()
            .filter(|message| {
                message.conversation_id() == Some(id) && read_ids.contains(message.id())
            })
            .for_each(ChatMessage::mark_read);
        true
    }

    /// Returns the latest timestamp recorded by the novelty check.
    #[must_use]
    pub fn last_message_timestamp(&self) -> Option<ObservedTimestamp> {
        self.read_state().last_message_timestamp.clone()
    }

    /// Replaces the channel catalog.
    pub fn set_channels(&self, channels: Vec<CatalogEntry>) {
        self.write_state().channels = channels;
    }

    /// Replaces the direct-message catalog.
    pub fn set_direct_messages(&self, direct_messages: Vec<CatalogEntry>) {
        self.write_state().direct_messages = direct_messages;
    }

    /// Returns a copy of the channel catalog.
    #[must_use]
    pub fn channels(&self) -> Vec<CatalogEntry> {
        self.read_state().channels.clone()
    }

    /// Returns a copy of the direct-message catalog.
    #[must_use]
    pub fn direct_messages(&self) -> Vec<CatalogEntry> {
        self.read_state().direct_messages.clone()
    }

    /// Looks up a catalog entry by id within one catalog.
    #[must_use]
    pub fn catalog_entry(&self, id: &ConversationId, kind: CatalogKind) -> Option<CatalogEntry> {
        self.read_state()
            .catalog(kind)
            .iter()
            .find(|entry| entry.id() == id)
            .cloned()
    }

    /// Attaches a batch of messages to an existing catalog entry.
    ///
    /// The entry's history is re-sorted oldest first and its summary fields
    /// are taken from the latest message of `messages`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EntryNotFound`] if the entry does not exist
    /// and [`CatalogError::EmptyBatch`] if `messages` is empty. Either way
    /// the catalog is unchanged.
    pub fn add_messages_to_conversation(
        &self,
        id: &ConversationId,
        kind: CatalogKind,
        messages: Vec<ChatMessage>,
    ) -> Result<(), CatalogError> {
        let mut state = self.write_state();
        let Some(entry) = state
            .catalog_mut(kind)
            .iter_mut()
            .find(|entry| entry.id() == id)
        else {
            debug!(%kind, conversation_id = %id, "catalog entry not found");
            return Err(CatalogError::EntryNotFound {
                kind,
                id: id.clone(),
            });
        };

        if !entry.append(messages) {
            debug!(%kind, conversation_id = %id, "ignoring empty catalog batch");
            return Err(CatalogError::EmptyBatch {
                kind,
                id: id.clone(),
            });
        }
        Ok(())
    }

    /// Resets every container, the recency marker, and the listener set.
    ///
    /// Both locks are held together, so an ingest racing on a cloned
    /// handle either lands before the reset and is wiped, or lands after it
    /// and finds no listeners.
    pub fn clear_storage(&self) {
        let mut listeners = self.write_listeners();
        let mut state = self.write_state();
        *state = StoreState::default();
        listeners.clear();
        drop(state);
        drop(listeners);
        info!("chat aggregation store cleared");
    }

    /// Returns summary counters for the admin dashboard.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let listener_count = self.read_listeners().len();
        let state = self.read_state();
        StoreStats {
            message_count: state.messages.len(),
            conversation_count: state.conversations.len(),
            unread_total: state
                .conversations
                .values()
                .map(Conversation::unread_count)
                .sum(),
            channel_count: state.channels.len(),
            direct_message_count: state.direct_messages.len(),
            listener_count,
            text_bytes: state
                .messages
                .iter()
                .map(|message| message.text().len())
                .sum(),
        }
    }

    /// Returns a consistent copy of everything the store holds.
    #[must_use]
    pub fn snapshot(&self) -> StoreSnapshot {
        let state = self.read_state();
        StoreSnapshot {
            messages: state.messages.iter().cloned().collect(),
            conversations: state.conversations_by_recency(),
            channels: state.channels.clone(),
            direct_messages: state.direct_messages.clone(),
            last_message_timestamp: state.last_message_timestamp.clone(),
        }
    }
}
