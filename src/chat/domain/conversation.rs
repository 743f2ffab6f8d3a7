//! Per-conversation thread aggregate.
//!
//! A [`Conversation`] is created lazily by the store the first time a message
//! carrying its identifier arrives and is only ever destroyed by a full
//! clear. It keeps a bounded tail of its messages and an unread counter that
//! only explicit mark-as-read resets.

use super::{ChatMessage, ConversationId, ObservedTimestamp};
use serde::{Deserialize, Serialize};

/// An aggregated thread of messages sharing a conversation identifier.
///
/// # Invariants
///
/// - `messages` holds at most the configured per-conversation capacity, in
///   insertion order; the oldest entries are evicted first
/// - `unread_count` counts messages that were unread when inserted and is
///   reset to zero only by [`Conversation::mark_read`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    id: ConversationId,
    name: String,
    last_message: String,
    last_timestamp: ObservedTimestamp,
    messages: Vec<ChatMessage>,
    unread_count: usize,
}

impl Conversation {
    /// Opens an empty thread seeded from its first message.
    ///
    /// The first sender becomes the thread name even when blank; later
    /// messages only replace it with a non-blank sender. The message itself
    /// still has to be passed to [`Conversation::record`].
    pub(crate) fn start(id: ConversationId, first: &ChatMessage) -> Self {
        Self {
            id,
            name: first.sender().to_owned(),
            last_message: first.text().to_owned(),
            last_timestamp: first.timestamp().clone(),
            messages: Vec::new(),
            unread_count: 0,
        }
    }

    /// Appends a message and trims the thread to `capacity`.
    pub(crate) fn record(&mut self, message: ChatMessage, capacity: usize) {
        message.text().clone_into(&mut self.last_message);
        self.last_timestamp = message.timestamp().clone();
        if message.has_sender() {
            message.sender().clone_into(&mut self.name);
        }
        if !message.is_read() {
            self.unread_count = self.unread_count.saturating_add(1);
        }
        self.messages.push(message);

        let excess = self.messages.len().saturating_sub(capacity);
        if excess > 0 {
            self.messages.drain(..excess);
        }
    }

    /// Clears the unread counter and flags every retained message as read.
    pub(crate) fn mark_read(&mut self) {
        self.unread_count = 0;
        for message in &mut self.messages {
            message.mark_read();
        }
    }

    /// Refreshes the mutable fields of every entry sharing `latest`'s id.
    ///
    /// Returns the number of entries touched.
    pub(crate) fn refresh(&mut self, latest: &ChatMessage) -> usize {
        self.messages
            .iter_mut()
            .filter(|message| message.id() == latest.id())
            .fold(0, |touched, message| {
                message.refresh_from(latest);
                touched + 1
            })
    }

    /// Returns the conversation identifier.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the best-known sender label for the thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the text of the most recently inserted message.
    #[must_use]
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Returns the timestamp of the most recently inserted message.
    #[must_use]
    pub const fn last_timestamp(&self) -> &ObservedTimestamp {
        &self.last_timestamp
    }

    /// Returns the retained messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages that arrived unread since the last
    /// mark-as-read.
    #[must_use]
    pub const fn unread_count(&self) -> usize {
        self.unread_count
    }

    /// Returns a copy of the retained messages sorted oldest first.
    ///
    /// Messages with unparseable timestamps follow all others, keeping their
    /// insertion order.
    #[must_use]
    pub fn chronological_messages(&self) -> Vec<ChatMessage> {
        let mut messages = self.messages.clone();
        messages.sort_by(|a, b| a.timestamp().chronological_cmp(b.timestamp()));
        messages
    }
}
