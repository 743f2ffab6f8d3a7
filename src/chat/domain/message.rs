//! A single chat line as observed by the page scraper.

use super::{ConversationId, MessageId, ObservedTimestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque locator the scraper uses to find a message's DOM node again.
///
/// The store carries it around and refreshes it during reconciliation but
/// never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(String);

impl ElementRef {
    /// Wraps a scraper-specific locator.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Returns the locator text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One observed chat message.
///
/// Only `is_read` and `element` change after a message has been stored;
/// everything else is fixed at construction. An empty `text` is
/// representable so that scraped noise can be handed to the store, which
/// then ignores it.
///
/// # Examples
///
/// ```
/// use chat_aggregator::chat::domain::{ChatMessage, ConversationId};
///
/// let message = ChatMessage::new("m1", "hello", "Ada", "2024-05-01T10:00:00Z")
///     .with_conversation(ConversationId::from("c1"));
///
/// assert_eq!(message.text(), "hello");
/// assert!(!message.is_read());
/// assert_eq!(message.conversation_id().map(ConversationId::as_str), Some("c1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    text: String,
    sender: String,
    timestamp: ObservedTimestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    conversation_id: Option<ConversationId>,
    #[serde(default)]
    is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element: Option<ElementRef>,
}

impl ChatMessage {
    /// Creates an unread, global-only message.
    #[must_use]
    pub fn new(
        id: impl Into<MessageId>,
        text: impl Into<String>,
        sender: impl Into<String>,
        timestamp: impl Into<ObservedTimestamp>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: sender.into(),
            timestamp: timestamp.into(),
            conversation_id: None,
            is_read: false,
            element: None,
        }
    }

    /// Attaches the message to a conversation thread.
    #[must_use]
    pub fn with_conversation(mut self, conversation_id: ConversationId) -> Self {
        self.conversation_id = Some(conversation_id);
        self
    }

    /// Sets the read flag.
    #[must_use]
    pub const fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// Sets the scraper element locator.
    #[must_use]
    pub fn with_element(mut self, element: ElementRef) -> Self {
        self.element = Some(element);
        self
    }

    /// Returns the message identifier.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.id
    }

    /// Returns the message body.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the sender label as scraped. May be blank.
    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the observed timestamp.
    #[must_use]
    pub const fn timestamp(&self) -> &ObservedTimestamp {
        &self.timestamp
    }

    /// Returns the conversation this message belongs to, if any.
    #[must_use]
    pub const fn conversation_id(&self) -> Option<&ConversationId> {
        self.conversation_id.as_ref()
    }

    /// Returns `true` if the message has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the scraper element locator, if any.
    #[must_use]
    pub const fn element(&self) -> Option<&ElementRef> {
        self.element.as_ref()
    }

    /// Returns `true` if the message carries a sender label worth keeping.
    #[must_use]
    pub fn has_sender(&self) -> bool {
        !self.sender.trim().is_empty()
    }

    pub(crate) const fn mark_read(&mut self) {
        self.is_read = true;
    }

    /// Copies the mutable fields (`is_read`, `element`) from a fresher scrape.
    pub(crate) fn refresh_from(&mut self, latest: &Self) {
        self.is_read = latest.is_read;
        self.element.clone_from(&latest.element);
    }
}
