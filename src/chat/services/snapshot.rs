//! Point-in-time exports of the store for export and admin collaborators.

use serde::{Deserialize, Serialize};

use crate::chat::domain::{CatalogEntry, ChatMessage, Conversation, ObservedTimestamp};

/// Full copy of the store contents.
///
/// Collections are in the same order the corresponding read accessors
/// return them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Global buffer, most recent first.
    pub messages: Vec<ChatMessage>,
    /// Conversation threads, most recently active first.
    pub conversations: Vec<Conversation>,
    /// Channel catalog as last published.
    pub channels: Vec<CatalogEntry>,
    /// Direct-message catalog as last published.
    pub direct_messages: Vec<CatalogEntry>,
    /// Latest timestamp recorded by the novelty check.
    pub last_message_timestamp: Option<ObservedTimestamp>,
}

impl StoreSnapshot {
    /// Renders the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if serialisation fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Summary counters for the admin dashboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Messages in the global buffer.
    pub message_count: usize,
    /// Known conversation threads.
    pub conversation_count: usize,
    /// Sum of unread counters across threads.
    pub unread_total: usize,
    /// Entries in the channel catalog.
    pub channel_count: usize,
    /// Entries in the direct-message catalog.
    pub direct_message_count: usize,
    /// Registered listeners.
    pub listener_count: usize,
    /// UTF-8 bytes of message text held in the global buffer.
    pub text_bytes: usize,
}

impl StoreStats {
    /// Returns the global buffer text size in whole kibibytes, rounded up.
    #[must_use]
    pub const fn text_kib(&self) -> usize {
        self.text_bytes.div_ceil(1024)
    }
}
