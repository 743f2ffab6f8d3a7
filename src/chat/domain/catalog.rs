//! Channel and direct-message catalog entries.
//!
//! The catalog is owned by an external directory collaborator which replaces
//! it wholesale. The store only attaches messages to entries that already
//! exist; it never invents one.

use super::{ChatMessage, ConversationId, ObservedTimestamp};
use crate::chat::error::ParseCatalogKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which catalog an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    /// A named multi-member channel.
    Channel,
    /// A one-to-one direct-message thread.
    #[serde(rename = "dm")]
    DirectMessage,
}

impl CatalogKind {
    /// Returns the label used by collaborators (`"channel"` or `"dm"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Channel => "channel",
            Self::DirectMessage => "dm",
        }
    }

    /// Resolves a collaborator label, returning `None` for anything other
    /// than `"channel"` or `"dm"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chat_aggregator::chat::domain::CatalogKind;
    ///
    /// assert_eq!(CatalogKind::from_label("dm"), Some(CatalogKind::DirectMessage));
    /// assert_eq!(CatalogKind::from_label("group"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::try_from(label).ok()
    }
}

impl TryFrom<&str> for CatalogKind {
    type Error = ParseCatalogKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "channel" => Ok(Self::Channel),
            "dm" => Ok(Self::DirectMessage),
            _ => Err(ParseCatalogKindError(value.to_owned())),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel or direct-message container published by the directory.
///
/// # Examples
///
/// ```
/// use chat_aggregator::chat::domain::{CatalogEntry, ConversationId};
///
/// let entry = CatalogEntry::new(ConversationId::from("general")).with_name("General");
/// assert_eq!(entry.name(), Some("General"));
/// assert!(entry.messages().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    id: ConversationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_timestamp: Option<ObservedTimestamp>,
}

impl CatalogEntry {
    /// Creates an entry with no attached messages.
    #[must_use]
    pub const fn new(id: ConversationId) -> Self {
        Self {
            id,
            name: None,
            messages: Vec::new(),
            last_message: None,
            last_timestamp: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> &ConversationId {
        &self.id
    }

    /// Returns the display name, if the directory supplied one.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns attached messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the text of the latest message of the last appended batch.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Returns the timestamp of the latest message of the last appended batch.
    #[must_use]
    pub const fn last_timestamp(&self) -> Option<&ObservedTimestamp> {
        self.last_timestamp.as_ref()
    }

    /// Appends a non-empty batch, re-sorts the history oldest first, and
    /// takes the summary fields from the latest message of `batch`.
    ///
    /// The summary ignores older history. When nothing in the
    /// batch has a comparable timestamp, the first message of the batch is
    /// used. An empty batch leaves the entry untouched and returns `false`.
    pub(crate) fn append(&mut self, batch: Vec<ChatMessage>) -> bool {
        let Some(latest) = latest_in_batch(&batch) else {
            return false;
        };
        self.last_message = Some(latest.text().to_owned());
        self.last_timestamp = Some(latest.timestamp().clone());

        self.messages.extend(batch);
        self.messages
            .sort_by(|a, b| a.timestamp().chronological_cmp(b.timestamp()));
        true
    }
}

fn latest_in_batch(batch: &[ChatMessage]) -> Option<&ChatMessage> {
    let first = batch.first()?;
    let latest = batch
        .iter()
        .filter(|message| message.timestamp().is_comparable())
        .reduce(|best, message| {
            if message.timestamp().instant() > best.timestamp().instant() {
                message
            } else {
                best
            }
        });
    Some(latest.unwrap_or(first))
}
