//! Domain types for the chat aggregation store.
//!
//! Pure value types with no infrastructure dependencies. Everything here is
//! serialisable via serde so snapshots can be handed to export
//! collaborators as-is.

mod catalog;
mod conversation;
mod ids;
mod message;
mod timestamp;

pub use catalog::{CatalogEntry, CatalogKind};
pub use conversation::Conversation;
pub use ids::{ConversationId, MessageId, SubscriptionId};
pub use message::{ChatMessage, ElementRef};
pub use timestamp::{Novelty, ObservedTimestamp};
