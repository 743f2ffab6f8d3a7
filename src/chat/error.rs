//! Error types for catalog updates and listener delivery.
//!
//! Uses `thiserror` for typed variants that callers can inspect. None of
//! these are fatal: the store reports them and carries on.

use super::domain::{CatalogKind, ConversationId};
use std::sync::Arc;
use thiserror::Error;

/// Errors returned when attaching messages to a catalog entry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// The selected catalog has no entry with this identifier.
    #[error("no {kind} entry with id {id}")]
    EntryNotFound {
        /// The catalog that was searched.
        kind: CatalogKind,
        /// The identifier that was not found.
        id: ConversationId,
    },

    /// The batch to attach was empty.
    #[error("refusing to attach an empty batch to {kind} {id}")]
    EmptyBatch {
        /// The catalog of the target entry.
        kind: CatalogKind,
        /// The target entry.
        id: ConversationId,
    },
}

/// Error returned while parsing a catalog label.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown catalog kind: {0}")]
pub struct ParseCatalogKindError(pub String);

/// Errors a listener may report back to the store during fan-out.
///
/// The store logs these and moves on to the next listener.
#[derive(Debug, Clone, Error)]
pub enum ListenerError {
    /// The listener declined the batch.
    #[error("listener rejected batch: {0}")]
    Rejected(String),

    /// The listener failed while handling the batch.
    #[error("listener failed: {0}")]
    Failed(Arc<dyn std::error::Error + Send + Sync>),
}

impl ListenerError {
    /// Creates a rejection with a reason.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected(reason.into())
    }

    /// Wraps an arbitrary failure.
    #[must_use]
    pub fn failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failed(Arc::new(err))
    }
}
