//! Observer port notified once per genuinely new message.

use crate::chat::{domain::ChatMessage, error::ListenerError};

/// Result type for listener callbacks.
pub type ListenerResult = Result<(), ListenerError>;

/// Receives batches of newly accepted messages.
///
/// Listeners run synchronously on the ingesting caller's stack, in
/// registration order. Returning an error (or panicking) only affects the
/// failing listener; the remaining listeners still run and the ingesting
/// caller never sees the failure.
///
/// Any `Fn(&[ChatMessage]) -> ListenerResult` closure is a listener.
///
/// # Examples
///
/// ```
/// use chat_aggregator::chat::domain::ChatMessage;
/// use chat_aggregator::chat::ports::{ListenerResult, MessageListener};
///
/// let listener = |batch: &[ChatMessage]| -> ListenerResult {
///     assert!(!batch.is_empty());
///     Ok(())
/// };
/// let message = ChatMessage::new("m1", "hi", "Ada", "2024-05-01T10:00:00Z");
/// assert!(listener.on_new_messages(&[message]).is_ok());
/// ```
pub trait MessageListener: Send + Sync {
    /// Handles a non-empty batch of newly accepted messages.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError`] when the listener could not handle the
    /// batch. The store logs the error and continues the fan-out.
    fn on_new_messages(&self, batch: &[ChatMessage]) -> ListenerResult;
}

impl<F> MessageListener for F
where
    F: Fn(&[ChatMessage]) -> ListenerResult + Send + Sync,
{
    fn on_new_messages(&self, batch: &[ChatMessage]) -> ListenerResult {
        self(batch)
    }
}
