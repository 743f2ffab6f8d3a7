//! Then steps for message stream BDD scenarios.

use super::world::MessageStreamWorld;
use chat_aggregator::chat::{
    domain::{CatalogKind, ConversationId},
    error::CatalogError,
};
use rstest_bdd_macros::then;

#[then(r#"conversation "{conversation}" has {count:usize} unread messages"#)]
fn unread_count_is(
    world: &MessageStreamWorld,
    conversation: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let thread = world
        .store
        .conversation(&ConversationId::new(conversation.as_str()))
        .ok_or_else(|| eyre::eyre!("missing conversation {conversation}"))?;
    if thread.unread_count() != count {
        return Err(eyre::eyre!(
            "expected {count} unread, found {}",
            thread.unread_count()
        ));
    }
    Ok(())
}

#[then(r#"conversation "{conversation}" last message is "{text}""#)]
fn last_message_is(
    world: &MessageStreamWorld,
    conversation: String,
    text: String,
) -> Result<(), eyre::Report> {
    let thread = world
        .store
        .conversation(&ConversationId::new(conversation.as_str()))
        .ok_or_else(|| eyre::eyre!("missing conversation {conversation}"))?;
    if thread.last_message() != text {
        return Err(eyre::eyre!(
            "expected last message {text:?}, found {:?}",
            thread.last_message()
        ));
    }
    Ok(())
}

#[then("the subscriber was notified {count:usize} times")]
fn subscriber_notified(world: &MessageStreamWorld, count: usize) -> Result<(), eyre::Report> {
    let seen = world.recorder.batch_count();
    if seen != count {
        return Err(eyre::eyre!("expected {count} notifications, found {seen}"));
    }
    Ok(())
}

#[then("the store buffers {count:usize} messages")]
fn store_buffers(world: &MessageStreamWorld, count: usize) -> Result<(), eyre::Report> {
    let buffered = world.store.all_messages().len();
    if buffered != count {
        return Err(eyre::eyre!(
            "expected {count} buffered messages, found {buffered}"
        ));
    }
    Ok(())
}

#[then("the store has no conversations")]
fn no_conversations(world: &MessageStreamWorld) -> Result<(), eyre::Report> {
    let threads = world.store.all_conversations();
    if !threads.is_empty() {
        return Err(eyre::eyre!("expected no conversations, found {}", threads.len()));
    }
    Ok(())
}

#[then(r#"the "{kind}" catalog entry "{id}" is missing"#)]
fn catalog_entry_missing(
    world: &MessageStreamWorld,
    kind: String,
    id: String,
) -> Result<(), eyre::Report> {
    let kind = CatalogKind::try_from(kind.as_str())?;
    if world
        .store
        .catalog_entry(&ConversationId::new(id.as_str()), kind)
        .is_some()
    {
        return Err(eyre::eyre!("catalog entry {id} should have been cleared"));
    }
    Ok(())
}

#[then("the history attachment fails with an empty batch error")]
fn attachment_fails_with_empty_batch(world: &MessageStreamWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_attach_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing attachment result"))?;
    if !matches!(result, Err(CatalogError::EmptyBatch { .. })) {
        return Err(eyre::eyre!("expected EmptyBatch error, got {result:?}"));
    }
    Ok(())
}
