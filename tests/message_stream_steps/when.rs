//! When steps for message stream BDD scenarios.

use super::world::MessageStreamWorld;
use chat_aggregator::chat::domain::{CatalogKind, ChatMessage, ConversationId};
use rstest_bdd_macros::when;

#[when(
    r#"message "{id}" saying "{text}" from "{sender}" at "{timestamp}" arrives in conversation "{conversation}""#
)]
fn message_arrives(
    world: &mut MessageStreamWorld,
    id: String,
    text: String,
    sender: String,
    timestamp: String,
    conversation: String,
) -> Result<(), eyre::Report> {
    let message = ChatMessage::new(id.as_str(), text, sender, timestamp)
        .with_conversation(ConversationId::new(conversation));
    if !world.store.add_new_message(message).is_stored() {
        return Err(eyre::eyre!("message {id} was rejected"));
    }
    Ok(())
}

#[when(r#"conversation "{conversation}" is marked as read"#)]
fn mark_read(world: &mut MessageStreamWorld, conversation: String) -> Result<(), eyre::Report> {
    if !world
        .store
        .mark_conversation_as_read(&ConversationId::new(conversation.as_str()))
    {
        return Err(eyre::eyre!("unknown conversation {conversation}"));
    }
    Ok(())
}

#[when("the store is cleared")]
fn clear_store(world: &mut MessageStreamWorld) {
    world.store.clear_storage();
}

#[when(r#"an empty history batch is attached to "{kind}" entry "{id}""#)]
fn attach_empty_batch(
    world: &mut MessageStreamWorld,
    kind: String,
    id: String,
) -> Result<(), eyre::Report> {
    let kind = CatalogKind::try_from(kind.as_str())?;
    world.last_attach_result = Some(world.store.add_messages_to_conversation(
        &ConversationId::new(id),
        kind,
        Vec::new(),
    ));
    Ok(())
}
