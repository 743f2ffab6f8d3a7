//! Given steps for message stream BDD scenarios.

use std::sync::Arc;

use super::world::MessageStreamWorld;
use chat_aggregator::chat::domain::{CatalogEntry, CatalogKind, ConversationId};
use rstest_bdd_macros::given;

#[given("an empty message store with a subscriber")]
fn empty_store_with_subscriber(world: &mut MessageStreamWorld) -> Result<(), eyre::Report> {
    if !world.store.all_messages().is_empty() {
        return Err(eyre::eyre!("expected a fresh store"));
    }
    world
        .store
        .on_new_messages(Arc::new(world.recorder.clone()));
    if world.store.stats().listener_count != 1 {
        return Err(eyre::eyre!("subscriber was not registered"));
    }
    Ok(())
}

#[given(r#"a "{kind}" catalog entry "{id}""#)]
fn catalog_entry(
    world: &mut MessageStreamWorld,
    kind: String,
    id: String,
) -> Result<(), eyre::Report> {
    let entry = CatalogEntry::new(ConversationId::new(id)).with_name("scenario entry");
    match CatalogKind::try_from(kind.as_str())? {
        CatalogKind::Channel => world.store.set_channels(vec![entry]),
        CatalogKind::DirectMessage => world.store.set_direct_messages(vec![entry]),
    }
    Ok(())
}
