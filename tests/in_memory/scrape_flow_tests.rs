//! Scraper polling flows against [`AggregationStore`].
//!
//! The scraper re-submits every visible line on each poll. Only lines newer
//! than anything seen before should reach listeners.

use crate::in_memory::helpers::{ObservedStore, observed, poll, scraped_line, support_thread};
use chat_aggregator::chat::domain::{ChatMessage, ConversationId, ElementRef};
use rstest::rstest;

#[rstest]
fn repeated_polls_announce_each_line_once(observed: ObservedStore, support_thread: ConversationId) {
    let ObservedStore { store, recorder } = observed;
    let first_window: Vec<ChatMessage> = (0..3).map(|n| scraped_line(&support_thread, n)).collect();
    let second_window: Vec<ChatMessage> =
        (1..5).map(|n| scraped_line(&support_thread, n)).collect();

    assert_eq!(poll(&store, &first_window), 3);
    assert_eq!(poll(&store, &first_window), 0);
    assert_eq!(poll(&store, &second_window), 2);

    let announced: Vec<String> = recorder
        .messages()
        .iter()
        .map(|m| m.id().to_string())
        .collect();
    assert_eq!(
        announced,
        ["support-0", "support-1", "support-2", "support-3", "support-4"]
    );
}

#[rstest]
fn buffer_holds_the_scrape_window_not_just_new_lines(
    observed: ObservedStore,
    support_thread: ConversationId,
) {
    let ObservedStore { store, .. } = observed;
    let window: Vec<ChatMessage> = (0..2).map(|n| scraped_line(&support_thread, n)).collect();

    poll(&store, &window);
    poll(&store, &window);

    // Re-submitted lines are buffered again; the thread keeps them too.
    assert_eq!(store.all_messages().len(), 4);
    assert_eq!(store.conversation_messages(&support_thread).len(), 4);
}

#[rstest]
fn long_session_respects_both_retention_limits(
    observed: ObservedStore,
    support_thread: ConversationId,
) {
    let ObservedStore { store, recorder } = observed;
    let other = ConversationId::from("sales");

    let threads = [&support_thread, &other];
    for (n, conversation) in (0..150).zip(threads.into_iter().cycle()) {
        store.add_new_message(scraped_line(conversation, n));
    }

    assert_eq!(store.all_messages().len(), 100);
    assert_eq!(recorder.batch_count(), 150);
    for thread in store.all_conversations() {
        assert_eq!(thread.messages().len(), 50);
        assert_eq!(thread.unread_count(), 75);
    }
    let newest = store.recent_messages(1);
    assert_eq!(
        newest.first().map(|m| m.id().to_string()),
        Some("sales-149".to_owned())
    );
}

#[rstest]
fn reading_a_thread_after_reconciliation(observed: ObservedStore, support_thread: ConversationId) {
    let ObservedStore { store, recorder } = observed;
    let window: Vec<ChatMessage> = (0..3).map(|n| scraped_line(&support_thread, n)).collect();
    poll(&store, &window);
    recorder.reset();

    // The page re-renders: line 0 is now shown as read with a new node.
    let rerendered = vec![
        scraped_line(&support_thread, 0)
            .with_read(true)
            .with_element(ElementRef::new("#row-0-v2")),
    ];
    assert_eq!(store.update_existing_message_details(&rerendered), 1);
    assert_eq!(recorder.batch_count(), 0);

    let thread = store.conversation_messages(&support_thread);
    let first = thread.first().expect("thread has lines");
    assert!(first.is_read());
    assert_eq!(first.element().map(|e| e.as_str()), Some("#row-0-v2"));

    // Reconciliation does not clear unread bookkeeping; mark-as-read does.
    let summary = store.conversation(&support_thread).expect("thread exists");
    assert_eq!(summary.unread_count(), 3);
    assert!(store.mark_conversation_as_read(&support_thread));
    assert_eq!(store.stats().unread_total, 0);
}

#[rstest]
fn conversations_list_follows_latest_activity(observed: ObservedStore) {
    let ObservedStore { store, .. } = observed;
    let alpha = ConversationId::from("alpha");
    let beta = ConversationId::from("beta");

    store.add_new_message(scraped_line(&alpha, 1));
    store.add_new_message(scraped_line(&beta, 2));
    store.add_new_message(scraped_line(&alpha, 3));

    let order: Vec<String> = store
        .all_conversations()
        .iter()
        .map(|c| c.id().to_string())
        .collect();
    assert_eq!(order, ["alpha", "beta"]);
}

#[rstest]
fn teardown_leaves_an_empty_store(observed: ObservedStore, support_thread: ConversationId) {
    let ObservedStore { store, recorder } = observed;
    poll(&store, &[scraped_line(&support_thread, 0)]);

    store.clear_storage();

    assert_eq!(store.snapshot().messages.len(), 0);
    assert!(store.all_conversations().is_empty());
    assert!(store.last_message_timestamp().is_none());
    recorder.reset();
    poll(&store, &[scraped_line(&support_thread, 1)]);
    assert_eq!(recorder.batch_count(), 0);
}
