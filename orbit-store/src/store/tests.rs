use super::*;
use crate::ids::seed_id;
use crate::logging::LogConfig;
use crate::storage::MemoryPreferenceStorage;
use std::sync::Arc;
use std::time::Duration;

const SARAH_CHAT: Uuid = seed_id(301);
const EMILY_CHAT: Uuid = seed_id(303);
const DAVID_CHAT: Uuid = seed_id(304);
const PRIYA_CHAT: Uuid = seed_id(305);
const FIRST_POST: Uuid = seed_id(101);
const UNREAD_NOTIFICATION: Uuid = seed_id(501);
const JORDAN: Uuid = seed_id(7);

fn test_config() -> StoreConfig {
    StoreConfig {
        rng_seed: Some(42),
        logging: LogConfig::disabled(),
        ..Default::default()
    }
}

fn test_store() -> Store {
    let storage = MemoryPreferenceStorage::with_value("orbit-theme", "light");
    Store::new(SeedData::demo(), test_config(), Box::new(storage)).unwrap()
}

/// Comfortably past the longest auto-reply delay
fn after_reply_window() -> Instant {
    Instant::now() + Duration::from_secs(3)
}

fn recomputed_unread(store: &Store) -> u32 {
    store.state().conversations().iter().map(|c| c.unread).sum()
}

#[test]
fn test_create_post_prepends_with_zero_counts() {
    let mut store = test_store();
    let before = store.state().posts().len();

    let post = store.create_post("Hello orbit", vec!["img.png".to_string()]);

    assert_eq!(store.state().posts().len(), before + 1);
    assert_eq!(store.state().posts()[0].id, post.id);
    assert_eq!(post.author.id, store.state().current_user().id);
    assert_eq!((post.likes, post.comments, post.shares), (0, 0, 0));
    assert!(!post.is_liked);
    assert_eq!(post.category, "Technology");
}

#[test]
fn test_create_post_keeps_at_most_four_images() {
    let mut store = test_store();
    let images: Vec<String> = (0..6).map(|i| format!("img{}.png", i)).collect();

    let post = store.create_post("", images);

    assert_eq!(post.images, vec!["img0.png", "img1.png", "img2.png", "img3.png"]);
}

#[test]
fn test_create_post_accepts_empty_content() {
    let mut store = test_store();
    let post = store.create_post("", vec![]);
    assert_eq!(post.content, "");
}

#[test]
fn test_toggle_like_twice_restores_post() {
    let mut store = test_store();
    let original = store.state().post(FIRST_POST).unwrap().clone();

    let liked = store.toggle_like(FIRST_POST).unwrap();
    assert!(liked.is_liked);
    assert_eq!(liked.likes, original.likes + 1);

    let unliked = store.toggle_like(FIRST_POST).unwrap();
    assert_eq!(unliked.is_liked, original.is_liked);
    assert_eq!(unliked.likes, original.likes);
}

#[test]
fn test_toggle_like_unknown_post() {
    let mut store = test_store();
    let before = store.snapshot();

    let err = store.toggle_like(seed_id(9999)).unwrap_err();

    assert!(matches!(err, StoreError::PostNotFound(_)));
    assert!(err.is_not_found());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_add_comment_keeps_counter_in_step() {
    let mut store = test_store();
    let before_thread = store.state().comments_for(FIRST_POST).len();
    let before_count = store.state().post(FIRST_POST).unwrap().comments;

    let comment = store.add_comment(FIRST_POST, "x").unwrap();

    let thread = store.state().comments_for(FIRST_POST);
    assert_eq!(thread.len(), before_thread + 1);
    assert_eq!(thread.last().unwrap().id, comment.id);
    assert_eq!(
        store.state().post(FIRST_POST).unwrap().comments,
        before_count + 1
    );
    assert_eq!(comment.author.id, store.state().current_user().id);
}

#[test]
fn test_add_comment_on_post_without_thread() {
    let mut store = test_store();
    let post = store.create_post("fresh", vec![]);

    store.add_comment(post.id, "first!").unwrap();

    assert_eq!(store.state().comments_for(post.id).len(), 1);
    assert_eq!(store.state().post(post.id).unwrap().comments, 1);
}

#[test]
fn test_add_comment_unknown_post_creates_no_thread() {
    let mut store = test_store();
    let missing = seed_id(9999);

    assert!(matches!(
        store.add_comment(missing, "lost"),
        Err(StoreError::PostNotFound(id)) if id == missing
    ));
    assert!(store.state().comments_for(missing).is_empty());
}

#[test]
fn test_seed_comment_counters_are_reconciled() {
    let mut seed = SeedData::demo();
    seed.posts[0].comments = 40;
    let store = Store::new(
        seed,
        test_config(),
        Box::new(MemoryPreferenceStorage::new()),
    )
    .unwrap();

    let post = &store.state().posts()[0];
    assert_eq!(post.comments as usize, store.state().comments_for(post.id).len());
}

#[test]
fn test_duplicate_seed_ids_rejected() {
    let mut seed = SeedData::demo();
    let dup = seed.conversations[0].clone();
    seed.conversations.push(dup);

    let result = Store::new(seed, test_config(), Box::new(MemoryPreferenceStorage::new()));
    assert!(matches!(result, Err(StoreError::InvalidSeed(_))));
}

#[test]
fn test_send_message_updates_preview_and_schedules_reply() {
    let mut store = test_store();

    let message = store.send_message(DAVID_CHAT, "hi", None).unwrap();

    let conversation = store.state().conversation(DAVID_CHAT).unwrap();
    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].id, message.id);
    assert_eq!(conversation.last_message, "hi");
    assert_eq!(message.content.as_deref(), Some("hi"));
    assert_eq!(store.pending_replies().len(), 1);
}

#[test]
fn test_image_message_uses_placeholder_preview() {
    let mut store = test_store();

    let message = store
        .send_message(DAVID_CHAT, "", Some("photo.jpg".to_string()))
        .unwrap();

    assert_eq!(message.content, None);
    assert_eq!(message.image.as_deref(), Some("photo.jpg"));
    assert_eq!(
        store.state().conversation(DAVID_CHAT).unwrap().last_message,
        IMAGE_PREVIEW
    );
}

#[test]
fn test_reply_delay_within_window() {
    let mut store = test_store();
    let sent_at = Instant::now();

    store.send_message(DAVID_CHAT, "hi", None).unwrap();

    let due = store.next_reply_due().unwrap();
    assert!(due >= sent_at + Duration::from_millis(1500));
    assert!(due < Instant::now() + Duration::from_millis(2500));
}

#[test]
fn test_auto_reply_arrives_after_delay() {
    let mut store = test_store();
    let david = store.state().conversation(DAVID_CHAT).unwrap().user.id;

    store.send_message(DAVID_CHAT, "hi", None).unwrap();

    assert!(store.deliver_due_replies(Instant::now()).is_empty());
    assert_eq!(store.state().conversation(DAVID_CHAT).unwrap().messages.len(), 1);

    let delivered = store.deliver_due_replies(after_reply_window());
    assert_eq!(delivered.len(), 1);

    let conversation = store.state().conversation(DAVID_CHAT).unwrap();
    assert_eq!(conversation.messages.len(), 2);
    assert_eq!(conversation.messages[1].sender_id, david);
    assert_eq!(
        Some(conversation.last_message.as_str()),
        conversation.messages[1].content.as_deref()
    );
    assert!(store.pending_replies().is_empty());
}

#[test]
fn test_auto_reply_drawn_from_counterpart_pool() {
    let mut store = test_store();
    let pool = SeedData::demo().auto_replies[&seed_id(5)].clone();

    store.send_message(DAVID_CHAT, "hi", None).unwrap();
    let delivered = store.deliver_due_replies(after_reply_window());

    let text = delivered[0].content.clone().unwrap();
    assert!(pool.contains(&text), "{:?} not in pool", text);
}

#[test]
fn test_no_reply_without_pool() {
    let mut store = test_store();

    store.send_message(PRIYA_CHAT, "thanks!", None).unwrap();

    assert!(store.next_reply_due().is_none());
    assert!(store.deliver_due_replies(after_reply_window()).is_empty());
}

#[test]
fn test_reply_to_inactive_conversation_sets_unread_to_one() {
    let mut seed = SeedData::demo();
    seed.conversations
        .iter_mut()
        .find(|c| c.id == SARAH_CHAT)
        .unwrap()
        .unread = 3;
    let storage = MemoryPreferenceStorage::with_value("orbit-theme", "light");
    let mut store = Store::new(seed, test_config(), Box::new(storage)).unwrap();

    store.send_message(SARAH_CHAT, "see you there", None).unwrap();
    store.deliver_due_replies(after_reply_window());

    assert_eq!(store.state().conversation(SARAH_CHAT).unwrap().unread, 1);
    assert_eq!(store.unread_messages_count(), recomputed_unread(&store));
}

#[test]
fn test_reply_to_read_conversation_marks_it_unread() {
    let mut store = test_store();
    assert_eq!(store.state().conversation(DAVID_CHAT).unwrap().unread, 0);

    store.send_message(DAVID_CHAT, "hi", None).unwrap();
    store.deliver_due_replies(after_reply_window());

    assert_eq!(store.state().conversation(DAVID_CHAT).unwrap().unread, 1);
}

#[test]
fn test_reply_to_active_conversation_stays_read() {
    let mut store = test_store();
    store.open_conversation(SARAH_CHAT).unwrap();

    store.send_message(SARAH_CHAT, "see you there", None).unwrap();
    store.deliver_due_replies(after_reply_window());

    assert_eq!(store.state().conversation(SARAH_CHAT).unwrap().unread, 0);
}

#[test]
fn test_active_state_checked_at_delivery() {
    let mut store = test_store();
    store.open_conversation(DAVID_CHAT).unwrap();
    store.send_message(DAVID_CHAT, "hi", None).unwrap();

    store.set_active_conversation(None).unwrap();
    store.deliver_due_replies(after_reply_window());

    assert_eq!(store.state().conversation(DAVID_CHAT).unwrap().unread, 1);
}

#[test]
fn test_send_message_unknown_conversation() {
    let mut store = test_store();

    assert!(matches!(
        store.send_message(seed_id(9999), "hello?", None),
        Err(StoreError::ConversationNotFound(_))
    ));
    assert!(store.next_reply_due().is_none());
}

#[test]
fn test_clear_conversation_keeps_unread() {
    let mut store = test_store();
    let unread_before = store.state().conversation(SARAH_CHAT).unwrap().unread;
    let total_before = store.unread_messages_count();

    store.clear_conversation(SARAH_CHAT).unwrap();

    let conversation = store.state().conversation(SARAH_CHAT).unwrap();
    assert!(conversation.messages.is_empty());
    assert_eq!(conversation.last_message, "");
    assert_eq!(conversation.unread, unread_before);
    assert_eq!(store.unread_messages_count(), total_before);
}

#[test]
fn test_clear_does_not_cancel_pending_reply() {
    let mut store = test_store();
    store.send_message(DAVID_CHAT, "hi", None).unwrap();

    store.clear_conversation(DAVID_CHAT).unwrap();
    store.deliver_due_replies(after_reply_window());

    assert_eq!(store.state().conversation(DAVID_CHAT).unwrap().messages.len(), 1);
}

#[test]
fn test_mark_conversation_read() {
    let mut store = test_store();
    assert!(store.unread_messages_count() > 0);

    store.mark_conversation_read(SARAH_CHAT).unwrap();
    store.mark_conversation_read(EMILY_CHAT).unwrap();

    assert_eq!(store.unread_messages_count(), 0);
    assert_eq!(store.unread_messages_count(), recomputed_unread(&store));
}

#[test]
fn test_open_conversation_sets_active_and_reads() {
    let mut store = test_store();

    store.open_conversation(SARAH_CHAT).unwrap();

    assert_eq!(store.state().ui().active_conversation, Some(SARAH_CHAT));
    assert_eq!(store.state().active_conversation().unwrap().unread, 0);
}

#[test]
fn test_set_active_conversation_unknown_id() {
    let mut store = test_store();
    store.open_conversation(SARAH_CHAT).unwrap();

    assert!(store.set_active_conversation(Some(seed_id(9999))).is_err());
    assert_eq!(store.state().ui().active_conversation, Some(SARAH_CHAT));
}

#[test]
fn test_notification_counters() {
    let mut store = test_store();
    let unread = |s: &Store| s.state().notifications().iter().filter(|n| !n.read).count();
    let before = store.unread_notifications_count();
    assert_eq!(before, unread(&store));

    store.mark_notification_read(UNREAD_NOTIFICATION).unwrap();
    assert_eq!(store.unread_notifications_count(), before - 1);
    assert_eq!(store.unread_notifications_count(), unread(&store));

    let changed = store.mark_all_notifications_read();
    assert_eq!(changed, before - 1);
    assert_eq!(store.unread_notifications_count(), 0);

    assert_eq!(store.mark_all_notifications_read(), 0);
}

#[test]
fn test_mark_unknown_notification() {
    let mut store = test_store();
    assert!(matches!(
        store.mark_notification_read(seed_id(9999)),
        Err(StoreError::NotificationNotFound(_))
    ));
}

#[test]
fn test_connect_user_is_idempotent() {
    let mut store = test_store();

    store.connect_user(JORDAN).unwrap();
    let after_first = store.snapshot();
    store.connect_user(JORDAN).unwrap();

    assert_eq!(store.snapshot(), after_first);
    let jordan = store
        .state()
        .suggested_users()
        .iter()
        .find(|s| s.user.id == JORDAN)
        .unwrap();
    assert!(jordan.is_connected);
}

#[test]
fn test_connect_unknown_user() {
    let mut store = test_store();
    assert!(matches!(
        store.connect_user(seed_id(9999)),
        Err(StoreError::UserNotFound(_))
    ));
}

#[test]
fn test_toggle_theme_persists() {
    let storage = Arc::new(MemoryPreferenceStorage::with_value("orbit-theme", "light"));
    let mut store = Store::new(SeedData::demo(), test_config(), Box::new(storage.clone())).unwrap();
    assert_eq!(store.theme(), Theme::Light);

    assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
    assert_eq!(storage.get("orbit-theme").unwrap(), Some("dark".to_string()));

    assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
    assert_eq!(storage.get("orbit-theme").unwrap(), Some("light".to_string()));
}

#[test]
fn test_view_state_actions() {
    let mut store = test_store();

    store.set_active_section(Section::Discover);
    store.set_mobile_menu_open(true);
    store.set_selected_post(Some(FIRST_POST)).unwrap();

    let ui = store.state().ui();
    assert_eq!(ui.active_section, Section::Discover);
    assert!(ui.mobile_menu_open);
    assert_eq!(ui.selected_post, Some(FIRST_POST));

    assert!(store.set_selected_post(Some(seed_id(9999))).is_err());
    store.set_selected_post(None).unwrap();
    assert_eq!(store.state().ui().selected_post, None);
}

#[test]
fn test_queries() {
    let store = test_store();
    let state = store.state();

    assert_eq!(state.posts_in_category(ALL_CATEGORIES).len(), state.posts().len());
    assert!(state
        .posts_in_category("Design")
        .iter()
        .all(|p| p.category == "Design"));

    let mine = state.posts_by_author(state.current_user().id);
    assert!(!mine.is_empty());

    assert!(state.online_users().iter().all(|u| u.is_online));

    let by_recency = state.conversations_by_recency();
    assert!(by_recency
        .windows(2)
        .all(|w| w[0].updated_at >= w[1].updated_at));

    assert_eq!(
        state.conversation_with_user(seed_id(5)).map(|c| c.id),
        Some(DAVID_CHAT)
    );
    assert_eq!(
        state.notification_post(UNREAD_NOTIFICATION).map(|p| p.id),
        Some(seed_id(106))
    );
}

#[test]
fn test_sent_message_moves_conversation_to_top() {
    let mut store = test_store();
    store.send_message(PRIYA_CHAT, "ping", None).unwrap();
    assert_eq!(store.state().conversations_by_recency()[0].id, PRIYA_CHAT);
}

#[test]
fn test_cancel_pending_replies() {
    let mut store = test_store();
    store.send_message(DAVID_CHAT, "one", None).unwrap();
    store.send_message(SARAH_CHAT, "two", None).unwrap();

    assert_eq!(store.cancel_pending_replies(), 2);
    assert!(store.deliver_due_replies(after_reply_window()).is_empty());
}

#[test]
fn test_snapshot_carries_derived_counters() {
    let store = test_store();
    let snapshot = store.snapshot();

    assert_eq!(snapshot.unread_messages_count, store.unread_messages_count());
    assert_eq!(
        snapshot.unread_notifications_count,
        store.unread_notifications_count()
    );
    assert_eq!(snapshot.theme, Theme::Light);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Send(usize),
        Read(usize),
        Open(usize),
        Close,
        Clear(usize),
        Deliver,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0..5usize).prop_map(Op::Send),
            (0..5usize).prop_map(Op::Read),
            (0..5usize).prop_map(Op::Open),
            Just(Op::Close),
            (0..5usize).prop_map(Op::Clear),
            Just(Op::Deliver),
        ]
    }

    proptest! {
        #[test]
        fn prop_double_toggle_restores_every_post(index in 0..6usize) {
            let mut store = test_store();
            let post = store.state().posts()[index].clone();

            store.toggle_like(post.id).unwrap();
            store.toggle_like(post.id).unwrap();

            let after = store.state().post(post.id).unwrap();
            prop_assert_eq!(after.likes, post.likes);
            prop_assert_eq!(after.is_liked, post.is_liked);
        }

        #[test]
        fn prop_comment_counter_tracks_thread(
            targets in proptest::collection::vec(0..6usize, 0..20)
        ) {
            let mut store = test_store();
            let ids: Vec<Uuid> = store.state().posts().iter().map(|p| p.id).collect();

            for t in targets {
                store.add_comment(ids[t], "x").unwrap();
            }

            for post in store.state().posts() {
                prop_assert_eq!(
                    post.comments as usize,
                    store.state().comments_for(post.id).len()
                );
            }
        }

        #[test]
        fn prop_unread_total_is_live_sum(ops in proptest::collection::vec(op(), 0..25)) {
            let mut store = test_store();
            let ids: Vec<Uuid> = store.state().conversations().iter().map(|c| c.id).collect();
            let mut clock = Instant::now();

            for op in ops {
                match op {
                    Op::Send(i) => { store.send_message(ids[i], "hey", None).unwrap(); }
                    Op::Read(i) => store.mark_conversation_read(ids[i]).unwrap(),
                    Op::Open(i) => store.open_conversation(ids[i]).unwrap(),
                    Op::Close => store.set_active_conversation(None).unwrap(),
                    Op::Clear(i) => store.clear_conversation(ids[i]).unwrap(),
                    Op::Deliver => {
                        clock += Duration::from_secs(3);
                        store.deliver_due_replies(clock);
                    }
                }
                prop_assert_eq!(store.unread_messages_count(), recomputed_unread(&store));
            }
        }
    }
}
