use orbit_types::{Comment, Message, Post, Section, Theme};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{AppState, Store, StoreSnapshot};

const COMMAND_BUFFER: usize = 64;

type Job = Box<dyn FnOnce(&mut Store) + Send>;

enum Command {
    Run(Job),
    Shutdown(oneshot::Sender<usize>),
}

/// Cloneable async front-end to a [`Store`] owned by a single task.
///
/// Every call is queued on one channel, so actions run one at a time in the
/// order they were sent. The owning task also wakes up when the next
/// auto-reply is due and applies it.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    sender: mpsc::Sender<Command>,
}

impl StoreHandle {
    /// Move the store into a new task on the current tokio runtime
    pub fn spawn(store: Store) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(run(store, receiver));
        (Self { sender }, task)
    }

    /// Run a closure against the store and return its result
    pub async fn call<R, F>(&self, f: F) -> StoreResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Store) -> R + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move |store| {
            let _ = tx.send(f(store));
        });

        self.sender
            .send(Command::Run(job))
            .await
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    /// Read-only access to the current state
    pub async fn read<R, F>(&self, f: F) -> StoreResult<R>
    where
        R: Send + 'static,
        F: FnOnce(&AppState) -> R + Send + 'static,
    {
        self.call(move |store| f(store.state())).await
    }

    /// Cancel outstanding auto-replies and stop the owning task.
    /// Returns the number of replies that were cancelled.
    pub async fn shutdown(&self) -> StoreResult<usize> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(Command::Shutdown(tx))
            .await
            .map_err(|_| StoreError::Closed)?;
        rx.await.map_err(|_| StoreError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    pub async fn snapshot(&self) -> StoreResult<StoreSnapshot> {
        self.call(|store| store.snapshot()).await
    }

    pub async fn unread_messages_count(&self) -> StoreResult<u32> {
        self.read(|state| state.unread_messages_count()).await
    }

    pub async fn unread_notifications_count(&self) -> StoreResult<usize> {
        self.read(|state| state.unread_notifications_count()).await
    }

    pub async fn theme(&self) -> StoreResult<Theme> {
        self.call(|store| store.theme()).await
    }

    pub async fn create_post(&self, content: String, images: Vec<String>) -> StoreResult<Post> {
        self.call(move |store| store.create_post(content, images)).await
    }

    pub async fn toggle_like(&self, post_id: Uuid) -> StoreResult<Post> {
        self.call(move |store| store.toggle_like(post_id)).await?
    }

    pub async fn add_comment(&self, post_id: Uuid, content: String) -> StoreResult<Comment> {
        self.call(move |store| store.add_comment(post_id, content)).await?
    }

    pub async fn send_message(
        &self,
        conversation_id: Uuid,
        content: String,
        image: Option<String>,
    ) -> StoreResult<Message> {
        self.call(move |store| store.send_message(conversation_id, content, image))
            .await?
    }

    pub async fn clear_conversation(&self, conversation_id: Uuid) -> StoreResult<()> {
        self.call(move |store| store.clear_conversation(conversation_id))
            .await?
    }

    pub async fn mark_conversation_read(&self, conversation_id: Uuid) -> StoreResult<()> {
        self.call(move |store| store.mark_conversation_read(conversation_id))
            .await?
    }

    pub async fn set_active_conversation(&self, conversation_id: Option<Uuid>) -> StoreResult<()> {
        self.call(move |store| store.set_active_conversation(conversation_id))
            .await?
    }

    pub async fn open_conversation(&self, conversation_id: Uuid) -> StoreResult<()> {
        self.call(move |store| store.open_conversation(conversation_id))
            .await?
    }

    pub async fn mark_all_notifications_read(&self) -> StoreResult<usize> {
        self.call(|store| store.mark_all_notifications_read()).await
    }

    pub async fn mark_notification_read(&self, notification_id: Uuid) -> StoreResult<()> {
        self.call(move |store| store.mark_notification_read(notification_id))
            .await?
    }

    pub async fn connect_user(&self, user_id: Uuid) -> StoreResult<()> {
        self.call(move |store| store.connect_user(user_id)).await?
    }

    pub async fn set_active_section(&self, section: Section) -> StoreResult<()> {
        self.call(move |store| store.set_active_section(section)).await
    }

    pub async fn set_mobile_menu_open(&self, open: bool) -> StoreResult<()> {
        self.call(move |store| store.set_mobile_menu_open(open)).await
    }

    pub async fn set_selected_post(&self, post_id: Option<Uuid>) -> StoreResult<()> {
        self.call(move |store| store.set_selected_post(post_id)).await?
    }

    pub async fn toggle_theme(&self) -> StoreResult<Theme> {
        self.call(|store| store.toggle_theme()).await?
    }
}

async fn run(mut store: Store, mut receiver: mpsc::Receiver<Command>) {
    log::debug!("Store task started");

    loop {
        let next_due = store.next_reply_due();

        tokio::select! {
            biased;

            _ = sleep_until_due(next_due) => {
                deliver(&mut store);
            }

            command = receiver.recv() => match command {
                Some(Command::Run(job)) => {
                    // Replies already due land before the action observes state
                    deliver(&mut store);
                    job(&mut store);
                }
                Some(Command::Shutdown(reply)) => {
                    let cancelled = store.cancel_pending_replies();
                    let _ = reply.send(cancelled);
                    break;
                }
                None => {
                    store.cancel_pending_replies();
                    break;
                }
            },
        }
    }

    log::debug!("Store task stopped");
}

fn deliver(store: &mut Store) {
    let delivered = store.deliver_due_replies(Instant::now());
    if !delivered.is_empty() {
        log::debug!("Delivered {} auto-replies", delivered.len());
    }
}

async fn sleep_until_due(due: Option<Instant>) {
    match due {
        Some(due) => sleep_until(due).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::ids::seed_id;
    use crate::logging::LogConfig;
    use crate::seed::SeedData;
    use crate::storage::MemoryPreferenceStorage;
    use std::time::Duration;

    const DAVID_CHAT: Uuid = seed_id(304);

    fn spawn_store() -> (StoreHandle, JoinHandle<()>) {
        let config = StoreConfig {
            rng_seed: Some(7),
            logging: LogConfig::disabled(),
            ..Default::default()
        };
        let storage = MemoryPreferenceStorage::with_value("orbit-theme", "light");
        let store = Store::new(SeedData::demo(), config, Box::new(storage)).unwrap();
        StoreHandle::spawn(store)
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_reply_follows_virtual_clock() {
        let (handle, _task) = spawn_store();

        handle
            .send_message(DAVID_CHAT, "hi".to_string(), None)
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(1000)).await;
        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot.conversation(DAVID_CHAT).unwrap().messages.len(), 1);

        tokio::time::advance(Duration::from_millis(1600)).await;
        let snapshot = handle.snapshot().await.unwrap();
        let conversation = snapshot.conversation(DAVID_CHAT).unwrap();
        assert_eq!(conversation.messages.len(), 2);
        assert_eq!(conversation.messages[1].sender_id, conversation.user.id);
        assert_eq!(conversation.unread, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_replies() {
        let (handle, task) = spawn_store();

        handle
            .send_message(DAVID_CHAT, "hi".to_string(), None)
            .await
            .unwrap();

        assert_eq!(handle.shutdown().await.unwrap(), 1);
        task.await.unwrap();

        assert!(matches!(handle.snapshot().await, Err(StoreError::Closed)));
        assert!(handle.is_closed());
    }

    #[tokio::test]
    async fn test_not_found_passes_through_handle() {
        let (handle, _task) = spawn_store();

        let err = handle.toggle_like(seed_id(9999)).await.unwrap_err();
        assert!(matches!(err, StoreError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn test_clones_share_one_store() {
        let (handle, _task) = spawn_store();
        let other = handle.clone();

        let post = handle
            .create_post("from one handle".to_string(), vec![])
            .await
            .unwrap();

        let seen = other
            .read(move |state| state.post(post.id).map(|p| p.content.clone()))
            .await
            .unwrap();
        assert_eq!(seen.as_deref(), Some("from one handle"));
    }
}
