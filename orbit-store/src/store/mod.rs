//! The application state store.
//!
//! [`Store`] is the single owner of every mutable domain collection. Views
//! read through [`Store::state`] and change things only through the action
//! methods below. Actions keyed by an id report a `*NotFound` error and leave
//! state untouched when the id is unknown.
//!
//! Sending a message may schedule an auto-reply from the counterpart. The
//! reply is queued inside the store and applied by [`Store::deliver_due_replies`];
//! [`crate::handle::StoreHandle`] drives that from the tokio clock.

mod replies;
mod state;

#[cfg(test)]
mod tests;

pub use replies::{PendingReply, ReplyScheduler};
pub use state::{AppState, StoreSnapshot, ALL_CATEGORIES};

use std::collections::HashMap;

use chrono::Utc;
use orbit_types::{Comment, Message, Post, Section, Theme};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::Instant;
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::ids::generate_id;
use crate::seed::SeedData;
use crate::storage::PreferenceStorage;
use crate::theme::ThemeSettings;

/// Conversation preview shown for messages without text
pub const IMAGE_PREVIEW: &str = "Sent an image";

pub struct Store {
    state: AppState,
    auto_replies: HashMap<Uuid, Vec<String>>,
    scheduler: ReplyScheduler,
    theme: ThemeSettings,
    config: StoreConfig,
    rng: StdRng,
}

impl Store {
    /// Build a store from seed data. The seed is validated and comment
    /// counters are reconciled with their threads before anything is exposed.
    pub fn new(
        seed: SeedData,
        config: StoreConfig,
        storage: Box<dyn PreferenceStorage>,
    ) -> StoreResult<Self> {
        seed.validate()?;

        let mut seed = seed;
        seed.normalize_comment_counts();
        let auto_replies = std::mem::take(&mut seed.auto_replies);

        let theme = ThemeSettings::load(storage, config.theme_key.clone());
        let rng = match config.rng_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "Store initialised: {} posts, {} conversations, {} notifications, theme={}",
            seed.posts.len(),
            seed.conversations.len(),
            seed.notifications.len(),
            theme.current().as_str()
        );

        Ok(Self {
            state: AppState::from_seed(seed),
            auto_replies,
            scheduler: ReplyScheduler::new(),
            theme,
            config,
            rng,
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot::capture(&self.state, self.theme.current())
    }

    pub fn unread_messages_count(&self) -> u32 {
        self.state.unread_messages_count()
    }

    pub fn unread_notifications_count(&self) -> usize {
        self.state.unread_notifications_count()
    }

    // Posts

    /// Publish a post as the current user at the top of the feed.
    /// Images past the configured maximum are dropped.
    pub fn create_post(&mut self, content: impl Into<String>, mut images: Vec<String>) -> Post {
        if images.len() > self.config.max_post_images {
            log::warn!(
                "Post has {} images, keeping the first {}",
                images.len(),
                self.config.max_post_images
            );
            images.truncate(self.config.max_post_images);
        }

        let post = Post {
            id: generate_id(),
            author: self.state.current_user.clone(),
            content: content.into(),
            images,
            likes: 0,
            comments: 0,
            shares: 0,
            created_at: Utc::now(),
            is_liked: false,
            category: self.config.default_post_category.clone(),
        };

        log_action!(self.config.logging, "create_post id={}", post.id);
        self.state.posts.insert(0, post.clone());
        post
    }

    /// Like or unlike a post on behalf of the current user
    pub fn toggle_like(&mut self, post_id: Uuid) -> StoreResult<Post> {
        let post = self
            .state
            .post_mut(post_id)
            .ok_or(StoreError::PostNotFound(post_id))?;

        if post.is_liked {
            post.is_liked = false;
            post.likes = post.likes.saturating_sub(1);
        } else {
            post.is_liked = true;
            post.likes += 1;
        }

        log_action!(
            self.config.logging,
            "toggle_like id={} liked={} likes={}",
            post_id,
            post.is_liked,
            post.likes
        );
        Ok(post.clone())
    }

    /// Append a comment by the current user and bump the post's counter
    pub fn add_comment(&mut self, post_id: Uuid, content: impl Into<String>) -> StoreResult<Comment> {
        let author = self.state.current_user.clone();
        let post = self
            .state
            .post_mut(post_id)
            .ok_or(StoreError::PostNotFound(post_id))?;
        post.comments += 1;

        let comment = Comment {
            id: generate_id(),
            author,
            content: content.into(),
            created_at: Utc::now(),
            likes: 0,
        };

        self.state
            .post_comments
            .entry(post_id)
            .or_default()
            .push(comment.clone());

        log_action!(self.config.logging, "add_comment post={} id={}", post_id, comment.id);
        Ok(comment)
    }

    /// Select a post for the detail view; `None` closes it
    pub fn set_selected_post(&mut self, post_id: Option<Uuid>) -> StoreResult<()> {
        if let Some(id) = post_id {
            if self.state.post(id).is_none() {
                return Err(StoreError::PostNotFound(id));
            }
        }
        self.state.ui.selected_post = post_id;
        Ok(())
    }

    // Conversations

    /// Send a message as the current user. Empty `content` is stored as no
    /// text. If the counterpart has an auto-reply pool, one reply is picked
    /// now and queued for delivery after a randomised delay.
    pub fn send_message(
        &mut self,
        conversation_id: Uuid,
        content: impl Into<String>,
        image: Option<String>,
    ) -> StoreResult<Message> {
        let content = content.into();
        let sender_id = self.state.current_user.id;
        let conversation = self
            .state
            .conversation_mut(conversation_id)
            .ok_or(StoreError::ConversationNotFound(conversation_id))?;

        let now = Utc::now();
        let message = Message {
            id: generate_id(),
            sender_id,
            content: (!content.is_empty()).then(|| content.clone()),
            image,
            created_at: now,
        };

        conversation.messages.push(message.clone());
        conversation.last_message = if content.is_empty() {
            IMAGE_PREVIEW.to_string()
        } else {
            content
        };
        conversation.updated_at = now;
        let counterpart = conversation.user.id;

        log_action!(
            self.config.logging,
            "send_message conversation={} id={}",
            conversation_id,
            message.id
        );

        self.schedule_auto_reply(conversation_id, counterpart);
        Ok(message)
    }

    fn schedule_auto_reply(&mut self, conversation_id: Uuid, counterpart: Uuid) {
        let Some(pool) = self.auto_replies.get(&counterpart) else {
            return;
        };
        if pool.is_empty() {
            return;
        }

        let reply = pool[self.rng.gen_range(0..pool.len())].clone();
        let (min, max) = self.config.reply_delay_bounds();
        let delay = if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        };

        log_reply!(
            self.config.logging,
            "scheduled reply in {:?} for conversation={}",
            delay,
            conversation_id
        );
        self.scheduler
            .schedule(conversation_id, counterpart, reply, Instant::now() + delay);
    }

    /// Earliest instant at which a queued auto-reply becomes due
    pub fn next_reply_due(&self) -> Option<Instant> {
        self.scheduler.next_due()
    }

    pub fn pending_replies(&self) -> &[PendingReply] {
        self.scheduler.pending()
    }

    /// Apply every auto-reply due at or before `now`, earliest first, and
    /// return the delivered messages.
    ///
    /// A reply into the active conversation leaves it read; otherwise the
    /// conversation is marked with a single unread message. Whether it is
    /// active is checked here, at delivery. Replies whose conversation no
    /// longer exists are dropped.
    pub fn deliver_due_replies(&mut self, now: Instant) -> Vec<Message> {
        let mut delivered = Vec::new();

        for reply in self.scheduler.take_due(now) {
            let active = self.state.ui.active_conversation == Some(reply.conversation_id);
            let Some(conversation) = self.state.conversation_mut(reply.conversation_id) else {
                log::warn!(
                    "Dropping auto-reply for missing conversation {}",
                    reply.conversation_id
                );
                continue;
            };

            let created_at = Utc::now();
            let message = Message {
                id: generate_id(),
                sender_id: reply.sender_id,
                content: Some(reply.content.clone()),
                image: None,
                created_at,
            };

            conversation.messages.push(message.clone());
            conversation.last_message = reply.content;
            conversation.updated_at = created_at;
            conversation.unread = if active { 0 } else { 1 };

            log_reply!(
                self.config.logging,
                "delivered reply conversation={} unread={}",
                conversation.id,
                conversation.unread
            );
            delivered.push(message);
        }

        delivered
    }

    /// Drop all queued auto-replies; returns how many were cancelled
    pub fn cancel_pending_replies(&mut self) -> usize {
        let cancelled = self.scheduler.cancel_all();
        if cancelled > 0 {
            log_reply!(self.config.logging, "cancelled {} pending replies", cancelled);
        }
        cancelled
    }

    /// Remove every message and the preview. The unread counter and any
    /// queued auto-replies are left alone.
    pub fn clear_conversation(&mut self, conversation_id: Uuid) -> StoreResult<()> {
        let conversation = self
            .state
            .conversation_mut(conversation_id)
            .ok_or(StoreError::ConversationNotFound(conversation_id))?;

        conversation.messages.clear();
        conversation.last_message.clear();

        log_action!(self.config.logging, "clear_conversation id={}", conversation_id);
        Ok(())
    }

    pub fn mark_conversation_read(&mut self, conversation_id: Uuid) -> StoreResult<()> {
        let conversation = self
            .state
            .conversation_mut(conversation_id)
            .ok_or(StoreError::ConversationNotFound(conversation_id))?;
        conversation.unread = 0;
        Ok(())
    }

    /// Mark which conversation the user is looking at; `None` closes it
    pub fn set_active_conversation(&mut self, conversation_id: Option<Uuid>) -> StoreResult<()> {
        if let Some(id) = conversation_id {
            if self.state.conversation(id).is_none() {
                return Err(StoreError::ConversationNotFound(id));
            }
        }
        self.state.ui.active_conversation = conversation_id;
        Ok(())
    }

    /// Make a conversation active and mark it read
    pub fn open_conversation(&mut self, conversation_id: Uuid) -> StoreResult<()> {
        self.set_active_conversation(Some(conversation_id))?;
        self.mark_conversation_read(conversation_id)
    }

    // Notifications

    /// Mark every notification read; returns how many changed
    pub fn mark_all_notifications_read(&mut self) -> usize {
        let mut changed = 0;
        for notification in self.state.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            changed += 1;
        }
        log_action!(self.config.logging, "mark_all_notifications_read changed={}", changed);
        changed
    }

    pub fn mark_notification_read(&mut self, notification_id: Uuid) -> StoreResult<()> {
        let notification = self
            .state
            .notifications
            .iter_mut()
            .find(|n| n.id == notification_id)
            .ok_or(StoreError::NotificationNotFound(notification_id))?;
        notification.read = true;
        Ok(())
    }

    // Connections

    /// Connect with a suggested user. Connecting twice is a no-op and there
    /// is no way back.
    pub fn connect_user(&mut self, user_id: Uuid) -> StoreResult<()> {
        let suggestion = self
            .state
            .suggested_users
            .iter_mut()
            .find(|s| s.user.id == user_id)
            .ok_or(StoreError::UserNotFound(user_id))?;

        if !suggestion.is_connected {
            suggestion.is_connected = true;
            log_action!(self.config.logging, "connect_user id={}", user_id);
        }
        Ok(())
    }

    // View state

    pub fn set_active_section(&mut self, section: Section) {
        self.state.ui.active_section = section;
    }

    pub fn set_mobile_menu_open(&mut self, open: bool) {
        self.state.ui.mobile_menu_open = open;
    }

    /// Flip between light and dark and persist the choice
    pub fn toggle_theme(&mut self) -> StoreResult<Theme> {
        let theme = self.theme.toggle()?;
        log_storage!(self.config.logging, "theme set to {}", theme.as_str());
        Ok(theme)
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.cancel_pending_replies();
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("posts", &self.state.posts.len())
            .field("conversations", &self.state.conversations.len())
            .field("pending_replies", &self.scheduler.len())
            .field("theme", &self.theme.current())
            .finish()
    }
}
