use std::collections::HashMap;

use orbit_types::{
    ActivityPoint, Comment, Conversation, Notification, Post, SuggestedUser, Theme, UiState, User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::seed::SeedData;

/// Category label that matches every post
pub const ALL_CATEGORIES: &str = "All";

/// All domain collections owned by the store.
///
/// Read access is public; mutation goes through [`super::Store`] only.
#[derive(Debug, Clone)]
pub struct AppState {
    pub(crate) current_user: User,
    pub(crate) users: Vec<User>,
    /// Most recent first
    pub(crate) posts: Vec<Post>,
    pub(crate) post_comments: HashMap<Uuid, Vec<Comment>>,
    pub(crate) conversations: Vec<Conversation>,
    pub(crate) notifications: Vec<Notification>,
    pub(crate) suggested_users: Vec<SuggestedUser>,
    pub(crate) categories: Vec<String>,
    pub(crate) activity: Vec<ActivityPoint>,
    pub(crate) ui: UiState,
}

impl AppState {
    pub(crate) fn from_seed(seed: SeedData) -> Self {
        Self {
            current_user: seed.current_user,
            users: seed.users,
            posts: seed.posts,
            post_comments: seed.comments,
            conversations: seed.conversations,
            notifications: seed.notifications,
            suggested_users: seed.suggested_users,
            categories: seed.categories,
            activity: seed.activity,
            ui: UiState::default(),
        }
    }

    pub fn current_user(&self) -> &User {
        &self.current_user
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn online_users(&self) -> Vec<&User> {
        self.users.iter().filter(|u| u.is_online).collect()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, post_id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    /// Comment thread of a post; empty when the post has none
    pub fn comments_for(&self, post_id: Uuid) -> &[Comment] {
        self.post_comments
            .get(&post_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Posts in a category, in feed order. `"All"` matches everything.
    pub fn posts_in_category(&self, category: &str) -> Vec<&Post> {
        if category == ALL_CATEGORIES {
            return self.posts.iter().collect();
        }
        self.posts.iter().filter(|p| p.category == category).collect()
    }

    pub fn posts_by_author(&self, user_id: Uuid) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.author.id == user_id).collect()
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn activity(&self) -> &[ActivityPoint] {
        &self.activity
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, conversation_id: Uuid) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    /// Conversations ordered by last activity, newest first
    pub fn conversations_by_recency(&self) -> Vec<&Conversation> {
        let mut sorted: Vec<&Conversation> = self.conversations.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    pub fn conversation_with_user(&self, user_id: Uuid) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.user.id == user_id)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.ui
            .active_conversation
            .and_then(|id| self.conversation(id))
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// The post a notification refers to, if it still exists
    pub fn notification_post(&self, notification_id: Uuid) -> Option<&Post> {
        self.notifications
            .iter()
            .find(|n| n.id == notification_id)
            .and_then(|n| n.post_id)
            .and_then(|post_id| self.post(post_id))
    }

    pub fn suggested_users(&self) -> &[SuggestedUser] {
        &self.suggested_users
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    /// Sum of unread counters across conversations, recomputed on every call
    pub fn unread_messages_count(&self) -> u32 {
        self.conversations.iter().map(|c| c.unread).sum()
    }

    /// Number of unread notifications, recomputed on every call
    pub fn unread_notifications_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    pub(crate) fn post_mut(&mut self, post_id: Uuid) -> Option<&mut Post> {
        self.posts.iter_mut().find(|p| p.id == post_id)
    }

    pub(crate) fn conversation_mut(&mut self, conversation_id: Uuid) -> Option<&mut Conversation> {
        self.conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
    }
}

/// Owned copy of the whole store, for views that cannot borrow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub theme: Theme,
    pub current_user: User,
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub post_comments: HashMap<Uuid, Vec<Comment>>,
    pub conversations: Vec<Conversation>,
    pub notifications: Vec<Notification>,
    pub suggested_users: Vec<SuggestedUser>,
    pub categories: Vec<String>,
    pub activity: Vec<ActivityPoint>,
    pub ui: UiState,
    pub unread_messages_count: u32,
    pub unread_notifications_count: usize,
}

impl StoreSnapshot {
    pub(crate) fn capture(state: &AppState, theme: Theme) -> Self {
        Self {
            theme,
            current_user: state.current_user.clone(),
            users: state.users.clone(),
            posts: state.posts.clone(),
            post_comments: state.post_comments.clone(),
            conversations: state.conversations.clone(),
            notifications: state.notifications.clone(),
            suggested_users: state.suggested_users.clone(),
            categories: state.categories.clone(),
            activity: state.activity.clone(),
            ui: state.ui.clone(),
            unread_messages_count: state.unread_messages_count(),
            unread_notifications_count: state.unread_notifications_count(),
        }
    }

    pub fn conversation(&self, conversation_id: Uuid) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == conversation_id)
    }

    pub fn post(&self, post_id: Uuid) -> Option<&Post> {
        self.posts.iter().find(|p| p.id == post_id)
    }
}
