use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::{NotificationKind, Section};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub avatar: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    pub job_title: String,
    pub company: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author: User,
    pub content: String,
    /// Up to four image references, in display order
    #[serde(default)]
    pub images: Vec<String>,
    pub likes: u64,
    /// Mirrors the length of the post's comment thread
    pub comments: u64,
    pub shares: u64,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    /// Whether the current user has liked this post
    #[serde(default)]
    pub is_liked: bool,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: User,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    /// The other participant
    pub user: User,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub last_message: String,
    /// Last activity
    #[serde(with = "datetime_format")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub unread: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    /// Who triggered the notification
    pub user: User,
    #[serde(default)]
    pub post_id: Option<Uuid>,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestedUser {
    #[serde(flatten)]
    pub user: User,
    pub mutual_connections: u32,
    #[serde(default)]
    pub is_connected: bool,
}

/// One bar of the weekly activity chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub day: String,
    pub value: u32,
}

/// Transient view state shared through the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiState {
    pub active_section: Section,
    pub active_conversation: Option<Uuid>,
    pub selected_post: Option<Uuid>,
    pub mobile_menu_open: bool,
}
