use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Post not found: {0}")]
    PostNotFound(Uuid),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(Uuid),

    #[error("Notification not found: {0}")]
    NotificationNotFound(Uuid),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store is closed")]
    Closed,
}

impl StoreError {
    /// True for the "referenced entity does not exist" family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::PostNotFound(_)
                | StoreError::ConversationNotFound(_)
                | StoreError::NotificationNotFound(_)
                | StoreError::UserNotFound(_)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
