use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// The other theme
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Share,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Comment => "comment",
            NotificationKind::Follow => "follow",
            NotificationKind::Share => "share",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(NotificationKind::Like),
            "comment" => Some(NotificationKind::Comment),
            "follow" => Some(NotificationKind::Follow),
            "share" => Some(NotificationKind::Share),
            _ => None,
        }
    }
}

/// Named top-level sections a view can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Home,
    Discover,
    Chats,
    Notifications,
    Connections,
    Profile,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Discover => "discover",
            Section::Chats => "chats",
            Section::Notifications => "notifications",
            Section::Connections => "connections",
            Section::Profile => "profile",
        }
    }

    /// Unknown names fall back to `Home`, matching the view router's default branch
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "discover" => Section::Discover,
            "chats" => Section::Chats,
            "notifications" => Section::Notifications,
            "connections" => Section::Connections,
            "profile" => Section::Profile,
            _ => Section::Home,
        }
    }
}
