use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use orbit_types::{
    ActivityPoint, Comment, Conversation, Message, Notification, NotificationKind, Post,
    SuggestedUser, User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::ids::seed_id;

/// Everything the store is initialised from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedData {
    pub current_user: User,
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    /// Comment threads keyed by post id
    #[serde(default)]
    pub comments: HashMap<Uuid, Vec<Comment>>,
    #[serde(default)]
    pub conversations: Vec<Conversation>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub suggested_users: Vec<SuggestedUser>,
    /// Candidate auto-replies keyed by the replying user's id
    #[serde(default)]
    pub auto_replies: HashMap<Uuid, Vec<String>>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub activity: Vec<ActivityPoint>,
}

impl SeedData {
    /// Parse a seed set from JSON and validate it
    pub fn from_json(json: &str) -> StoreResult<Self> {
        let seed: SeedData = serde_json::from_str(json)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn to_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject seed sets whose collections repeat an id
    pub fn validate(&self) -> StoreResult<()> {
        ensure_unique("user", self.users.iter().map(|u| u.id))?;
        ensure_unique("post", self.posts.iter().map(|p| p.id))?;
        ensure_unique(
            "comment",
            self.comments.values().flatten().map(|c| c.id),
        )?;
        ensure_unique("conversation", self.conversations.iter().map(|c| c.id))?;
        ensure_unique("notification", self.notifications.iter().map(|n| n.id))?;
        ensure_unique(
            "suggested user",
            self.suggested_users.iter().map(|s| s.user.id),
        )?;

        for conversation in &self.conversations {
            ensure_unique("message", conversation.messages.iter().map(|m| m.id))?;
        }

        Ok(())
    }

    /// Make each post's comment counter match its thread length
    pub fn normalize_comment_counts(&mut self) {
        for post in &mut self.posts {
            let thread_len = self.comments.get(&post.id).map_or(0, Vec::len) as u64;
            if post.comments != thread_len {
                log::debug!(
                    "Seed post {} claims {} comments but has {}, correcting",
                    post.id,
                    post.comments,
                    thread_len
                );
                post.comments = thread_len;
            }
        }
    }

    /// The built-in demo dataset, timestamped relative to now
    pub fn demo() -> Self {
        Self::demo_at(Utc::now())
    }

    /// The built-in demo dataset, timestamped relative to `now`
    pub fn demo_at(now: DateTime<Utc>) -> Self {
        let ago_min = |m: i64| now - Duration::minutes(m);

        let current_user = User {
            cover_image: Some("https://picsum.photos/seed/orbit-cover/1200/400".to_string()),
            bio: Some("Building calm software. Coffee, climbing and open source.".to_string()),
            location: Some("San Francisco, CA".to_string()),
            ..person(
                1,
                "Alex Morgan",
                "alexmorgan",
                "Product Engineer",
                "Orbit",
                (2847, 412, 156),
                true,
                true,
            )
        };

        let sarah = person(
            2,
            "Sarah Chen",
            "sarahchen",
            "UX Designer",
            "Figma",
            (15_600, 890, 342),
            true,
            true,
        );
        let marcus = person(
            3,
            "Marcus Johnson",
            "marcusj",
            "Software Architect",
            "Stripe",
            (8_420, 1_203, 215),
            true,
            false,
        );
        let emily = person(
            4,
            "Emily Rodriguez",
            "emilyr",
            "Travel Photographer",
            "Freelance",
            (42_300, 520, 894),
            false,
            true,
        );
        let david = person(
            5,
            "David Kim",
            "davidkim",
            "Founder",
            "Lumen Labs",
            (1_250_000, 310, 1_042),
            true,
            true,
        );
        let priya = person(
            6,
            "Priya Patel",
            "priyap",
            "Data Scientist",
            "Spotify",
            (3_980, 760, 128),
            false,
            false,
        );

        let users = vec![
            sarah.clone(),
            marcus.clone(),
            emily.clone(),
            david.clone(),
            priya.clone(),
        ];

        let posts = vec![
            post(
                101,
                &sarah,
                "Just shipped a redesign of our onboarding flow. Fewer screens, clearer choices, and a 23% lift in activation.",
                &["https://picsum.photos/seed/orbit-101/800/600"],
                (234, 2, 12),
                ago_min(45),
                "Design",
            ),
            post(
                102,
                &marcus,
                "Hot take: most microservice migrations are really org-chart migrations. Start with the boundaries your teams already have.",
                &[],
                (512, 1, 48),
                ago_min(3 * 60),
                "Technology",
            ),
            post(
                103,
                &emily,
                "Golden hour over the Dolomites. Worth every one of the 4am alarms.",
                &[
                    "https://picsum.photos/seed/orbit-103a/800/600",
                    "https://picsum.photos/seed/orbit-103b/800/600",
                ],
                (1_893, 0, 203),
                ago_min(6 * 60),
                "Photography",
            ),
            post(
                104,
                &david,
                "We closed our seed round today. Grateful to everyone who took a bet on a two-person team with a whiteboard full of ideas.",
                &[],
                (4_210, 0, 389),
                ago_min(26 * 60),
                "Business",
            ),
            post(
                105,
                &priya,
                "Three months of Lisbon, one laptop, zero regrets. Remote work done right is a superpower.",
                &["https://picsum.photos/seed/orbit-105/800/600"],
                (678, 0, 31),
                ago_min(2 * 24 * 60),
                "Travel",
            ),
            post(
                106,
                &current_user,
                "Refactored our state layer this week. Derived counters instead of cached ones, and a whole class of bugs just disappeared.",
                &[],
                (87, 0, 4),
                ago_min(4 * 24 * 60),
                "Technology",
            ),
        ];

        let mut comments = HashMap::new();
        comments.insert(
            seed_id(101),
            vec![
                comment(
                    201,
                    &marcus,
                    "The new progress indicator is so much clearer.",
                    ago_min(30),
                    12,
                ),
                comment(
                    202,
                    &emily,
                    "Would love to read a write-up of the research behind this!",
                    ago_min(20),
                    5,
                ),
            ],
        );
        comments.insert(
            seed_id(102),
            vec![comment(203, &david, "Conway's law remains undefeated.", ago_min(2 * 60), 31)],
        );

        let conversations = vec![
            Conversation {
                id: seed_id(301),
                user: sarah.clone(),
                messages: vec![
                    message(
                        401,
                        &current_user,
                        "Hey Sarah! Loved the onboarding redesign.",
                        ago_min(70),
                    ),
                    message(
                        402,
                        &sarah,
                        "Thank you! It took forever to get the copy right.",
                        ago_min(65),
                    ),
                    message(
                        403,
                        &sarah,
                        "Are you coming to the design meetup on Thursday?",
                        ago_min(10),
                    ),
                ],
                last_message: "Are you coming to the design meetup on Thursday?".to_string(),
                updated_at: ago_min(10),
                unread: 2,
            },
            Conversation {
                id: seed_id(302),
                user: marcus.clone(),
                messages: vec![
                    message(
                        404,
                        &marcus,
                        "Did you get a chance to look at the RFC?",
                        ago_min(5 * 60),
                    ),
                    message(
                        405,
                        &current_user,
                        "Yes, left a few comments on the caching section.",
                        ago_min(4 * 60),
                    ),
                ],
                last_message: "Yes, left a few comments on the caching section.".to_string(),
                updated_at: ago_min(4 * 60),
                unread: 0,
            },
            Conversation {
                id: seed_id(303),
                user: emily.clone(),
                messages: vec![message(
                    406,
                    &emily,
                    "Sending you the full-res shots from the trip!",
                    ago_min(25 * 60),
                )],
                last_message: "Sending you the full-res shots from the trip!".to_string(),
                updated_at: ago_min(25 * 60),
                unread: 1,
            },
            Conversation {
                id: seed_id(304),
                user: david.clone(),
                messages: vec![],
                last_message: String::new(),
                updated_at: ago_min(3 * 24 * 60),
                unread: 0,
            },
            Conversation {
                id: seed_id(305),
                user: priya.clone(),
                messages: vec![message(
                    407,
                    &priya,
                    "Thanks for the intro last week!",
                    ago_min(5 * 24 * 60),
                )],
                last_message: "Thanks for the intro last week!".to_string(),
                updated_at: ago_min(5 * 24 * 60),
                unread: 0,
            },
        ];

        let notifications = vec![
            notification(
                501,
                NotificationKind::Like,
                &sarah,
                Some(106),
                "liked your post",
                ago_min(15),
                false,
            ),
            notification(
                502,
                NotificationKind::Comment,
                &marcus,
                Some(106),
                "commented on your post: \"Derived state for the win.\"",
                ago_min(50),
                false,
            ),
            notification(
                503,
                NotificationKind::Follow,
                &emily,
                None,
                "started following you",
                ago_min(3 * 60),
                false,
            ),
            notification(
                504,
                NotificationKind::Share,
                &david,
                Some(106),
                "shared your post",
                ago_min(24 * 60),
                true,
            ),
            notification(
                505,
                NotificationKind::Like,
                &priya,
                Some(106),
                "liked your post",
                ago_min(2 * 24 * 60),
                true,
            ),
        ];

        let suggested_users = vec![
            suggestion(
                person(
                    7,
                    "Jordan Lee",
                    "jordanlee",
                    "Frontend Developer",
                    "Vercel",
                    (5_120, 430, 98),
                    true,
                    false,
                ),
                12,
            ),
            suggestion(
                person(
                    8,
                    "Aisha Okafor",
                    "aishao",
                    "Product Manager",
                    "Notion",
                    (9_870, 610, 176),
                    false,
                    true,
                ),
                8,
            ),
            suggestion(
                person(
                    9,
                    "Tom Becker",
                    "tombecker",
                    "DevRel Engineer",
                    "Cloudflare",
                    (21_400, 1_020, 402),
                    true,
                    true,
                ),
                5,
            ),
            suggestion(
                person(
                    10,
                    "Lena Novak",
                    "lenanovak",
                    "Illustrator",
                    "Freelance",
                    (13_050, 280, 611),
                    false,
                    false,
                ),
                3,
            ),
        ];

        let mut auto_replies = HashMap::new();
        auto_replies.insert(
            sarah.id,
            strings(&[
                "That sounds great! 😊",
                "Haha, totally agree!",
                "Let me check my calendar and get back to you.",
                "Love that idea!",
            ]),
        );
        auto_replies.insert(
            marcus.id,
            strings(&[
                "Makes sense, let's sync tomorrow.",
                "Interesting, I hadn't thought of it that way.",
                "Can you send me the doc?",
            ]),
        );
        auto_replies.insert(
            emily.id,
            strings(&[
                "Wish you were here! 📸",
                "I'll send more photos soon.",
                "The light here is unreal.",
            ]),
        );
        auto_replies.insert(
            david.id,
            strings(&[
                "Appreciate it! Let's grab coffee soon.",
                "Busy week, but I'll reply properly tonight.",
            ]),
        );

        let categories = strings(&[
            "All",
            "Technology",
            "Design",
            "Photography",
            "Travel",
            "Business",
        ]);

        let activity = [
            ("Mon", 45),
            ("Tue", 62),
            ("Wed", 38),
            ("Thu", 71),
            ("Fri", 84),
            ("Sat", 52),
            ("Sun", 67),
        ]
        .into_iter()
        .map(|(day, value)| ActivityPoint {
            day: day.to_string(),
            value,
        })
        .collect();

        SeedData {
            current_user,
            users,
            posts,
            comments,
            conversations,
            notifications,
            suggested_users,
            auto_replies,
            categories,
            activity,
        }
    }
}

fn ensure_unique(kind: &str, ids: impl Iterator<Item = Uuid>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::InvalidSeed(format!("duplicate {} id {}", kind, id)));
        }
    }
    Ok(())
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn person(
    n: u128,
    name: &str,
    username: &str,
    job_title: &str,
    company: &str,
    (followers, following, posts): (u64, u64, u64),
    is_online: bool,
    verified: bool,
) -> User {
    User {
        id: seed_id(n),
        name: name.to_string(),
        username: username.to_string(),
        avatar: format!("https://i.pravatar.cc/150?img={}", n),
        cover_image: None,
        bio: None,
        location: None,
        is_online,
        job_title: job_title.to_string(),
        company: company.to_string(),
        followers,
        following,
        posts,
        verified,
    }
}

fn post(
    n: u128,
    author: &User,
    content: &str,
    images: &[&str],
    (likes, comments, shares): (u64, u64, u64),
    created_at: DateTime<Utc>,
    category: &str,
) -> Post {
    Post {
        id: seed_id(n),
        author: author.clone(),
        content: content.to_string(),
        images: strings(images),
        likes,
        comments,
        shares,
        created_at,
        is_liked: false,
        category: category.to_string(),
    }
}

fn comment(
    n: u128,
    author: &User,
    content: &str,
    created_at: DateTime<Utc>,
    likes: u64,
) -> Comment {
    Comment {
        id: seed_id(n),
        author: author.clone(),
        content: content.to_string(),
        created_at,
        likes,
    }
}

fn message(n: u128, sender: &User, content: &str, created_at: DateTime<Utc>) -> Message {
    Message {
        id: seed_id(n),
        sender_id: sender.id,
        content: Some(content.to_string()),
        image: None,
        created_at,
    }
}

fn notification(
    n: u128,
    kind: NotificationKind,
    user: &User,
    post: Option<u128>,
    content: &str,
    created_at: DateTime<Utc>,
    read: bool,
) -> Notification {
    Notification {
        id: seed_id(n),
        kind,
        user: user.clone(),
        post_id: post.map(seed_id),
        content: content.to_string(),
        created_at,
        read,
    }
}

fn suggestion(user: User, mutual_connections: u32) -> SuggestedUser {
    SuggestedUser {
        user,
        mutual_connections,
        is_connected: false,
    }
}
