use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - represents a blog post with its denormalized popularity counters.
///
/// `like_count`, `dislike_count` and `view_count` are a cache of the interaction
/// set for this post. They are only ever overwritten with freshly recounted
/// values, see [`PopularityCounts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub like_count: i64,
    pub dislike_count: i64,
    pub comment_count: i64,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with zeroed counters.
    pub fn new(author_id: Uuid, title: String, content: String, tags: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            content,
            tags,
            like_count: 0,
            dislike_count: 0,
            comment_count: 0,
            view_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the cached counters with a recount.
    pub fn apply_counts(&mut self, counts: PopularityCounts) {
        self.like_count = counts.likes;
        self.dislike_count = counts.dislikes;
        self.view_count = counts.views;
    }

    pub fn counts(&self) -> PopularityCounts {
        PopularityCounts {
            likes: self.like_count,
            dislikes: self.dislike_count,
            views: self.view_count,
        }
    }
}

/// Aggregate of the interaction set of one post at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularityCounts {
    pub likes: i64,
    pub dislikes: i64,
    pub views: i64,
}
