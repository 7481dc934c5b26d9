//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query string of `GET /api/posts`.
///
/// `tag` is a comma separated list; a post matches if it carries any of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub sort_by: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub min_popularity: Option<i64>,
    pub max_popularity: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListPostsQuery {
    /// Split `tag` into trimmed, non-empty entries.
    pub fn tags(&self) -> Vec<String> {
        self.tag
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// A post as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub author_id: String,
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

/// Popularity counters of a post after a resync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountersResponse {
    pub likes: i64,
    pub dislikes: i64,
    pub views: i64,
}

/// Result of a like/dislike request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionResponse {
    pub post_id: String,
    /// `"like"`, `"dislike"` or `"none"`.
    pub reaction: String,
    /// Absent when the counters could not be refreshed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counters: Option<CountersResponse>,
}
