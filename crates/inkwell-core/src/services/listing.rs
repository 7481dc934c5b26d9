//! Listing service
//!
//! Runs a [`PostQuery`] against the post store and returns the page together
//! with the total number of matches.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::{Post, parse_id};
use crate::error::DomainError;
use crate::ports::PostRepository;
use crate::query::{PostQuery, SearchFilterSpec};
use crate::retry::RetryPolicy;

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub posts: Vec<Post>,
    /// Matches across all pages.
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Listing service
#[derive(Clone)]
pub struct ListingService {
    posts: Arc<dyn PostRepository>,
    retry: RetryPolicy,
}

impl ListingService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self {
            posts,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[instrument(skip(self))]
    pub async fn list_posts(&self, spec: &SearchFilterSpec) -> Result<PostPage, DomainError> {
        let query = PostQuery::from_spec(spec)?;
        let q = &query;

        let posts = self
            .retry
            .run("find_matching", move || self.posts.find_matching(q))
            .await?;
        let total = self
            .retry
            .run("count_matching", move || self.posts.count_matching(q))
            .await?;

        debug!(
            predicates = query.predicates().len(),
            returned = posts.len(),
            total,
            "Listed posts"
        );

        let window = query.window();
        Ok(PostPage {
            posts,
            total,
            page: window.page(),
            page_size: window.page_size(),
        })
    }

    /// Fetch a single post by its identifier.
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: &str) -> Result<Post, DomainError> {
        let id = parse_id("post", post_id)?;
        self.retry
            .run("find_post", move || self.posts.find_by_id(id))
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity_type: "Post",
                id: id.to_string(),
            })
    }
}
