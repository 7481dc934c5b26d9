//! Popularity service
//!
//! Records reactions and views, then re-derives a post's counters from its
//! interaction set.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{Interaction, PopularityCounts, Reaction, ReactionAction, parse_id};
use crate::error::{DomainError, RepoError};
use crate::ports::{InteractionRepository, PostRepository};
use crate::retry::RetryPolicy;

/// Result of a reaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionOutcome {
    /// The reaction now stored for the caller.
    pub reaction: Reaction,
    /// Counters written back onto the post, or `None` if the resync failed
    /// and the post's cached counters are stale.
    pub counters: Option<PopularityCounts>,
}

/// Popularity service
#[derive(Clone)]
pub struct PopularityService {
    posts: Arc<dyn PostRepository>,
    interactions: Arc<dyn InteractionRepository>,
    retry: RetryPolicy,
}

impl PopularityService {
    pub fn new(posts: Arc<dyn PostRepository>, interactions: Arc<dyn InteractionRepository>) -> Self {
        Self {
            posts,
            interactions,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn like(&self, post_id: &str, user_id: &str) -> Result<ReactionOutcome, DomainError> {
        self.react(post_id, user_id, ReactionAction::Like).await
    }

    pub async fn dislike(
        &self,
        post_id: &str,
        user_id: &str,
    ) -> Result<ReactionOutcome, DomainError> {
        self.react(post_id, user_id, ReactionAction::Dislike).await
    }

    /// Apply a like/dislike request for a user.
    ///
    /// Nothing is written if the identifiers are malformed, the post is
    /// missing, or the interaction cannot be stored. Once the interaction is
    /// stored the request succeeds even if the counter resync fails.
    #[instrument(skip(self))]
    pub async fn react(
        &self,
        post_id: &str,
        user_id: &str,
        action: ReactionAction,
    ) -> Result<ReactionOutcome, DomainError> {
        let post_id = parse_id("post", post_id)?;
        let user_id = parse_id("user", user_id)?;
        self.ensure_post_exists(post_id).await?;

        let current = self
            .retry
            .run("find_reaction", move || {
                self.interactions.find_reaction(post_id, user_id)
            })
            .await?
            .map(|interaction| interaction.reaction)
            .unwrap_or_default();

        let reaction = current.next(action);
        let interaction = Interaction::reacted(post_id, user_id, reaction);
        let record = &interaction;
        self.retry
            .run("upsert_interaction", move || self.interactions.upsert(record))
            .await?;

        info!(
            post_id = %post_id,
            user_id = %user_id,
            previous = ?current,
            reaction = ?reaction,
            "Reaction recorded"
        );

        let counters = self.recount_best_effort(post_id).await;
        Ok(ReactionOutcome { reaction, counters })
    }

    /// Mark the post as viewed by the user, leaving any reaction untouched.
    #[instrument(skip(self))]
    pub async fn record_view(&self, post_id: &str, user_id: &str) -> Result<(), DomainError> {
        let post_id = parse_id("post", post_id)?;
        let user_id = parse_id("user", user_id)?;
        self.ensure_post_exists(post_id).await?;

        self.retry
            .run("mark_viewed", move || {
                self.interactions.mark_viewed(post_id, user_id, Utc::now())
            })
            .await?;

        debug!(post_id = %post_id, user_id = %user_id, "View recorded");

        self.recount_best_effort(post_id).await;
        Ok(())
    }

    /// Recount a post's interactions and write the totals onto the post.
    #[instrument(skip(self))]
    pub async fn resync(&self, post_id: &str) -> Result<PopularityCounts, DomainError> {
        let post_id = parse_id("post", post_id)?;
        self.recount(post_id).await
    }

    async fn ensure_post_exists(&self, post_id: Uuid) -> Result<(), DomainError> {
        let post = self
            .retry
            .run("find_post", move || self.posts.find_by_id(post_id))
            .await?;

        match post {
            Some(_) => Ok(()),
            None => Err(post_not_found(post_id)),
        }
    }

    async fn recount(&self, post_id: Uuid) -> Result<PopularityCounts, DomainError> {
        let counts = self
            .retry
            .run("count_by_reaction", move || {
                self.interactions.count_by_reaction(post_id)
            })
            .await?;

        self.retry
            .run("update_counters", move || {
                self.posts.update_counters(post_id, counts)
            })
            .await
            .map_err(|err| match err {
                RepoError::NotFound => post_not_found(post_id),
                other => other.into(),
            })?;

        debug!(
            post_id = %post_id,
            likes = counts.likes,
            dislikes = counts.dislikes,
            views = counts.views,
            "Counters resynced"
        );
        Ok(counts)
    }

    async fn recount_best_effort(&self, post_id: Uuid) -> Option<PopularityCounts> {
        match self.recount(post_id).await {
            Ok(counts) => Some(counts),
            Err(err) => {
                warn!(
                    post_id = %post_id,
                    error = %err,
                    "Counter resync failed, counters stale until next interaction"
                );
                None
            }
        }
    }
}

fn post_not_found(post_id: Uuid) -> DomainError {
    DomainError::NotFound {
        entity_type: "Post",
        id: post_id.to_string(),
    }
}
