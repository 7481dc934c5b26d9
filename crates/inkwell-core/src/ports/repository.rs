use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Interaction, PopularityCounts, Post};
use crate::error::RepoError;
use crate::query::PostQuery;

/// Generic keyed storage owned by the record's own collaborator.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// Post store as seen by the popularity and listing services.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// The page of posts selected by `query`, in its sort order.
    async fn find_matching(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Number of posts matching `query`'s predicates, ignoring its page window.
    async fn count_matching(&self, query: &PostQuery) -> Result<u64, RepoError>;

    /// Overwrite only the popularity counters of a post.
    ///
    /// Returns [`RepoError::NotFound`] when no such post exists.
    async fn update_counters(&self, id: Uuid, counts: PopularityCounts) -> Result<(), RepoError>;
}

/// One record per (post, user) pair.
#[async_trait]
pub trait InteractionRepository: Send + Sync {
    /// Absence is a normal result, not an error.
    async fn find_reaction(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Interaction>, RepoError>;

    /// Insert, or replace reaction, viewed and interacted_at of the existing record.
    async fn upsert(&self, interaction: &Interaction) -> Result<(), RepoError>;

    /// Set `viewed` without touching the reaction, inserting if needed.
    async fn mark_viewed(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError>;

    /// Snapshot of likes, dislikes and views for a post.
    async fn count_by_reaction(&self, post_id: Uuid) -> Result<PopularityCounts, RepoError>;
}
