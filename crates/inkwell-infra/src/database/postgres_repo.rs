//! PostgreSQL repository implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DbConn, EntityTrait, FromQueryResult, Insert, PaginatorTrait, QueryFilter,
    QuerySelect, Set,
};
use tracing::instrument;
use uuid::Uuid;

use inkwell_core::domain::{Interaction, PopularityCounts, Post};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{InteractionRepository, PostRepository};
use inkwell_core::query::PostQuery;

use super::entity::interaction::{self, Entity as InteractionEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::query;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    #[instrument(skip(self))]
    async fn find_matching(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let models = query::page(query)
            .all(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count_matching(&self, query: &PostQuery) -> Result<u64, RepoError> {
        query::filtered(query)
            .count(self.db.as_ref())
            .await
            .map_err(map_db_err)
    }

    #[instrument(skip(self))]
    async fn update_counters(&self, id: Uuid, counts: PopularityCounts) -> Result<(), RepoError> {
        let result = PostEntity::update_many()
            .col_expr(post::Column::LikeCount, Expr::value(counts.likes))
            .col_expr(post::Column::DislikeCount, Expr::value(counts.dislikes))
            .col_expr(post::Column::ViewCount, Expr::value(counts.views))
            .filter(post::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

/// Aggregate row produced by [`PostgresInteractionRepository::count_by_reaction`].
#[derive(Debug, FromQueryResult)]
struct CountsRow {
    likes: i64,
    dislikes: i64,
    views: i64,
}

/// Insert the full record, overwriting reaction and view state on conflict.
pub(crate) fn upsert_statement(record: &Interaction) -> Insert<interaction::ActiveModel> {
    InteractionEntity::insert(interaction::ActiveModel::from(record)).on_conflict(
        OnConflict::columns([interaction::Column::PostId, interaction::Column::UserId])
            .update_columns([
                interaction::Column::Reaction,
                interaction::Column::Viewed,
                interaction::Column::InteractedAt,
            ])
            .to_owned(),
    )
}

/// Insert a view-only row. On conflict only the view flag and timestamp
/// change, so an existing reaction survives.
pub(crate) fn mark_viewed_statement(
    post_id: Uuid,
    user_id: Uuid,
    at: DateTime<Utc>,
) -> Insert<interaction::ActiveModel> {
    let record = interaction::ActiveModel {
        post_id: Set(post_id),
        user_id: Set(user_id),
        reaction: Set(None),
        viewed: Set(true),
        interacted_at: Set(at.into()),
    };

    InteractionEntity::insert(record).on_conflict(
        OnConflict::columns([interaction::Column::PostId, interaction::Column::UserId])
            .update_columns([
                interaction::Column::Viewed,
                interaction::Column::InteractedAt,
            ])
            .to_owned(),
    )
}

/// PostgreSQL interaction repository.
pub struct PostgresInteractionRepository {
    db: Arc<DbConn>,
}

impl PostgresInteractionRepository {
    pub fn new(db: impl Into<Arc<DbConn>>) -> Self {
        Self { db: db.into() }
    }
}

#[async_trait]
impl InteractionRepository for PostgresInteractionRepository {
    #[instrument(skip(self))]
    async fn find_reaction(
        &self,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Interaction>, RepoError> {
        let result = InteractionEntity::find_by_id((post_id, user_id))
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self), fields(post_id = %record.post_id, user_id = %record.user_id))]
    async fn upsert(&self, record: &Interaction) -> Result<(), RepoError> {
        upsert_statement(record)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn mark_viewed(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        mark_viewed_statement(post_id, user_id, at)
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(())
    }

    /// All three totals come from one statement, so they share a snapshot.
    #[instrument(skip(self))]
    async fn count_by_reaction(&self, post_id: Uuid) -> Result<PopularityCounts, RepoError> {
        let row = InteractionEntity::find()
            .select_only()
            .column_as(
                Expr::cust("COUNT(*) FILTER (WHERE reaction = 'like')"),
                "likes",
            )
            .column_as(
                Expr::cust("COUNT(*) FILTER (WHERE reaction = 'dislike')"),
                "dislikes",
            )
            .column_as(Expr::cust("COUNT(*) FILTER (WHERE viewed)"), "views")
            .filter(interaction::Column::PostId.eq(post_id))
            .into_model::<CountsRow>()
            .one(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(row
            .map(|row| PopularityCounts {
                likes: row.likes,
                dislikes: row.dislikes,
                views: row.views,
            })
            .unwrap_or_default())
    }
}
