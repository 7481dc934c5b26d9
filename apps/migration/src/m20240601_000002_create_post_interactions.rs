use sea_orm_migration::prelude::*;

use crate::m20240601_000001_create_posts::Posts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostInteractions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostInteractions::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostInteractions::UserId).uuid().not_null())
                    .col(ColumnDef::new(PostInteractions::Reaction).string_len(16).null())
                    .col(
                        ColumnDef::new(PostInteractions::Viewed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PostInteractions::InteractedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // One record per (post, user); upserts conflict on it
                    .primary_key(
                        Index::create()
                            .col(PostInteractions::PostId)
                            .col(PostInteractions::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_post_interactions_post")
                            .from(PostInteractions::Table, PostInteractions::PostId)
                            .to(Posts::Table, Posts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_post_interactions_post_reaction")
                    .table(PostInteractions::Table)
                    .col(PostInteractions::PostId)
                    .col(PostInteractions::Reaction)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostInteractions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PostInteractions {
    Table,
    PostId,
    UserId,
    Reaction,
    Viewed,
    InteractedAt,
}
