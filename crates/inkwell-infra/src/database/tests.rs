use std::collections::BTreeMap;

use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait, Value};
use uuid::Uuid;

use crate::database::entity::interaction::{self, ReactionKind};
use crate::database::entity::post;
use crate::database::postgres_repo::{
    PostgresInteractionRepository, PostgresPostRepository, mark_viewed_statement,
    upsert_statement,
};
use inkwell_core::domain::{Interaction, PopularityCounts, Post, Reaction};
use inkwell_core::error::RepoError;
use inkwell_core::ports::{BaseRepository, InteractionRepository, PostRepository};
use inkwell_core::query::PostQuery;

fn post_model(id: Uuid, likes: i64) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        author_id: Uuid::new_v4(),
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        tags: vec!["rust".to_owned(), "web".to_owned()],
        like_count: likes,
        dislike_count: 0,
        comment_count: 2,
        view_count: 9,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(post_id, 4)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.expect("post should be found");
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.tags, vec!["rust", "web"]);
    assert_eq!(post.like_count, 4);
    assert_eq!(post.comment_count, 2);
}

#[tokio::test]
async fn test_find_matching_returns_models_in_order() {
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(first, 9), post_model(second, 3)]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let query = PostQuery::builder().min_likes(1).build().unwrap();
    let posts = repo.find_matching(&query).await.unwrap();

    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, first);
    assert_eq!(posts[1].id, second);
}

#[tokio::test]
async fn test_count_matching() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(5)),
        )])]])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let query = PostQuery::builder().any_tag(["rust"]).build().unwrap();
    assert_eq!(repo.count_matching(&query).await.unwrap(), 5);
}

#[tokio::test]
async fn test_update_counters() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let counts = PopularityCounts {
        likes: 3,
        dislikes: 1,
        views: 7,
    };
    repo.update_counters(Uuid::new_v4(), counts).await.unwrap();
}

#[tokio::test]
async fn test_update_counters_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let repo = PostgresPostRepository::new(db);

    let result = repo
        .update_counters(Uuid::new_v4(), PopularityCounts::default())
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_reaction_maps_null_to_none() {
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();
    let now = chrono::Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([
            vec![interaction::Model {
                post_id,
                user_id,
                reaction: None,
                viewed: true,
                interacted_at: now.into(),
            }],
            vec![interaction::Model {
                post_id,
                user_id,
                reaction: Some(ReactionKind::Dislike),
                viewed: true,
                interacted_at: now.into(),
            }],
        ])
        .into_connection();
    let repo = PostgresInteractionRepository::new(db);

    let viewed_only = repo.find_reaction(post_id, user_id).await.unwrap().unwrap();
    assert_eq!(viewed_only.reaction, Reaction::None);
    assert!(viewed_only.viewed);

    let disliked = repo.find_reaction(post_id, user_id).await.unwrap().unwrap();
    assert_eq!(disliked.reaction, Reaction::Dislike);
}

#[tokio::test]
async fn test_find_reaction_absent() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<interaction::Model>::new()])
        .into_connection();
    let repo = PostgresInteractionRepository::new(db);

    let result = repo
        .find_reaction(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_count_by_reaction_reads_aggregate_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[BTreeMap::from([
            ("likes", Value::BigInt(Some(3))),
            ("dislikes", Value::BigInt(Some(1))),
            ("views", Value::BigInt(Some(8))),
        ])]])
        .into_connection();
    let repo = PostgresInteractionRepository::new(db);

    let counts = repo.count_by_reaction(Uuid::new_v4()).await.unwrap();

    assert_eq!(
        counts,
        PopularityCounts {
            likes: 3,
            dislikes: 1,
            views: 8
        }
    );
}

/// The `DO UPDATE SET` tail of an upsert, where the overwritten columns are listed.
fn conflict_update(sql: &str) -> &str {
    let (_, update) = sql
        .split_once("DO UPDATE SET")
        .expect("statement should have an upsert clause");
    update
}

#[test]
fn test_upsert_overwrites_reaction_on_conflict() {
    let record = Interaction::reacted(Uuid::new_v4(), Uuid::new_v4(), Reaction::Like);
    let sql = upsert_statement(&record)
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"ON CONFLICT ("post_id", "user_id")"#));
    let update = conflict_update(&sql);
    assert!(update.contains(r#""reaction" = "excluded"."reaction""#));
    assert!(update.contains(r#""viewed" = "excluded"."viewed""#));
    assert!(update.contains(r#""interacted_at" = "excluded"."interacted_at""#));
}

#[test]
fn test_mark_viewed_keeps_existing_reaction() {
    let sql = mark_viewed_statement(Uuid::new_v4(), Uuid::new_v4(), chrono::Utc::now())
        .build(DatabaseBackend::Postgres)
        .to_string();

    assert!(sql.contains(r#"ON CONFLICT ("post_id", "user_id")"#));
    let update = conflict_update(&sql);
    assert!(update.contains(r#""viewed" = "excluded"."viewed""#));
    assert!(update.contains(r#""interacted_at" = "excluded"."interacted_at""#));
    assert!(!update.contains(r#""reaction""#));
}

#[tokio::test]
async fn test_upsert_and_mark_viewed_execute() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();
    let repo = PostgresInteractionRepository::new(db);
    let post_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    repo.upsert(&Interaction::reacted(post_id, user_id, Reaction::Dislike))
        .await
        .unwrap();
    repo.mark_viewed(post_id, user_id, chrono::Utc::now())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_repositories_share_one_pool() {
    let db = std::sync::Arc::new(
        MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![post_model(Uuid::new_v4(), 1)]])
            .append_query_results([Vec::<interaction::Model>::new()])
            .into_connection(),
    );
    let posts = PostgresPostRepository::new(db.clone());
    let interactions = PostgresInteractionRepository::new(db.clone());

    let query = PostQuery::builder().build().unwrap();
    assert_eq!(posts.find_matching(&query).await.unwrap().len(), 1);
    assert!(
        interactions
            .find_reaction(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(std::sync::Arc::strong_count(&db), 3);
}

#[test]
fn test_reaction_kind_mapping() {
    assert_eq!(ReactionKind::from_reaction(Reaction::None), None);
    assert_eq!(
        ReactionKind::from_reaction(Reaction::Like),
        Some(ReactionKind::Like)
    );
    assert_eq!(
        ReactionKind::into_reaction(Some(ReactionKind::Dislike)),
        Reaction::Dislike
    );
    assert_eq!(ReactionKind::into_reaction(None), Reaction::None);
}
