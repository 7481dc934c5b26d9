//! Translation of a [`PostQuery`] into SQL conditions and ordering.

use sea_orm::sea_query::extension::postgres::PgBinOper;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Select};

use inkwell_core::query::{PostPredicate, PostQuery, SortKey};

use super::entity::post::{self, Entity as PostEntity};

/// AND of every predicate in the query.
fn condition(query: &PostQuery) -> Condition {
    query
        .predicates()
        .iter()
        .fold(Condition::all(), |cond, predicate| {
            cond.add(predicate_condition(predicate))
        })
}

fn predicate_condition(predicate: &PostPredicate) -> Condition {
    match predicate {
        PostPredicate::Author(author_id) => {
            Condition::all().add(post::Column::AuthorId.eq(*author_id))
        }
        PostPredicate::AnyTag(tags) => Condition::all().add(
            Expr::col(post::Column::Tags).binary(PgBinOper::Overlap, Expr::val(tags.clone())),
        ),
        PostPredicate::TitleContains(needle) => Condition::all().add(
            Expr::expr(Func::lower(Expr::col(post::Column::Title)))
                .like(LikeExpr::new(format!("%{}%", escape_like(needle))).escape('\\')),
        ),
        PostPredicate::CreatedBetween { from, to } => Condition::all()
            .add_option(from.map(|from| post::Column::CreatedAt.gte(from)))
            .add_option(to.map(|to| post::Column::CreatedAt.lte(to))),
        PostPredicate::LikesBetween { min, max } => Condition::all()
            .add_option(min.map(|min| post::Column::LikeCount.gte(min)))
            .add_option(max.map(|max| post::Column::LikeCount.lte(max))),
    }
}

fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Apply the sort key, with `id` as the tie-breaker.
pub(crate) fn ordered(select: Select<PostEntity>, sort: SortKey) -> Select<PostEntity> {
    let select = match sort {
        SortKey::Newest => select.order_by_desc(post::Column::CreatedAt),
        SortKey::Oldest => select.order_by_asc(post::Column::CreatedAt),
        SortKey::Popularity => select.order_by_desc(post::Column::LikeCount),
    };
    select.order_by_asc(post::Column::Id)
}

/// Posts matching the query's predicates. Shared by page and count queries.
///
/// A query without predicates gets no `WHERE` clause at all.
pub(crate) fn filtered(query: &PostQuery) -> Select<PostEntity> {
    let select = PostEntity::find();
    if query.predicates().is_empty() {
        select
    } else {
        select.filter(condition(query))
    }
}

/// Filtered and ordered select, without the page window.
pub(crate) fn select(query: &PostQuery) -> Select<PostEntity> {
    ordered(filtered(query), query.sort())
}

/// Filtered and ordered select, restricted to the query's page.
pub(crate) fn page(query: &PostQuery) -> Select<PostEntity> {
    let window = query.window();
    select(query).offset(window.skip()).limit(window.limit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &PostQuery) -> String {
        select(query).build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_empty_query_has_no_where_clause() {
        let query = PostQuery::builder().build().unwrap();
        let sql = sql(&query);
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains(r#""created_at" DESC"#));
        assert!(sql.contains(r#""id" ASC"#));
    }

    #[test]
    fn test_empty_count_query_has_no_where_clause() {
        let query = PostQuery::builder().build().unwrap();
        let sql = filtered(&query).build(DbBackend::Postgres).to_string();
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("TRUE"));
    }

    #[test]
    fn test_page_offset_fits_signed_bigint() {
        let query = PostQuery::builder().page(i64::MAX, 100).build().unwrap();
        let sql = page(&query).build(DbBackend::Postgres).to_string();
        assert!(sql.contains(&format!("OFFSET {}", i64::MAX)));
        assert!(sql.contains("LIMIT 100"));
    }

    #[test]
    fn test_page_applies_window() {
        let query = PostQuery::builder().page(3, 20).build().unwrap();
        let sql = page(&query).build(DbBackend::Postgres).to_string();
        assert!(sql.contains("LIMIT 20"));
        assert!(sql.contains("OFFSET 40"));
    }

    #[test]
    fn test_popularity_range_is_one_pair_of_bounds() {
        let query = PostQuery::builder()
            .min_likes(5)
            .max_likes(10)
            .sort(SortKey::Popularity)
            .build()
            .unwrap();
        let sql = sql(&query);
        assert!(sql.contains(r#""like_count" >= 5"#));
        assert!(sql.contains(r#""like_count" <= 10"#));
        assert_eq!(sql.matches("like_count\" >=").count(), 1);
        assert!(sql.contains(r#""like_count" DESC"#));
    }

    #[test]
    fn test_tags_and_title_are_anded() {
        let query = PostQuery::builder()
            .any_tag(["go"])
            .title_contains("Go")
            .build()
            .unwrap();
        let sql = sql(&query);
        assert!(sql.contains("&&"));
        assert!(sql.contains("LIKE '%go%'"));
        assert!(sql.contains(" AND "));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
