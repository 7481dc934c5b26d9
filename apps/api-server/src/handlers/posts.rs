//! Post listing and lookup.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::Post;
use inkwell_core::query::{SearchFilterSpec, SortKey};
use inkwell_shared::dto::{ListPostsQuery, PostResponse};
use inkwell_shared::{ApiResponse, PageMeta, PaginatedResponse};

use crate::middleware::error::AppResult;
use crate::state::AppState;

pub(super) fn post_response(post: Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        author_id: post.author_id.to_string(),
        title: post.title,
        content: post.content,
        tags: post.tags,
        like_count: post.like_count,
        dislike_count: post.dislike_count,
        comment_count: post.comment_count,
        view_count: post.view_count,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn search_spec(query: ListPostsQuery) -> SearchFilterSpec {
    let defaults = SearchFilterSpec::default();
    SearchFilterSpec {
        tags: query.tags(),
        author_id: query.author,
        title: query.title,
        start_date: query.start_date,
        end_date: query.end_date,
        min_popularity: query.min_popularity,
        max_popularity: query.max_popularity,
        sort: query
            .sort_by
            .as_deref()
            .map(SortKey::from_param)
            .unwrap_or_default(),
        page: query.page.unwrap_or(defaults.page),
        page_size: query.limit.unwrap_or(defaults.page_size),
    }
}

/// GET /api/posts
///
/// The total number of matches is also sent in `X-Total-Count`.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let spec = search_spec(query.into_inner());
    let page = state.listing.list_posts(&spec).await?;

    let meta = PageMeta::new(page.page, page.page_size, page.total);
    let items = page.posts.into_iter().map(post_response).collect();

    Ok(HttpResponse::Ok()
        .insert_header(("X-Total-Count", page.total.to_string()))
        .json(ApiResponse::ok(PaginatedResponse { items, meta })))
}

/// GET /api/posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.listing.get_post(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post_response(post))))
}
