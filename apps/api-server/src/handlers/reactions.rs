//! Reaction and view recording.

use actix_web::{HttpResponse, web};

use inkwell_core::domain::{PopularityCounts, ReactionAction};
use inkwell_shared::ApiResponse;
use inkwell_shared::dto::{CountersResponse, ReactionResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn counters_response(counts: PopularityCounts) -> CountersResponse {
    CountersResponse {
        likes: counts.likes,
        dislikes: counts.dislikes,
        views: counts.views,
    }
}

async fn react(
    state: web::Data<AppState>,
    post_id: String,
    identity: Identity,
    action: ReactionAction,
) -> AppResult<HttpResponse> {
    let outcome = state
        .popularity
        .react(&post_id, &identity.user_id, action)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(ReactionResponse {
        post_id,
        reaction: outcome.reaction.as_str().to_owned(),
        counters: outcome.counters.map(counters_response),
    })))
}

/// POST /api/posts/{id}/like
pub async fn like_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    react(state, path.into_inner(), identity, ReactionAction::Like).await
}

/// POST /api/posts/{id}/dislike
pub async fn dislike_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    react(state, path.into_inner(), identity, ReactionAction::Dislike).await
}

/// POST /api/posts/{id}/view
pub async fn record_view(
    state: web::Data<AppState>,
    path: web::Path<String>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    state
        .popularity
        .record_view(&path.into_inner(), &identity.user_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
