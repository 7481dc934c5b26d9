//! HTTP handlers and route configuration.

mod health;
mod posts;
mod reactions;

use std::sync::Arc;

use actix_web::{error, web};
use inkwell_core::ports::RateLimiter;

use crate::middleware::error::AppError;
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// Reaction and view routes sit behind `limiter`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, limiter: Option<Arc<dyn RateLimiter>>) {
    cfg.app_data(query_config()).service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts/{id}", web::get().to(posts::get_post))
            // Authenticated, rate limited
            .service(
                web::scope("/posts/{id}")
                    .wrap(RateLimitMiddleware::new(limiter))
                    .route("/like", web::post().to(reactions::like_post))
                    .route("/dislike", web::post().to(reactions::dislike_post))
                    .route("/view", web::post().to(reactions::record_view)),
            ),
    );
}

/// Malformed query strings become RFC 7807 bad requests.
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| error::Error::from(AppError::BadRequest(err.to_string())))
}
