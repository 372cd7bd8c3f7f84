use super::handlers::{admin, comments, votes};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{any, delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

fn cors_layer(allowed_origins: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if allowed_origins == "*" {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse::<HeaderValue>().ok())
        .collect();

    if origins.is_empty() {
        tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
        base.allow_origin(Any)
    } else {
        tracing::info!("CORS enabled for origins: {:?}", origins);
        base.allow_origin(origins)
    }
}

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    // add/reply/vote 接受任意方法：先过登录校验，再由处理函数决定方法语义
    Router::new()
        .route("/add/:article_id/", any(comments::add_comment))
        .route("/reply/:comment_id/", any(comments::reply_comment))
        .route("/vote/:comment_id/:vote_type/", any(votes::vote_comment))
        .route("/comments/:article_id/", get(comments::list_comments))
        .route("/replies/:comment_id/", get(comments::list_replies))
        .route("/admin/articles", post(admin::create_article))
        .route("/admin/articles/:id", delete(admin::delete_article))
        .route("/admin/users", post(admin::create_user))
        .route("/admin/users/:id", delete(admin::delete_user))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}
