use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::CommentError;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    auth::{authorize_admin, generate_token, hash_token},
    error::AppError,
    http::extract::IdPath,
    state::AppState,
};

#[derive(Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

pub async fn create_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    authorize_admin(&headers, &state.admin_token)?;

    let title = payload.title.trim();
    if title.is_empty() {
        return Err(CommentError::Validation("Article title cannot be empty.".into()).into());
    }

    let id = state.db.create_article(title).await?;
    tracing::info!("Admin created article {}", id);
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn delete_article(
    State(state): State<AppState>,
    headers: HeaderMap,
    IdPath(article_id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    authorize_admin(&headers, &state.admin_token)?;

    if !state.db.delete_article(article_id).await? {
        return Err(CommentError::NotFound("Article", article_id).into());
    }
    tracing::info!("Admin deleted article {} and its comments", article_id);
    Ok(StatusCode::NO_CONTENT)
}

/// 明文令牌只在这里返回一次，库里只有摘要。
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    authorize_admin(&headers, &state.admin_token)?;

    let username = payload.username.trim();
    if username.is_empty() {
        return Err(CommentError::Validation("Username cannot be empty.".into()).into());
    }

    let token = generate_token();
    let id = state
        .db
        .create_user(username, &hash_token(&token))
        .await?
        .ok_or_else(|| AppError::Conflict(format!("Username already taken: {}", username)))?;

    tracing::info!("Admin created user {} ({})", id, username);
    Ok((StatusCode::CREATED, Json(json!({ "id": id, "token": token }))))
}

pub async fn delete_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    IdPath(user_id): IdPath<i64>,
) -> Result<StatusCode, AppError> {
    authorize_admin(&headers, &state.admin_token)?;

    if !state.db.delete_user(user_id).await? {
        return Err(CommentError::NotFound("User", user_id).into());
    }
    tracing::info!("Admin deleted user {} and their comments", user_id);
    Ok(StatusCode::NO_CONTENT)
}
