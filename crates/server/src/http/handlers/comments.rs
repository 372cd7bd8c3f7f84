use axum::{
    extract::State,
    http::Method,
    response::Redirect,
    Form, Json,
};
use domain::{Comment, CommentError, CommentRepository};
use serde::Deserialize;

use crate::{auth::AuthUser, error::AppError, http::extract::IdPath, state::AppState};

#[derive(Deserialize, Default)]
pub struct CommentForm {
    #[serde(default)]
    pub body: String,
}

fn form_body(form: &Option<Form<CommentForm>>) -> &str {
    form.as_ref().map(|f| f.body.as_str()).unwrap_or("")
}

/// 非法表单不报错，直接重定向回文章页。
fn swallow_validation(result: Result<Comment, CommentError>) -> Result<(), AppError> {
    match result {
        Ok(_) => Ok(()),
        Err(CommentError::Validation(reason)) => {
            tracing::debug!("Ignored invalid comment form: {}", reason);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn add_comment(
    State(state): State<AppState>,
    user: AuthUser,
    method: Method,
    IdPath(article_id): IdPath<i64>,
    form: Option<Form<CommentForm>>,
) -> Result<Redirect, AppError> {
    if method == Method::POST {
        let result = state
            .comments
            .create_comment(article_id, user.user_id, form_body(&form))
            .await;
        swallow_validation(result)?;
    } else if !state.db.article_exists(article_id).await? {
        return Err(CommentError::NotFound("Article", article_id).into());
    }

    Ok(Redirect::to(&state.article_url(article_id)))
}

pub async fn reply_comment(
    State(state): State<AppState>,
    user: AuthUser,
    method: Method,
    IdPath(comment_id): IdPath<i64>,
    form: Option<Form<CommentForm>>,
) -> Result<Redirect, AppError> {
    let parent = state.comments.get_comment(comment_id).await?;

    if method == Method::POST {
        let result = state
            .comments
            .create_reply(parent.id, user.user_id, form_body(&form))
            .await;
        swallow_validation(result)?;
    }

    Ok(Redirect::to(&state.article_url(parent.article_id)))
}

pub async fn list_comments(
    State(state): State<AppState>,
    _user: AuthUser,
    IdPath(article_id): IdPath<i64>,
) -> Result<Json<Vec<Comment>>, AppError> {
    Ok(Json(state.comments.list_comments(article_id).await?))
}

pub async fn list_replies(
    State(state): State<AppState>,
    _user: AuthUser,
    IdPath(comment_id): IdPath<i64>,
) -> Result<Json<Vec<Comment>>, AppError> {
    let parent = state.comments.get_comment(comment_id).await?;
    Ok(Json(state.comments.list_replies(parent.id).await?))
}
