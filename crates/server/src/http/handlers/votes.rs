use axum::{
    extract::State,
    http::Method,
    Json,
};
use domain::{VoteCounts, VoteDirection};

use crate::{
    auth::{require_post, AuthUser},
    error::AppError,
    http::extract::IdPath,
    state::AppState,
};

pub async fn vote_comment(
    State(state): State<AppState>,
    _user: AuthUser,
    method: Method,
    IdPath((comment_id, vote_type)): IdPath<(i64, String)>,
) -> Result<Json<VoteCounts>, AppError> {
    require_post(&method)?;

    let counts = match vote_type.parse::<VoteDirection>() {
        Ok(direction) => state.comments.apply_vote(comment_id, direction).await?,
        Err(e) => {
            // 未知方向不计票，只返回当前计数
            tracing::debug!("Vote on comment {} ignored: {}", comment_id, e);
            state.comments.get_comment(comment_id).await?.vote_counts()
        }
    };

    Ok(Json(counts))
}
