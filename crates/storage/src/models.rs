use chrono::NaiveDateTime;
use domain::Comment;
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlComment {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub parent_id: Option<i64>,
    pub body: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub is_approved: bool,
    pub upvote_count: i64,
    pub downvote_count: i64,
}

impl From<SqlComment> for Comment {
    fn from(sql: SqlComment) -> Self {
        Comment {
            id: sql.id,
            article_id: sql.article_id,
            author_id: sql.author_id,
            parent_id: sql.parent_id,
            body: sql.body,
            created_at: sql.created_at,
            updated_at: sql.updated_at,
            is_approved: sql.is_approved,
            upvote_count: sql.upvote_count,
            downvote_count: sql.downvote_count,
        }
    }
}

#[derive(FromRow)]
pub struct SqlVoteCounts {
    pub upvote_count: i64,
    pub downvote_count: i64,
}
