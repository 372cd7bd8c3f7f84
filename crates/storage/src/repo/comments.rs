use crate::{
    models::{SqlComment, SqlVoteCounts},
    Db,
};
use async_trait::async_trait;
use chrono::Utc;
use domain::{Comment, CommentRepository, NewComment, VoteCounts, VoteDirection};

const COMMENT_COLUMNS: &str = r#"
    id, article_id, author_id, parent_id, body,
    created_at, updated_at, is_approved,
    upvote_count, downvote_count
"#;

impl Db {
    /// 直接删除一条评论，其回复随外键级联删除。不对外暴露为 HTTP 接口。
    pub async fn delete_comment(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_comments(&self, article_id: i64) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE article_id = ?")
            .bind(article_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CommentRepository for Db {
    async fn article_exists(&self, article_id: i64) -> anyhow::Result<bool> {
        Ok(self.get_article_title(article_id).await?.is_some())
    }

    async fn insert(&self, new: NewComment) -> anyhow::Result<Comment> {
        let now = Utc::now().naive_utc();
        let row = sqlx::query_as::<_, SqlComment>(&format!(
            r#"
            INSERT INTO comments (article_id, author_id, parent_id, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(new.article_id)
        .bind(new.author_id)
        .bind(new.parent_id)
        .bind(new.body.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, comment_id: i64) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?"
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_parent(&self, comment_id: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE parent_id = ?
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_top_level(&self, article_id: i64) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query_as::<_, SqlComment>(&format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM comments
            WHERE article_id = ? AND parent_id IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(article_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn increment_counter(
        &self,
        comment_id: i64,
        direction: VoteDirection,
    ) -> anyhow::Result<Option<VoteCounts>> {
        // 单条 UPDATE 完成自增，并发投票不会丢失更新
        let sql = match direction {
            VoteDirection::Up => {
                r#"
                UPDATE comments
                SET upvote_count = upvote_count + 1, updated_at = ?
                WHERE id = ?
                RETURNING upvote_count, downvote_count
                "#
            }
            VoteDirection::Down => {
                r#"
                UPDATE comments
                SET downvote_count = downvote_count + 1, updated_at = ?
                WHERE id = ?
                RETURNING upvote_count, downvote_count
                "#
            }
        };

        let row = sqlx::query_as::<_, SqlVoteCounts>(sql)
            .bind(Utc::now().naive_utc())
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| VoteCounts {
            upvotes: r.upvote_count,
            downvotes: r.downvote_count,
        }))
    }
}
