use crate::Db;
use chrono::Utc;

impl Db {
    /// 只保存令牌的摘要，明文令牌由调用方生成并交给用户。
    /// 用户名已被占用时返回 `None`。
    pub async fn create_user(&self, username: &str, token_hash: &str) -> anyhow::Result<Option<i64>> {
        let id = sqlx::query_scalar(
            r#"
            INSERT INTO users (username, token_hash, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT DO NOTHING
            RETURNING id
            "#,
        )
        .bind(username)
        .bind(token_hash)
        .bind(Utc::now().naive_utc())
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn find_user_by_token_hash(&self, token_hash: &str) -> anyhow::Result<Option<i64>> {
        let id = sqlx::query_scalar("SELECT id FROM users WHERE token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    /// 删除用户，其发表的评论（以及这些评论的回复）随外键级联删除。
    pub async fn delete_user(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{memory_db, seed};
    use domain::{CommentBody, CommentRepository, NewComment};

    #[tokio::test]
    async fn token_lookup_and_user_cascade() {
        let db = memory_db().await;
        let (article, ferris) = seed(&db).await;
        let other = db.create_user("crab", "hash-crab").await.unwrap().unwrap();

        assert_eq!(db.find_user_by_token_hash("hash-ferris").await.unwrap(), Some(ferris));
        assert_eq!(db.find_user_by_token_hash("nope").await.unwrap(), None);
        assert_eq!(db.create_user("ferris", "another-hash").await.unwrap(), None);

        for (author, body) in [(ferris, "mine"), (other, "theirs")] {
            db.insert(NewComment {
                article_id: article,
                author_id: author,
                parent_id: None,
                body: CommentBody::new(body).unwrap(),
            })
            .await
            .unwrap();
        }

        assert!(db.delete_user(ferris).await.unwrap());
        let left = db.find_top_level(article).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].author_id, other);
    }
}
