use crate::Db;
use chrono::Utc;

impl Db {
    pub async fn create_article(&self, title: &str) -> anyhow::Result<i64> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO articles (title, created_at) VALUES (?, ?) RETURNING id")
                .bind(title)
                .bind(Utc::now().naive_utc())
                .fetch_one(&self.pool)
                .await?;
        Ok(id)
    }

    pub async fn get_article_title(&self, id: i64) -> anyhow::Result<Option<String>> {
        let title = sqlx::query_scalar("SELECT title FROM articles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(title)
    }

    /// 删除文章，其全部评论随外键级联删除。
    pub async fn delete_article(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
