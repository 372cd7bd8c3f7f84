use async_trait::async_trait;

use crate::models::{Comment, NewComment, VoteDirection, VoteCounts};

/// 评论记录的存储接口。实现方负责表结构、迁移与级联删除。
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn article_exists(&self, article_id: i64) -> anyhow::Result<bool>;

    async fn insert(&self, new: NewComment) -> anyhow::Result<Comment>;

    async fn get_by_id(&self, comment_id: i64) -> anyhow::Result<Option<Comment>>;

    /// Replies of `comment_id`, newest first.
    async fn find_by_parent(&self, comment_id: i64) -> anyhow::Result<Vec<Comment>>;

    /// Top-level comments of an article, newest first.
    async fn find_top_level(&self, article_id: i64) -> anyhow::Result<Vec<Comment>>;

    /// Adds one to the selected counter in a single statement.
    /// Returns `None` when the comment does not exist.
    async fn increment_counter(
        &self,
        comment_id: i64,
        direction: VoteDirection,
    ) -> anyhow::Result<Option<VoteCounts>>;
}
