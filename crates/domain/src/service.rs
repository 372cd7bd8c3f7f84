use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{CommentError, CommentResult};
use crate::models::{Comment, CommentBody, NewComment, VoteCounts, VoteDirection};
use crate::repository::CommentRepository;

/// 评论业务逻辑。本身不持有状态，所有读写都经由仓储。
#[derive(Clone)]
pub struct CommentService {
    repo: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(repo: Arc<dyn CommentRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_comment(
        &self,
        article_id: i64,
        author_id: i64,
        body: &str,
    ) -> CommentResult<Comment> {
        if !self.repo.article_exists(article_id).await? {
            return Err(CommentError::NotFound("Article", article_id));
        }
        let body = CommentBody::new(body)?;

        let comment = self
            .repo
            .insert(NewComment {
                article_id,
                author_id,
                parent_id: None,
                body,
            })
            .await?;

        info!(
            "Comment {} created on article {} by user {}",
            comment.id, article_id, author_id
        );
        Ok(comment)
    }

    pub async fn create_reply(
        &self,
        parent_comment_id: i64,
        author_id: i64,
        body: &str,
    ) -> CommentResult<Comment> {
        let parent = self.get_comment(parent_comment_id).await?;
        let body = CommentBody::new(body)?;

        let reply = self
            .repo
            .insert(NewComment {
                article_id: parent.article_id,
                author_id,
                parent_id: Some(parent.id),
                body,
            })
            .await?;

        info!(
            "Reply {} to comment {} created by user {}",
            reply.id, parent.id, author_id
        );
        Ok(reply)
    }

    pub async fn apply_vote(
        &self,
        comment_id: i64,
        direction: VoteDirection,
    ) -> CommentResult<VoteCounts> {
        let counts = self
            .repo
            .increment_counter(comment_id, direction)
            .await?
            .ok_or(CommentError::NotFound("Comment", comment_id))?;

        debug!(
            "Vote {} on comment {}: {} up / {} down",
            direction, comment_id, counts.upvotes, counts.downvotes
        );
        Ok(counts)
    }

    pub async fn list_replies(&self, comment_id: i64) -> CommentResult<Vec<Comment>> {
        Ok(self.repo.find_by_parent(comment_id).await?)
    }

    pub async fn list_comments(&self, article_id: i64) -> CommentResult<Vec<Comment>> {
        if !self.repo.article_exists(article_id).await? {
            return Err(CommentError::NotFound("Article", article_id));
        }
        Ok(self.repo.find_top_level(article_id).await?)
    }

    pub async fn get_comment(&self, comment_id: i64) -> CommentResult<Comment> {
        self.repo
            .get_by_id(comment_id)
            .await?
            .ok_or(CommentError::NotFound("Comment", comment_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryRepo {
        articles: HashSet<i64>,
        rows: Mutex<Vec<Comment>>,
    }

    impl MemoryRepo {
        fn with_articles(ids: &[i64]) -> Self {
            Self {
                articles: ids.iter().copied().collect(),
                rows: Mutex::new(Vec::new()),
            }
        }

        fn newest_first(mut rows: Vec<Comment>) -> Vec<Comment> {
            rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
            rows
        }
    }

    #[async_trait]
    impl CommentRepository for MemoryRepo {
        async fn article_exists(&self, article_id: i64) -> anyhow::Result<bool> {
            Ok(self.articles.contains(&article_id))
        }

        async fn insert(&self, new: NewComment) -> anyhow::Result<Comment> {
            let mut rows = self.rows.lock().unwrap();
            // 人为拉开时间，保证排序可预测
            let now = Utc::now().naive_utc() + Duration::seconds(rows.len() as i64);
            let comment = Comment {
                id: rows.len() as i64 + 1,
                article_id: new.article_id,
                author_id: new.author_id,
                parent_id: new.parent_id,
                body: new.body.into_inner(),
                created_at: now,
                updated_at: now,
                is_approved: false,
                upvote_count: 0,
                downvote_count: 0,
            };
            rows.push(comment.clone());
            Ok(comment)
        }

        async fn get_by_id(&self, comment_id: i64) -> anyhow::Result<Option<Comment>> {
            let rows = self.rows.lock().unwrap();
            Ok(rows.iter().find(|c| c.id == comment_id).cloned())
        }

        async fn find_by_parent(&self, comment_id: i64) -> anyhow::Result<Vec<Comment>> {
            let rows = self.rows.lock().unwrap();
            Ok(Self::newest_first(
                rows.iter()
                    .filter(|c| c.parent_id == Some(comment_id))
                    .cloned()
                    .collect(),
            ))
        }

        async fn find_top_level(&self, article_id: i64) -> anyhow::Result<Vec<Comment>> {
            let rows = self.rows.lock().unwrap();
            Ok(Self::newest_first(
                rows.iter()
                    .filter(|c| c.article_id == article_id && c.parent_id.is_none())
                    .cloned()
                    .collect(),
            ))
        }

        async fn increment_counter(
            &self,
            comment_id: i64,
            direction: VoteDirection,
        ) -> anyhow::Result<Option<VoteCounts>> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows.iter_mut().find(|c| c.id == comment_id).map(|c| {
                match direction {
                    VoteDirection::Up => c.upvote_count += 1,
                    VoteDirection::Down => c.downvote_count += 1,
                }
                c.updated_at = Utc::now().naive_utc();
                c.vote_counts()
            }))
        }
    }

    fn service(articles: &[i64]) -> CommentService {
        CommentService::new(Arc::new(MemoryRepo::with_articles(articles)))
    }

    #[tokio::test]
    async fn create_comment_starts_top_level_with_zero_votes() {
        let svc = service(&[1]);
        let c = svc.create_comment(1, 7, "first!").await.unwrap();
        assert_eq!(c.article_id, 1);
        assert_eq!(c.author_id, 7);
        assert_eq!(c.parent_id, None);
        assert_eq!((c.upvote_count, c.downvote_count), (0, 0));
        assert!(!c.is_approved);
    }

    #[tokio::test]
    async fn create_comment_rejects_missing_article_and_empty_body() {
        let svc = service(&[1]);
        assert!(matches!(
            svc.create_comment(2, 7, "hello").await,
            Err(CommentError::NotFound("Article", 2))
        ));
        assert!(matches!(
            svc.create_comment(1, 7, "   ").await,
            Err(CommentError::Validation(_))
        ));
        assert!(svc.list_comments(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reply_inherits_parent_article() {
        let svc = service(&[3]);
        let parent = svc.create_comment(3, 1, "parent").await.unwrap();
        let reply = svc.create_reply(parent.id, 2, "child").await.unwrap();
        assert_eq!(reply.article_id, 3);
        assert_eq!(reply.parent_id, Some(parent.id));

        let nested = svc.create_reply(reply.id, 1, "grandchild").await.unwrap();
        assert_eq!(nested.parent_id, Some(reply.id));
        assert_eq!(nested.article_id, 3);
    }

    #[tokio::test]
    async fn reply_to_missing_parent_is_not_found() {
        let svc = service(&[1]);
        assert!(matches!(
            svc.create_reply(99, 1, "orphan").await,
            Err(CommentError::NotFound("Comment", 99))
        ));
    }

    #[tokio::test]
    async fn votes_accumulate_and_never_decrease() {
        let svc = service(&[1]);
        let c = svc.create_comment(1, 1, "vote me").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let after_up = svc.apply_vote(c.id, VoteDirection::Up).await.unwrap();
        let after_down = svc.apply_vote(c.id, VoteDirection::Down).await.unwrap();
        assert_eq!(after_up, VoteCounts { upvotes: 1, downvotes: 0 });
        assert_eq!(after_down, VoteCounts { upvotes: 1, downvotes: 1 });

        let voted = svc.get_comment(c.id).await.unwrap();
        assert_eq!(voted.created_at, c.created_at);
        assert!(voted.updated_at > c.updated_at);

        let mut last = after_down;
        for dir in [VoteDirection::Up, VoteDirection::Up, VoteDirection::Down] {
            let next = svc.apply_vote(c.id, dir).await.unwrap();
            assert!(next.upvotes >= last.upvotes && next.downvotes >= last.downvotes);
            last = next;
        }
        assert_eq!(last, VoteCounts { upvotes: 3, downvotes: 2 });

        assert!(matches!(
            svc.apply_vote(42, VoteDirection::Up).await,
            Err(CommentError::NotFound("Comment", 42))
        ));
    }

    #[tokio::test]
    async fn list_replies_returns_only_children_newest_first() {
        let svc = service(&[1]);
        let parent = svc.create_comment(1, 1, "parent").await.unwrap();
        let other = svc.create_comment(1, 1, "other").await.unwrap();
        let r1 = svc.create_reply(parent.id, 2, "one").await.unwrap();
        let r2 = svc.create_reply(parent.id, 3, "two").await.unwrap();
        svc.create_reply(other.id, 2, "elsewhere").await.unwrap();

        let ids: Vec<i64> = svc
            .list_replies(parent.id)
            .await
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![r2.id, r1.id]);
    }
}
