use domain::CommentService;
use std::sync::Arc;
use storage::Db;

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub comments: CommentService,
    pub login_url: String,
    pub article_url_prefix: String,
    pub admin_token: String,
}

impl AppState {
    pub fn new(
        db: Db,
        login_url: impl Into<String>,
        article_url_prefix: impl Into<String>,
        admin_token: impl Into<String>,
    ) -> Self {
        let comments = CommentService::new(Arc::new(db.clone()));
        Self {
            db,
            comments,
            login_url: login_url.into(),
            article_url_prefix: article_url_prefix.into(),
            admin_token: admin_token.into(),
        }
    }

    pub fn article_url(&self, article_id: i64) -> String {
        format!("{}{}/", self.article_url_prefix, article_id)
    }
}
