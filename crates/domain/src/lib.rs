mod error;
mod models;
mod repository;
mod service;

pub use error::{CommentError, CommentResult};
pub use models::{Comment, CommentBody, NewComment, VoteCounts, VoteDirection};
pub use repository::CommentRepository;
pub use service::CommentService;
