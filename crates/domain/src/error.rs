use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("{0} {1} not found")]
    NotFound(&'static str, i64),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type CommentResult<T> = Result<T, CommentError>;
