use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use domain::CommentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Comment(#[from] CommentError),

    #[error("Login required")]
    Unauthenticated { login_redirect: String },

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Not Found")]
    RouteNotFound,

    #[error("Missing Authorization header")]
    MissingAdminToken,

    #[error("Invalid Admin Token")]
    InvalidAdminToken,

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthenticated { login_redirect } => {
                return Redirect::to(login_redirect).into_response();
            }
            AppError::MethodNotAllowed => {
                return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "POST")]).into_response();
            }
            AppError::Comment(CommentError::NotFound(..)) | AppError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::Comment(CommentError::Validation(_)) => StatusCode::BAD_REQUEST,
            AppError::MissingAdminToken => StatusCode::UNAUTHORIZED,
            AppError::InvalidAdminToken => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Comment(CommentError::Storage(e)) | AppError::Internal(e) => {
                tracing::error!("Request failed: {:?}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}
