use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap, Method, Uri},
};
use sha2::{Digest, Sha256};

use crate::{error::AppError, state::AppState};

const SESSION_COOKIE: &str = "session";

/// 已登录的调用者。令牌可放在 `Authorization: Bearer` 头或 `session` cookie 中。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let login_redirect = || AppError::Unauthenticated {
            login_redirect: login_redirect_url(&state.login_url, &parts.uri),
        };

        let Some(token) = extract_token(&parts.headers) else {
            return Err(login_redirect());
        };

        match state.db.find_user_by_token_hash(&hash_token(token)).await? {
            Some(user_id) => Ok(AuthUser { user_id }),
            None => {
                tracing::debug!("Rejected unknown session token on {}", parts.uri.path());
                Err(login_redirect())
            }
        }
    }
}

/// `{login_url}?next=<原路径及查询串>`，next 做百分号编码，`/` 保留原样。
fn login_redirect_url(login_url: &str, uri: &Uri) -> String {
    let next = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{}?next={}", login_url, next)
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim()).filter(|t| !t.is_empty());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
        .filter(|t| !t.is_empty())
}

/// 只接受 POST，其它方法返回 405。放在认证之后调用，未登录的请求先被重定向。
pub fn require_post(method: &Method) -> Result<(), AppError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(AppError::MethodNotAllowed)
    }
}

/// 管理接口使用固定的 Bearer 令牌。
pub fn authorize_admin(headers: &HeaderMap, admin_token: &str) -> Result<(), AppError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::MissingAdminToken)?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err(AppError::InvalidAdminToken);
    }
    Ok(())
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_from_bearer_or_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc123"));
        assert_eq!(extract_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(extract_token(&headers), Some("xyz"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(extract_token(&empty), None);
    }

    #[test]
    fn login_redirect_keeps_query_and_encodes_it() {
        let uri: Uri = "/add/3/".parse().unwrap();
        assert_eq!(login_redirect_url("/login/", &uri), "/login/?next=/add/3/");

        let uri: Uri = "/add/3/?body=a b&x=1".replace(' ', "%20").parse().unwrap();
        assert_eq!(
            login_redirect_url("/login/", &uri),
            "/login/?next=/add/3/%3Fbody%3Da%2520b%26x%3D1"
        );
    }

    #[test]
    fn tokens_are_random_and_hash_is_stable() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(hash_token(&a), hash_token(&a));
        assert_ne!(hash_token(&a), a);
    }

    #[test]
    fn only_post_passes_method_guard() {
        assert!(require_post(&Method::POST).is_ok());
        assert!(matches!(require_post(&Method::GET), Err(AppError::MethodNotAllowed)));
    }
}
