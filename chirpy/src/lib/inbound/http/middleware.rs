use std::sync::atomic::Ordering;

use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user ID in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Middleware that validates the access token and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // Every rejection collapses to 401; the reason is logged by the authenticator
    let identity = state
        .authenticator
        .authenticate(authorization_header(req.headers()))?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(identity.user_id),
    });

    Ok(next.run(req).await)
}

/// Counts requests reaching the static file server.
pub async fn count_file_server_hits(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    state.file_server_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

/// Raw `Authorization` header value, if present and valid UTF-8.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_authorization_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(authorization_header(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(authorization_header(&headers), Some("Bearer abc"));
    }
}
