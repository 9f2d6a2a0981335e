use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;

use super::ApiError;
use crate::inbound::http::middleware::authorization_header;
use crate::inbound::http::router::AppState;

pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .authenticator
        .revoke_session(authorization_header(&headers))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
