use std::sync::atomic::Ordering;

use axum::extract::State;

use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Zero the hit counter and wipe every user and chirp. Dev platform only.
pub async fn reset(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if !state.is_dev {
        tracing::warn!("Reset refused outside the dev platform");
        return Err(ApiError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    state.file_server_hits.store(0, Ordering::Relaxed);
    let chirps = state.chirp_service.reset_chirps().await?;
    let users = state.user_service.reset_users().await?;

    tracing::warn!(users, chirps, "Store reset");

    Ok("OK")
}
