//! Self-service account handlers.

use axum::Json;
use axum::extract::State;

use learnhub_core::error::AppError;

use crate::dto::response::{AccountResponse, MeResponse, SessionResponse};
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /accounts/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MeResponse>> {
    let account = state
        .accounts
        .find_by_id(auth.account_id)
        .await?
        .ok_or_else(|| AppError::not_found("Account not found"))?;

    Ok(Json(MeResponse {
        context: auth.0,
        account: AccountResponse::from(account),
    }))
}

/// GET /accounts/me/sessions
pub async fn sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = state.auth_service.sessions_of(auth.account_id).await?;
    let current = auth.device_id.as_deref();

    Ok(Json(
        sessions
            .into_iter()
            .map(|s| SessionResponse::from_session(s, current))
            .collect(),
    ))
}
