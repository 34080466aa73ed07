//! Auth handlers for login, registration, refresh and logout.

use std::str::FromStr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use learnhub_auth::{AuthOutcome, ClientInfo};
use learnhub_core::error::AppError;
use learnhub_entity::account::AccountRole;

use crate::dto::request::{LoginRequest, LogoutRequest, RefreshRequest, RegisterRequest};
use crate::dto::response::{LogoutAllResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ClientMeta};
use crate::state::AppState;

/// A restricted account is answered with 403 and the same body shape.
fn outcome_response(outcome: AuthOutcome) -> Response {
    let status = if outcome.is_denied() {
        StatusCode::FORBIDDEN
    } else {
        StatusCode::OK
    };
    (status, Json(outcome)).into_response()
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Response> {
    let device_id = req
        .device_id
        .filter(|d| !d.trim().is_empty())
        .or(client.device_id);

    let outcome = state
        .auth_service
        .login(
            &req.email,
            &req.password,
            ClientInfo {
                user_agent: client.user_agent,
                ip_address: client.ip_address,
                device_id,
            },
        )
        .await?;

    Ok(outcome_response(outcome))
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    client: ClientMeta,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Response> {
    let role = req.role.as_deref().map(AccountRole::from_str).transpose()?;

    let outcome = state
        .auth_service
        .register(
            learnhub_auth::RegisterRequest {
                email: req.email,
                password: req.password,
                role,
                username: req.username,
            },
            ClientInfo {
                user_agent: client.user_agent,
                ip_address: client.ip_address,
                device_id: None,
            },
        )
        .await?;

    Ok(outcome_response(outcome))
}

/// POST /auth/refresh-token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Response> {
    let outcome = state.auth_service.refresh(&req.token).await?;
    Ok(outcome_response(outcome))
}

/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> ApiResult<Json<MessageResponse>> {
    // The body is optional for device-bound tokens.
    let req: LogoutRequest = if body.is_empty() {
        LogoutRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid logout request: {e}")))?
    };

    state
        .auth_service
        .logout(&auth.claims, &auth.token, req.session_token.as_deref())
        .await?;

    Ok(Json(MessageResponse::new("Logged out successfully")))
}

/// POST /auth/logout-all
pub async fn logout_all(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<LogoutAllResponse>> {
    let count = state
        .auth_service
        .logout_all(&auth.claims, &auth.token)
        .await?;

    Ok(Json(LogoutAllResponse { count }))
}
