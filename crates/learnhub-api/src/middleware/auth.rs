//! Authentication gate middleware.
//!
//! Runs [`AuthenticationGate`](learnhub_auth::AuthenticationGate) over every
//! request. An authenticated caller's [`SecurityContext`] is inserted into
//! the request extensions; a rejection short-circuits with its own body.

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use learnhub_auth::gate::RejectionStatus;
use learnhub_auth::{GateOutcome, GateRejection, GateRequest, SecurityContext};

use crate::extractors::client::{remote_addr, user_agent};
use crate::state::AppState;

/// Axum middleware entry point.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let gate_request = GateRequest {
        path: &path,
        authorization: authorization.as_deref(),
        remote_addr: remote_addr(request.headers(), request.extensions()),
        user_agent: user_agent(request.headers()),
        already_authenticated: request.extensions().get::<SecurityContext>().is_some(),
    };

    match state.gate.run(gate_request).await {
        GateOutcome::Authenticated(context) => {
            request.extensions_mut().insert(*context);
            next.run(request).await
        }
        GateOutcome::Rejected(rejection) => rejection_response(rejection),
        GateOutcome::Bypass | GateOutcome::Anonymous | GateOutcome::AlreadyAuthenticated => {
            next.run(request).await
        }
    }
}

/// Renders a gate rejection with its own status and body.
pub fn rejection_response(rejection: GateRejection) -> Response {
    let status = match rejection.status {
        RejectionStatus::Unauthorized => StatusCode::UNAUTHORIZED,
        RejectionStatus::Forbidden => StatusCode::FORBIDDEN,
    };
    (status, Json(rejection)).into_response()
}
