use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use crate::inbound::http::handlers::ApiErrorBody;
use crate::inbound::http::router::AppState;
use crate::user::models::UserId;

/// Identity decoded from a verified session token, stored in request
/// extensions for downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware guarding protected routes.
///
/// Extracts the bearer token, verifies it, and injects the decoded
/// identity into request extensions. A missing or mis-schemed header is
/// rejected without attempting verification. The repository is never
/// consulted here; the signed claims are trusted as-is.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Session token rejected");
        unauthorized("Invalid or expired token")
    })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a valid user id");
        unauthorized("Invalid or expired token")
    })?;

    req.extensions_mut().insert(AuthenticatedIdentity {
        user_id,
        email: claims.email,
    });

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing authentication token"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Missing authentication token"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(unauthorized("Missing authentication token"));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiErrorBody::new(message.to_string())),
    )
        .into_response()
}
