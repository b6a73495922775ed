use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate_login_body;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let validation = validate_login_body(&body);
    if !validation.is_valid {
        return Err(ApiError::BadRequest(validation.errors.join(", ")));
    }

    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    let session = state
        .auth_service
        .login(email, password)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Login successful",
        LoginResponseData {
            token: session.token,
            user: (&session.user).into(),
        },
    ))
}

/// Shared by local and federated login: both return `{token, user}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub user: UserData,
}
