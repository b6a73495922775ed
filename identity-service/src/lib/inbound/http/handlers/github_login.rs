use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::login::LoginResponseData;
use super::ApiError;
use super::ApiSuccess;
use crate::inbound::http::router::AppState;

pub async fn github_login(
    State(state): State<AppState>,
    Json(body): Json<GithubLoginRequest>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let session = state
        .auth_service
        .login_with_github(&body.code)
        .await
        .map_err(ApiError::from)?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "GitHub login successful",
        LoginResponseData {
            token: session.token,
            user: (&session.user).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubLoginRequest {
    // An absent code behaves like an empty one: rejected by the service
    // before any provider call.
    #[serde(default)]
    pub code: String,
}
