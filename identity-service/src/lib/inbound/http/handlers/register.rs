use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::inbound::http::router::AppState;
use crate::inbound::http::validation::validate_register_body;
use crate::user::models::EmailAddress;
use crate::user::models::RegisterUserCommand;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<ApiSuccess<RegisterResponseData>, ApiError> {
    let validation = validate_register_body(&body);
    if !validation.is_valid {
        return Err(ApiError::BadRequest(validation.errors.join(", ")));
    }

    let command = parse_register_command(&body)?;

    state
        .auth_service
        .register(command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User registered successfully",
                RegisterResponseData { user: user.into() },
            )
        })
}

// Fields are known-present strings after validation.
fn parse_register_command(body: &Value) -> Result<RegisterUserCommand, ApiError> {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let email =
        EmailAddress::new(field("email")).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    Ok(RegisterUserCommand::new(
        field("name"),
        field("lastName"),
        email,
        field("password"),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterResponseData {
    pub user: UserData,
}
