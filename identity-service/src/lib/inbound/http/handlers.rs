use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::user::errors::UserError;
use crate::user::models::User;

pub mod get_me;
pub mod github_login;
pub mod login;
pub mod register;

/// Success envelope: `{success, message, time, data}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponseBody<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub time: DateTime<Utc>,
    pub data: T,
}

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize>(StatusCode, Json<ApiResponseBody<T>>);

impl<T: Serialize> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(
            status,
            Json(ApiResponseBody {
                success: true,
                message: message.to_string(),
                time: Utc::now(),
                data,
            }),
        )
    }
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Failure envelope: `{success: false, message, time, taskId}`.
///
/// The task id is a fresh correlation identifier minted per error for
/// support lookups; it is never persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: String,
    pub time: DateTime<Utc>,
    pub task_id: Uuid,
}

impl ApiErrorBody {
    pub fn new(message: String) -> Self {
        Self {
            success: false,
            message,
            time: Utc::now(),
            task_id: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ApiErrorBody::new(message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::AlreadyRegistered(_) => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::MissingAuthorizationCode => ApiError::BadRequest(err.to_string()),
            UserError::InvalidUserId(_) | UserError::InvalidEmail(_) => {
                ApiError::BadRequest(err.to_string())
            }
            // Upstream provider failures surface the provider's message;
            // it is the provider's text, not internal detail.
            UserError::Github(_) => {
                tracing::error!(error = %err, "Federated provider failure");
                ApiError::InternalServerError(err.to_string())
            }
            // Internal failures never leak detail to the caller.
            UserError::Password(_)
            | UserError::Token(_)
            | UserError::DatabaseError(_)
            | UserError::Unknown(_) => {
                tracing::error!(error = %err, "Internal failure");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

/// Public projection of a user: everything except the credential fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_string(),
            created_at: user.created_at,
        }
    }
}
