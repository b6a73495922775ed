use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Errors from the federated identity provider path
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GithubError {
    #[error("GitHub credentials are not configured")]
    NotConfigured,

    #[error("GitHub token exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("GitHub profile fetch failed: {0}")]
    ProfileFetchFailed(String),
}

/// Top-level error for all authentication operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    // Domain-level errors
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Email is already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing authorization code")]
    MissingAuthorizationCode,

    #[error(transparent)]
    Github(#[from] GithubError),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
