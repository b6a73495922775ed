use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a registered identity. Accounts created through federated
/// login carry an empty `password_hash` and a `github_id`; locally
/// registered accounts carry a password hash and no `github_id`.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password_hash: String,
    pub github_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    ///
    /// # Returns
    /// UserId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Arguments
    /// * `s` - UUID string to parse
    ///
    /// # Returns
    /// Parsed UserId
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address value type.
///
/// Shape: `local@domain.tld` with no whitespace and a dot in the domain.
/// Equality is case-sensitive; the address is stored exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not have the `local@domain.tld` shape
    pub fn new(email: String) -> Result<Self, EmailError> {
        if Self::is_valid_format(&email) {
            Ok(Self(email))
        } else {
            Err(EmailError::InvalidFormat(email))
        }
    }

    /// Check whether a string has the accepted email shape.
    ///
    /// Non-empty local and domain parts separated by a single `@`, no
    /// whitespace anywhere, and a dot in the domain with non-empty
    /// segments on both sides.
    pub fn is_valid_format(email: &str) -> bool {
        if email.chars().any(char::is_whitespace) {
            return false;
        }
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        match domain.rsplit_once('.') {
            Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
            None => false,
        }
    }

    /// Get email as string slice.
    ///
    /// # Returns
    /// Email string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new local user.
///
/// Fields arrive pre-validated by the request body validator; the
/// password is plain text and is hashed by the service.
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: String,
    pub last_name: String,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterUserCommand {
    pub fn new(name: String, last_name: String, email: EmailAddress, password: String) -> Self {
        Self {
            name,
            last_name,
            email,
            password,
        }
    }
}

/// Result of a successful login, local or federated.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Profile returned by the federated identity provider.
///
/// The provider reports a missing public email either as an absent
/// field or as an empty string; callers treat both as "no email".
#[derive(Debug, Clone)]
pub struct GithubProfile {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub login: Option<String>,
}
