use async_trait::async_trait;

use crate::user::errors::GithubError;
use crate::user::errors::UserError;
use crate::user::models::AuthSession;
use crate::user::models::GithubProfile;
use crate::user::models::RegisterUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;

/// Port for authentication service operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new local user with validated fields.
    ///
    /// Callers run the request body validator first; this operation does
    /// not re-check password confirmation.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, last name, email,
    ///   and plain-text password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Email is already registered
    /// * `DatabaseError` - Repository operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Authenticate a user by email and password and issue a session token.
    ///
    /// # Arguments
    /// * `email` - Email address to look up
    /// * `password` - Plain-text password to verify
    ///
    /// # Returns
    /// Session token plus the authenticated user
    ///
    /// # Errors
    /// * `NotFound` - No user with this email
    /// * `InvalidCredentials` - Password does not match
    /// * `DatabaseError` - Repository operation failed
    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, UserError>;

    /// Retrieve the user identified by a verified session token.
    ///
    /// The id comes from token claims checked by the request gate, never
    /// from a request body.
    ///
    /// # Arguments
    /// * `id` - User ID decoded from the token subject
    ///
    /// # Returns
    /// User entity
    ///
    /// # Errors
    /// * `NotFound` - User no longer exists
    /// * `DatabaseError` - Repository operation failed
    async fn get_current_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Authenticate through the federated provider's authorization code.
    ///
    /// Creates a local account on first login for a previously-unseen
    /// email; reuses the existing account unchanged otherwise.
    ///
    /// # Arguments
    /// * `code` - OAuth authorization code from the provider callback
    ///
    /// # Returns
    /// Session token plus the (possibly just created) user
    ///
    /// # Errors
    /// * `MissingAuthorizationCode` - Code is empty
    /// * `Github(NotConfigured)` - Provider credentials absent
    /// * `Github(ExchangeFailed)` - Code exchange rejected or unreachable
    /// * `Github(ProfileFetchFailed)` - Profile fetch rejected or unreachable
    /// * `DatabaseError` - Repository operation failed
    async fn login_with_github(&self, code: &str) -> Result<AuthSession, UserError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// The insert is atomic with respect to the email uniqueness
    /// invariant: of two concurrent creates for the same email, exactly
    /// one succeeds.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Email is already registered
    /// * `DatabaseError` - Storage operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Arguments
    /// * `id` - User ID
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address (case-sensitive).
    ///
    /// # Arguments
    /// * `email` - Email address string
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Retrieve all users in insertion order.
    ///
    /// # Returns
    /// Vector of all users, oldest first
    ///
    /// # Errors
    /// * `DatabaseError` - Storage operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;
}

/// Client for the federated identity provider's OAuth endpoints.
#[async_trait]
pub trait GithubIdentityProvider: Send + Sync + 'static {
    /// Exchange an authorization code for an access token.
    ///
    /// # Arguments
    /// * `code` - Authorization code from the provider callback
    ///
    /// # Returns
    /// Provider access token
    ///
    /// # Errors
    /// * `ExchangeFailed` - Non-success response or provider-reported
    ///   error (carries the provider's description where available)
    async fn exchange_code(&self, code: &str) -> Result<String, GithubError>;

    /// Fetch the provider profile for an access token.
    ///
    /// # Arguments
    /// * `access_token` - Token obtained from `exchange_code`
    ///
    /// # Returns
    /// Decoded provider profile
    ///
    /// # Errors
    /// * `ProfileFetchFailed` - Non-success response or undecodable body
    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubError>;
}
