use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use auth::Claims;
use chrono::Utc;

use crate::user::errors::GithubError;
use crate::user::errors::UserError;
use crate::user::models::AuthSession;
use crate::user::models::EmailAddress;
use crate::user::models::RegisterUserCommand;
use crate::user::models::User;
use crate::user::models::UserId;
use crate::user::ports::AuthServicePort;
use crate::user::ports::GithubIdentityProvider;
use crate::user::ports::UserRepository;

/// Domain suffix for synthetic addresses assigned to federated accounts
/// whose provider profile has no public email.
const GITHUB_EMAIL_DOMAIN: &str = "github.com";

/// Authentication service implementation.
///
/// Concrete implementation of AuthServicePort with dependency injection.
/// Owns the business invariants: email uniqueness, credential secrecy,
/// and token issuance policy.
pub struct AuthService<UR, GH>
where
    UR: UserRepository,
    GH: GithubIdentityProvider,
{
    repository: Arc<UR>,
    github: Option<Arc<GH>>,
    authenticator: Arc<Authenticator>,
    token_ttl_hours: i64,
}

impl<UR, GH> AuthService<UR, GH>
where
    UR: UserRepository,
    GH: GithubIdentityProvider,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `github` - Federated identity client, absent when the provider
    ///   is not configured
    /// * `authenticator` - Password and token machinery
    /// * `token_ttl_hours` - Session token lifetime
    ///
    /// # Returns
    /// Configured authentication service instance
    pub fn new(
        repository: Arc<UR>,
        github: Option<Arc<GH>>,
        authenticator: Arc<Authenticator>,
        token_ttl_hours: i64,
    ) -> Self {
        Self {
            repository,
            github,
            authenticator,
            token_ttl_hours,
        }
    }

    fn session_claims(&self, user: &User) -> Claims {
        Claims::for_user(
            user.id,
            user.email.as_str().to_string(),
            self.token_ttl_hours,
        )
    }
}

#[async_trait::async_trait]
impl<UR, GH> AuthServicePort for AuthService<UR, GH>
where
    UR: UserRepository,
    GH: GithubIdentityProvider,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::AlreadyRegistered(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self
            .authenticator
            .hash_password(&command.password)
            .map_err(|e| UserError::Password(e.to_string()))?;

        let user = User {
            id: UserId::new(),
            name: command.name,
            last_name: command.last_name,
            email: command.email,
            password_hash,
            github_id: None,
            created_at: Utc::now(),
        };

        // The unique insert also catches a concurrent register that slipped
        // in between the lookup above and this write.
        self.repository.create(user).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        let claims = self.session_claims(&user);
        let result = self
            .authenticator
            .authenticate(password, &user.password_hash, &claims)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => UserError::Password(err.to_string()),
                AuthenticationError::JwtError(err) => UserError::Token(err.to_string()),
            })?;

        Ok(AuthSession {
            token: result.access_token,
            user,
        })
    }

    async fn get_current_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn login_with_github(&self, code: &str) -> Result<AuthSession, UserError> {
        if code.is_empty() {
            return Err(UserError::MissingAuthorizationCode);
        }

        let provider = self.github.as_ref().ok_or(GithubError::NotConfigured)?;

        let access_token = provider.exchange_code(code).await?;
        let profile = provider.fetch_profile(&access_token).await?;

        // Profiles without a public email get a stable synthetic address
        // derived from the provider user id.
        let email = profile
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@{}", profile.id, GITHUB_EMAIL_DOMAIN));

        let user = match self.repository.find_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                let user = User {
                    id: UserId::new(),
                    name: profile
                        .name
                        .clone()
                        .or_else(|| profile.login.clone())
                        .unwrap_or_default(),
                    last_name: String::new(),
                    email: EmailAddress::new(email.clone())?,
                    password_hash: String::new(),
                    github_id: Some(profile.id.clone()),
                    created_at: Utc::now(),
                };

                match self.repository.create(user).await {
                    Ok(created) => created,
                    // A concurrent federated login for the same account won
                    // the insert; reuse its row.
                    Err(UserError::AlreadyRegistered(_)) => self
                        .repository
                        .find_by_email(&email)
                        .await?
                        .ok_or_else(|| {
                            UserError::Unknown(format!(
                                "user missing after duplicate insert for {email}"
                            ))
                        })?,
                    Err(e) => return Err(e),
                }
            }
        };

        let claims = self.session_claims(&user);
        let token = self
            .authenticator
            .generate_token(&claims)
            .map_err(|e| UserError::Token(e.to_string()))?;

        Ok(AuthSession { token, user })
    }
}
