use std::sync::Arc;
use std::sync::Mutex;

use auth::Authenticator;
use auth::JwtHandler;
use identity_service::domain::user::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::user::errors::GithubError;
use identity_service::user::models::GithubProfile;
use identity_service::user::ports::GithubIdentityProvider;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server.
///
/// Runs against the in-memory repository and a stub GitHub provider, so
/// the suite needs no database or network.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub github: Arc<StubGithubProvider>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryUserRepository::new());
        let github = Arc::new(StubGithubProvider::new());
        let authenticator = Arc::new(Authenticator::new(TEST_SECRET));

        let auth_service = Arc::new(AuthService::new(
            repository,
            Some(Arc::clone(&github)),
            Arc::clone(&authenticator),
            1,
        ));

        let router = create_router(auth_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(TEST_SECRET),
            github,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }
}

/// Scriptable stand-in for the GitHub OAuth endpoints.
pub struct StubGithubProvider {
    profile: Mutex<Option<GithubProfile>>,
    exchange_error: Mutex<Option<String>>,
}

impl StubGithubProvider {
    pub fn new() -> Self {
        Self {
            profile: Mutex::new(None),
            exchange_error: Mutex::new(None),
        }
    }

    /// Set the profile returned by the next profile fetches.
    pub fn set_profile(&self, profile: GithubProfile) {
        *self.profile.lock().unwrap() = Some(profile);
    }

    /// Make code exchange fail with a provider-style message.
    pub fn fail_exchange(&self, message: &str) {
        *self.exchange_error.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait::async_trait]
impl GithubIdentityProvider for StubGithubProvider {
    async fn exchange_code(&self, _code: &str) -> Result<String, GithubError> {
        if let Some(message) = self.exchange_error.lock().unwrap().clone() {
            return Err(GithubError::ExchangeFailed(message));
        }
        Ok("stub-access-token".to_string())
    }

    async fn fetch_profile(&self, _access_token: &str) -> Result<GithubProfile, GithubError> {
        self.profile.lock().unwrap().clone().ok_or_else(|| {
            GithubError::ProfileFetchFailed("no stub profile configured".to_string())
        })
    }
}
