use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::user::errors::GithubError;
use crate::user::models::GithubProfile;
use crate::user::ports::GithubIdentityProvider;

/// Timeout applied to both provider calls so a slow upstream cannot hold
/// a login request open indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub's API rejects requests without a User-Agent.
const USER_AGENT: &str = concat!("identity-service/", env!("CARGO_PKG_VERSION"));

/// OAuth client for GitHub's authorization-code flow.
///
/// Exchanges the callback code for an access token, then fetches the
/// profile of the user who authorized it.
pub struct GithubOAuthClient {
    http_client: reqwest::Client,
    config: GithubConfig,
}

impl GithubOAuthClient {
    /// Create a new client from provider configuration.
    ///
    /// # Arguments
    /// * `config` - Client credentials and endpoint URLs
    ///
    /// # Errors
    /// * `reqwest::Error` - HTTP client construction failed
    pub fn new(config: GithubConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    id: i64,
    email: Option<String>,
    name: Option<String>,
    login: Option<String>,
}

#[async_trait]
impl GithubIdentityProvider for GithubOAuthClient {
    async fn exchange_code(&self, code: &str) -> Result<String, GithubError> {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
        ];
        if let Some(redirect_uri) = &self.config.redirect_uri {
            params.push(("redirect_uri", redirect_uri.as_str()));
        }

        let response = self
            .http_client
            .post(&self.config.token_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| GithubError::ExchangeFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GithubError::ExchangeFailed(format!(
                "token endpoint returned {}",
                response.status()
            )));
        }

        let body: AccessTokenResponse = response
            .json()
            .await
            .map_err(|e| GithubError::ExchangeFailed(e.to_string()))?;

        // GitHub reports a rejected code inside a 200 response.
        if let Some(error) = body.error {
            return Err(GithubError::ExchangeFailed(
                body.error_description.unwrap_or(error),
            ));
        }

        body.access_token
            .ok_or_else(|| GithubError::ExchangeFailed("response carried no access token".into()))
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GithubProfile, GithubError> {
        let response = self
            .http_client
            .get(&self.config.user_url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| GithubError::ProfileFetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GithubError::ProfileFetchFailed(format!(
                "user endpoint returned {}",
                response.status()
            )));
        }

        let profile: ProfileResponse = response
            .json()
            .await
            .map_err(|e| GithubError::ProfileFetchFailed(e.to_string()))?;

        Ok(GithubProfile {
            id: profile.id.to_string(),
            email: profile.email,
            name: profile.name,
            login: profile.login,
        })
    }
}
