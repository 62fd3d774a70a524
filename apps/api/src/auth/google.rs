//! Google OAuth 2.0 authorization-code flow.
//!
//! The provider is a trait so the callback handler can be exercised without
//! talking to Google.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPES: &str = "openid email profile";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("OAuth token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Failed to parse user profile response")]
    ProfileParse,

    #[error("Google profile has no email address")]
    MissingEmail,

    #[error("OAuth state mismatch")]
    StateMismatch,

    #[error("Email {0} is already linked to a different Google account")]
    AccountMismatch(String),
}

/// The identity Google vouches for after a successful code exchange.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoogleIdentity {
    /// Google's stable subject identifier.
    #[serde(rename = "sub")]
    pub subject: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

impl GoogleIdentity {
    pub fn email(&self) -> Result<&str, OAuthError> {
        self.email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or(OAuthError::MissingEmail)
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL the browser is redirected to; `state` is echoed back on callback.
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError>;

    /// Exchanges an authorization code for an access token.
    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError>;

    /// Fetches the signed-in user's identity with an access token.
    async fn fetch_identity(&self, access_token: &str) -> Result<GoogleIdentity, OAuthError>;
}

pub struct GoogleProvider {
    client: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl GoogleProvider {
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Result<Self, OAuthError> {
        Url::parse(&redirect_uri)?;
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    error_description: Option<String>,
}

#[async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let url = Url::parse_with_params(
            GOOGLE_AUTH_URL,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("state", state),
                ("access_type", "online"),
                ("prompt", "select_account"),
            ],
        )?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .client
            .post(GOOGLE_TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<TokenErrorResponse>(&body)
                .map(|e| match e.error_description {
                    Some(desc) => format!("{}: {desc}", e.error),
                    None => e.error,
                })
                .unwrap_or_else(|_| format!("status {status}"));
            return Err(OAuthError::TokenExchange(message));
        }

        serde_json::from_str::<TokenResponse>(&body)
            .map(|t| t.access_token)
            .map_err(|e| OAuthError::TokenExchange(format!("unexpected token response: {e}")))
    }

    async fn fetch_identity(&self, access_token: &str) -> Result<GoogleIdentity, OAuthError> {
        let identity = self
            .client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await?
            .error_for_status()?
            .json::<GoogleIdentity>()
            .await
            .map_err(|_| OAuthError::ProfileParse)?;

        Ok(identity)
    }
}
