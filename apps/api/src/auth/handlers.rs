//! Axum route handlers for the Google login flow.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
    Json,
};
use axum_extra::{headers::Cookie, TypedHeader};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use url::Url;

use crate::auth::google::OAuthError;
use crate::auth::linking::resolve_account;
use crate::auth::state_cookie::STATE_COOKIE_NAME;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/auth/google
///
/// Starts the login: sets the signed state cookie and redirects to Google.
pub async fn handle_google_login(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let (nonce, cookie_value) = state.state_signer.issue()?;
    let url = state.identity.authorization_url(&nonce)?;

    let mut headers = HeaderMap::new();
    state.state_signer.set_cookie(&mut headers, &cookie_value);

    Ok((headers, Redirect::to(&url)))
}

/// GET /api/auth/google/callback
///
/// Never answers with JSON: success redirects to the SPA with `?token=`,
/// any failure to the SPA's sign-in error page.
pub async fn handle_google_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
    cookies: Option<TypedHeader<Cookie>>,
) -> impl IntoResponse {
    let state_cookie = cookies
        .as_ref()
        .and_then(|TypedHeader(c)| c.get(STATE_COOKIE_NAME))
        .map(String::from);

    let mut headers = HeaderMap::new();
    state.state_signer.clear_cookie(&mut headers);

    let target = match complete_login(&state, &params, state_cookie.as_deref()).await {
        Ok(token) => success_redirect(&state.config.frontend_url, &token),
        Err(e) => {
            error!("OAuth callback failed: {e}");
            failure_redirect(&state.config.frontend_url)
        }
    };

    (headers, Redirect::to(&target))
}

async fn complete_login(
    state: &AppState,
    params: &CallbackParams,
    state_cookie: Option<&str>,
) -> Result<String, AppError> {
    if let Some(err) = &params.error {
        return Err(OAuthError::TokenExchange(format!("provider returned error: {err}")).into());
    }
    let code = params
        .code
        .as_deref()
        .ok_or_else(|| OAuthError::TokenExchange("missing authorization code".to_string()))?;
    let returned_state = params.state.as_deref().ok_or(OAuthError::StateMismatch)?;
    let cookie = state_cookie.ok_or(OAuthError::StateMismatch)?;
    state.state_signer.verify(cookie, returned_state)?;

    let access_token = state.identity.exchange_code(code).await?;
    let identity = state.identity.fetch_identity(&access_token).await?;
    let (user, outcome) = resolve_account(state.users.as_ref(), &identity).await?;

    info!("Google login for user {} ({:?})", user.id, outcome);
    Ok(state.tokens.issue(&user)?)
}

fn success_redirect(frontend_url: &str, token: &str) -> String {
    let base = format!("{frontend_url}/");
    Url::parse_with_params(&base, &[("token", token)])
        .map(|u| u.to_string())
        .unwrap_or_else(|_| format!("{base}?token={token}"))
}

fn failure_redirect(frontend_url: &str) -> String {
    format!("{frontend_url}/signin?error=auth_failed")
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the SPA drops its copy. Any pending login state is cleared.
pub async fn handle_logout(State(state): State<AppState>) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    state.state_signer.clear_cookie(&mut headers);
    (
        headers,
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    )
}
